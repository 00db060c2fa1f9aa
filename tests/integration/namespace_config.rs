use std::fs;

use attrfilter::query::{DegreeKind, FilterPredicate};
use attrfilter::{ConfigError, MemoryFilterEngine, ScriptingConfig, Value, ValueType};
use tempfile::tempdir;

const CONFIG: &str = r#"
namespace = "movies"

[log]
filter = "attrfilter=debug"

[domain]
disabled = ["float32"]

[domain.bounds.int64]
min = -9007199254740991
max = 9007199254740991
"#;

#[test]
fn loads_config_from_file_and_builds_namespace() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scripting.toml");
    fs::write(&path, CONFIG).unwrap();

    let config = ScriptingConfig::load(Some(path.clone())).unwrap();
    assert_eq!(config.path(), Some(path.as_path()));
    assert_eq!(config.log_filter(), "attrfilter=debug");
    config.init_tracing();

    let ns = config
        .namespace_builder()
        .node_column("votes", ValueType::Int64)
        .node_column("score", ValueType::Float32)
        .build()
        .unwrap();
    assert_eq!(ns.name(), "movies");

    let engine = MemoryFilterEngine::new();
    let votes = ns.compare("votes", &engine).unwrap().gt(1_000).unwrap();
    match votes.query().predicate() {
        FilterPredicate::Range { range, .. } => {
            assert_eq!(range.upper(), &Value::Int(9_007_199_254_740_991));
        }
        other => panic!("unexpected predicate {other:?}"),
    }

    // Beyond the narrowed domain.
    let err = ns
        .compare("votes", &engine)
        .unwrap()
        .lt(i64::MAX)
        .unwrap_err();
    assert_eq!(err.code(), "TypeCompatibility");

    // Disabled domain: ordering fails, equality still works.
    let score = ns.compare("score", &engine).unwrap();
    let err = score.ge(4.5).unwrap_err();
    assert!(err.to_string().contains("float32"), "{err}");
    assert!(score.eq(4.5).is_ok());
    assert!(score.ne(4.5).is_ok());
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let config = ScriptingConfig::load(Some(dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config.namespace(), "graph");
    assert!(config.domains().contains(ValueType::Float32));
}

#[test]
fn malformed_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "namespace = [").unwrap();
    match ScriptingConfig::load(Some(path.clone())) {
        Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn degree_equality_ignores_disabled_domain() {
    let config = ScriptingConfig::from_toml_str("[domain]\ndisabled = [\"int32\"]").unwrap();
    let ns = config
        .namespace_builder()
        .topology(DegreeKind::InDegree)
        .build()
        .unwrap();
    let engine = MemoryFilterEngine::new();
    let indegree = ns.compare("indegree", &engine).unwrap();

    assert_eq!(indegree.gt(3).unwrap_err().code(), "TypeCompatibility");
    let exact = indegree.eq(3).unwrap();
    assert_eq!(exact.query().to_string(), "node.indegree in [3, 3]");
    assert!(indegree.ne(3).is_ok());
}
