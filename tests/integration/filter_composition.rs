use std::sync::Arc;
use std::thread;

use attrfilter::query::FilterPredicate;
use attrfilter::{
    AttributeScope, FilterEngine, FilterError, MemoryFilterEngine, Namespace, NamespaceRef,
    ValueType,
};

fn graph(name: &str) -> NamespaceRef {
    Namespace::builder(name)
        .node_column("age", ValueType::Int32)
        .node_column("city", ValueType::String)
        .edge_column("weight", ValueType::Float64)
        .build()
        .expect("namespace builds")
}

#[test]
fn and_or_build_composite_queries() {
    let ns = graph("social");
    let engine = MemoryFilterEngine::new();
    let adults = ns.compare("age", &engine).unwrap().ge(18).unwrap();
    let berlin = ns.compare("city", &engine).unwrap().eq("Berlin").unwrap();
    let paris = ns.compare("city", &engine).unwrap().eq("Paris").unwrap();

    let cities = berlin.or(paris, &engine).unwrap();
    assert_eq!(cities.query().predicate(), &FilterPredicate::Union);
    assert_eq!(cities.query().scope(), Some(AttributeScope::Node));

    let both = adults.and(cities, &engine).unwrap();
    assert_eq!(both.query().predicate(), &FilterPredicate::Intersection);
    assert_eq!(both.query().subqueries().len(), 2);
    assert_eq!(
        both.query().to_string(),
        r#"(node.age in [18, 2147483647] AND (node.city == "Berlin" OR node.city == "Paris"))"#
    );
    assert!(both.namespace().same_as(&ns));
}

#[test]
fn not_negates_with_the_filter_scope() {
    let ns = graph("social");
    let engine = MemoryFilterEngine::new();
    let heavy = ns.compare("weight", &engine).unwrap().gt(0.5).unwrap();
    let light = heavy.not(&engine).unwrap();
    assert_eq!(
        light.query().predicate(),
        &FilterPredicate::Not {
            scope: AttributeScope::Edge
        }
    );
}

#[test]
fn double_negation_nests_queries() {
    let ns = graph("social");
    let engine = MemoryFilterEngine::new();
    let not_thirty = ns.compare("age", &engine).unwrap().ne(30).unwrap();
    let again = not_thirty.not(&engine).unwrap();
    assert_eq!(
        again.query().to_string(),
        "NOT[node](NOT[node](node.age == 30))"
    );
}

#[test]
fn combining_across_namespaces_fails() {
    let left = graph("left");
    let right = graph("right");
    let engine = MemoryFilterEngine::new();
    let a = left.compare("age", &engine).unwrap().lt(10).unwrap();
    let b = right.compare("age", &engine).unwrap().lt(10).unwrap();
    let err = a.and(b, &engine).unwrap_err();
    assert_eq!(
        err,
        FilterError::NamespaceMismatch {
            left: "left".into(),
            right: "right".into(),
        }
    );
}

#[test]
fn filters_render_as_json() {
    let ns = graph("social");
    let engine = MemoryFilterEngine::new();
    let filter = ns.compare("age", &engine).unwrap().ne(30).unwrap();
    let json: serde_json::Value = serde_json::from_str(&filter.to_json().unwrap()).unwrap();
    assert_eq!(json["predicate"]["kind"], "not");
    assert_eq!(json["predicate"]["scope"], "node");
    let child = &json["subqueries"][0]["predicate"];
    assert_eq!(child["kind"], "equals");
    assert_eq!(child["value"], serde_json::json!({"t": "Int", "v": 30}));
}

#[test]
fn works_through_a_dyn_engine() {
    let ns = graph("social");
    let engine: Box<dyn FilterEngine> = Box::new(MemoryFilterEngine::new());
    let filter = ns.compare("age", engine.as_ref()).unwrap().le(65).unwrap();
    assert!(matches!(
        filter.query().predicate(),
        FilterPredicate::Range { .. }
    ));
}

#[test]
fn concurrent_comparisons_get_distinct_ids() {
    let ns = graph("social");
    let engine = Arc::new(MemoryFilterEngine::new());
    let handles: Vec<_> = (0..4i64)
        .map(|i| {
            let ns = ns.clone();
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                (0..25i64)
                    .map(|j| {
                        ns.compare("age", engine.as_ref())
                            .unwrap()
                            .ne(i * 100 + j)
                            .unwrap()
                            .query()
                            .id()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let mut ids: Vec<_> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 100);
    // Each `ne` creates an equality query and a negation query.
    assert_eq!(engine.queries_created(), 200);
}
