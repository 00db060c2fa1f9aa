use attrfilter::query::{DegreeKind, FilterPredicate};
use attrfilter::{
    AttributeScope, ComparisonOp, FilterError, MemoryFilterEngine, Namespace, NamespaceRef, Range,
    Value, ValueType,
};

fn social_graph() -> NamespaceRef {
    Namespace::builder("social")
        .node_column("age", ValueType::Int32)
        .node_column("name", ValueType::String)
        .node_column("active", ValueType::Bool)
        .node_column("rank", ValueType::Int8)
        .edge_column("weight", ValueType::Float64)
        .topology(DegreeKind::Degree)
        .build()
        .expect("namespace builds")
}

fn expect_range(predicate: &FilterPredicate) -> &Range {
    match predicate {
        FilterPredicate::Range { range, .. } | FilterPredicate::Degree { range, .. } => range,
        other => panic!("expected a range predicate, got {other:?}"),
    }
}

#[test]
fn age_greater_than_thirty() {
    let ns = social_graph();
    let engine = MemoryFilterEngine::new();
    let filter = ns.compare("age", &engine).unwrap().gt(30).unwrap();

    let expected = Range::new(Value::Int(30), Value::Int(2_147_483_647), false, true).unwrap();
    match filter.query().predicate() {
        FilterPredicate::Range {
            scope,
            attribute,
            range,
        } => {
            assert_eq!(*scope, AttributeScope::Node);
            assert_eq!(attribute, "age");
            assert_eq!(range, &expected);
        }
        other => panic!("unexpected predicate {other:?}"),
    }
    assert_eq!(
        filter.query().to_string(),
        "node.age in (30, 2147483647]"
    );
}

#[test]
fn age_not_equal_thirty_is_node_negation() {
    let ns = social_graph();
    let engine = MemoryFilterEngine::new();
    let builder = ns.compare("age", &engine).unwrap();
    let filter = builder.ne(30).unwrap();

    let query = filter.query();
    assert_eq!(
        query.predicate(),
        &FilterPredicate::Not {
            scope: AttributeScope::Node
        }
    );
    let [equals] = query.subqueries() else {
        panic!("negation must carry exactly one subquery");
    };
    assert_eq!(
        equals.predicate(),
        &FilterPredicate::Equals {
            scope: AttributeScope::Node,
            attribute: "age".into(),
            value: Value::Int(30),
        }
    );
    assert_eq!(query.to_string(), "NOT[node](node.age == 30)");
}

#[test]
fn name_equality_builds_no_range() {
    let ns = social_graph();
    let engine = MemoryFilterEngine::new();
    let filter = ns.compare("name", &engine).unwrap().eq("Alice").unwrap();
    assert_eq!(
        filter.query().predicate(),
        &FilterPredicate::Equals {
            scope: AttributeScope::Node,
            attribute: "name".into(),
            value: Value::from("Alice"),
        }
    );
    assert!(filter.query().subqueries().is_empty());
    assert_eq!(engine.queries_created(), 1);
}

#[test]
fn name_greater_than_fails_with_type_compatibility() {
    let ns = social_graph();
    let engine = MemoryFilterEngine::new();
    let builder = ns.compare("name", &engine).unwrap();
    for op in [
        ComparisonOp::Gt,
        ComparisonOp::Ge,
        ComparisonOp::Lt,
        ComparisonOp::Le,
    ] {
        let err = builder.compare(op, "Alice").unwrap_err();
        match err {
            FilterError::TypeCompatibility {
                op: failed,
                value_type,
                ..
            } => {
                assert_eq!(failed, op);
                assert_eq!(value_type, ValueType::String);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
    assert_eq!(engine.queries_created(), 0);
}

#[test]
fn boolean_attributes_only_support_equality() {
    let ns = social_graph();
    let engine = MemoryFilterEngine::new();
    let builder = ns.compare("active", &engine).unwrap();
    assert!(builder.eq(true).is_ok());
    assert!(builder.ne(true).is_ok());
    assert_eq!(builder.le(true).unwrap_err().code(), "TypeCompatibility");
}

#[test]
fn edge_attributes_negate_with_edge_scope() {
    let ns = social_graph();
    let engine = MemoryFilterEngine::new();
    let filter = ns.compare("weight", &engine).unwrap().ne(1).unwrap();
    assert_eq!(
        filter.query().predicate(),
        &FilterPredicate::Not {
            scope: AttributeScope::Edge
        }
    );
    assert_eq!(
        filter.query().subqueries()[0].predicate(),
        &FilterPredicate::Equals {
            scope: AttributeScope::Edge,
            attribute: "weight".into(),
            value: Value::Float(1.0),
        }
    );
}

#[test]
fn comparisons_at_domain_edges_stay_well_formed() {
    let ns = social_graph();
    let engine = MemoryFilterEngine::new();
    let rank = ns.compare("rank", &engine).unwrap();

    let above_max = rank.gt(127).unwrap();
    let range = expect_range(above_max.query().predicate());
    assert_eq!(range.lower(), range.upper());
    assert!(range.is_empty());

    let below_min = rank.lt(-128).unwrap();
    let range = expect_range(below_min.query().predicate());
    assert_eq!(range.lower(), &Value::Int(-128));
    assert!(range.is_empty());

    let at_most_max = rank.le(127).unwrap();
    assert!(!expect_range(at_most_max.query().predicate()).is_empty());
}

#[test]
fn operands_outside_the_column_type_are_rejected() {
    let ns = social_graph();
    let engine = MemoryFilterEngine::new();
    let rank = ns.compare("rank", &engine).unwrap();
    for operand in [Value::Int(128), Value::Float(2.5), Value::from("7")] {
        let err = rank.ge(operand.clone()).unwrap_err();
        assert_eq!(err.code(), "TypeCompatibility", "{operand}");
    }
    let weight = ns.compare("weight", &engine).unwrap();
    assert_eq!(
        weight.lt(f64::NAN).unwrap_err().code(),
        "TypeCompatibility"
    );
}

#[test]
fn degree_attributes_use_degree_predicates() {
    let ns = social_graph();
    let engine = MemoryFilterEngine::new();
    let degree = ns.compare("degree", &engine).unwrap();

    let filter = degree.ge(3).unwrap();
    assert!(matches!(
        filter.query().predicate(),
        FilterPredicate::Degree {
            degree: DegreeKind::Degree,
            ..
        }
    ));
    assert_eq!(filter.query().to_string(), "node.degree in [3, 2147483647]");

    let not_two = degree.ne(2).unwrap();
    assert_eq!(not_two.query().to_string(), "NOT[node](node.degree in [2, 2])");

    let not_two = degree.ne("two").unwrap();
    let [equals] = not_two.query().subqueries() else {
        panic!("negation must carry exactly one subquery");
    };
    assert!(expect_range(equals.predicate()).is_empty());

    let fractional = degree.eq(2.5).unwrap();
    assert!(expect_range(fractional.query().predicate()).is_empty());
}

#[test]
fn float32_operands_use_stored_precision() {
    let ns = Namespace::builder("ratings")
        .node_column("score", ValueType::Float32)
        .build()
        .expect("namespace builds");
    let engine = MemoryFilterEngine::new();
    let score = ns.compare("score", &engine).unwrap();
    let stored = Value::Float(f64::from(0.1f32));

    let above = score.gt(0.1).unwrap();
    let range = expect_range(above.query().predicate());
    assert_eq!(range.lower(), &stored);
    assert!(!range.lower_inclusive());

    let equal = score.eq(0.1).unwrap();
    assert_eq!(
        equal.query().predicate(),
        &FilterPredicate::Equals {
            scope: AttributeScope::Node,
            attribute: "score".into(),
            value: stored,
        }
    );
}

#[test]
fn unknown_attribute_is_reported() {
    let ns = social_graph();
    let engine = MemoryFilterEngine::new();
    match ns.compare("height", &engine) {
        Err(FilterError::UnknownAttribute { name }) => assert_eq!(name, "height"),
        Err(other) => panic!("unexpected error {other:?}"),
        Ok(_) => panic!("height is not registered"),
    }
}
