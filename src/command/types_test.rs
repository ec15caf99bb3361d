use std::str::FromStr;

use crate::command::builder::{downsample, filtered_range};
use crate::command::types::{AggregateKind, CompareOp, FilterExpr, QuerySpec};
use crate::engine::errors::ClientError;

#[test]
fn aggregate_kind_names_round_trip() {
    for kind in [
        AggregateKind::Max,
        AggregateKind::Min,
        AggregateKind::Sum,
        AggregateKind::Avg,
        AggregateKind::Count,
        AggregateKind::First,
        AggregateKind::Last,
    ] {
        assert_eq!(AggregateKind::from_str(kind.as_str()).unwrap(), kind);
    }
    assert_eq!(AggregateKind::from_str("max").unwrap(), AggregateKind::Max);
    assert!(matches!(
        AggregateKind::from_str("median"),
        Err(ClientError::InvalidArgument(_))
    ));
}

#[test]
fn compare_op_flip_is_an_involution() {
    for op in [
        CompareOp::Eq,
        CompareOp::Neq,
        CompareOp::Gt,
        CompareOp::Gte,
        CompareOp::Lt,
        CompareOp::Lte,
    ] {
        assert_eq!(op.flipped().flipped(), op);
    }
    assert_eq!(CompareOp::Gte.flipped(), CompareOp::Lte);
}

#[test]
fn filter_expr_keeps_trimmed_text() {
    let filter = FilterExpr::parse("  a > 1  ").unwrap();
    assert_eq!(filter.text(), "a > 1");
    assert!(matches!(
        FilterExpr::parse("a >"),
        Err(ClientError::InvalidFilterSyntax(_))
    ));
}

#[test]
fn query_spec_survives_serialization() {
    let spec = filtered_range(&["test.go.b", "test.go.c"], 0, 100, "test.go.b > 6").unwrap();
    let json = serde_json::to_string(&spec).unwrap();
    let back: QuerySpec = serde_json::from_str(&json).unwrap();
    assert_eq!(back, spec);

    let spec = downsample(&["b"], 0, 10, AggregateKind::First, 3).unwrap();
    let bytes = bincode::serialize(&spec).unwrap();
    let back: QuerySpec = bincode::deserialize(&bytes).unwrap();
    assert_eq!(back.buckets().count(), 4);
}
