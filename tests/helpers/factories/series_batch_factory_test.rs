use crate::engine::types::{DataType, Value};
use crate::test_helpers::factories::SeriesBatchFactory;

#[test]
fn builds_six_typed_series() {
    let f = SeriesBatchFactory::new();
    assert_eq!(f.paths()[0], "test.go.a");
    assert_eq!(f.types()[5], DataType::Boolean);
    assert_eq!(f.timestamps(), vec![1, 2, 3, 4, 5, 6, 7]);
    assert!(f.rows().iter().flatten().all(Option::is_some));
}

#[test]
fn sample_nulls_walk_the_diagonal() {
    let f = SeriesBatchFactory::new().with_sample_nulls();
    let rows = f.rows();
    assert!(rows[2][1].is_none());
    assert!(rows[6][5].is_none());
    assert_eq!(rows[3][1], Some(Value::Integer(4)));
    assert_eq!(f.columns()[1].iter().filter(|c| c.is_none()).count(), 1);
}

#[test]
fn prefix_and_row_count_are_configurable() {
    let f = SeriesBatchFactory::new().with_prefix("root.sg").with_rows(3);
    assert_eq!(f.paths()[2], "root.sg.c");
    assert_eq!(f.rows().len(), 3);
    assert_eq!(f.columns()[0].len(), 3);
}
