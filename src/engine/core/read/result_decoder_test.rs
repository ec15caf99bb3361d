use crate::engine::core::column::NullMask;
use crate::engine::core::read::result_decoder::decode;
use crate::engine::core::read::result_table::ExpectedTypes;
use crate::engine::core::write::batch::{Alignment, EncodedBatch, EncodedSlice, RowBatch};
use crate::engine::core::write::batch_encoder::{encode_column_non_aligned, encode_row_aligned};
use crate::engine::errors::ClientError;
use crate::engine::types::{DataType, Value};
use crate::test_helpers::factory::Factory;

#[test]
fn row_batch_round_trips_with_nulls() {
    let fixture = Factory::series_batch().with_sample_nulls();
    let batch = encode_row_aligned(
        &fixture.paths(),
        &fixture.timestamps(),
        fixture.rows(),
        &fixture.types(),
    )
    .unwrap();

    let table = decode(EncodedBatch::Rows(batch), &ExpectedTypes::any()).unwrap();

    assert_eq!(table.paths(), fixture.paths().as_slice());
    assert_eq!(table.data_types(), fixture.types().as_slice());
    assert_eq!(table.timestamps().collect::<Vec<_>>(), fixture.timestamps());
    let decoded: Vec<_> = table.rows().iter().map(|r| r.values.clone()).collect();
    assert_eq!(decoded, fixture.rows());
}

#[test]
fn column_batch_round_trips_through_wire_form() {
    let fixture = Factory::series_batch().with_sample_nulls();
    let batch = encode_column_non_aligned(
        &fixture.paths(),
        &fixture.timestamps(),
        fixture.columns(),
        &fixture.types(),
    )
    .unwrap();
    let wire = bincode::serialize(&EncodedBatch::Columns(batch)).unwrap();
    let raw: EncodedBatch = bincode::deserialize(&wire).unwrap();

    let table = decode(raw, &ExpectedTypes::from_pairs(
        fixture.paths().into_iter().zip(fixture.types()),
    ))
    .unwrap();

    let decoded: Vec<_> = table.rows().iter().map(|r| r.values.clone()).collect();
    assert_eq!(decoded, fixture.rows());
    assert_eq!(table.value(2, "test.go.b"), None);
    assert_eq!(table.value(3, "test.go.b"), Some(&Value::Integer(4)));
}

#[test]
fn rows_are_sorted_by_timestamp() {
    let raw = RowBatch {
        paths: vec!["a".into()],
        data_types: vec![DataType::Long],
        timestamps: vec![30, 10, 20],
        rows: vec![
            EncodedSlice::encode(vec![Some(Value::Long(3))]),
            EncodedSlice::encode(vec![Some(Value::Long(1))]),
            EncodedSlice::encode(vec![None]),
        ],
        alignment: Alignment::Aligned,
    };

    let table = decode(EncodedBatch::Rows(raw), &ExpectedTypes::any()).unwrap();
    assert_eq!(table.timestamps().collect::<Vec<_>>(), vec![10, 20, 30]);
    assert_eq!(table.value(0, "a"), Some(&Value::Long(1)));
    assert_eq!(table.value(1, "a"), None);
}

#[test]
fn absent_cells_are_not_filled_in() {
    let raw = RowBatch {
        paths: vec!["a".into(), "b".into()],
        data_types: vec![DataType::Double, DataType::Boolean],
        timestamps: vec![1],
        rows: vec![EncodedSlice::encode(vec![None, Some(Value::Boolean(false))])],
        alignment: Alignment::NonAligned,
    };
    let table = decode(EncodedBatch::Rows(raw), &ExpectedTypes::any()).unwrap();
    assert_eq!(table.rows()[0].values, vec![None, Some(Value::Boolean(false))]);
}

#[test]
fn value_kind_drift_is_malformed() {
    let raw = RowBatch {
        paths: vec!["a".into()],
        data_types: vec![DataType::Long],
        timestamps: vec![1],
        rows: vec![EncodedSlice::encode(vec![Some(Value::Integer(1))])],
        alignment: Alignment::Aligned,
    };
    assert!(matches!(
        decode(EncodedBatch::Rows(raw), &ExpectedTypes::any()),
        Err(ClientError::MalformedResponse(_))
    ));
}

#[test]
fn declared_type_must_match_expectation() {
    let raw = RowBatch {
        paths: vec!["a".into()],
        data_types: vec![DataType::Double],
        timestamps: vec![1],
        rows: vec![EncodedSlice::encode(vec![Some(Value::Double(1.0))])],
        alignment: Alignment::Aligned,
    };
    let expected = ExpectedTypes::any().pin("a", DataType::Float);
    assert!(matches!(
        decode(EncodedBatch::Rows(raw), &expected),
        Err(ClientError::MalformedResponse(_))
    ));
}

#[test]
fn bitmap_value_count_drift_is_malformed() {
    assert!(EncodedSlice::encode(vec![None, Some(Value::Long(2))]).is_consistent());

    let (bitmap, _) = NullMask::split(vec![Some(Value::Long(1)), Some(Value::Long(2))]);
    let short = EncodedSlice {
        bitmap,
        values: vec![Value::Long(1)],
    };
    assert!(!short.is_consistent());

    let raw = RowBatch {
        paths: vec!["a".into(), "b".into()],
        data_types: vec![DataType::Long, DataType::Long],
        timestamps: vec![1],
        rows: vec![short],
        alignment: Alignment::Aligned,
    };
    match decode(EncodedBatch::Rows(raw), &ExpectedTypes::any()) {
        Err(ClientError::MalformedResponse(msg)) => assert!(msg.contains("2 present"), "{msg}"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn header_and_slice_counts_are_checked() {
    let short_types = RowBatch {
        paths: vec!["a".into(), "b".into()],
        data_types: vec![DataType::Long],
        timestamps: vec![],
        rows: vec![],
        alignment: Alignment::Aligned,
    };
    assert!(decode(EncodedBatch::Rows(short_types), &ExpectedTypes::any()).is_err());

    let missing_row = RowBatch {
        paths: vec!["a".into()],
        data_types: vec![DataType::Long],
        timestamps: vec![1, 2],
        rows: vec![EncodedSlice::encode(vec![None])],
        alignment: Alignment::Aligned,
    };
    assert!(decode(EncodedBatch::Rows(missing_row), &ExpectedTypes::any()).is_err());

    let wide_row = RowBatch {
        paths: vec!["a".into()],
        data_types: vec![DataType::Long],
        timestamps: vec![1],
        rows: vec![EncodedSlice::encode(vec![None, None])],
        alignment: Alignment::Aligned,
    };
    assert!(decode(EncodedBatch::Rows(wide_row), &ExpectedTypes::any()).is_err());
}

#[test]
fn duplicate_timestamps_are_malformed() {
    let raw = RowBatch {
        paths: vec!["a".into()],
        data_types: vec![DataType::Long],
        timestamps: vec![5, 5],
        rows: vec![
            EncodedSlice::encode(vec![None]),
            EncodedSlice::encode(vec![None]),
        ],
        alignment: Alignment::Aligned,
    };
    assert!(matches!(
        decode(EncodedBatch::Rows(raw), &ExpectedTypes::any()),
        Err(ClientError::MalformedResponse(_))
    ));
}

#[test]
fn empty_result_decodes_to_empty_table() {
    let raw = RowBatch {
        paths: vec!["a".into()],
        data_types: vec![DataType::Binary],
        timestamps: vec![],
        rows: vec![],
        alignment: Alignment::Aligned,
    };
    let table = decode(EncodedBatch::Rows(raw), &ExpectedTypes::any()).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.data_type_of("a"), Some(DataType::Binary));
}
