use std::str::FromStr;

use crate::engine::errors::ClientError;
use crate::engine::types::{Cell, DataType, Value, validate};

#[test]
fn data_type_of_each_value_kind() {
    assert_eq!(Value::from("x").data_type(), DataType::Binary);
    assert_eq!(Value::from(1i32).data_type(), DataType::Integer);
    assert_eq!(Value::from(1i64).data_type(), DataType::Long);
    assert_eq!(Value::from(1.5f32).data_type(), DataType::Float);
    assert_eq!(Value::from(1.5f64).data_type(), DataType::Double);
    assert_eq!(Value::from(true).data_type(), DataType::Boolean);
}

#[test]
fn validate_accepts_matching_and_absent_cells() {
    assert!(validate("a", &Some(Value::Long(3)), DataType::Long).is_ok());
    for ty in DataType::ALL {
        assert!(validate("a", &None, ty).is_ok(), "absent must validate for {ty}");
    }
}

#[test]
fn validate_never_widens_integers() {
    let cell: Cell = Some(Value::Integer(7));
    let err = validate("test.go.c", &cell, DataType::Long).unwrap_err();
    assert_eq!(
        err,
        ClientError::TypeMismatch {
            path: "test.go.c".into(),
            expected: DataType::Long,
            found: DataType::Integer,
        }
    );
}

#[test]
fn validate_rejects_float_in_double_column() {
    let cell: Cell = Some(Value::Float(1.1));
    assert!(matches!(
        validate("d", &cell, DataType::Double),
        Err(ClientError::TypeMismatch { .. })
    ));
}

#[test]
fn data_type_parses_case_insensitively() {
    assert_eq!(DataType::from_str("binary").unwrap(), DataType::Binary);
    assert_eq!(DataType::from_str("DOUBLE").unwrap(), DataType::Double);
    assert!(DataType::from_str("decimal").is_err());
    for ty in DataType::ALL {
        assert_eq!(DataType::from_str(&ty.to_string()).unwrap(), ty);
    }
}

#[test]
fn value_display_renders_binary_as_text() {
    assert_eq!(Value::from("seven").to_string(), "seven");
    assert_eq!(Value::Boolean(false).to_string(), "false");
}

#[test]
fn arrow_types_keep_width() {
    assert_eq!(
        DataType::Integer.to_arrow_data_type(),
        arrow_schema::DataType::Int32
    );
    assert_eq!(
        DataType::Float.to_arrow_data_type(),
        arrow_schema::DataType::Float32
    );
}
