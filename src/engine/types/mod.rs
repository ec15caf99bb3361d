use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::errors::ClientError;

/// Declared type of a series. Widths are part of the type: an `Integer`
/// column never accepts a `Long` value and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Binary,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
}

impl DataType {
    pub const ALL: [DataType; 6] = [
        DataType::Binary,
        DataType::Integer,
        DataType::Long,
        DataType::Float,
        DataType::Double,
        DataType::Boolean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Binary => "BINARY",
            DataType::Integer => "INTEGER",
            DataType::Long => "LONG",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Boolean => "BOOLEAN",
        }
    }

    pub fn to_arrow_data_type(&self) -> arrow_schema::DataType {
        match self {
            DataType::Binary => arrow_schema::DataType::Binary,
            DataType::Integer => arrow_schema::DataType::Int32,
            DataType::Long => arrow_schema::DataType::Int64,
            DataType::Float => arrow_schema::DataType::Float32,
            DataType::Double => arrow_schema::DataType::Float64,
            DataType::Boolean => arrow_schema::DataType::Boolean,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BINARY" => Ok(DataType::Binary),
            "INTEGER" => Ok(DataType::Integer),
            "LONG" => Ok(DataType::Long),
            "FLOAT" => Ok(DataType::Float),
            "DOUBLE" => Ok(DataType::Double),
            "BOOLEAN" => Ok(DataType::Boolean),
            _ => Err(ClientError::InvalidArgument(format!(
                "unknown data type '{}'",
                s
            ))),
        }
    }
}

/// A present value of one of the six supported kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Binary(Vec<u8>),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
}

/// One (series, timestamp) slot. `None` means the series has no sample there.
pub type Cell = Option<Value>;

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Binary(_) => DataType::Binary,
            Value::Integer(_) => DataType::Integer,
            Value::Long(_) => DataType::Long,
            Value::Float(_) => DataType::Float,
            Value::Double(_) => DataType::Double,
            Value::Boolean(_) => DataType::Boolean,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Binary(b) => f.write_str(&String::from_utf8_lossy(b)),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Binary(value.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Binary(value.into_bytes())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Binary(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

/// Checks a cell against the declared type of its series. Absent cells carry
/// no type obligation.
pub fn validate(path: &str, cell: &Cell, declared: DataType) -> Result<(), ClientError> {
    match cell {
        Some(value) if value.data_type() != declared => Err(ClientError::TypeMismatch {
            path: path.to_string(),
            expected: declared,
            found: value.data_type(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod types_test;
