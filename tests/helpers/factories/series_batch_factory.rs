use crate::engine::types::{Cell, DataType, Value};

const NAMES: [&str; 7] = ["one", "two", "three", "four", "five", "six", "seven"];

/// Six series of every data type over timestamps 1..=7.
pub struct SeriesBatchFactory {
    prefix: String,
    rows: usize,
    nulls: Vec<(usize, usize)>,
}

impl SeriesBatchFactory {
    pub fn new() -> Self {
        Self {
            prefix: "test.go".to_string(),
            rows: NAMES.len(),
            nulls: Vec::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows.min(NAMES.len());
        self
    }

    pub fn with_null(mut self, row: usize, column: usize) -> Self {
        self.nulls.push((row, column));
        self
    }

    /// One missing cell per row from the third row on, walking the diagonal.
    pub fn with_sample_nulls(self) -> Self {
        (2..7).fold(self, |f, row| f.with_null(row, row - 1))
    }

    pub fn paths(&self) -> Vec<String> {
        ["a", "b", "c", "d", "e", "f"]
            .iter()
            .map(|s| format!("{}.{}", self.prefix, s))
            .collect()
    }

    pub fn types(&self) -> Vec<DataType> {
        DataType::ALL.to_vec()
    }

    pub fn timestamps(&self) -> Vec<i64> {
        (1..=self.rows as i64).collect()
    }

    pub fn rows(&self) -> Vec<Vec<Cell>> {
        (0..self.rows)
            .map(|row| {
                let i = row as i32 + 1;
                let values = [
                    Value::from(NAMES[row]),
                    Value::Integer(i),
                    Value::Long(i as i64),
                    Value::Float(i as f32 + 0.1),
                    Value::Double(i as f64 + 0.1),
                    Value::Boolean(row % 2 == 0),
                ];
                values
                    .into_iter()
                    .enumerate()
                    .map(|(col, v)| (!self.nulls.contains(&(row, col))).then_some(v))
                    .collect()
            })
            .collect()
    }

    pub fn columns(&self) -> Vec<Vec<Cell>> {
        let rows = self.rows();
        (0..6)
            .map(|col| rows.iter().map(|r| r[col].clone()).collect())
            .collect()
    }
}
