use std::collections::HashMap;

use crate::engine::types::{Cell, DataType, Value};

/// One decoded timestamp: a cell per returned series, in `paths` order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub timestamp: i64,
    pub values: Vec<Cell>,
}

/// Decoded query result, rows ordered by ascending timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    paths: Vec<String>,
    data_types: Vec<DataType>,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub(crate) fn new(paths: Vec<String>, data_types: Vec<DataType>, rows: Vec<ResultRow>) -> Self {
        Self {
            paths,
            data_types,
            rows,
        }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn data_types(&self) -> &[DataType] {
        &self.data_types
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = i64> + '_ {
        self.rows.iter().map(|r| r.timestamp)
    }

    pub fn column_index(&self, path: &str) -> Option<usize> {
        self.paths.iter().position(|p| p == path)
    }

    pub fn data_type_of(&self, path: &str) -> Option<DataType> {
        self.column_index(path).map(|i| self.data_types[i])
    }

    /// All cells of one series, one per row.
    pub fn column(&self, path: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(path)?;
        Some(self.rows.iter().map(|r| &r.values[idx]).collect())
    }

    pub fn value(&self, row: usize, path: &str) -> Option<&Value> {
        let idx = self.column_index(path)?;
        self.rows.get(row)?.values.get(idx)?.as_ref()
    }

    pub fn into_rows(self) -> Vec<ResultRow> {
        self.rows
    }
}

/// Types the caller expects for named series. Series without an entry are
/// only checked against the type the response itself declares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpectedTypes {
    pinned: HashMap<String, DataType>,
}

impl ExpectedTypes {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, DataType)>,
        P: Into<String>,
    {
        Self {
            pinned: pairs.into_iter().map(|(p, t)| (p.into(), t)).collect(),
        }
    }

    pub fn pin(mut self, path: impl Into<String>, data_type: DataType) -> Self {
        self.pinned.insert(path.into(), data_type);
        self
    }

    pub fn get(&self, path: &str) -> Option<DataType> {
        self.pinned.get(path).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty()
    }
}
