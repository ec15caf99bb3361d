use serde::{Deserialize, Serialize};

use crate::engine::core::column::NullMask;
use crate::engine::types::{Cell, DataType, Value};

/// Whether every series is expected at every timestamp of the batch.
/// The encoding is the same either way; the flag tells the server whether to
/// place the batch densely or sparsely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Aligned,
    NonAligned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layout {
    Row,
    Column,
}

/// Selects one of the four insertion shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InsertShape {
    pub layout: Layout,
    pub alignment: Alignment,
}

impl InsertShape {
    pub const ROW_ALIGNED: InsertShape = InsertShape {
        layout: Layout::Row,
        alignment: Alignment::Aligned,
    };
    pub const ROW_NON_ALIGNED: InsertShape = InsertShape {
        layout: Layout::Row,
        alignment: Alignment::NonAligned,
    };
    pub const COLUMN_ALIGNED: InsertShape = InsertShape {
        layout: Layout::Column,
        alignment: Alignment::Aligned,
    };
    pub const COLUMN_NON_ALIGNED: InsertShape = InsertShape {
        layout: Layout::Column,
        alignment: Alignment::NonAligned,
    };
}

/// Caller-side cells, either one `Vec` per timestamp or one per series.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertValues {
    Rows(Vec<Vec<Cell>>),
    Columns(Vec<Vec<Cell>>),
}

impl InsertValues {
    pub fn layout(&self) -> Layout {
        match self {
            InsertValues::Rows(_) => Layout::Row,
            InsertValues::Columns(_) => Layout::Column,
        }
    }
}

/// One row or one column: presence bitmap plus the dense run of present
/// values, in cell order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedSlice {
    pub bitmap: NullMask,
    pub values: Vec<Value>,
}

impl EncodedSlice {
    pub fn encode(cells: Vec<Cell>) -> Self {
        let (bitmap, values) = NullMask::split(cells);
        Self { bitmap, values }
    }

    pub fn is_consistent(&self) -> bool {
        self.bitmap.count_present() == self.values.len()
    }
}

/// Row-major batch: one slice per timestamp, each masked over `paths`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowBatch {
    pub paths: Vec<String>,
    pub data_types: Vec<DataType>,
    pub timestamps: Vec<i64>,
    pub rows: Vec<EncodedSlice>,
    pub alignment: Alignment,
}

/// Column-major batch: one slice per path, each masked over `timestamps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnBatch {
    pub paths: Vec<String>,
    pub data_types: Vec<DataType>,
    pub timestamps: Vec<i64>,
    pub columns: Vec<EncodedSlice>,
    pub alignment: Alignment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EncodedBatch {
    Rows(RowBatch),
    Columns(ColumnBatch),
}

impl EncodedBatch {
    pub fn paths(&self) -> &[String] {
        match self {
            EncodedBatch::Rows(b) => &b.paths,
            EncodedBatch::Columns(b) => &b.paths,
        }
    }

    pub fn data_types(&self) -> &[DataType] {
        match self {
            EncodedBatch::Rows(b) => &b.data_types,
            EncodedBatch::Columns(b) => &b.data_types,
        }
    }

    pub fn timestamps(&self) -> &[i64] {
        match self {
            EncodedBatch::Rows(b) => &b.timestamps,
            EncodedBatch::Columns(b) => &b.timestamps,
        }
    }

    pub fn alignment(&self) -> Alignment {
        match self {
            EncodedBatch::Rows(b) => b.alignment,
            EncodedBatch::Columns(b) => b.alignment,
        }
    }

    pub fn slices(&self) -> &[EncodedSlice] {
        match self {
            EncodedBatch::Rows(b) => &b.rows,
            EncodedBatch::Columns(b) => &b.columns,
        }
    }

    /// Number of present cells across the whole batch.
    pub fn present_count(&self) -> usize {
        self.slices().iter().map(|s| s.values.len()).sum()
    }
}
