pub mod batch;
pub mod batch_encoder;

pub use batch::{
    Alignment, ColumnBatch, EncodedBatch, EncodedSlice, InsertShape, InsertValues, Layout,
    RowBatch,
};
pub use batch_encoder::{
    encode, encode_column_aligned, encode_column_non_aligned, encode_row_aligned,
    encode_row_non_aligned,
};
