pub mod result_decoder;
pub mod result_table;

pub use result_decoder::{RawBatch, decode};
pub use result_table::{ExpectedTypes, ResultRow, ResultTable};

#[cfg(test)]
mod result_decoder_test;
