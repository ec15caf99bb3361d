pub mod arrow;
pub mod types;

pub use arrow::to_record_batch;
pub use types::{Response, ResponseBody, StatusCode};
