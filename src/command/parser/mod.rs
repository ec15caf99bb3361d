pub mod error;
pub mod filter;
pub mod tokenizer;

pub use error::ParseError;
pub use filter::parse_filter;
