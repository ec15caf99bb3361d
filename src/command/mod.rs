pub mod builder;
pub mod parser;
pub mod types;

pub use builder::{aggregate, build, downsample, filtered_range, last_value, plain_range};
pub use types::{AggregateKind, FilterExpr, QueryShape, QuerySpec};

#[cfg(test)]
mod types_test;
