pub mod column;
pub mod read;
pub mod write;
