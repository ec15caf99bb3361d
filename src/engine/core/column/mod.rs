pub mod null_mask;

pub use null_mask::NullMask;
