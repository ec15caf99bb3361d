pub mod client;
pub mod metadata;

pub use client::Session;
pub use metadata::{ClusterInfo, NodeInfo, SeriesDescriptor, StorageEngineInfo};
