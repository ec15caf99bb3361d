use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::types::DataType;

/// A series known to the server, as returned by `list_time_series`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDescriptor {
    pub path: String,
    pub data_type: DataType,
}

impl SeriesDescriptor {
    pub fn new(path: impl Into<String>, data_type: DataType) -> Self {
        Self {
            path: path.into(),
            data_type,
        }
    }
}

impl fmt::Display for SeriesDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path, self.data_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub id: u64,
    pub ip: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEngineInfo {
    pub id: u64,
    pub ip: String,
    pub port: u16,
    pub engine: String,
}

/// Cluster topology. Passed through from the server without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub nodes: Vec<NodeInfo>,
    pub storage_engines: Vec<StorageEngineInfo>,
}

impl fmt::Display for ClusterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "front-end nodes:")?;
        for node in &self.nodes {
            writeln!(f, "  #{} {}:{}", node.id, node.ip, node.port)?;
        }
        writeln!(f, "storage engines:")?;
        for engine in &self.storage_engines {
            writeln!(
                f,
                "  #{} {}:{} [{}]",
                engine.id, engine.ip, engine.port, engine.engine
            )?;
        }
        Ok(())
    }
}
