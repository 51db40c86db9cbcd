// src/graph/mod.rs
//! Recommendation-network graphs: construction, SCCs, bow-tie regions.

pub mod adjacency;
pub mod bowtie;
pub mod builder;
pub mod persistent;
pub mod scc;
pub mod types;

pub use adjacency::Adjacency;
pub use builder::GraphBuilder;
pub use scc::{strongly_connected, Scc};
pub use types::{EdgeRecord, IncomingRecords, NodeId, TargetRecords};
