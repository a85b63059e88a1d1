mod cluster;
mod control;
mod error;
mod resolve;
pub mod volume;

pub use self::{
    cluster::{ClusterError, ClusterId},
    control::FatFileSystem,
    error::Error,
    resolve::{EntryKind, ResolvedEntry},
    volume::fat::ClusterChain,
};
