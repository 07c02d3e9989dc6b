//! Artifact repository layer for blobtree.
//!
//! Maps the artifact-repository contract of an experiment tracker
//! (log a file or a directory, list, download, delete) onto an
//! [`ObjectStore`](blobtree_overlay::ObjectStore) overlay.
//!
//! The [`ArtifactRegistry`] hands out repositories by URI scheme. It owns a
//! [`ClientCache`] of connected digest store clients, which expire after a
//! configurable time to live and are reconnected on next use, and one
//! overlay per artifact URI, so the path index outlives the clients.

pub mod cache;
pub mod config;
pub mod error;
pub mod registry;
pub mod repository;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{ClientCache, Connector, HttpConnector};
pub use config::{CacheConfig, RepoConfig};
pub use error::{RepoError, RepoResult};
pub use registry::ArtifactRegistry;
pub use repository::{verify_artifact_path, ArtifactRepository, FileInfo};
