//! Kubernetes access: connection, listing and ID to name lookups.

pub mod client;
pub mod labels;
pub mod list;
pub mod names;

pub use client::{ClusterConnection, ConnectionError, ConnectionOptions};
pub use labels::LabelSet;
pub use list::{ListError, NamespacedResource};
pub use names::NameMap;
