//! Domain logic - version classification independent of the filesystem

pub mod version;

pub use version::{VersionKind, VersionString};
