//! Evidence readers: pure file-to-evidence mappers over dependency
//! manifests, one per supported language ecosystem.

pub mod java;
pub mod node;
pub mod python;

use async_trait::async_trait;
use std::path::Path;

use crate::detector::types::ManifestScan;
use crate::error::Result;

/// Reads one ecosystem's dependency manifests and reports every platform
/// anchor found there.
///
/// Readers never decide conflicts: they return all anchors, including
/// contradictory ones, and the anchor resolver classifies the combined
/// evidence. A missing or unreadable manifest is not an error; the reader
/// returns an empty scan and the resolver moves on to the next ecosystem.
#[async_trait]
pub trait ManifestReader: Send + Sync {
    fn name(&self) -> &str;

    async fn scan(&self, root: &Path) -> Result<ManifestScan>;
}

/// Read a file to string, mapping "not found" to `None` and propagating
/// other I/O failures.
pub(crate) async fn read_optional(
    path: &Path,
) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
