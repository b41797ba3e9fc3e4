//! Publishing component manifests to disk.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::shared::types::ComponentManifest;

/// Writes the manifests as a JSON array to `path`, creating parent directories as needed.
#[tracing::instrument(skip_all, fields(path = ?path.as_ref()))]
pub fn write_manifest(path: impl AsRef<Path>, manifests: &[ComponentManifest]) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(manifests)?;
    info!(components = manifests.len(), "Writing manifest");
    fs::write(path, content)?;
    Ok(())
}
