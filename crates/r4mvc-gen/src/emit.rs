//! Write rendered output to disk.

use anyhow::{Context, Result};
use r4mvc_core::config::GenerationSettings;
use std::path::{Path, PathBuf};

/// Where the generated file goes for a project directory.
pub fn output_path(project_dir: &Path, settings: &GenerationSettings) -> PathBuf {
    project_dir.join(&settings.output_file)
}

/// Write `text` to `destination`, creating parent directories.
///
/// Returns `false` without touching the file when it already holds exactly
/// `text`, so build tools watching timestamps do not rebuild needlessly.
pub fn write(text: &str, destination: &Path) -> Result<bool> {
    if let Ok(existing) = std::fs::read(destination)
        && existing == text.as_bytes()
    {
        tracing::debug!("{} is up to date", destination.display());
        return Ok(false);
    }
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(destination, text)
        .with_context(|| format!("failed to write {}", destination.display()))?;
    Ok(true)
}
