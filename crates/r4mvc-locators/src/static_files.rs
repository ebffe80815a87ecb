//! Static assets below the web root.

use crate::{StaticFileLocator, to_slash, walk_files};
use globset::{Glob, GlobSet, GlobSetBuilder};
use r4mvc_core::config::LocatorConfig;
use r4mvc_core::model::StaticFile;
use std::path::{Path, PathBuf};

/// Every file below the web root (`wwwroot` by default), minus exclusions.
/// Paths are relative to the web root.
#[derive(Debug, Clone)]
pub struct WebRootLocator {
    static_root: PathBuf,
    exclude: GlobSet,
}

impl Default for WebRootLocator {
    fn default() -> Self {
        Self::new("wwwroot", &[])
    }
}

impl WebRootLocator {
    /// Invalid exclude patterns are logged and ignored.
    pub fn new(static_root: impl Into<PathBuf>, exclude: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in exclude {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => tracing::warn!("ignoring invalid static exclude {:?}: {}", pattern, e),
            }
        }
        let exclude = builder.build().unwrap_or_else(|e| {
            tracing::warn!("ignoring static excludes: {}", e);
            GlobSet::empty()
        });
        Self {
            static_root: static_root.into(),
            exclude,
        }
    }

    pub fn from_config(config: &LocatorConfig) -> Self {
        Self::new(&config.static_root, &config.static_exclude)
    }
}

impl StaticFileLocator for WebRootLocator {
    fn find(&self, project_root: &Path) -> Vec<StaticFile> {
        let root = project_root.join(&self.static_root);
        if !root.is_dir() {
            tracing::debug!("no static root at {}", root.display());
            return Vec::new();
        }

        let mut files = Vec::new();
        for path in walk_files(&root) {
            let Ok(relative) = path.strip_prefix(&root) else {
                continue;
            };
            if self.exclude.is_match(relative) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            files.push(StaticFile::new(file_name, to_slash(relative)));
        }
        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        files
    }
}
