//! Discovery of views and static files in a project tree.
//!
//! Locators are pluggable: several can be combined and their results are
//! concatenated in locator order. Each locator sorts its own output by
//! relative path, and a locator that finds nothing returns an empty list.

pub mod razor;
pub mod static_files;

use r4mvc_core::model::{StaticFile, View};
use std::path::Path;

pub use razor::RazorViewLocator;
pub use static_files::WebRootLocator;

/// Finds views belonging to controllers.
pub trait ViewLocator {
    fn find(&self, project_root: &Path) -> Vec<View>;
}

/// Finds static assets.
pub trait StaticFileLocator {
    fn find(&self, project_root: &Path) -> Vec<StaticFile>;
}

/// Run every view locator and concatenate their results.
pub fn discover_views(project_root: &Path, locators: &[Box<dyn ViewLocator>]) -> Vec<View> {
    locators
        .iter()
        .flat_map(|l| l.find(project_root))
        .collect()
}

/// Run every static-file locator and concatenate their results.
pub fn discover_static_files(
    project_root: &Path,
    locators: &[Box<dyn StaticFileLocator>],
) -> Vec<StaticFile> {
    locators
        .iter()
        .flat_map(|l| l.find(project_root))
        .collect()
}

/// `a/b/c.txt` with forward slashes regardless of platform.
pub(crate) fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Regular files below `dir`, skipping hidden entries. Unreadable entries
/// are logged and skipped.
pub(crate) fn walk_files(dir: &Path) -> Vec<std::path::PathBuf> {
    let walker = ignore::WalkBuilder::new(dir)
        .hidden(true)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_some_and(|t| t.is_file()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => tracing::debug!("skipping unreadable entry under {}: {}", dir.display(), e),
        }
    }
    files
}
