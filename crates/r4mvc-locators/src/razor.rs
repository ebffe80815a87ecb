//! Razor views under `Views/<Controller>/`.

use crate::{ViewLocator, to_slash, walk_files};
use r4mvc_core::config::LocatorConfig;
use r4mvc_core::model::View;
use std::path::{Path, PathBuf};

/// Finds `<views_folder>/<Controller>/**/<View>.<ext>` files.
///
/// Files directly inside the views folder (`_ViewImports.cshtml`,
/// `_ViewStart.cshtml`) belong to no controller and are skipped.
#[derive(Debug, Clone)]
pub struct RazorViewLocator {
    views_folder: PathBuf,
    extensions: Vec<String>,
}

impl Default for RazorViewLocator {
    fn default() -> Self {
        Self::new("Views", ["cshtml"])
    }
}

impl RazorViewLocator {
    pub fn new(
        views_folder: impl Into<PathBuf>,
        extensions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            views_folder: views_folder.into(),
            extensions: extensions
                .into_iter()
                .map(|e| e.into().to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &LocatorConfig) -> Self {
        Self::new(&config.views_folder, config.view_extensions.iter().cloned())
    }

    fn has_view_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

impl ViewLocator for RazorViewLocator {
    fn find(&self, project_root: &Path) -> Vec<View> {
        let views_dir = project_root.join(&self.views_folder);
        if !views_dir.is_dir() {
            tracing::debug!("no views folder at {}", views_dir.display());
            return Vec::new();
        }

        let mut views = Vec::new();
        for path in walk_files(&views_dir) {
            if !self.has_view_extension(&path) {
                continue;
            }
            let Ok(in_views) = path.strip_prefix(&views_dir) else {
                continue;
            };
            let mut components = in_views.components();
            let (Some(controller), Some(_)) = (components.next(), components.next()) else {
                continue;
            };
            let Some(view_name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let relative = path.strip_prefix(project_root).unwrap_or(&path);
            views.push(View::new(
                controller.as_os_str().to_string_lossy(),
                view_name,
                to_slash(relative),
            ));
        }
        views.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        views
    }
}
