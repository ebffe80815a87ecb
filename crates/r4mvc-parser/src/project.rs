//! Collect the C# sources of a project directory.

use globset::{Glob, GlobSet, GlobSetBuilder};
use r4mvc_core::GenerationError;
use std::path::{Path, PathBuf};

/// One C# source file, path relative to the project directory.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

pub(crate) fn build_globset(root: &Path, patterns: &[String]) -> Result<GlobSet, GenerationError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| GenerationError::malformed(root, format!("invalid glob {pattern:?}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| GenerationError::malformed(root, format!("invalid glob set: {e}")))
}

fn is_output_file(path: &Path, output_path: Option<&Path>) -> bool {
    let Some(output_path) = output_path else {
        return false;
    };
    path.file_name() == output_path.file_name()
        && std::fs::canonicalize(path).is_ok_and(|p| p == output_path)
}

/// Collect every `.cs` file under `project_dir`, sorted by relative path.
///
/// Files matching `exclude` and the generated `output_file` itself are skipped,
/// so a previous run never feeds back into analysis.
pub fn collect_sources(
    project_dir: &Path,
    exclude: &[String],
    output_file: &str,
) -> Result<Vec<SourceFile>, GenerationError> {
    let exclude_set = build_globset(project_dir, exclude)?;
    // `./out.cs`, `sub/../out.cs` and absolute paths all name the same file
    let output_path = std::fs::canonicalize(project_dir.join(output_file)).ok();

    let walker = ignore::WalkBuilder::new(project_dir)
        .hidden(true)
        .git_ignore(true)
        .build();

    let mut paths: Vec<(PathBuf, PathBuf)> = Vec::new();
    for entry in walker.flatten() {
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("cs") {
            continue;
        }
        let rel_path = path.strip_prefix(project_dir).unwrap_or(path).to_path_buf();
        if is_output_file(path, output_path.as_deref()) {
            tracing::debug!("skipping generated file {}", rel_path.display());
            continue;
        }
        if exclude_set.is_match(&rel_path) {
            tracing::debug!("excluded {}", rel_path.display());
            continue;
        }
        paths.push((rel_path, path.to_path_buf()));
    }
    paths.sort_by(|a, b| a.0.cmp(&b.0));

    let mut sources = Vec::with_capacity(paths.len());
    for (rel_path, abs_path) in paths {
        let bytes = std::fs::read(&abs_path)
            .map_err(|e| GenerationError::malformed(&abs_path, format!("unreadable: {e}")))?;
        let text = String::from_utf8(bytes)
            .map_err(|_| GenerationError::malformed(&abs_path, "not valid UTF-8"))?;
        // Visual Studio writes a byte order mark by default
        let text = match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        };
        sources.push(SourceFile::new(rel_path, text));
    }
    Ok(sources)
}
