//! Tree-sitter based analysis of C# MVC projects.
//!
//! Parses a project's sources into a read-only [`snapshot::ProgramSnapshot`]
//! and extracts controllers and their action methods from it.

pub mod analysis;
pub mod project;
pub mod snapshot;
pub mod treesitter;

pub use analysis::{ControllerConvention, ControllerShape, DefaultConvention, analyze};
pub use project::{SourceFile, collect_sources};
pub use snapshot::ProgramSnapshot;
