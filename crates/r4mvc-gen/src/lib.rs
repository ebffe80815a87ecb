//! Synthesis of the helper declaration tree, C# rendering and file emission.
//!
//! [`generate`] is the whole engine: model in, immutable [`CompilationUnit`]
//! out. It does no I/O; [`render`] and [`emit`] turn the tree into a file.

pub mod aggregate;
pub mod emit;
pub mod render;
pub mod synthesis;

pub use render::render;

use r4mvc_core::GenerationError;
use r4mvc_core::config::GenerationSettings;
use r4mvc_core::declaration::{CompilationUnit, DeclarationNode};
use r4mvc_core::model::{ControllerDescriptor, StaticFile, View};

/// Namespaces imported by the generated file for its attributes.
pub const USINGS: &[&str] = &["System.CodeDom.Compiler", "System.Diagnostics"];

/// Build the declaration tree for a discovered project model.
///
/// Controller partials are grouped by namespace in order of first
/// appearance; the root and links classes go into `settings.namespace`.
/// Fails with [`GenerationError::NameCollision`] before building anything if
/// two controllers share a generated name or one is named like the root class.
pub fn generate(
    controllers: &[ControllerDescriptor],
    views: &[View],
    static_files: &[StaticFile],
    settings: &GenerationSettings,
) -> Result<CompilationUnit, GenerationError> {
    aggregate::check_collisions(controllers, settings)?;

    let mut groups: Vec<(&str, Vec<DeclarationNode>)> = Vec::new();
    for controller in controllers {
        let namespace = controller.namespace.as_deref().unwrap_or("");
        let partial = synthesis::controller_partial(controller, views);
        match groups.iter_mut().find(|(ns, _)| *ns == namespace) {
            Some((_, members)) => members.push(partial),
            None => groups.push((namespace, vec![partial])),
        }
    }

    let root_members = [
        aggregate::root_class(controllers, settings),
        aggregate::links_class(static_files, settings),
    ];
    match groups.iter_mut().find(|(ns, _)| *ns == settings.namespace) {
        Some((_, members)) => members.extend(root_members),
        None => groups.push((settings.namespace.as_str(), root_members.into())),
    }

    let members = groups
        .into_iter()
        .map(|(ns, members)| DeclarationNode::namespace(ns).with_children(members))
        .collect();
    let usings = USINGS.iter().map(|u| (*u).to_string()).collect();
    Ok(CompilationUnit::new(usings, members))
}
