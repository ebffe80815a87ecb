//! Controller and action discovery over a [`ProgramSnapshot`].
//!
//! Whether a type is a controller is decided once per type by a
//! [`ControllerConvention`]; the rest of the pipeline only ever sees the
//! resulting [`ControllerDescriptor`]s.

use crate::snapshot::{MethodSymbol, ProgramSnapshot, TypeKind, TypeSymbol};
use r4mvc_core::model::{ActionDescriptor, ActionParameter, ControllerDescriptor};
use std::collections::HashMap;
use std::path::PathBuf;

/// Framework base classes that make a type a controller.
pub const FRAMEWORK_BASES: &[&str] = &["Controller", "ControllerBase"];

/// Outcome of the controller check for one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerShape {
    Controller,
    NotAClass,
    Nested,
    NotPublic,
    Abstract,
    Static,
    Generic,
    /// Name does not end with the controller suffix.
    NameMismatch,
    /// Opted out with `[NonController]`.
    OptedOut,
    /// Neither a framework base class nor `[Controller]`.
    NoControllerBase,
}

impl ControllerShape {
    pub fn is_controller(self) -> bool {
        self == Self::Controller
    }
}

/// Capability check deciding which types are controllers and which of
/// their methods are actions.
pub trait ControllerConvention {
    /// Suffix stripped from controller type names.
    fn suffix(&self) -> &str;

    fn classify(&self, snapshot: &ProgramSnapshot, ty: &TypeSymbol) -> ControllerShape;

    fn is_action(&self, method: &MethodSymbol) -> bool;
}

/// ASP.NET Core conventions: public concrete classes named `*Controller`
/// deriving from `Controller`/`ControllerBase` or marked `[Controller]`.
/// Overrides (filter hooks, `object` members) are never actions.
#[derive(Debug, Clone)]
pub struct DefaultConvention {
    suffix: String,
}

impl DefaultConvention {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl Default for DefaultConvention {
    fn default() -> Self {
        Self::new("Controller")
    }
}

impl ControllerConvention for DefaultConvention {
    fn suffix(&self) -> &str {
        &self.suffix
    }

    fn classify(&self, snapshot: &ProgramSnapshot, ty: &TypeSymbol) -> ControllerShape {
        if ty.kind != TypeKind::Class {
            return ControllerShape::NotAClass;
        }
        if ty.containing_type.is_some() {
            return ControllerShape::Nested;
        }
        if ty.name.len() <= self.suffix.len() || !ty.name.ends_with(&self.suffix) {
            return ControllerShape::NameMismatch;
        }
        if !ty.has_modifier("public") {
            return ControllerShape::NotPublic;
        }
        if ty.has_modifier("abstract") {
            return ControllerShape::Abstract;
        }
        if ty.has_modifier("static") {
            return ControllerShape::Static;
        }
        if ty.generic_arity > 0 {
            return ControllerShape::Generic;
        }
        if ty.has_attribute("NonController") {
            return ControllerShape::OptedOut;
        }
        if ty.has_attribute("Controller") || snapshot.inherits_from(ty, FRAMEWORK_BASES) {
            ControllerShape::Controller
        } else {
            ControllerShape::NoControllerBase
        }
    }

    fn is_action(&self, method: &MethodSymbol) -> bool {
        method.has_modifier("public")
            && !method.has_modifier("static")
            && !method.has_modifier("abstract")
            && !method.has_modifier("override")
            && !method.is_generic
            && !method.has_attribute("NonAction")
            && !(method.name == "Dispose" && method.parameters.is_empty())
    }
}

/// Merge the partial declarations of each type, keeping first-seen order.
///
/// Modifiers, attributes and bases are unioned; methods are concatenated in
/// file order.
pub fn merge_partials(types: &[TypeSymbol]) -> Vec<(TypeSymbol, Vec<PathBuf>)> {
    let mut merged: Vec<(TypeSymbol, Vec<PathBuf>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for ty in types {
        let key = ty.qualified_name();
        match index.get(&key) {
            Some(&i) => {
                let (existing, files) = &mut merged[i];
                for m in &ty.modifiers {
                    if !existing.modifiers.contains(m) {
                        existing.modifiers.push(m.clone());
                    }
                }
                for a in &ty.attributes {
                    if !existing.attributes.contains(a) {
                        existing.attributes.push(a.clone());
                    }
                }
                for b in &ty.base_types {
                    if !existing.base_types.contains(b) {
                        existing.base_types.push(b.clone());
                    }
                }
                existing.methods.extend(ty.methods.iter().cloned());
                if !files.contains(&ty.file) {
                    files.push(ty.file.clone());
                }
            }
            None => {
                index.insert(key, merged.len());
                merged.push((ty.clone(), vec![ty.file.clone()]));
            }
        }
    }
    merged
}

fn to_action(method: &MethodSymbol, controller: &str) -> ActionDescriptor {
    ActionDescriptor {
        name: method.name.clone(),
        controller: controller.to_string(),
        parameters: method
            .parameters
            .iter()
            .map(|p| ActionParameter {
                name: p.name.clone(),
                type_name: p.type_name.clone(),
            })
            .collect(),
        return_type: method.return_type.clone(),
    }
}

/// Extract controllers and their actions in declaration order.
///
/// Syntax errors in the snapshot do not stop analysis; callers report
/// [`ProgramSnapshot::diagnostics`] themselves.
pub fn analyze(
    snapshot: &ProgramSnapshot,
    convention: &dyn ControllerConvention,
) -> Vec<ControllerDescriptor> {
    let mut controllers = Vec::new();
    for (ty, files) in merge_partials(snapshot.types()) {
        let shape = convention.classify(snapshot, &ty);
        if !shape.is_controller() {
            if ty.name.ends_with(convention.suffix()) {
                tracing::debug!("{} is not a controller: {:?}", ty.qualified_name(), shape);
            }
            continue;
        }

        let mut descriptor =
            ControllerDescriptor::new(&ty.name, ty.namespace.as_deref(), convention.suffix())
                .with_partial(ty.has_modifier("partial"));
        descriptor.actions = ty
            .methods
            .iter()
            .filter(|m| convention.is_action(m))
            .map(|m| to_action(m, &ty.name))
            .collect();
        descriptor.source_files = files;
        controllers.push(descriptor);
    }
    controllers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(source: &str) -> ProgramSnapshot {
        ProgramSnapshot::from_source("Test.cs", source).unwrap()
    }

    fn shape_of(source: &str, name: &str) -> ControllerShape {
        let snap = snapshot(source);
        let ty = snap.types().iter().find(|t| t.name == name).unwrap();
        DefaultConvention::default().classify(&snap, ty)
    }

    #[test]
    fn test_classify_direct_controller() {
        let shape = shape_of("public class HomeController : Controller { }", "HomeController");
        assert_eq!(shape, ControllerShape::Controller);
    }

    #[test]
    fn test_classify_rejects_non_controllers() {
        assert_eq!(
            shape_of("class HomeController : Controller { }", "HomeController"),
            ControllerShape::NotPublic
        );
        assert_eq!(
            shape_of("public abstract class BaseController : Controller { }", "BaseController"),
            ControllerShape::Abstract
        );
        assert_eq!(
            shape_of("public class HomeService : Controller { }", "HomeService"),
            ControllerShape::NameMismatch
        );
        assert_eq!(
            shape_of("public class PlainController { }", "PlainController"),
            ControllerShape::NoControllerBase
        );
        assert_eq!(
            shape_of("public interface IHomeController { }", "IHomeController"),
            ControllerShape::NotAClass
        );
        assert_eq!(
            shape_of("public class Controller : ControllerBase { }", "Controller"),
            ControllerShape::NameMismatch
        );
    }

    #[test]
    fn test_classify_attribute_opt_in_and_out() {
        assert_eq!(
            shape_of("[Controller] public class PingController { }", "PingController"),
            ControllerShape::Controller
        );
        assert_eq!(
            shape_of(
                "[NonController] public class HiddenController : Controller { }",
                "HiddenController"
            ),
            ControllerShape::OptedOut
        );
    }

    #[test]
    fn test_classify_through_project_base_class() {
        let source = r"
public abstract class AppController : Controller { }
public class HomeController : AppController { }
";
        assert_eq!(shape_of(source, "HomeController"), ControllerShape::Controller);
    }

    #[test]
    fn test_classify_cyclic_bases_terminate() {
        let source = r"
public class AController : BController { }
public class BController : AController { }
";
        assert_eq!(shape_of(source, "AController"), ControllerShape::NoControllerBase);
    }

    #[test]
    fn test_merge_partials_unions_parts() {
        let source = r"
namespace App {
    public partial class HomeController : Controller { public IActionResult Index() { return null; } }
    partial class HomeController { public IActionResult About() { return null; } }
}
";
        let snap = snapshot(source);
        let merged = merge_partials(snap.types());
        assert_eq!(merged.len(), 1);
        let (ty, files) = &merged[0];
        assert!(ty.has_modifier("public"));
        assert!(ty.has_modifier("partial"));
        let names: Vec<&str> = ty.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Index", "About"]);
        assert_eq!(files.len(), 1);
    }
}
