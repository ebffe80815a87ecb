//! MVC domain model: controllers, actions, views and static files.

use crate::naming;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A controller recognised during symbol analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerDescriptor {
    /// Field name used in generated code: the type name with the suffix stripped.
    pub name: String,
    /// Original type name, e.g. `HomeController`.
    pub type_name: String,
    pub namespace: Option<String>,
    /// Fully qualified path back to the declaration: `MyApp.Controllers.HomeController`.
    pub qualified_reference: String,
    pub actions: Vec<ActionDescriptor>,
    /// Whether any declaration of the type carries the `partial` modifier.
    /// The generated members only compile against partial controllers.
    #[serde(default)]
    pub is_partial: bool,
    /// Files contributing a declaration of this type, in discovery order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_files: Vec<PathBuf>,
}

impl ControllerDescriptor {
    /// Build a descriptor with no actions, deriving the field name from `suffix`.
    pub fn new(type_name: impl Into<String>, namespace: Option<&str>, suffix: &str) -> Self {
        let type_name = type_name.into();
        let namespace = namespace.filter(|ns| !ns.is_empty()).map(String::from);
        let qualified_reference = match &namespace {
            Some(ns) => format!("{ns}.{type_name}"),
            None => type_name.clone(),
        };
        Self {
            name: naming::strip_suffix(&type_name, suffix).to_string(),
            type_name,
            namespace,
            qualified_reference,
            actions: Vec::new(),
            is_partial: false,
            source_files: Vec::new(),
        }
    }

    /// Append a parameterless action. Convenience for fixtures and tests.
    #[must_use]
    pub fn with_action(mut self, name: impl Into<String>) -> Self {
        let action = ActionDescriptor::new(name, &self.type_name);
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn with_partial(mut self, is_partial: bool) -> Self {
        self.is_partial = is_partial;
        self
    }

    /// Action names in declaration order with overloads collapsed (first wins).
    pub fn unique_action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.actions.len());
        for action in &self.actions {
            if !names.contains(&action.name.as_str()) {
                names.push(&action.name);
            }
        }
        names
    }

    /// Names declared more than once (overloads), each reported once.
    pub fn overloaded_actions(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        let mut overloaded: Vec<&str> = Vec::new();
        for action in &self.actions {
            let name = action.name.as_str();
            if seen.contains(&name) {
                if !overloaded.contains(&name) {
                    overloaded.push(name);
                }
            } else {
                seen.push(name);
            }
        }
        overloaded
    }

    /// Whether a view's `controller_name` refers to this controller.
    ///
    /// Matches either the original type name or the stripped name, ignoring case.
    pub fn owns_view(&self, view: &View) -> bool {
        naming::eq_ignore_case(&view.controller_name, &self.type_name)
            || naming::eq_ignore_case(&view.controller_name, &self.name)
    }
}

/// A public action method on a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub name: String,
    /// Type name of the containing controller.
    pub controller: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ActionParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
}

impl ActionDescriptor {
    pub fn new(name: impl Into<String>, controller: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            controller: controller.into(),
            parameters: Vec::new(),
            return_type: None,
        }
    }

    /// `Index(int id, string sort)` style signature for diagnostics.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.type_name, p.name))
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

/// One parameter of an action method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParameter {
    pub name: String,
    pub type_name: String,
}

/// A view template associated with a controller by folder convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub controller_name: String,
    pub view_name: String,
    /// Path relative to the project root, `/`-separated.
    pub relative_path: String,
}

impl View {
    pub fn new(
        controller_name: impl Into<String>,
        view_name: impl Into<String>,
        relative_path: impl Into<String>,
    ) -> Self {
        Self {
            controller_name: controller_name.into(),
            view_name: view_name.into(),
            relative_path: relative_path.into(),
        }
    }

    /// Application-root-relative virtual path: `~/Views/Home/Index.cshtml`.
    pub fn virtual_path(&self) -> String {
        format!("~/{}", naming::normalize_separators(&self.relative_path))
    }
}

/// A static asset exposed through a stable path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticFile {
    pub file_name: String,
    /// Path relative to the static root.
    pub relative_path: String,
}

impl StaticFile {
    pub fn new(file_name: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            relative_path: relative_path.into(),
        }
    }

    /// The relative path with forward slashes.
    pub fn url_path(&self) -> String {
        naming::normalize_separators(&self.relative_path)
    }
}
