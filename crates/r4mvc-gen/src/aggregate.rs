//! Top-level helper classes: the per-controller root class and the links class.

use crate::synthesis::{generated_attributes, member_identifier, unique_string_fields};
use r4mvc_core::GenerationError;
use r4mvc_core::config::GenerationSettings;
use r4mvc_core::declaration::{DeclarationNode, Expr, Modifier};
use r4mvc_core::model::{ControllerDescriptor, StaticFile};
use std::collections::HashMap;

/// Fail if two controllers would generate the same root field, or one would
/// be named like the root class holding it.
///
/// Runs before any node is built so a collision never yields partial output.
pub fn check_collisions(
    controllers: &[ControllerDescriptor],
    settings: &GenerationSettings,
) -> Result<(), GenerationError> {
    let mut seen: HashMap<String, &ControllerDescriptor> = HashMap::new();
    for controller in controllers {
        let field = member_identifier(&controller.name);
        if field == settings.helpers_prefix {
            return Err(GenerationError::NameCollision {
                first: settings.helpers_prefix.clone(),
                second: controller.qualified_reference.clone(),
                field,
            });
        }
        if let Some(first) = seen.get(&field) {
            return Err(GenerationError::NameCollision {
                field,
                first: first.qualified_reference.clone(),
                second: controller.qualified_reference.clone(),
            });
        }
        seen.insert(field, controller);
    }
    Ok(())
}

/// `global::`-qualified reference to a user type.
pub fn global_reference(qualified: &str) -> String {
    format!("global::{qualified}")
}

fn static_partial(name: &str) -> DeclarationNode {
    DeclarationNode::class(name)
        .with_modifiers([Modifier::Public, Modifier::Static, Modifier::Partial])
        .with_attributes(generated_attributes())
}

/// `public static partial class MVC` with one singleton field per controller.
pub fn root_class(controllers: &[ControllerDescriptor], settings: &GenerationSettings) -> DeclarationNode {
    let fields = controllers.iter().map(|controller| {
        let type_name = global_reference(&controller.qualified_reference);
        DeclarationNode::field(
            member_identifier(&controller.name),
            type_name.clone(),
            Expr::New(type_name),
        )
        .with_modifiers([Modifier::Public, Modifier::Static])
    });
    static_partial(&settings.helpers_prefix).with_children(fields)
}

/// `public static partial class Links` with one path field per static file.
///
/// Files whose sanitized names clash keep the first occurrence.
pub fn links_class(static_files: &[StaticFile], settings: &GenerationSettings) -> DeclarationNode {
    let fields = unique_string_fields(
        static_files.iter().map(|f| (f.file_name.as_str(), f.url_path())),
        &[Modifier::Public, Modifier::Static],
        &[settings.links_class.as_str()],
    );
    static_partial(&settings.links_class).with_children(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use r4mvc_core::declaration::NodeKind;

    #[test]
    fn test_collision_names_both_types() {
        let controllers = vec![
            ControllerDescriptor::new("HomeController", Some("App.Controllers"), "Controller"),
            ControllerDescriptor::new("HomeController", Some("App.Admin"), "Controller"),
        ];
        let err = check_collisions(&controllers, &GenerationSettings::default()).unwrap_err();
        match err {
            GenerationError::NameCollision { field, first, second } => {
                assert_eq!(field, "Home");
                assert_eq!(first, "App.Controllers.HomeController");
                assert_eq!(second, "App.Admin.HomeController");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_distinct_names_pass() {
        let controllers = vec![
            ControllerDescriptor::new("HomeController", None, "Controller"),
            ControllerDescriptor::new("AccountController", None, "Controller"),
        ];
        assert!(check_collisions(&controllers, &GenerationSettings::default()).is_ok());
    }

    #[test]
    fn test_controller_named_like_root_class_collides() {
        let controllers = vec![ControllerDescriptor::new("MVCController", None, "Controller")];
        let err = check_collisions(&controllers, &GenerationSettings::default()).unwrap_err();
        assert!(matches!(err, GenerationError::NameCollision { ref field, .. } if field == "MVC"));
    }

    #[test]
    fn test_links_field_named_like_class_is_dropped() {
        let files = vec![StaticFile::new("Links", "Links"), StaticFile::new("a.js", "a.js")];
        let links = links_class(&files, &GenerationSettings::default());
        let names: Vec<&str> = links.children().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a_js"]);
    }

    #[test]
    fn test_root_class_fields() {
        let controllers = vec![ControllerDescriptor::new(
            "HomeController",
            Some("App.Controllers"),
            "Controller",
        )];
        let root = root_class(&controllers, &GenerationSettings::default());
        assert_eq!(root.name(), "MVC");
        assert!(root.has_modifier(Modifier::Static));
        assert!(root.has_modifier(Modifier::Partial));
        let field = root.child("Home").unwrap();
        assert_eq!(field.kind(), NodeKind::Field);
        assert_eq!(field.type_name(), Some("global::App.Controllers.HomeController"));
        assert_eq!(
            field.value(),
            Some(&Expr::New("global::App.Controllers.HomeController".to_string()))
        );
    }

    #[test]
    fn test_links_class_first_wins() {
        let files = vec![
            StaticFile::new("site.css", "css\\site.css"),
            StaticFile::new("site.css", "lib/site.css"),
            StaticFile::new("app.js", "js/app.js"),
        ];
        let links = links_class(&files, &GenerationSettings::default());
        assert_eq!(links.name(), "Links");
        let values: Vec<(&str, &str)> = links
            .children()
            .iter()
            .map(|f| (f.name(), f.string_value().unwrap()))
            .collect();
        assert_eq!(values, vec![("site_css", "css/site.css"), ("app_js", "js/app.js")]);
    }
}
