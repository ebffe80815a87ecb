//! Per-controller members: action names, action constants and views.
//!
//! Every function here is pure: it takes model records and returns a new
//! declaration node.

use r4mvc_core::config::{GENERATOR_NAME, GENERATOR_VERSION};
use r4mvc_core::declaration::{Attribute, DeclarationNode, Expr, Modifier};
use r4mvc_core::model::{ControllerDescriptor, View};
use r4mvc_core::naming;

pub const ACTION_NAMES_CLASS: &str = "ActionNamesClass";
pub const ACTION_NAME_CONSTANTS: &str = "ActionNameConstants";
pub const VIEWS_CLASS: &str = "ViewsClass";
pub const VIEW_NAMES_CLASS: &str = "_ViewNamesClass";

/// Names inside `ViewsClass` that no view field may take.
pub const VIEWS_CLASS_RESERVED: &[&str] = &[VIEWS_CLASS, "s_ViewNames", "ViewNames", VIEW_NAMES_CLASS];

/// Members the partial adds to a controller. A group is left out as a whole
/// when one of its names is already an action method of the controller.
const PARTIAL_MEMBER_GROUPS: [&[&str]; 3] = [
    &[ACTION_NAMES_CLASS, "s_actions", "ActionNames"],
    &[ACTION_NAME_CONSTANTS],
    &[VIEWS_CLASS, "s_views", "Views"],
];

/// Binding strength of generated name/value fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// `public readonly string`, resolved at run time.
    ReadOnly,
    /// `public const string`, usable where a compile-time literal is required.
    Constant,
}

impl Binding {
    fn modifiers(self) -> [Modifier; 2] {
        match self {
            Self::ReadOnly => [Modifier::Public, Modifier::ReadOnly],
            Self::Constant => [Modifier::Public, Modifier::Const],
        }
    }
}

/// `[GeneratedCode("R4Mvc", "<version>"), DebuggerNonUserCode]`, carried by
/// every synthesized type.
pub fn generated_attributes() -> Vec<Attribute> {
    vec![
        Attribute::new("GeneratedCode")
            .with_argument(Expr::String(GENERATOR_NAME.to_string()))
            .with_argument(Expr::String(GENERATOR_VERSION.to_string())),
        Attribute::new("DebuggerNonUserCode"),
    ]
}

/// A public class tagged as generated.
pub fn generated_class(name: &str) -> DeclarationNode {
    DeclarationNode::class(name)
        .with_modifiers([Modifier::Public])
        .with_attributes(generated_attributes())
}

/// Identifier for a member derived from a name found in the project.
pub fn member_identifier(name: &str) -> String {
    if naming::is_identifier(name) || name.strip_prefix('@').is_some_and(naming::is_keyword) {
        name.to_string()
    } else {
        naming::sanitize_identifier(name)
    }
}

/// String fields with the given modifiers, one per distinct identifier.
///
/// Pairs whose identifier is `reserved` or was already used are dropped: the
/// first one wins.
pub(crate) fn unique_string_fields<'a>(
    pairs: impl IntoIterator<Item = (&'a str, String)>,
    modifiers: &[Modifier],
    reserved: &[&str],
) -> Vec<DeclarationNode> {
    let mut used: Vec<String> = reserved.iter().map(|r| (*r).to_string()).collect();
    let mut fields = Vec::new();
    for (name, value) in pairs {
        let ident = member_identifier(name);
        if used.contains(&ident) {
            continue;
        }
        fields.push(DeclarationNode::string_field(&ident, value).with_modifiers(modifiers.iter().copied()));
        used.push(ident);
    }
    fields
}

/// String fields for `(name, value)` pairs at the given binding strength.
pub fn string_fields<'a>(
    pairs: impl IntoIterator<Item = (&'a str, String)>,
    binding: Binding,
) -> Vec<DeclarationNode> {
    unique_string_fields(pairs, &binding.modifiers(), &[])
}

/// A generated class exposing the same name/value pairs at one binding strength.
///
/// A pair named like the class itself is dropped.
pub fn string_members_class<'a>(
    class_name: &str,
    pairs: impl IntoIterator<Item = (&'a str, String)>,
    binding: Binding,
) -> DeclarationNode {
    generated_class(class_name).with_children(unique_string_fields(
        pairs,
        &binding.modifiers(),
        &[class_name],
    ))
}

fn action_pairs(controller: &ControllerDescriptor) -> Vec<(&str, String)> {
    controller
        .unique_action_names()
        .into_iter()
        .map(|name| (name, name.to_string()))
        .collect()
}

/// `ActionNamesClass`: one read-only field per action, value = action name.
pub fn action_names_class(controller: &ControllerDescriptor) -> DeclarationNode {
    string_members_class(ACTION_NAMES_CLASS, action_pairs(controller), Binding::ReadOnly)
}

/// `ActionNameConstants`: the same pairs as `const` fields.
pub fn action_constants_class(controller: &ControllerDescriptor) -> DeclarationNode {
    string_members_class(ACTION_NAME_CONSTANTS, action_pairs(controller), Binding::Constant)
}

/// `static readonly T field = new T();` plus `public T Property { get { return field; } }`.
fn singleton_accessor(type_name: &str, field: &str, property: &str) -> [DeclarationNode; 2] {
    [
        DeclarationNode::field(field, type_name, Expr::New(type_name.to_string()))
            .with_modifiers([Modifier::Static, Modifier::ReadOnly]),
        DeclarationNode::property(property, type_name, Expr::Ident(field.to_string()))
            .with_modifiers([Modifier::Public]),
    ]
}

/// `ViewsClass` for the views owned by `controller`.
///
/// Holds one `"~/" + path` field per view and a nested `_ViewNamesClass`
/// with the bare view names, reachable through `ViewNames`. Views named like
/// one of [`VIEWS_CLASS_RESERVED`] are left out of both classes.
pub fn views_class(controller: &ControllerDescriptor, views: &[View]) -> DeclarationNode {
    let owned: Vec<&View> = views
        .iter()
        .filter(|v| controller.owns_view(v))
        .filter(|v| {
            let ident = member_identifier(&v.view_name);
            !VIEWS_CLASS_RESERVED.iter().any(|r| *r == ident)
        })
        .collect();

    let view_names = string_members_class(
        VIEW_NAMES_CLASS,
        owned.iter().map(|v| (v.view_name.as_str(), v.view_name.clone())),
        Binding::ReadOnly,
    );

    generated_class(VIEWS_CLASS)
        .with_children(singleton_accessor(VIEW_NAMES_CLASS, "s_ViewNames", "ViewNames"))
        .with_child(view_names)
        .with_children(unique_string_fields(
            owned.iter().map(|v| (v.view_name.as_str(), v.virtual_path())),
            &Binding::ReadOnly.modifiers(),
            VIEWS_CLASS_RESERVED,
        ))
}

/// Generated partial members whose names an action method already takes.
///
/// The whole group holding such a member is left out of the partial.
pub fn shadowed_members(controller: &ControllerDescriptor) -> Vec<&'static str> {
    PARTIAL_MEMBER_GROUPS
        .iter()
        .flat_map(|group| group.iter().copied())
        .filter(|member| controller.actions.iter().any(|a| a.name == *member))
        .collect()
}

/// The partial declaration extending a controller with its generated members.
///
/// The partial itself is not tagged as generated: it shares attributes with
/// the user's own declaration of the type.
pub fn controller_partial(controller: &ControllerDescriptor, views: &[View]) -> DeclarationNode {
    let shadowed = shadowed_members(controller);
    let [action_names, action_constants, views_group] =
        PARTIAL_MEMBER_GROUPS.map(|group| !group.iter().any(|m| shadowed.contains(m)));

    let mut partial = DeclarationNode::class(&controller.type_name)
        .with_modifiers([Modifier::Public, Modifier::Partial]);
    if action_names {
        partial = partial
            .with_child(action_names_class(controller))
            .with_children(singleton_accessor(ACTION_NAMES_CLASS, "s_actions", "ActionNames"));
    }
    if action_constants {
        partial = partial.with_child(action_constants_class(controller));
    }
    if views_group {
        partial = partial
            .with_child(views_class(controller, views))
            .with_children(singleton_accessor(VIEWS_CLASS, "s_views", "Views"));
    }
    partial
}

#[cfg(test)]
mod tests {
    use super::*;
    use r4mvc_core::declaration::NodeKind;

    fn home() -> ControllerDescriptor {
        ControllerDescriptor::new("HomeController", Some("App.Controllers"), "Controller")
            .with_action("Index")
            .with_action("About")
    }

    #[test]
    fn test_binding_modifiers() {
        let readonly = string_fields([("A", "a".to_string())], Binding::ReadOnly);
        assert!(readonly[0].has_modifier(Modifier::ReadOnly));
        assert!(!readonly[0].has_modifier(Modifier::Const));
        let constant = string_fields([("A", "a".to_string())], Binding::Constant);
        assert!(constant[0].has_modifier(Modifier::Const));
        assert!(!constant[0].has_modifier(Modifier::ReadOnly));
    }

    #[test]
    fn test_action_classes_share_pairs() {
        let names = action_names_class(&home());
        let constants = action_constants_class(&home());
        let pairs = |node: &DeclarationNode| -> Vec<(String, String)> {
            node.children_of(NodeKind::Field)
                .map(|f| (f.name().to_string(), f.string_value().unwrap().to_string()))
                .collect()
        };
        assert_eq!(pairs(&names), pairs(&constants));
        assert_eq!(
            pairs(&names),
            vec![
                ("Index".to_string(), "Index".to_string()),
                ("About".to_string(), "About".to_string())
            ]
        );
    }

    #[test]
    fn test_duplicate_identifiers_first_wins() {
        let fields = string_fields(
            [
                ("site.css", "css/site.css".to_string()),
                ("site_css", "other/site_css".to_string()),
                ("site.css", "lib/site.css".to_string()),
            ],
            Binding::ReadOnly,
        );
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name(), "site_css");
        assert_eq!(fields[0].string_value(), Some("css/site.css"));
    }

    #[test]
    fn test_view_named_like_fixed_member_is_dropped() {
        let views = vec![
            View::new("Home", "ViewNames", "Views/Home/ViewNames.cshtml"),
            View::new("Home", "ViewsClass", "Views/Home/ViewsClass.cshtml"),
            View::new("Home", "Index", "Views/Home/Index.cshtml"),
        ];
        let class = views_class(&home(), &views);
        let names: Vec<&str> = class.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["s_ViewNames", "ViewNames", "_ViewNamesClass", "Index"]);
        let view_names = class.child(VIEW_NAMES_CLASS).unwrap();
        assert_eq!(view_names.children().len(), 1);
        assert_eq!(view_names.children()[0].name(), "Index");
    }

    #[test]
    fn test_field_named_like_enclosing_class_is_dropped() {
        let c = ControllerDescriptor::new("HomeController", None, "Controller")
            .with_action("ActionNameConstants")
            .with_action("Index");
        let names = action_names_class(&c);
        let fields: Vec<&str> = names.children().iter().map(|f| f.name()).collect();
        assert_eq!(fields, vec!["ActionNameConstants", "Index"]);
        let constants = string_members_class(
            ACTION_NAME_CONSTANTS,
            [("ActionNameConstants", "x".to_string()), ("Index", "Index".to_string())],
            Binding::Constant,
        );
        assert_eq!(constants.children().len(), 1);
        assert_eq!(constants.children()[0].name(), "Index");
    }

    #[test]
    fn test_action_shadowing_partial_member_drops_group() {
        let c = ControllerDescriptor::new("HomeController", None, "Controller")
            .with_action("Index")
            .with_action("Views");
        assert_eq!(shadowed_members(&c), vec!["Views"]);
        let partial = controller_partial(&c, &[]);
        let names: Vec<&str> = partial.children().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["ActionNamesClass", "s_actions", "ActionNames", "ActionNameConstants"]
        );
    }

    #[test]
    fn test_member_identifier() {
        assert_eq!(member_identifier("Index"), "Index");
        assert_eq!(member_identifier("@default"), "@default");
        assert_eq!(member_identifier("default"), "@default");
        assert_eq!(member_identifier("Index.Mobile"), "Index_Mobile");
    }

    #[test]
    fn test_generated_attributes_present() {
        let class = generated_class("X");
        assert!(class.has_attribute("GeneratedCode"));
        assert!(class.has_attribute("DebuggerNonUserCode"));
        let generated = &class.attributes()[0];
        assert_eq!(generated.arguments[0], Expr::String("R4Mvc".to_string()));
    }

    #[test]
    fn test_controller_partial_layout() {
        let partial = controller_partial(&home(), &[]);
        assert_eq!(partial.name(), "HomeController");
        assert!(partial.has_modifier(Modifier::Partial));
        assert!(partial.attributes().is_empty());
        let names: Vec<&str> = partial.children().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "ActionNamesClass",
                "s_actions",
                "ActionNames",
                "ActionNameConstants",
                "ViewsClass",
                "s_views",
                "Views"
            ]
        );
        let prop = partial.child("ActionNames").unwrap();
        assert_eq!(prop.kind(), NodeKind::Property);
        assert_eq!(prop.value(), Some(&Expr::Ident("s_actions".to_string())));
    }
}
