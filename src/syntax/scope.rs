use std::ops::ControlFlow;

use tree_sitter::{Node, Tree};

use super::{grouped_span, identifier_text, node_text, Span};

/// What kind of container a scope is anchored on
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ScopeKind {
    Class,
    Interface,
    Object,
    Function,
    Module,
}

impl ScopeKind {
    pub fn classify(node_kind: &str) -> Self {
        match node_kind {
            "class_declaration" | "abstract_class_declaration" | "class" => Self::Class,
            "interface_declaration" => Self::Interface,
            "object" => Self::Object,
            "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "function"
            | "arrow_function"
            | "method_definition" => Self::Function,
            _ => Self::Module,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MemberKind {
    Method,
    Property,
    Function,
    Variable,
}

impl MemberKind {
    fn of(node_kind: &str) -> Option<Self> {
        match node_kind {
            "method_definition" | "method_signature" | "abstract_method_signature" => {
                Some(Self::Method)
            }
            "public_field_definition"
            | "field_definition"
            | "property_signature"
            | "pair"
            | "shorthand_property_identifier" => Some(Self::Property),
            "function_declaration" | "generator_function_declaration" => Some(Self::Function),
            "lexical_declaration" | "variable_declaration" => Some(Self::Variable),
            _ => None,
        }
    }
}

/// A direct child declaration of a scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    /// Empty when the declaration has no simple name
    pub name: String,
    pub syntax_kind: MemberKind,
    pub span: Span,
}

/// The innermost container around an offset, with its members in declaration order
#[derive(Debug, Clone)]
pub struct ScopeDescriptor<'tree> {
    pub anchor: Node<'tree>,
    pub members: Vec<MemberDescriptor>,
    pub kind: ScopeKind,
}

const SCOPE_CONTAINERS: &[&str] = &[
    "class_declaration",
    "abstract_class_declaration",
    "class",
    "interface_declaration",
    "object",
    "internal_module",
    "module",
    "program",
];

const MEMBER_LEADING: &[&str] = &["decorator", "comment"];

/// Bodies whose members are separated by `;` or `,` that stay in place when members move
const SEPARATED_BODIES: &[&str] = &["interface_body", "object_type"];

/// Anonymous functions `export default` can carry as a value
const DEFAULT_EXPORTS: &[&str] = &[
    "function_expression",
    "function",
    "generator_function",
    "arrow_function",
];

/// The deepest class, interface, object literal, namespace or file containing `offset`
pub fn find_containing_scope<'tree>(
    tree: &'tree Tree,
    source: &str,
    offset: usize,
) -> Option<ScopeDescriptor<'tree>> {
    if offset > source.len() {
        return None;
    }

    let root = tree.root_node();
    let anchor = match deepest_container(root, offset) {
        ControlFlow::Break(container) => container,
        ControlFlow::Continue(()) => root,
    };

    Some(ScopeDescriptor {
        anchor,
        members: collect_members(anchor, source),
        kind: ScopeKind::classify(anchor.kind()),
    })
}

fn deepest_container(node: Node<'_>, offset: usize) -> ControlFlow<Node<'_>> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if Span::of(child).contains(offset) {
            deepest_container(child, offset)?;
        }
    }

    if SCOPE_CONTAINERS.contains(&node.kind()) {
        ControlFlow::Break(node)
    } else {
        ControlFlow::Continue(())
    }
}

/// The outermost method, property, function or variable statement containing `offset`
pub fn find_member_at_position(
    tree: &Tree,
    source: &str,
    offset: usize,
) -> Option<MemberDescriptor> {
    match first_member_at(tree.root_node(), offset) {
        ControlFlow::Break(node) => describe_member(node, source),
        ControlFlow::Continue(()) => None,
    }
}

fn first_member_at(node: Node<'_>, offset: usize) -> ControlFlow<Node<'_>> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if !Span::of(child).contains(offset) {
            continue;
        }
        let exports_member = child.kind() == "export_statement" && exported(child).is_some();
        if exports_member || MemberKind::of(child.kind()).is_some() {
            return ControlFlow::Break(child);
        }
        first_member_at(child, offset)?;
    }
    ControlFlow::Continue(())
}

fn member_list_node(anchor: Node<'_>) -> Node<'_> {
    match anchor.kind() {
        "object" | "program" => anchor,
        _ => anchor.child_by_field_name("body").unwrap_or(anchor),
    }
}

fn collect_members(anchor: Node<'_>, source: &str) -> Vec<MemberDescriptor> {
    let list = member_list_node(anchor);
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter_map(|child| describe_member(child, source))
        .collect()
}

/// The declaration an export carries, with its member kind
fn exported(node: Node<'_>) -> Option<(Node<'_>, MemberKind)> {
    if let Some(declaration) = node.child_by_field_name("declaration") {
        return Some((declaration, MemberKind::of(declaration.kind())?));
    }
    // `export default function () {}` has no declaration, only a value
    let value = node.child_by_field_name("value")?;
    DEFAULT_EXPORTS
        .contains(&value.kind())
        .then_some((value, MemberKind::Function))
}

fn describe_member(node: Node<'_>, source: &str) -> Option<MemberDescriptor> {
    let (target, syntax_kind) = if node.kind() == "export_statement" {
        exported(node)?
    } else {
        (node, MemberKind::of(node.kind())?)
    };

    Some(MemberDescriptor {
        name: member_name(target, syntax_kind, source),
        syntax_kind,
        span: member_span(node),
    })
}

fn member_span(node: Node<'_>) -> Span {
    let span = grouped_span(node, MEMBER_LEADING);
    match node.parent() {
        Some(body) if SEPARATED_BODIES.contains(&body.kind()) => {
            Span::new(span.start, node.end_byte())
        }
        _ => span,
    }
}

fn member_name(node: Node<'_>, kind: MemberKind, source: &str) -> String {
    match kind {
        MemberKind::Variable => {
            let mut cursor = node.walk();
            let declarator = node
                .named_children(&mut cursor)
                .find(|child| child.kind() == "variable_declarator");
            declarator
                .and_then(|declarator| declarator.child_by_field_name("name"))
                .filter(|name| name.kind() == "identifier")
                .map(|name| node_text(name, source).to_string())
                .unwrap_or_default()
        }
        MemberKind::Function => node
            .child_by_field_name("name")
            .map(|name| node_text(name, source).to_string())
            .unwrap_or_default(),
        MemberKind::Method | MemberKind::Property => {
            if node.kind() == "shorthand_property_identifier" {
                return node_text(node, source).to_string();
            }
            ["name", "property", "key"]
                .into_iter()
                .find_map(|field| node.child_by_field_name(field))
                .and_then(|name| identifier_text(name, source))
                .unwrap_or_default()
        }
    }
}
