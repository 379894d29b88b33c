mod cache;
mod scope;

#[cfg(test)]
mod scope_tests;

use std::path::Path;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tree_sitter::{Language, Node, Parser, Tree};

pub use cache::TreeCache;
pub use scope::{
    find_containing_scope, find_member_at_position, MemberDescriptor, MemberKind,
    ScopeDescriptor, ScopeKind,
};

/// Half-open byte range `[start, end)` into a source text
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn of(node: Node<'_>) -> Self {
        Self::new(node.start_byte(), node.end_byte())
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Grammar flavor used for the ECMAScript family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    Ts,
    Tsx,
    Js,
}

impl ScriptKind {
    /// `.tsx`/`.jsx` get the JSX-aware grammar, `.js` plain JavaScript, everything else TypeScript
    pub fn from_file_name(file_name: &str) -> Self {
        Self::from_extension(file_name).unwrap_or(Self::Ts)
    }

    /// Like [`ScriptKind::from_file_name`], but untitled buffers fall back to the editor's
    /// language identifier
    pub fn infer(file_name: &str, language_id: &str) -> Self {
        Self::from_extension(file_name).unwrap_or(match language_id {
            "typescriptreact" | "javascriptreact" => Self::Tsx,
            "javascript" => Self::Js,
            _ => Self::Ts,
        })
    }

    fn from_extension(file_name: &str) -> Option<Self> {
        match Path::new(file_name).extension()?.to_str()? {
            "tsx" | "jsx" => Some(Self::Tsx),
            "js" | "mjs" | "cjs" => Some(Self::Js),
            "ts" | "mts" | "cts" => Some(Self::Ts),
            _ => None,
        }
    }

    pub fn grammar_name(self) -> &'static str {
        match self {
            Self::Ts => "typescript",
            Self::Tsx => "tsx",
            Self::Js => "javascript",
        }
    }

    pub fn language(self) -> Language {
        match self {
            Self::Ts => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::Js => tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

/// Parse `content` with the grammar implied by `file_name_hint`.
///
/// Malformed input still yields a tree; tree-sitter recovers with `ERROR` nodes and callers
/// work with whatever structure survived.
pub fn build_tree(content: &str, file_name_hint: &str) -> Result<Tree> {
    parse_with(&ScriptKind::from_file_name(file_name_hint).language(), content)
}

pub fn parse_with(language: &Language, content: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser.set_language(language)?;
    parser
        .parse(content, None)
        .ok_or_else(|| anyhow!("tree-sitter did not produce a tree"))
}

pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "property_identifier",
    "private_property_identifier",
    "type_identifier",
    "field_identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
];

const STRING_KINDS: &[&str] = &["string", "string_literal"];

/// Fields that hold the declared name, in lookup order
const NAME_FIELDS: &[&str] = &["name", "property", "key", "field", "pattern", "left", "type"];

pub(crate) fn unquote(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

/// The name a single identifier-like node spells, with string keys unquoted
pub(crate) fn identifier_text(node: Node<'_>, source: &str) -> Option<String> {
    let kind = node.kind();
    if IDENTIFIER_KINDS.contains(&kind) {
        Some(node_text(node, source).to_string())
    } else if STRING_KINDS.contains(&kind) {
        Some(unquote(node_text(node, source)).to_string())
    } else {
        None
    }
}

/// Every identifier bound by `node`, descending into destructuring patterns
pub(crate) fn identifiers_in(node: Node<'_>, source: &str) -> Vec<String> {
    if let Some(name) = identifier_text(node, source) {
        return vec![name];
    }

    // `{ key: binding }` and `binding = default` only bind their pattern side
    let pattern_side = match node.kind() {
        "pair_pattern" => node.child_by_field_name("value"),
        "assignment_pattern" | "object_assignment_pattern" => node.child_by_field_name("left"),
        _ => None,
    };
    if let Some(pattern) = pattern_side {
        return identifiers_in(pattern, source);
    }

    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .flat_map(|child| identifiers_in(child, source))
        .collect()
}

/// Names introduced by a declaration node.
///
/// Variable statements report every declarator; other declarations report whatever their
/// name-carrying field binds.
pub fn declared_names(node: Node<'_>, source: &str) -> Vec<String> {
    let mut cursor = node.walk();
    let declarators = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "variable_declarator")
        .collect::<Vec<_>>();

    if !declarators.is_empty() {
        return declarators
            .into_iter()
            .filter_map(|declarator| declarator.child_by_field_name("name"))
            .flat_map(|name| identifiers_in(name, source))
            .collect();
    }

    for field in NAME_FIELDS {
        if let Some(child) = node.child_by_field_name(field) {
            return identifiers_in(child, source);
        }
    }

    // shorthand forms carry their name without a field
    if let Some(name) = identifier_text(node, source) {
        return vec![name];
    }

    let mut cursor = node.walk();
    let name = node
        .named_children(&mut cursor)
        .find_map(|child| identifier_text(child, source));
    name.into_iter().collect()
}

/// Widen `node` over the comments and decorators/attributes sitting directly above it and
/// over a trailing `;` that belongs to it.
pub(crate) fn grouped_span(node: Node<'_>, leading: &[&str]) -> Span {
    let mut first = node;
    while let Some(prev) = first.prev_sibling() {
        let adjacent = last_row(prev) + 1 >= first.start_position().row;
        if leading.contains(&prev.kind()) && adjacent && !trails_previous(prev) {
            first = prev;
        } else {
            break;
        }
    }

    let end = match node.next_sibling() {
        Some(next) if next.kind() == ";" => next.end_byte(),
        _ => node.end_byte(),
    };

    Span::new(first.start_byte(), end)
}

/// A comment sharing a line with the end of the node before it belongs to that node
fn trails_previous(node: Node<'_>) -> bool {
    node.prev_sibling()
        .is_some_and(|prev| last_row(prev) == node.start_position().row)
}

/// Row of the last character of `node`; line comments may end at column 0 of the next row
fn last_row(node: Node<'_>) -> usize {
    let end = node.end_position();
    if end.column == 0 && end.row > node.start_position().row {
        end.row - 1
    } else {
        end.row
    }
}

/// `node` followed by each of its ancestors, innermost first
pub(crate) fn ancestors_at(tree: &Tree, offset: usize) -> impl Iterator<Item = Node<'_>> {
    let innermost = tree.root_node().descendant_for_byte_range(offset, offset);
    std::iter::successors(innermost, |node| node.parent())
}
