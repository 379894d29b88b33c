use std::sync::Arc;

use anyhow::Result;
use tree_sitter::{Language, Node, Tree};

use super::traits::{Capability, HandlerError, LanguageHandler};
use crate::{
    editor::{Position, Range, TextDocument},
    members::{self, MemberWithRange},
    syntax::{
        ancestors_at, declared_names, find_containing_scope, grouped_span, node_text, parse_with,
        Span, TreeCache,
    },
};

/// Picks the grammar for a document: cache key name and tree-sitter language
pub(super) type GrammarFor = fn(&TextDocument) -> (&'static str, Language);

/// Node kinds a grammar uses for each element lookup
#[derive(Debug)]
pub(super) struct NodeKinds {
    pub classes: &'static [&'static str],
    pub functions: &'static [&'static str],
    pub variables: &'static [&'static str],
    pub object_keys: &'static [&'static str],
    /// Declarations that count as class members when they sit in one of `member_bodies`
    pub members: &'static [&'static str],
    pub member_bodies: &'static [&'static str],
    pub strings: &'static [&'static str],
    /// Statements that only exist to carry a declaration, like `export`
    pub wrappers: &'static [&'static str],
    /// Siblings above a declaration that belong to it
    pub leading: &'static [&'static str],
    pub function_scopes: &'static [&'static str],
    pub jsx_elements: &'static [&'static str],
    /// Whether the scope and member model applies to this grammar
    pub scoped_members: bool,
}

pub(super) struct Parsed {
    pub source: String,
    pub tree: Tree,
}

/// Language handler driven by a table of node kinds
pub(super) struct KindTableHandler {
    grammar: GrammarFor,
    kinds: &'static NodeKinds,
    cache: Arc<TreeCache>,
}

impl KindTableHandler {
    pub fn new(grammar: GrammarFor, kinds: &'static NodeKinds, cache: Arc<TreeCache>) -> Self {
        Self {
            grammar,
            kinds,
            cache,
        }
    }

    pub fn parse(&self, document: &TextDocument) -> Result<Parsed> {
        let source = document.text();
        let (name, language) = (self.grammar)(document);
        let tree = self
            .cache
            .get_or_parse(name, &source, || parse_with(&language, &source))?;
        Ok(Parsed { source, tree })
    }

    /// The innermost declaration of one of `kinds` around the word that declares the word
    fn lookup(
        &self,
        document: &TextDocument,
        position: Position,
        word: &str,
        kinds: &[&str],
        accept: impl Fn(Node<'_>) -> bool,
    ) -> Capability<Option<Span>> {
        let parsed = self.parse(document)?;
        let offset = anchor_offset(document, position, word);

        let span = ancestors_at(&parsed.tree, offset)
            .find(|node| {
                kinds.contains(&node.kind())
                    && accept(*node)
                    && declared_names(*node, &parsed.source)
                        .iter()
                        .any(|name| name == word)
            })
            .map(|node| {
                log::trace!("{word} is declared by {}", node.kind());
                self.element_span(node)
            });

        Ok(span)
    }

    fn resolve(
        &self,
        document: &TextDocument,
        position: Position,
        word: &str,
        kinds: &[&str],
        accept: impl Fn(Node<'_>) -> bool,
    ) -> Capability<Option<Range>> {
        Ok(self
            .lookup(document, position, word, kinds, accept)?
            .map(|span| document.range_of(span)))
    }

    /// The declaration widened over its wrappers, leading comments and trailing `;`
    pub fn element_span(&self, node: Node<'_>) -> Span {
        let mut outer = node;
        while let Some(parent) = outer.parent() {
            if self.kinds.wrappers.contains(&parent.kind()) && wraps(parent, outer) {
                outer = parent;
            } else {
                break;
            }
        }
        grouped_span(outer, self.kinds.leading)
    }

    fn is_member(&self, node: Node<'_>) -> bool {
        let mut parent = node.parent();
        while let Some(wrapper) = parent.filter(|p| self.kinds.wrappers.contains(&p.kind())) {
            parent = wrapper.parent();
        }
        parent
            .filter(|body| self.kinds.member_bodies.contains(&body.kind()))
            .and_then(|body| body.parent())
            .is_some_and(|owner| self.kinds.classes.contains(&owner.kind()))
    }

    fn innermost(
        &self,
        document: &TextDocument,
        position: Position,
        kinds: &[&str],
    ) -> Result<Option<Span>> {
        let parsed = self.parse(document)?;
        let offset = document.offset_at(position);
        let span = ancestors_at(&parsed.tree, offset)
            .find(|node| kinds.contains(&node.kind()))
            .map(Span::of);
        Ok(span)
    }
}

/// Whether `parent` exists only to carry `child`
fn wraps(parent: Node<'_>, child: Node<'_>) -> bool {
    let carried = parent
        .child_by_field_name("declaration")
        .or_else(|| parent.child_by_field_name("definition"));
    match carried {
        Some(carried) => carried.id() == child.id(),
        None => parent.named_child_count() == 1,
    }
}

/// Extend `span` over a `,` directly following `node`
fn with_separator(node: Node<'_>, span: Span) -> Span {
    match node.next_sibling() {
        Some(next) if next.kind() == "," => Span::new(span.start, next.end_byte()),
        _ => span,
    }
}

/// Start of `word` when the cursor touches it, so a cursor just past the word still lands in its
/// node
pub(super) fn anchor_offset(document: &TextDocument, position: Position, word: &str) -> usize {
    match document.word_at(position) {
        Some((range, found)) if found == word => document.offset_at(range.start),
        _ => document.offset_at(position),
    }
}

impl LanguageHandler for KindTableHandler {
    fn class_range(
        &self,
        document: &TextDocument,
        position: Position,
        word: &str,
    ) -> Capability<Option<Range>> {
        self.resolve(document, position, word, self.kinds.classes, |_| true)
    }

    fn function_range(
        &self,
        document: &TextDocument,
        position: Position,
        word: &str,
    ) -> Capability<Option<Range>> {
        self.resolve(document, position, word, self.kinds.functions, |_| true)
    }

    fn variable_range(
        &self,
        document: &TextDocument,
        position: Position,
        word: &str,
    ) -> Capability<Option<Range>> {
        self.resolve(document, position, word, self.kinds.variables, |node| {
            !self.is_member(node)
        })
    }

    fn object_key_range(
        &self,
        document: &TextDocument,
        position: Position,
        word: &str,
    ) -> Capability<Option<Range>> {
        let parsed = self.parse(document)?;
        let offset = anchor_offset(document, position, word);
        let range = ancestors_at(&parsed.tree, offset)
            .find(|node| {
                self.kinds.object_keys.contains(&node.kind())
                    && !self.is_member(*node)
                    && declared_names(*node, &parsed.source)
                        .first()
                        .is_some_and(|name| name == word)
            })
            .map(|node| document.range_of(with_separator(node, self.element_span(node))));
        Ok(range)
    }

    fn class_member_range(
        &self,
        document: &TextDocument,
        position: Position,
        word: &str,
    ) -> Capability<Option<Range>> {
        self.resolve(document, position, word, self.kinds.members, |node| {
            self.is_member(node)
        })
    }

    fn multiline_string_range(
        &self,
        document: &TextDocument,
        position: Position,
        _word: &str,
    ) -> Capability<Option<Range>> {
        let parsed = self.parse(document)?;
        let offset = document.offset_at(position);
        let range = ancestors_at(&parsed.tree, offset)
            .find(|node| {
                self.kinds.strings.contains(&node.kind())
                    && node_text(*node, &parsed.source).contains('\n')
            })
            .map(|node| document.range_of(Span::of(node)));
        Ok(range)
    }

    fn jsx_element_range(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> Capability<Option<Range>> {
        if self.kinds.jsx_elements.is_empty() {
            return Err(HandlerError::Unsupported("jsx element selection"));
        }
        Ok(self
            .innermost(document, position, self.kinds.jsx_elements)?
            .map(|span| document.range_of(span)))
    }

    fn function_scope_range(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> Capability<Option<Range>> {
        let parsed = self.parse(document)?;
        let offset = document.offset_at(position);
        let range = ancestors_at(&parsed.tree, offset)
            .find(|node| self.kinds.function_scopes.contains(&node.kind()))
            .map(|node| document.range_of(self.element_span(node)));
        Ok(range)
    }

    fn members_in_scope(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> Capability<Vec<MemberWithRange>> {
        if !self.kinds.scoped_members {
            return Err(HandlerError::Unsupported("member navigation"));
        }

        let parsed = self.parse(document)?;
        let offset = document.offset_at(position);
        let members = find_containing_scope(&parsed.tree, &parsed.source, offset)
            .map(|scope| {
                log::trace!(
                    "{} scope with {} members",
                    scope.kind,
                    scope.members.len()
                );
                members::project(document, &scope.members)
            })
            .unwrap_or_default();
        Ok(members)
    }
}
