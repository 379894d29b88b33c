use std::sync::Arc;

use anyhow::Result;
use tree_sitter::{Node, Tree};

use super::{
    common::anchor_offset,
    traits::{Capability, LanguageHandler},
    LanguageCommon, LanguageFamily, LanguageName,
};
use crate::{
    editor::{Position, Range, TextDocument},
    syntax::{ancestors_at, node_text, parse_with, unquote, Span, TreeCache},
};

pub fn language(cache: Arc<TreeCache>) -> LanguageCommon {
    let handler = Arc::new(JsonHandler { cache });
    LanguageCommon {
        name: LanguageName::Json,
        family: LanguageFamily::StructuredData,
        file_extensions: &["json", "jsonc"],
        handler,
    }
}

/// One step of a path from the document root to a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySegment {
    Key(String),
    Index(usize),
}

struct JsonHandler {
    cache: Arc<TreeCache>,
}

impl JsonHandler {
    fn parse(&self, source: &str) -> Result<Tree> {
        self.cache.get_or_parse("json", source, || {
            parse_with(&tree_sitter_json::LANGUAGE.into(), source)
        })
    }
}

fn key_of(pair: Node<'_>, source: &str) -> Option<String> {
    pair.child_by_field_name("key")
        .map(|key| unquote(node_text(key, source)).to_string())
}

/// Path from the root to the innermost property around `offset`
pub fn key_path(tree: &Tree, source: &str, offset: usize) -> Vec<KeySegment> {
    let Some(innermost) = ancestors_at(tree, offset).find(|node| node.kind() == "pair") else {
        return vec![];
    };

    let mut path = vec![];
    let mut child = None::<Node<'_>>;
    for node in std::iter::successors(Some(innermost), |node| node.parent()) {
        match node.kind() {
            "pair" => path.extend(key_of(node, source).map(KeySegment::Key)),
            "array" => {
                if let Some(child) = child {
                    let mut cursor = node.walk();
                    let index = node
                        .named_children(&mut cursor)
                        .filter(|element| element.kind() != "comment")
                        .position(|element| element.id() == child.id());
                    if let Some(index) = index {
                        path.push(KeySegment::Index(index));
                    }
                }
            }
            _ => {}
        }
        child = Some(node);
    }

    path.reverse();
    path
}

/// Follow `path` from the root value, preferring the property that contains `offset` when a key
/// repeats
fn resolve_path<'tree>(
    tree: &'tree Tree,
    source: &str,
    path: &[KeySegment],
    offset: usize,
) -> Option<Node<'tree>> {
    let root = tree.root_node();
    let mut cursor = root.walk();
    let mut value = root
        .named_children(&mut cursor)
        .find(|node| node.kind() != "comment")?;
    let mut property = None;

    for segment in path {
        let mut cursor = value.walk();
        let children = value.named_children(&mut cursor).collect::<Vec<_>>();
        match segment {
            KeySegment::Key(key) => {
                let candidates = children
                    .into_iter()
                    .filter(|child| {
                        child.kind() == "pair" && key_of(*child, source).as_ref() == Some(key)
                    })
                    .collect::<Vec<_>>();
                let pair = candidates
                    .iter()
                    .find(|pair| Span::of(**pair).contains(offset))
                    .or_else(|| candidates.first())
                    .copied()?;
                value = pair.child_by_field_name("value")?;
                property = Some(pair);
            }
            KeySegment::Index(index) => {
                value = children
                    .into_iter()
                    .filter(|child| child.kind() != "comment")
                    .nth(*index)?;
            }
        }
    }

    property
}

impl LanguageHandler for JsonHandler {
    fn class_range(&self, _: &TextDocument, _: Position, _: &str) -> Capability<Option<Range>> {
        Ok(None)
    }

    fn function_range(&self, _: &TextDocument, _: Position, _: &str) -> Capability<Option<Range>> {
        Ok(None)
    }

    fn variable_range(&self, _: &TextDocument, _: Position, _: &str) -> Capability<Option<Range>> {
        Ok(None)
    }

    fn object_key_range(
        &self,
        _: &TextDocument,
        _: Position,
        _: &str,
    ) -> Capability<Option<Range>> {
        Ok(None)
    }

    fn class_member_range(
        &self,
        _: &TextDocument,
        _: Position,
        _: &str,
    ) -> Capability<Option<Range>> {
        Ok(None)
    }

    fn multiline_string_range(
        &self,
        _: &TextDocument,
        _: Position,
        _: &str,
    ) -> Capability<Option<Range>> {
        Ok(None)
    }

    fn property_range(
        &self,
        document: &TextDocument,
        position: Position,
        word: &str,
    ) -> Capability<Option<Range>> {
        let source = document.text();
        let tree = self.parse(&source)?;
        let offset = anchor_offset(document, position, word);

        let path = key_path(&tree, &source, offset);
        if path.is_empty() {
            return Ok(None);
        }
        log::trace!("json key path {path:?}");

        Ok(resolve_path(&tree, &source, &path, offset).map(|pair| {
            let span = match pair.next_sibling() {
                Some(next) if next.kind() == "," => Span::new(pair.start_byte(), next.end_byte()),
                _ => Span::of(pair),
            };
            document.range_of(span)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKAGE: &str = r#"{
  "name": "demo",
  "scripts": {
    "build": "tsc",
    "test": "jest"
  },
  "files": ["dist", { "main": "index.js" }]
}
"#;

    fn document() -> TextDocument {
        TextDocument::new("package.json", "json", PACKAGE)
    }

    #[test]
    fn key_path_reaches_nested_properties() {
        let tree = parse_with(&tree_sitter_json::LANGUAGE.into(), PACKAGE).unwrap();
        let offset = PACKAGE.find("main").unwrap();
        assert_eq!(
            key_path(&tree, PACKAGE, offset),
            vec![
                KeySegment::Key("files".into()),
                KeySegment::Index(1),
                KeySegment::Key("main".into())
            ]
        );
    }

    #[test]
    fn property_range_includes_trailing_comma() {
        let handler = JsonHandler {
            cache: Arc::new(TreeCache::new(2)),
        };
        let range = handler
            .property_range(&document(), Position::new(3, 6), "build")
            .unwrap()
            .unwrap();
        assert_eq!(range, Range::new(Position::new(3, 4), Position::new(3, 19)));
    }

    #[test]
    fn last_property_has_no_comma() {
        let handler = JsonHandler {
            cache: Arc::new(TreeCache::new(2)),
        };
        let range = handler
            .property_range(&document(), Position::new(4, 6), "test")
            .unwrap()
            .unwrap();
        assert_eq!(document().text_in(range), r#""test": "jest""#);
    }

    #[test]
    fn root_value_has_no_property() {
        let handler = JsonHandler {
            cache: Arc::new(TreeCache::new(2)),
        };
        assert_eq!(
            handler
                .property_range(&document(), Position::new(0, 0), "x")
                .unwrap(),
            None
        );
    }
}
