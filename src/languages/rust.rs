use std::sync::Arc;

use tree_sitter::Language;

use super::{
    common::{KindTableHandler, NodeKinds},
    LanguageCommon, LanguageFamily, LanguageName,
};
use crate::{editor::TextDocument, syntax::TreeCache};

static KINDS: NodeKinds = NodeKinds {
    classes: &[
        "struct_item",
        "enum_item",
        "union_item",
        "trait_item",
        "impl_item",
    ],
    functions: &["function_item", "function_signature_item"],
    variables: &["let_declaration", "const_item", "static_item"],
    object_keys: &["field_initializer", "shorthand_field_initializer"],
    members: &[
        "function_item",
        "function_signature_item",
        "field_declaration",
        "const_item",
        "type_item",
        "associated_type",
        "enum_variant",
    ],
    member_bodies: &[
        "declaration_list",
        "field_declaration_list",
        "enum_variant_list",
    ],
    strings: &["string_literal", "raw_string_literal"],
    wrappers: &[],
    leading: &["attribute_item", "line_comment", "block_comment"],
    function_scopes: &["function_item", "closure_expression"],
    jsx_elements: &[],
    scoped_members: false,
};

fn grammar(_: &TextDocument) -> (&'static str, Language) {
    ("rust", tree_sitter_rust::LANGUAGE.into())
}

pub fn language(cache: Arc<TreeCache>) -> LanguageCommon {
    LanguageCommon {
        name: LanguageName::Rust,
        family: LanguageFamily::Generic,
        file_extensions: &["rs"],
        handler: Arc::new(KindTableHandler::new(grammar, &KINDS, cache)),
    }
}
