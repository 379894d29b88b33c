use std::sync::Arc;

use tree_sitter::Language;

use super::{
    common::{KindTableHandler, NodeKinds},
    traits::LanguageHandler,
    LanguageCommon, LanguageFamily, LanguageName,
};
use crate::{editor::TextDocument, syntax::ScriptKind, syntax::TreeCache};

static KINDS: NodeKinds = NodeKinds {
    classes: &[
        "class_declaration",
        "abstract_class_declaration",
        "class",
        "interface_declaration",
    ],
    functions: &[
        "function_declaration",
        "generator_function_declaration",
        "function_expression",
        "function",
        "generator_function",
        "function_signature",
    ],
    variables: &["lexical_declaration", "variable_declaration"],
    object_keys: &["pair", "shorthand_property_identifier", "method_definition"],
    members: &[
        "method_definition",
        "public_field_definition",
        "field_definition",
        "method_signature",
        "abstract_method_signature",
        "property_signature",
    ],
    member_bodies: &["class_body", "interface_body", "object_type"],
    strings: &["template_string", "string"],
    wrappers: &["export_statement"],
    leading: &["decorator", "comment"],
    function_scopes: &[
        "function_declaration",
        "generator_function_declaration",
        "function_expression",
        "function",
        "generator_function",
        "arrow_function",
        "method_definition",
    ],
    jsx_elements: &["jsx_element", "jsx_self_closing_element"],
    scoped_members: true,
};

fn grammar(document: &TextDocument) -> (&'static str, Language) {
    let kind = ScriptKind::infer(document.file_name(), document.language_id());
    (kind.grammar_name(), kind.language())
}

/// TypeScript and JavaScript with and without JSX, served by one handler
pub fn languages(cache: Arc<TreeCache>) -> Vec<LanguageCommon> {
    let handler: Arc<dyn LanguageHandler> =
        Arc::new(KindTableHandler::new(grammar, &KINDS, cache));

    [
        (LanguageName::Typescript, &["ts", "mts", "cts"] as &[&str]),
        (LanguageName::Typescriptreact, &["tsx"] as &[&str]),
        (LanguageName::Javascript, &["js", "mjs", "cjs"] as &[&str]),
        (LanguageName::Javascriptreact, &["jsx"] as &[&str]),
    ]
    .into_iter()
    .map(|(name, file_extensions)| LanguageCommon {
        name,
        family: LanguageFamily::Ast,
        file_extensions,
        handler: handler.clone(),
    })
    .collect()
}
