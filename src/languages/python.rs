use std::sync::Arc;

use tree_sitter::Language;

use super::{
    common::{KindTableHandler, NodeKinds},
    LanguageCommon, LanguageFamily, LanguageName,
};
use crate::{editor::TextDocument, syntax::TreeCache};

static KINDS: NodeKinds = NodeKinds {
    classes: &["class_definition"],
    functions: &["function_definition"],
    variables: &["assignment"],
    object_keys: &["pair", "keyword_argument"],
    members: &["function_definition", "assignment"],
    member_bodies: &["block"],
    strings: &["string"],
    wrappers: &["decorated_definition", "expression_statement"],
    leading: &["comment"],
    function_scopes: &["function_definition", "lambda"],
    jsx_elements: &[],
    scoped_members: false,
};

fn grammar(_: &TextDocument) -> (&'static str, Language) {
    ("python", tree_sitter_python::LANGUAGE.into())
}

pub fn language(cache: Arc<TreeCache>) -> LanguageCommon {
    LanguageCommon {
        name: LanguageName::Python,
        family: LanguageFamily::Generic,
        file_extensions: &["py", "pyi"],
        handler: Arc::new(KindTableHandler::new(grammar, &KINDS, cache)),
    }
}
