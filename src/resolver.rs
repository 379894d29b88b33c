use serde::{Deserialize, Serialize};

use crate::{
    editor::{Position, Range, TextDocument},
    languages::{
        traits::{Capability, HandlerError, LanguageHandler},
        LanguageCommon, LanguageFamily,
    },
};

/// Which lookup order full-syntax-tree languages use
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ResolverOrder {
    /// Innermost declarations first: variable before function before class
    #[default]
    Specific,
    /// The outermost-first order every other language uses
    Generic,
}

/// One handler lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Lookup {
    Class,
    Function,
    Variable,
    ObjectKey,
    ClassMember,
    MultilineString,
}

pub const AST_PRIORITY: [Lookup; 6] = [
    Lookup::Variable,
    Lookup::Function,
    Lookup::MultilineString,
    Lookup::ObjectKey,
    Lookup::ClassMember,
    Lookup::Class,
];

pub const GENERIC_PRIORITY: [Lookup; 6] = [
    Lookup::Class,
    Lookup::Function,
    Lookup::MultilineString,
    Lookup::ObjectKey,
    Lookup::ClassMember,
    Lookup::Variable,
];

impl Lookup {
    fn run(
        self,
        handler: &dyn LanguageHandler,
        document: &TextDocument,
        position: Position,
        word: &str,
    ) -> Capability<Option<Range>> {
        match self {
            Self::Class => handler.class_range(document, position, word),
            Self::Function => handler.function_range(document, position, word),
            Self::Variable => handler.variable_range(document, position, word),
            Self::ObjectKey => handler.object_key_range(document, position, word),
            Self::ClassMember => handler.class_member_range(document, position, word),
            Self::MultilineString => handler.multiline_string_range(document, position, word),
        }
    }
}

/// Finds the one element boundary a cursor stands for
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementResolver {
    order: ResolverOrder,
}

impl ElementResolver {
    pub fn new(order: ResolverOrder) -> Self {
        Self { order }
    }

    pub fn priority(&self, family: LanguageFamily) -> &'static [Lookup] {
        match (family, self.order) {
            (LanguageFamily::Ast, ResolverOrder::Specific) => &AST_PRIORITY,
            _ => &GENERIC_PRIORITY,
        }
    }

    /// The first range the language reports for the word under `position`, in priority order
    pub fn resolve(
        &self,
        language: &LanguageCommon,
        document: &TextDocument,
        position: Position,
    ) -> anyhow::Result<Option<Range>> {
        let Some((_, word)) = document.word_at(position) else {
            log::trace!("no word at {position:?}");
            return Ok(None);
        };
        let handler = language.handler();

        match language.family() {
            LanguageFamily::StructuredData => {
                return optional(handler.property_range(document, position, &word));
            }
            LanguageFamily::Markup => {
                if let Some(range) = optional(handler.element_range(document, position, &word))? {
                    return Ok(Some(range));
                }
            }
            LanguageFamily::Ast | LanguageFamily::Generic => {}
        }

        for lookup in self.priority(language.family()) {
            if let Some(range) = optional(lookup.run(handler, document, position, &word))? {
                log::debug!("{word} resolved by {lookup} lookup to {range:?}");
                return Ok(Some(range));
            }
        }

        Ok(None)
    }
}

/// An unsupported capability finds nothing
fn optional(result: Capability<Option<Range>>) -> anyhow::Result<Option<Range>> {
    match result {
        Ok(range) => Ok(range),
        Err(HandlerError::Unsupported(capability)) => {
            log::trace!("{capability} skipped");
            Ok(None)
        }
        Err(HandlerError::Internal(error)) => Err(error),
    }
}
