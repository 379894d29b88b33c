use crate::{editor::MessageLevel, languages::traits::HandlerError};

/// Every way an element command can end without doing its work
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// No document is open; commands stay silent
    #[error("no active document")]
    NoActiveContext,
    #[error("{capability} is not available for {language}")]
    UnsupportedLanguage {
        language: String,
        capability: &'static str,
    },
    #[error("no {0} found at the cursor")]
    NoElementFound(&'static str),
    #[error("{0}")]
    BoundaryExceeded(String),
    #[error("the editor rejected the edit")]
    EditApplicationFailure,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CommandError {
    /// How the error is shown, or `None` when it is not shown at all
    pub fn level(&self) -> Option<MessageLevel> {
        match self {
            Self::NoActiveContext => None,
            Self::UnsupportedLanguage { .. } => Some(MessageLevel::Warning),
            Self::NoElementFound(_) | Self::BoundaryExceeded(_) => Some(MessageLevel::Info),
            Self::EditApplicationFailure | Self::Internal(_) => Some(MessageLevel::Error),
        }
    }

    pub fn from_handler(error: HandlerError, language: impl Into<String>) -> Self {
        match error {
            HandlerError::Unsupported(capability) => Self::UnsupportedLanguage {
                language: language.into(),
                capability,
            },
            HandlerError::Internal(error) => Self::Internal(error),
        }
    }
}
