use std::collections::BTreeMap;

use crate::i18n::{Language, Message};

/// Errors surfaced by every public operation of the crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Local input checks failed; keyed by form field.
    #[error("validation failed for: {}", .0.keys().copied().collect::<Vec<_>>().join(", "))]
    Validation(BTreeMap<&'static str, String>),

    /// The backend answered with a non-success status code.
    #[error("server rejected the request ({code}): {message}")]
    Domain { code: String, message: String },

    /// The backend answered with a non-2xx HTTP status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Network or decoding failure.
    #[error("transport error: {0:#}")]
    Transport(anyhow::Error),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Transport(err)
    }
}

impl Error {
    pub fn domain(code: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Domain {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Text suitable for an error banner. Server messages are shown as-is,
    /// anything below the domain layer collapses into a generic message.
    pub fn user_message(&self, language: Language) -> String {
        match self {
            Error::Validation(errors) => errors
                .values()
                .cloned()
                .collect::<Vec<_>>()
                .join("\n"),
            Error::Domain { message, .. } if !message.trim().is_empty() => message.clone(),
            Error::Domain { .. } => Message::UnexpectedServerResponse.text(language).to_string(),
            Error::Http { .. } | Error::Transport(_) => {
                Message::GenericNetworkError.text(language).to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
