use std::fmt;

use thiserror::Error;

/// Boxed cause attached to transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

/// Every way a current-weather query can fail.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Response is not a valid structured document")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("Response is missing required field '{path}': {problem}{}", provider_hint(.provider_message))]
    IncompleteResponse {
        path: &'static str,
        problem: FieldProblem,
        /// `message` from the provider's error envelope, if the payload carried one.
        provider_message: Option<String>,
    },

    #[error("Invalid usage: {0}")]
    Usage(String),
}

impl WeatherError {
    pub(crate) fn usage<S: Into<String>>(message: S) -> Self {
        Self::Usage(message.into())
    }

    /// True for payloads the provider sent back but that don't describe a location,
    /// which is what an unknown city or a bad query usually produces.
    pub fn is_invalid_query(&self) -> bool {
        matches!(
            self,
            WeatherError::MalformedResponse(_) | WeatherError::IncompleteResponse { .. }
        )
    }

    /// HTTP status of a transport failure, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            WeatherError::Transport(err) => err.status(),
            _ => None,
        }
    }
}

fn provider_hint(message: &Option<String>) -> String {
    match message {
        Some(msg) => format!(" (provider said: {msg})"),
        None => String::new(),
    }
}

/// What was wrong with a required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    Missing,
    EmptyList,
    WrongType { expected: &'static str },
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Missing => f.write_str("field is absent"),
            FieldProblem::EmptyList => f.write_str("list is empty"),
            FieldProblem::WrongType { expected } => write!(f, "expected {expected}"),
        }
    }
}

/// A GET that did not produce a successful response body.
///
/// Causes are kept as opaque boxed errors so the HTTP client's own types stay out of
/// the public API.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("Request to {url} failed with status {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("Failed to read response body from {url}")]
    Body {
        url: String,
        #[source]
        source: BoxError,
    },
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
