use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

use crate::message::Role;
use crate::params::Parameter;

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The client was constructed with invalid inputs.
    Config,
    /// The conversation or the sampling parameters are malformed.
    Validation,
    /// The access token could not be obtained.
    Auth,
    /// A single-shot request failed.
    Request,
    /// A streaming request failed.
    Stream,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Config => write!(f, "Config error"),
            ErrorKind::Validation => write!(f, "Validation error"),
            ErrorKind::Auth => write!(f, "Auth error"),
            ErrorKind::Request => write!(f, "Request error"),
            ErrorKind::Stream => write!(f, "Stream error"),
        }
    }
}

/// Describes why a conversation or a parameter set was rejected.
#[derive(Clone, Debug, PartialEq)]
pub enum Violation {
    /// The conversation has no messages.
    EmptyConversation,
    /// The conversation has an even number of messages, so it does not
    /// end on a user turn.
    EvenLength(usize),
    /// The message at `position` (1-based) has the wrong role.
    UnexpectedRole {
        /// 1-based index of the offending message.
        position: usize,
        /// The role required at this position.
        expected: Role,
    },
    /// The total content length exceeds the limit.
    ContentTooLong {
        /// Total number of characters in the conversation.
        total: usize,
        /// The maximum number of characters allowed.
        limit: usize,
    },
    /// A sampling parameter is outside of its accepted range.
    OutOfRange {
        /// The offending parameter.
        parameter: Parameter,
        /// The rejected value.
        value: f64,
    },
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Violation::EmptyConversation => {
                write!(f, "messages must be a non-empty sequence")
            }
            Violation::EvenLength(len) => write!(
                f,
                "messages must have an odd length, got {len} messages"
            ),
            Violation::UnexpectedRole { position, expected } => write!(
                f,
                "message {position} must have role `{}`",
                expected.as_str()
            ),
            Violation::ContentTooLong { total, limit } => write!(
                f,
                "total content length {total} exceeds {limit} characters"
            ),
            Violation::OutOfRange { parameter, value } => write!(
                f,
                "{} must be within {}, got {value}",
                parameter.name(),
                parameter.range()
            ),
        }
    }
}

/// Error type for all operations of the SDK.
#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    violation: Option<Violation>,
}

impl Error {
    /// Creates a new error of the given kind.
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            violation: None,
        }
    }

    /// Creates a new `Config` error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Creates a new `Auth` error wrapping the given cause.
    #[inline]
    pub fn auth(cause: impl Display) -> Self {
        Self::new(
            ErrorKind::Auth,
            format!("failed to obtain access token: {cause}"),
        )
    }

    /// Creates a new `Request` error wrapping the given cause.
    #[inline]
    pub fn request(cause: impl Display) -> Self {
        Self::new(ErrorKind::Request, format!("request failed: {cause}"))
    }

    /// Creates a new `Stream` error wrapping the given cause.
    #[inline]
    pub fn stream(cause: impl Display) -> Self {
        Self::new(ErrorKind::Stream, format!("stream failed: {cause}"))
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the validation failure, if this is a `Validation` error.
    #[inline]
    pub fn violation(&self) -> Option<&Violation> {
        self.violation.as_ref()
    }
}

impl From<Violation> for Error {
    fn from(violation: Violation) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: violation.to_string(),
            violation: Some(violation),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for Error {}

/// A failure reported by a [`Transport`](crate::Transport).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportError {
    message: String,
    status: Option<u16>,
}

impl TransportError {
    /// Creates a new transport error.
    #[inline]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Attaches the HTTP status code of the failed response.
    #[inline]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status code, if the server responded at all.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for TransportError {}
