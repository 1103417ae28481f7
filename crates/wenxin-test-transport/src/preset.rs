use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A chunk of a preset streaming body.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetChunk {
    /// Raw bytes of the body, delivered as-is.
    #[serde(rename = "data")]
    Data(String),
    /// Fails the body read with the given message.
    #[serde(rename = "error")]
    Error(String),
}

/// How the transport replies to a request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    /// Replies with a JSON body.
    #[serde(rename = "json")]
    Json(Value),
    /// Fails the request before any body is received.
    #[serde(rename = "failure")]
    Failure {
        /// The error message.
        message: String,
        /// The HTTP status, if the failure was a status error.
        status: Option<u16>,
    },
    /// Replies with a body delivered in the given chunks.
    #[serde(rename = "stream")]
    Stream(Vec<PresetChunk>),
}

impl PresetReply {
    /// Creates a `Failure` reply without status.
    #[inline]
    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self::Failure {
            message: message.into(),
            status: None,
        }
    }

    /// Creates a `Stream` reply from raw body chunks.
    pub fn stream<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Stream(
            chunks
                .into_iter()
                .map(|chunk| PresetChunk::Data(chunk.into()))
                .collect(),
        )
    }
}
