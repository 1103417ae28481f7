use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wenxin_model::{Message, SamplingParameters};

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TokenReply {
    pub access_token: Option<String>,
    pub expires_in: Option<u64>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl TokenReply {
    pub fn into_token(self) -> Result<String, String> {
        if let Some(token) = self.access_token.filter(|t| !t.is_empty()) {
            return Ok(token);
        }
        Err(match (self.error, self.error_description) {
            (Some(error), Some(description)) => {
                format!("{error} ({description})")
            }
            (Some(error), None) => error,
            _ => "response has no `access_token` field".to_owned(),
        })
    }
}

/// The envelope the chat endpoint answers with when it rejects a request,
/// usually with HTTP 200.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RemoteError {
    pub error_code: i64,
    #[serde(default)]
    pub error_msg: String,
}

impl RemoteError {
    pub fn from_value(value: &Value) -> Option<Self> {
        value.get("error_code")?;
        serde_json::from_value(value.clone()).ok()
    }
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "service error {}: {}", self.error_code, self.error_msg)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
struct StreamFragment {
    result: Option<String>,
    error_code: Option<i64>,
    #[serde(default)]
    error_msg: String,
}

/// What one line of a streaming body turned out to be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamLine {
    /// A text fragment for the caller.
    Chunk(String),
    /// A well-formed line without text, e.g. the empty closing fragment.
    Empty,
    /// The service aborted the stream.
    Remote(RemoteError),
}

/// Parses one line of a streaming body.
///
/// Lines may carry the `data:` field prefix of server-sent events.
pub fn parse_stream_line(line: &[u8]) -> Result<StreamLine, serde_json::Error> {
    let line = line.trim_ascii();
    let line = match line.strip_prefix(b"data:") {
        Some(data) => data.trim_ascii(),
        None => line,
    };
    if line.is_empty() {
        return Ok(StreamLine::Empty);
    }

    let fragment: StreamFragment = serde_json::from_slice(line)?;
    if let Some(error_code) = fragment.error_code {
        return Ok(StreamLine::Remote(RemoteError {
            error_code,
            error_msg: fragment.error_msg,
        }));
    }
    Ok(match fragment.result {
        Some(result) if !result.is_empty() => StreamLine::Chunk(result),
        _ => StreamLine::Empty,
    })
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatRequestBody<'a> {
    messages: &'a [Message],
    temperature: f64,
    top_p: f64,
    penalty_score: f64,
    max_output_tokens: u32,
    stream: bool,
    enable_system_memory: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_memory_id: Option<&'a str>,
}

#[inline]
pub fn create_request<'a>(
    messages: &'a [Message],
    params: &SamplingParameters,
    stream: bool,
    enable_system_memory: bool,
    system_memory_id: Option<&'a str>,
) -> ChatRequestBody<'a> {
    ChatRequestBody {
        messages,
        temperature: params.temperature,
        top_p: params.top_p,
        penalty_score: params.penalty_score,
        max_output_tokens: params.max_output_tokens,
        stream,
        enable_system_memory,
        system_memory_id: system_memory_id.filter(|_| enable_system_memory),
    }
}
