use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token accounting of a response.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct Usage {
    /// Tokens consumed by the input messages.
    pub prompt_tokens: u64,
    /// Tokens generated by the model.
    pub completion_tokens: u64,
    /// Sum of the two above.
    pub total_tokens: u64,
}

/// A complete response of a single-shot chat request.
///
/// The payload is taken as the service sends it. Fields this type doesn't
/// know about are kept in [`extra`](Self::extra).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Unique identifier of this round.
    pub id: String,
    /// The kind of the returned object, e.g. `chat.completion`.
    #[serde(default)]
    pub object: String,
    /// Unix timestamp of the response.
    #[serde(default)]
    pub created: i64,
    /// Generated text.
    pub result: String,
    /// Whether the result was cut off.
    #[serde(default)]
    pub is_truncated: bool,
    /// Whether the caller should drop the conversation history.
    #[serde(default)]
    pub need_clear_history: bool,
    /// Token accounting.
    #[serde(default)]
    pub usage: Usage,
    /// Sequence number of the fragment, only sent in streaming mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_id: Option<u64>,
    /// Whether this is the last fragment, only sent in streaming mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_end: Option<bool>,
    /// Why the generation stopped, e.g. `normal` or `length`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    /// Moderation flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<i64>,
    /// The round that triggered `need_clear_history`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ban_round: Option<i64>,
    /// Remaining fields of the payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "id": "as-123456",
            "object": "chat.completion",
            "created": 1699000000,
            "result": "Hello!",
            "is_truncated": false,
            "need_clear_history": false,
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 20,
                "total_tokens": 30
            },
            "search_info": { "search_results": [] }
        }))
        .unwrap();
        assert_eq!(resp.id, "as-123456");
        assert_eq!(resp.result, "Hello!");
        assert_eq!(resp.usage.total_tokens, 30);
        assert!(resp.finish_reason.is_none());
        assert!(resp.extra.contains_key("search_info"));
    }
}
