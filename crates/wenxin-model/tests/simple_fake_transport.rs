use std::collections::VecDeque;
use std::future::ready;

use bytes::Bytes;
use serde_json::{Value, json};
use wenxin_model::{
    BodyStream, ChatResponse, HttpRequest, Message, Transport, TransportError,
    validate_messages,
};

struct FakeBody {
    chunks: VecDeque<Bytes>,
}

impl BodyStream for FakeBody {
    fn next_chunk(
        &mut self,
    ) -> impl Future<Output = Result<Option<Bytes>, TransportError>> + Send
    {
        ready(Ok(self.chunks.pop_front()))
    }
}

/// Echoes the last user message back, word by word when streaming.
struct FakeTransport;

impl FakeTransport {
    fn last_content(req: &HttpRequest) -> Option<String> {
        let messages: Vec<Message> = serde_json::from_value(
            req.body.as_ref()?.get("messages")?.clone(),
        )
        .ok()?;
        validate_messages(&messages).ok()?;
        messages.last().map(|msg| msg.content.clone())
    }
}

impl Transport for FakeTransport {
    type Body = FakeBody;

    fn post_json(
        &self,
        req: HttpRequest,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send {
        let result = match Self::last_content(&req) {
            Some(content) => Ok(json!({
                "id": "as-1",
                "result": format!("You said {content}"),
            })),
            None => Err(TransportError::new("bad request").with_status(400)),
        };
        ready(result)
    }

    fn post_stream(
        &self,
        req: HttpRequest,
    ) -> impl Future<Output = Result<Self::Body, TransportError>> + Send {
        let result = match Self::last_content(&req) {
            Some(content) => Ok(FakeBody {
                chunks: format!("You said {content}")
                    .split(' ')
                    .map(|word| {
                        Bytes::from(json!({ "result": word }).to_string())
                    })
                    .collect(),
            }),
            None => Err(TransportError::new("bad request").with_status(400)),
        };
        ready(result)
    }
}

mod tests {
    use super::*;

    fn request(messages: &[Message]) -> HttpRequest {
        HttpRequest::post("http://localhost/chat")
            .with_query("access_token", "token")
            .with_body(json!({ "messages": messages }))
    }

    #[tokio::test]
    async fn test_completion() {
        let transport = FakeTransport;
        let req = request(&[Message::user("Good morning")]);
        assert_eq!(req.query_value("access_token"), Some("token"));

        let value = transport.post_json(req).await.unwrap();
        let resp: ChatResponse = serde_json::from_value(value).unwrap();
        assert_eq!(resp.result, "You said Good morning");
    }

    #[tokio::test]
    async fn test_streaming() {
        let transport = FakeTransport;
        let mut body = transport
            .post_stream(request(&[Message::user("Good morning")]))
            .await
            .unwrap();

        let mut words = Vec::new();
        while let Some(chunk) = body.next_chunk().await.unwrap() {
            let value: Value = serde_json::from_slice(&chunk).unwrap();
            words.push(value["result"].as_str().unwrap().to_owned());
        }
        assert_eq!(words.join(" "), "You said Good morning");
    }

    #[tokio::test]
    async fn test_error() {
        let transport = FakeTransport;
        let err = transport
            .post_json(request(&[Message::assistant("Hi")]))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
    }
}
