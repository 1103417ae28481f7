//! A scripted HTTP transport for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use serde_json::Value;
use tokio::time::sleep;
use wenxin_model::{BodyStream, HttpRequest, Transport, TransportError};

pub use preset::*;

const TOKEN_PATH: &str = "/oauth/2.0/token";

#[derive(Default)]
struct Inner {
    token_reply: Option<PresetReply>,
    chat_reply: Option<PresetReply>,
    delay: Option<Duration>,
    requests: Vec<HttpRequest>,
}

/// A local fake transport for testing purpose.
///
/// Requests to a URL ending with `/oauth/2.0/token` are answered with the
/// token reply, all other requests with the chat reply. Replies are reused
/// until they are replaced, and a request without a reply fails.
///
/// Every request is recorded and can be inspected afterwards. Clones share
/// the same script and records.
#[derive(Clone, Default)]
pub struct TestTransport {
    inner: Arc<Mutex<Inner>>,
}

impl TestTransport {
    /// Sets the reply of token requests.
    #[inline]
    pub fn set_token_reply(&self, reply: PresetReply) {
        self.lock().token_reply = Some(reply);
    }

    /// Sets the reply of chat requests.
    #[inline]
    pub fn set_chat_reply(&self, reply: PresetReply) {
        self.lock().chat_reply = Some(reply);
    }

    /// Delays every reply and every body chunk by `duration`.
    #[inline]
    pub fn set_delay(&self, duration: Duration) {
        self.lock().delay = Some(duration);
    }

    /// Returns all recorded requests, in the order they were sent.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    /// Returns the recorded token requests.
    pub fn token_requests(&self) -> Vec<HttpRequest> {
        self.requests_where(|req| is_token_request(req))
    }

    /// Returns the recorded chat requests.
    pub fn chat_requests(&self) -> Vec<HttpRequest> {
        self.requests_where(|req| !is_token_request(req))
    }

    fn requests_where(
        &self,
        predicate: impl Fn(&HttpRequest) -> bool,
    ) -> Vec<HttpRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|req| predicate(req))
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn reply(
        &self,
        req: HttpRequest,
    ) -> Result<(Reply, Option<Duration>), TransportError> {
        let (reply, delay) = {
            let mut inner = self.lock();
            let reply = if is_token_request(&req) {
                inner.token_reply.clone()
            } else {
                inner.chat_reply.clone()
            };
            let delay = inner.delay;
            inner.requests.push(req);
            (reply, delay)
        };
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        let reply = reply.ok_or_else(|| {
            TransportError::new("no preset reply for this request")
        })?;
        let reply = match reply {
            PresetReply::Json(value) => Reply::Json(value),
            PresetReply::Stream(chunks) => Reply::Stream(chunks),
            PresetReply::Failure { message, status } => {
                let err = TransportError::new(message);
                return Err(match status {
                    Some(status) => err.with_status(status),
                    None => err,
                });
            }
        };
        Ok((reply, delay))
    }
}

enum Reply {
    Json(Value),
    Stream(Vec<PresetChunk>),
}

fn is_token_request(req: &HttpRequest) -> bool {
    req.url.ends_with(TOKEN_PATH)
}

impl Transport for TestTransport {
    type Body = TestBody;

    async fn post_json(
        &self,
        req: HttpRequest,
    ) -> Result<Value, TransportError> {
        match self.reply(req).await? {
            (Reply::Json(value), _) => Ok(value),
            (Reply::Stream(_), _) => Err(TransportError::new(
                "preset reply is a stream, not a JSON body",
            )),
        }
    }

    async fn post_stream(
        &self,
        req: HttpRequest,
    ) -> Result<TestBody, TransportError> {
        let (chunks, delay) = match self.reply(req).await? {
            (Reply::Stream(chunks), delay) => (chunks, delay),
            (Reply::Json(value), delay) => {
                (vec![PresetChunk::Data(value.to_string())], delay)
            }
        };
        Ok(TestBody {
            chunks: chunks.into(),
            delay,
        })
    }
}

/// The streaming body of a [`TestTransport`] reply.
#[derive(Debug)]
pub struct TestBody {
    chunks: VecDeque<PresetChunk>,
    delay: Option<Duration>,
}

impl BodyStream for TestBody {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransportError> {
        let Some(chunk) = self.chunks.pop_front() else {
            return Ok(None);
        };
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }
        match chunk {
            PresetChunk::Data(data) => Ok(Some(Bytes::from(data))),
            PresetChunk::Error(message) => {
                self.chunks.clear();
                Err(TransportError::new(message))
            }
        }
    }
}
