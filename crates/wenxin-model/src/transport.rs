use bytes::Bytes;
use serde_json::Value;

use crate::error::TransportError;

/// A `POST` request to be executed by a [`Transport`].
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// The target URL without query string.
    pub url: String,
    /// Query parameters, appended in order.
    pub query: Vec<(String, String)>,
    /// The JSON body, if any.
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Creates a request without query parameters and body.
    #[inline]
    pub fn post<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Appends a query parameter.
    #[inline]
    pub fn with_query<K: Into<String>, V: Into<String>>(
        mut self,
        key: K,
        value: V,
    ) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the JSON body.
    #[inline]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A response body that is read incrementally.
pub trait BodyStream: Send + 'static {
    /// Reads the next chunk of the body.
    ///
    /// Returns `Ok(None)` once the body has been fully received. Chunk
    /// boundaries are arbitrary and carry no meaning.
    fn next_chunk(
        &mut self,
    ) -> impl Future<Output = Result<Option<Bytes>, TransportError>> + Send;
}

/// The HTTP capability the client is built on.
///
/// Implementations are expected to treat non-success status codes as
/// errors. Timeouts and connection management belong to the
/// implementation as well.
pub trait Transport: Send + Sync {
    /// The body type of streaming responses.
    type Body: BodyStream;

    /// Sends a request and parses the whole response body as JSON.
    fn post_json(
        &self,
        req: HttpRequest,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;

    /// Sends a request and returns the body for incremental reading.
    fn post_stream(
        &self,
        req: HttpRequest,
    ) -> impl Future<Output = Result<Self::Body, TransportError>> + Send;
}
