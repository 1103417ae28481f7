use std::time::Duration;

use bytes::Bytes;
use mime::Mime;
use reqwest::{Client, Response, StatusCode, Url, header};
use serde_json::Value;
use wenxin_model::{BodyStream, Error, HttpRequest, Transport, TransportError};

/// [`Transport`] backed by a `reqwest` client.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport that uses the given client.
    #[inline]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Creates a transport whose requests fail after `timeout`.
    ///
    /// For streaming requests the timeout covers the whole body.
    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| Error::config(format!("{err}")))?;
        Ok(Self { client })
    }

    async fn send(
        &self,
        req: HttpRequest,
        accept: &'static str,
    ) -> Result<Response, TransportError> {
        let url = request_url(&req)?;
        let mut builder = self
            .client
            .post(url)
            .header(header::ACCEPT, accept);
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|err| TransportError::new(format!("{err}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &text));
        }
        Ok(resp)
    }
}

impl Transport for ReqwestTransport {
    type Body = ResponseBody;

    fn post_json(
        &self,
        req: HttpRequest,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send {
        async move {
            let resp = self.send(req, "application/json").await?;
            if !is_json(&resp) {
                let content_type = resp.headers().get(header::CONTENT_TYPE);
                return Err(TransportError::new(format!(
                    "unexpected content type: {content_type:?}"
                )));
            }
            resp.json::<Value>()
                .await
                .map_err(|err| TransportError::new(format!("{err}")))
        }
    }

    fn post_stream(
        &self,
        req: HttpRequest,
    ) -> impl Future<Output = Result<Self::Body, TransportError>> + Send {
        async move {
            let resp = self.send(req, "text/event-stream").await?;
            trace!("streaming response from {}", resp.url());
            Ok(ResponseBody(resp))
        }
    }
}

/// The body of a streaming response.
#[derive(Debug)]
pub struct ResponseBody(Response);

impl BodyStream for ResponseBody {
    fn next_chunk(
        &mut self,
    ) -> impl Future<Output = Result<Option<Bytes>, TransportError>> + Send
    {
        async move {
            self.0
                .chunk()
                .await
                .map_err(|err| TransportError::new(format!("{err}")))
        }
    }
}

fn request_url(req: &HttpRequest) -> Result<Url, TransportError> {
    let mut url = Url::parse(&req.url).map_err(|err| {
        TransportError::new(format!("invalid url `{}`: {err}", req.url))
    })?;
    if !req.query.is_empty() {
        url.query_pairs_mut().extend_pairs(&req.query);
    }
    Ok(url)
}

fn status_error(status: StatusCode, text: &str) -> TransportError {
    let message = if text.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {text}")
    };
    TransportError::new(message).with_status(status.as_u16())
}

// A missing content type is given the benefit of the doubt.
fn is_json(resp: &Response) -> bool {
    let Some(content_type) = resp.headers().get(header::CONTENT_TYPE) else {
        return true;
    };
    content_type
        .to_str()
        .ok()
        .and_then(|v| v.parse().ok())
        .map(|m: Mime| {
            m.subtype().as_str() == "json"
                || m.suffix().map(|s| s.as_str()) == Some("json")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url() {
        let req = HttpRequest::post("https://aip.baidubce.com/oauth/2.0/token")
            .with_query("client_id", "a b")
            .with_query("grant_type", "client_credentials");
        assert_eq!(
            request_url(&req).unwrap().as_str(),
            "https://aip.baidubce.com/oauth/2.0/token?client_id=a+b&grant_type=client_credentials"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = request_url(&HttpRequest::post("not a url")).unwrap_err();
        assert!(err.message().contains("not a url"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_status_error() {
        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.message(), "HTTP 500 Internal Server Error");
        assert_eq!(err.status(), Some(500));
    }
}
