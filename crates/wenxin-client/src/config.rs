use std::fmt::Debug;

use wenxin_model::{Error, SamplingParameters};

/// The OAuth endpoint access tokens are obtained from.
pub const DEFAULT_AUTH_URL: &str = "https://aip.baidubce.com/oauth/2.0/token";

/// Builder for [`ClientConfig`].
#[derive(Clone, PartialEq)]
pub struct ClientConfigBuilder {
    client_id: String,
    client_secret: String,
    endpoint: Option<String>,
    auth_url: Option<String>,
    defaults: Option<SamplingParameters>,
    stream_defaults: Option<SamplingParameters>,
}

impl ClientConfigBuilder {
    /// Creates a builder with the given credential pair (API key and
    /// secret key of the application).
    #[inline]
    pub fn with_credentials<I: Into<String>, S: Into<String>>(
        client_id: I,
        client_secret: S,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            endpoint: None,
            auth_url: None,
            defaults: None,
            stream_defaults: None,
        }
    }

    /// Sets the chat endpoint of the model.
    #[inline]
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets a custom OAuth endpoint.
    #[inline]
    pub fn with_auth_url<S: Into<String>>(mut self, auth_url: S) -> Self {
        self.auth_url = Some(auth_url.into());
        self
    }

    /// Sets the parameters used when a single-shot request leaves them
    /// unset.
    #[inline]
    pub fn with_defaults(mut self, defaults: SamplingParameters) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Sets the parameters used when a streaming request leaves them
    /// unset.
    #[inline]
    pub fn with_stream_defaults(mut self, defaults: SamplingParameters) -> Self {
        self.stream_defaults = Some(defaults);
        self
    }

    /// Builds the configuration.
    ///
    /// Fails with a `Config` error if the credentials or the endpoint are
    /// empty.
    pub fn build(self) -> Result<ClientConfig, Error> {
        let Some(endpoint) = self.endpoint.filter(|s| !s.is_empty()) else {
            return Err(Error::config("endpoint must not be empty"));
        };
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(Error::config(
                "client_id and client_secret must not be empty",
            ));
        }
        Ok(ClientConfig {
            client_id: self.client_id,
            client_secret: self.client_secret,
            endpoint,
            auth_url: self
                .auth_url
                .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            defaults: self.defaults.unwrap_or_default(),
            stream_defaults: self
                .stream_defaults
                .unwrap_or_else(SamplingParameters::streaming),
        })
    }
}

impl Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("auth_url", &self.auth_url)
            .field("defaults", &self.defaults)
            .field("stream_defaults", &self.stream_defaults)
            .finish()
    }
}

/// Configuration of a [`ChatClient`](crate::ChatClient).
///
/// The values are fixed once built and shared by every call made through
/// the client.
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) endpoint: String,
    pub(crate) auth_url: String,
    pub(crate) defaults: SamplingParameters,
    pub(crate) stream_defaults: SamplingParameters,
}

impl ClientConfig {
    /// Returns the client identifier (API key).
    #[inline]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the chat endpoint.
    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the OAuth endpoint.
    #[inline]
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Returns the defaults of single-shot requests.
    #[inline]
    pub fn defaults(&self) -> &SamplingParameters {
        &self.defaults
    }

    /// Returns the defaults of streaming requests.
    #[inline]
    pub fn stream_defaults(&self) -> &SamplingParameters {
        &self.stream_defaults
    }
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("auth_url", &self.auth_url)
            .field("defaults", &self.defaults)
            .field("stream_defaults", &self.stream_defaults)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use wenxin_model::ErrorKind;

    use super::*;

    #[test]
    fn test_build() {
        let config = ClientConfigBuilder::with_credentials("id", "secret")
            .with_endpoint("https://example.com/chat/completions_pro")
            .build()
            .unwrap();
        assert_eq!(config.auth_url(), DEFAULT_AUTH_URL);
        assert_eq!(config.defaults().max_output_tokens, 1024);
        assert_eq!(config.stream_defaults().max_output_tokens, 2048);
    }

    #[test]
    fn test_empty_inputs() {
        let cases = [
            ("", "secret", Some("https://example.com")),
            ("id", "", Some("https://example.com")),
            ("id", "secret", Some("")),
            ("id", "secret", None),
        ];
        for (id, secret, endpoint) in cases {
            let mut builder = ClientConfigBuilder::with_credentials(id, secret);
            if let Some(endpoint) = endpoint {
                builder = builder.with_endpoint(endpoint);
            }
            assert_eq!(builder.build().unwrap_err().kind(), ErrorKind::Config);
        }
    }

    #[test]
    fn test_secret_is_redacted() {
        let config = ClientConfigBuilder::with_credentials("id", "s3cr3t")
            .with_endpoint("https://example.com")
            .build()
            .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("<redacted>"));
    }
}
