use std::env;
use std::fmt::{self, Debug};
use std::time::Duration;

use wenxin_client::{
    ChatClient, ChatOptions, ChatStream, ClientConfigBuilder, ReqwestTransport,
};
use wenxin_model::{
    ChatResponse, CredentialEncryptor, Error, Message, Tracer, Transport,
};

use crate::variants::{DEFAULT_BASE_URL, DEFAULT_MODEL, Variant};

const ENV_CLIENT_ID: &str = "WENXIN_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "WENXIN_CLIENT_SECRET";
const ENV_MODEL: &str = "WENXIN_MODEL";
const ENV_BASE_URL: &str = "WENXIN_BASE_URL";

/// Builder for [`ErnieClient`].
#[derive(Clone)]
pub struct ErnieBuilder {
    client_id: String,
    client_secret: String,
    model: String,
    base_url: Option<String>,
    auth_url: Option<String>,
    timeout: Option<Duration>,
}

impl ErnieBuilder {
    /// Creates a builder for the default model with the given credential
    /// pair.
    #[inline]
    pub fn with_credentials<I: Into<String>, S: Into<String>>(
        client_id: I,
        client_secret: S,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            model: DEFAULT_MODEL.to_owned(),
            base_url: None,
            auth_url: None,
            timeout: None,
        }
    }

    /// Creates a builder from the `WENXIN_*` environment variables.
    ///
    /// `WENXIN_CLIENT_ID` and `WENXIN_CLIENT_SECRET` are required,
    /// `WENXIN_MODEL` and `WENXIN_BASE_URL` are optional.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Error> {
        let required = |key: &str| {
            lookup(key).filter(|v| !v.is_empty()).ok_or_else(|| {
                Error::config(format!(
                    "{key} environment variable is not set"
                ))
            })
        };
        let mut builder = Self::with_credentials(
            required(ENV_CLIENT_ID)?,
            required(ENV_CLIENT_SECRET)?,
        );
        if let Some(model) = lookup(ENV_MODEL).filter(|v| !v.is_empty()) {
            builder = builder.with_model(model);
        }
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty())
        {
            builder = builder.with_base_url(base_url);
        }
        Ok(builder)
    }

    /// Sets the model variant by name.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    /// Sets a custom base URL for the chat endpoints.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets a custom OAuth endpoint.
    #[inline]
    pub fn with_auth_url<S: Into<String>>(mut self, auth_url: S) -> Self {
        self.auth_url = Some(auth_url.into());
        self
    }

    /// Sets the timeout of the HTTP transport.
    ///
    /// Only used by [`build`](Self::build).
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds a client that talks to the service over HTTP.
    pub fn build(self) -> Result<ErnieClient, Error> {
        let transport = match self.timeout {
            Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
            None => ReqwestTransport::new(),
        };
        self.build_with_transport(transport)
    }

    /// Builds a client that sends requests through `transport`.
    ///
    /// Fails with a `Config` error if the model is unknown or the
    /// credentials are empty.
    pub fn build_with_transport<T: Transport>(
        self,
        transport: T,
    ) -> Result<ErnieClient<T>, Error> {
        let Some(variant) = Variant::find(&self.model) else {
            return Err(Error::config(format!(
                "unknown model `{}`",
                self.model
            )));
        };
        let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);

        let mut config = ClientConfigBuilder::with_credentials(
            self.client_id,
            self.client_secret,
        )
        .with_endpoint(variant.endpoint(base_url))
        .with_defaults(variant.defaults())
        .with_stream_defaults(variant.stream_defaults());
        if let Some(auth_url) = self.auth_url {
            config = config.with_auth_url(auth_url);
        }
        let config = config.build()?;
        debug!("using model {} at {}", variant.name, config.endpoint());

        Ok(ErnieClient {
            variant,
            inner: ChatClient::new(config, transport),
        })
    }
}

impl Debug for ErnieBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErnieBuilder")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("auth_url", &self.auth_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// A chat client bound to one ERNIE model variant.
pub struct ErnieClient<T = ReqwestTransport> {
    variant: &'static Variant,
    inner: ChatClient<T>,
}

impl<T> Clone for ErnieClient<T> {
    fn clone(&self) -> Self {
        Self {
            variant: self.variant,
            inner: self.inner.clone(),
        }
    }
}

impl ErnieClient {
    /// Creates a client for the variant named `model`.
    ///
    /// Fails with a `Config` error if the model is unknown or the
    /// credentials are empty.
    pub fn new<I, S>(
        model: &str,
        client_id: I,
        client_secret: S,
    ) -> Result<Self, Error>
    where
        I: Into<String>,
        S: Into<String>,
    {
        ErnieBuilder::with_credentials(client_id, client_secret)
            .with_model(model)
            .build()
    }

    /// Creates a client from the `WENXIN_*` environment variables.
    ///
    /// See [`ErnieBuilder::from_env`].
    #[inline]
    pub fn from_env() -> Result<Self, Error> {
        ErnieBuilder::from_env()?.build()
    }
}

impl<T: Transport> ErnieClient<T> {
    /// Returns the variant this client talks to.
    #[inline]
    pub fn variant(&self) -> &'static Variant {
        self.variant
    }

    /// Returns the underlying chat client.
    #[inline]
    pub fn chat_client(&self) -> &ChatClient<T> {
        &self.inner
    }

    /// Sets the tracer spans are recorded to.
    #[inline]
    pub fn with_tracer(mut self, tracer: impl Tracer + 'static) -> Self {
        self.inner = self.inner.with_tracer(tracer);
        self
    }

    /// Sets the encryptor credentials are encrypted with before being
    /// tagged on spans.
    #[inline]
    pub fn with_encryptor(
        mut self,
        encryptor: impl CredentialEncryptor + 'static,
    ) -> Self {
        self.inner = self.inner.with_encryptor(encryptor);
        self
    }

    /// See [`ChatClient::send_request`].
    #[inline]
    pub async fn send_request(
        &self,
        messages: &[Message],
        options: ChatOptions,
    ) -> Result<ChatResponse, Error> {
        self.inner.send_request(messages, options).await
    }

    /// See [`ChatClient::stream`].
    #[inline]
    pub async fn stream(
        &self,
        messages: &[Message],
        options: ChatOptions,
    ) -> Result<ChatStream<T::Body>, Error> {
        self.inner.stream(messages, options).await
    }

    /// See [`ChatClient::stream_request`].
    #[inline]
    pub async fn stream_request(
        &self,
        messages: &[Message],
        on_chunk: impl FnMut(String),
        options: ChatOptions,
    ) -> Result<(), Error> {
        self.inner.stream_request(messages, on_chunk, options).await
    }
}

impl<T: Transport> Debug for ErnieClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErnieClient")
            .field("variant", &self.variant.name)
            .field("config", self.inner.config())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use wenxin_model::ErrorKind;

    use super::*;

    fn lookup(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_env() {
        let builder = ErnieBuilder::from_lookup(lookup(&[
            ("WENXIN_CLIENT_ID", "id"),
            ("WENXIN_CLIENT_SECRET", "secret"),
            ("WENXIN_MODEL", "ernie-4.0-8k-latest"),
            ("WENXIN_BASE_URL", "http://localhost:8080/chat"),
        ]))
        .unwrap();
        assert_eq!(builder.client_id, "id");
        assert_eq!(builder.model, "ernie-4.0-8k-latest");
        assert_eq!(
            builder.base_url.as_deref(),
            Some("http://localhost:8080/chat")
        );

        let builder = ErnieBuilder::from_lookup(lookup(&[
            ("WENXIN_CLIENT_ID", "id"),
            ("WENXIN_CLIENT_SECRET", "secret"),
        ]))
        .unwrap();
        assert_eq!(builder.model, DEFAULT_MODEL);
        assert!(builder.base_url.is_none());
    }

    #[test]
    fn test_from_env_missing_secret() {
        let err =
            ErnieBuilder::from_lookup(lookup(&[("WENXIN_CLIENT_ID", "id")]))
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.message().contains("WENXIN_CLIENT_SECRET"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let builder = ErnieBuilder::with_credentials("id", "hunter2");
        assert!(!format!("{builder:?}").contains("hunter2"));
    }
}
