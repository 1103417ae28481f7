use std::fmt::{self, Debug};
use std::pin::pin;
use std::sync::Arc;

use futures_util::future::{Either, select};
use wenxin_model::{
    CredentialEncryptor, Error, HttpRequest, TraceSpan, Tracer, Transport,
};

use crate::ClientConfig;
use crate::proto::TokenReply;

/// Exchanges a credential pair for a bearer access token.
///
/// Every call performs a fresh exchange, nothing is cached.
#[derive(Clone)]
pub struct TokenProvider {
    client_id: String,
    client_secret: String,
    auth_url: String,
    encryptor: Option<Arc<dyn CredentialEncryptor>>,
}

impl TokenProvider {
    /// Creates a token provider for the given credentials.
    ///
    /// Fails with a `Config` error if any of the inputs is empty.
    pub fn new<I, S, U>(
        client_id: I,
        client_secret: S,
        auth_url: U,
    ) -> Result<Self, Error>
    where
        I: Into<String>,
        S: Into<String>,
        U: Into<String>,
    {
        let (client_id, client_secret, auth_url) =
            (client_id.into(), client_secret.into(), auth_url.into());
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(Error::config(
                "client_id and client_secret must not be empty",
            ));
        }
        if auth_url.is_empty() {
            return Err(Error::config("auth_url must not be empty"));
        }
        Ok(Self {
            client_id,
            client_secret,
            auth_url,
            encryptor: None,
        })
    }

    // The config builder has already rejected empty credentials.
    pub(crate) fn from_config(config: &ClientConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            auth_url: config.auth_url.clone(),
            encryptor: None,
        }
    }

    /// Encrypts the credentials with `encryptor` and tags them on the
    /// `get_access_token` span.
    #[inline]
    pub fn with_encryptor(
        mut self,
        encryptor: Arc<dyn CredentialEncryptor>,
    ) -> Self {
        self.encryptor = Some(encryptor);
        self
    }

    /// Obtains a new access token.
    pub async fn get_token<T: Transport>(
        &self,
        transport: &T,
        tracer: &dyn Tracer,
    ) -> Result<String, Error> {
        let mut span = tracer.start_span("get_access_token");
        span.set_tag("auth.url", &self.auth_url);
        span.set_tag("client_id", &self.client_id);

        let fetch = pin!(self.fetch_token(transport));
        let result = match &self.encryptor {
            None => fetch.await,
            Some(encryptor) => {
                let encrypt =
                    pin!(self.encrypt_credentials(encryptor.as_ref()));
                match select(encrypt, fetch).await {
                    Either::Left((tags, fetch)) => {
                        tag_all(span.as_mut(), &tags);
                        fetch.await
                    }
                    Either::Right((result, _)) => {
                        debug!("credential encryption outlived token fetch");
                        result
                    }
                }
            }
        };

        match &result {
            Ok(_) => span.set_tag("access_token.received", "true"),
            Err(err) => span.set_tag("error", err.message()),
        }
        span.finish();
        result
    }

    async fn fetch_token<T: Transport>(
        &self,
        transport: &T,
    ) -> Result<String, Error> {
        let req = HttpRequest::post(&self.auth_url)
            .with_query("client_id", &self.client_id)
            .with_query("client_secret", &self.client_secret)
            .with_query("grant_type", "client_credentials");
        trace!("requesting access token from {}", self.auth_url);

        let value = transport.post_json(req).await.map_err(Error::auth)?;
        let reply: TokenReply =
            serde_json::from_value(value).map_err(Error::auth)?;
        if let Some(expires_in) = reply.expires_in {
            debug!("got access token, expires in {expires_in}s");
        }
        reply.into_token().map_err(Error::auth)
    }

    async fn encrypt_credentials(
        &self,
        encryptor: &dyn CredentialEncryptor,
    ) -> Vec<(&'static str, String)> {
        let mut tags = Vec::with_capacity(2);
        let pairs = [
            ("client_id.encrypted", &self.client_id),
            ("client_secret.encrypted", &self.client_secret),
        ];
        for (key, plain_text) in pairs {
            match encryptor.encrypt(plain_text).await {
                Ok(cipher_text) => tags.push((key, cipher_text)),
                Err(err) => debug!("failed to encrypt `{key}`: {err}"),
            }
        }
        tags
    }
}

fn tag_all(span: &mut dyn TraceSpan, tags: &[(&'static str, String)]) {
    for (key, value) in tags {
        span.set_tag(key, value);
    }
}

impl Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("auth_url", &self.auth_url)
            .field("encryptor", &self.encryptor.is_some())
            .finish()
    }
}
