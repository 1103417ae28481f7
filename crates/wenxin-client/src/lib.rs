//! A client for the ERNIE chat-completion API.
//!
//! Every call goes through the same lifecycle: the conversation and the
//! sampling parameters are validated, a fresh access token is obtained,
//! and the request is sent to the model endpoint. A failure at any step
//! ends the call, nothing is retried.

#[macro_use]
extern crate tracing;

mod auth;
mod call;
mod config;
mod io;
mod log_tracer;
mod options;
mod proto;
mod stream;
mod transport;

use std::sync::Arc;

use futures_util::StreamExt;
use wenxin_model::{
    ChatResponse, CredentialEncryptor, Error, HttpRequest, Message,
    NoopTracer, SamplingParameters, Tracer, Transport, validate_messages,
    validate_parameters,
};

pub use auth::TokenProvider;
use call::{CallTrace, Phase};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_AUTH_URL};
pub use log_tracer::LogTracer;
pub use options::ChatOptions;
use proto::RemoteError;
pub use stream::ChatStream;
pub use transport::{ReqwestTransport, ResponseBody};

/// Chat client of one model endpoint.
///
/// The client holds no mutable state. Cloning it is cheap and the clones
/// may be used concurrently.
pub struct ChatClient<T> {
    config: Arc<ClientConfig>,
    auth: TokenProvider,
    transport: Arc<T>,
    tracer: Arc<dyn Tracer>,
}

impl<T> Clone for ChatClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            auth: self.auth.clone(),
            transport: Arc::clone(&self.transport),
            tracer: Arc::clone(&self.tracer),
        }
    }
}

impl<T: Transport> ChatClient<T> {
    /// Creates a new `ChatClient` sending requests through `transport`.
    pub fn new(config: ClientConfig, transport: T) -> Self {
        let auth = TokenProvider::from_config(&config);
        Self {
            config: Arc::new(config),
            auth,
            transport: Arc::new(transport),
            tracer: Arc::new(NoopTracer),
        }
    }

    /// Sets the tracer spans are recorded to.
    #[inline]
    pub fn with_tracer(mut self, tracer: impl Tracer + 'static) -> Self {
        self.tracer = Arc::new(tracer);
        self
    }

    /// Sets the encryptor credentials are encrypted with before being
    /// tagged on spans.
    #[inline]
    pub fn with_encryptor(
        mut self,
        encryptor: impl CredentialEncryptor + 'static,
    ) -> Self {
        self.auth = self.auth.with_encryptor(Arc::new(encryptor));
        self
    }

    /// Returns the configuration of this client.
    #[inline]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a single-shot request and returns the complete response.
    pub async fn send_request(
        &self,
        messages: &[Message],
        options: ChatOptions,
    ) -> Result<ChatResponse, Error> {
        let mut call = CallTrace::start(
            &*self.tracer,
            "chat_completion",
            self.endpoint(),
        );
        let result =
            self.send_request_inner(messages, &options, &mut call).await;
        if let Ok(resp) = &result {
            debug!(
                "got response {} ({} tokens)",
                resp.id, resp.usage.total_tokens
            );
        }
        call.finish(&result);
        result
    }

    async fn send_request_inner(
        &self,
        messages: &[Message],
        options: &ChatOptions,
        call: &mut CallTrace,
    ) -> Result<ChatResponse, Error> {
        let defaults = &self.config.defaults;
        let req = self.prepare(messages, options, defaults, false, call).await?;

        call.enter(Phase::Sending);
        let value = self
            .transport
            .post_json(req)
            .await
            .map_err(Error::request)?;
        if let Some(remote) = RemoteError::from_value(&value) {
            return Err(Error::request(remote));
        }
        serde_json::from_value(value).map_err(Error::request)
    }

    /// Sends a streaming request and returns the text fragments as a
    /// stream.
    ///
    /// The returned stream is the only handle to the call, dropping it
    /// cancels the request. The `chat_stream` span of the call stays open
    /// until the stream has ended, failed or been dropped.
    pub async fn stream(
        &self,
        messages: &[Message],
        options: ChatOptions,
    ) -> Result<ChatStream<T::Body>, Error> {
        let mut call =
            CallTrace::start(&*self.tracer, "chat_stream", self.endpoint());
        match self.open_stream(messages, &options, &mut call).await {
            Ok(body) => {
                call.enter(Phase::Receiving);
                Ok(ChatStream::new(body).with_call(call))
            }
            Err(err) => {
                call.fail(&err);
                Err(err)
            }
        }
    }

    async fn open_stream(
        &self,
        messages: &[Message],
        options: &ChatOptions,
        call: &mut CallTrace,
    ) -> Result<T::Body, Error> {
        let defaults = &self.config.stream_defaults;
        let req = self.prepare(messages, options, defaults, true, call).await?;

        call.enter(Phase::Sending);
        self.transport.post_stream(req).await.map_err(Error::stream)
    }

    /// Sends a streaming request and hands every text fragment to
    /// `on_chunk`, in arrival order.
    ///
    /// Returns once the response has been fully received. Fragments that
    /// were delivered before an error remain valid.
    pub async fn stream_request(
        &self,
        messages: &[Message],
        mut on_chunk: impl FnMut(String),
        options: ChatOptions,
    ) -> Result<(), Error> {
        let mut stream = self.stream(messages, options).await?;
        while let Some(chunk) = stream.next().await {
            on_chunk(chunk?);
        }
        debug!("stream completed after {} chunks", stream.delivered());
        Ok(())
    }

    async fn prepare(
        &self,
        messages: &[Message],
        options: &ChatOptions,
        defaults: &SamplingParameters,
        stream: bool,
        call: &mut CallTrace,
    ) -> Result<HttpRequest, Error> {
        call.enter(Phase::Validating);
        let params = options.resolve(defaults);
        validate_messages(messages)?;
        validate_parameters(&params)?;
        if options.enable_system_memory && options.system_memory_id.is_none() {
            warn!("system memory is enabled without a memory id");
        }

        call.enter(Phase::Authenticating);
        let token =
            self.auth.get_token(&*self.transport, &*self.tracer).await?;

        let body = proto::create_request(
            messages,
            &params,
            stream,
            options.enable_system_memory,
            options.system_memory_id.as_deref(),
        );
        let body = serde_json::to_value(&body).map_err(Error::request)?;
        Ok(HttpRequest::post(&self.config.endpoint)
            .with_query("access_token", token)
            .with_body(body))
    }

    #[inline]
    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

impl ChatClient<ReqwestTransport> {
    /// Creates a new `ChatClient` with a default HTTP transport.
    #[inline]
    pub fn with_config(config: ClientConfig) -> Self {
        Self::new(config, ReqwestTransport::new())
    }
}
