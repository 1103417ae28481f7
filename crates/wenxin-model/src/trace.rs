use async_trait::async_trait;

/// A named interval of work recorded by a [`Tracer`].
///
/// Spans are purely observational. Nothing a span does may affect the
/// request it describes.
pub trait TraceSpan: Send {
    /// Attaches a tag to the span.
    fn set_tag(&mut self, key: &str, value: &str);

    /// Ends the span.
    fn finish(self: Box<Self>);
}

/// A tracing backend that spans are started from.
pub trait Tracer: Send + Sync {
    /// Starts a new span.
    fn start_span(&self, name: &str) -> Box<dyn TraceSpan>;
}

/// A tracer that records nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracer;

struct NoopSpan;

impl TraceSpan for NoopSpan {
    #[inline]
    fn set_tag(&mut self, _key: &str, _value: &str) {}

    #[inline]
    fn finish(self: Box<Self>) {}
}

impl Tracer for NoopTracer {
    #[inline]
    fn start_span(&self, _name: &str) -> Box<dyn TraceSpan> {
        Box::new(NoopSpan)
    }
}

/// Encrypts credentials before they are attached to spans as tags.
///
/// Failures are tolerated by the caller: a credential that can't be
/// encrypted is simply not tagged.
#[async_trait]
pub trait CredentialEncryptor: Send + Sync {
    /// Encrypts `plain_text` and returns the cipher text.
    async fn encrypt(&self, plain_text: &str) -> Result<String, String>;
}
