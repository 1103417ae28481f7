use wenxin_model::{Error, TraceSpan, Tracer};

/// The stage a call is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Validating,
    Authenticating,
    Sending,
    Receiving,
    Completed,
    Failed,
    Cancelled,
}

impl Phase {
    fn as_str(&self) -> &'static str {
        match self {
            Phase::Validating => "validating",
            Phase::Authenticating => "authenticating",
            Phase::Sending => "sending",
            Phase::Receiving => "receiving",
            Phase::Completed => "completed",
            Phase::Failed => "failed",
            Phase::Cancelled => "cancelled",
        }
    }
}

/// Tracks the phase of one call on its span.
///
/// A call dropped before it was finished is tagged as cancelled.
pub struct CallTrace {
    span: Option<Box<dyn TraceSpan>>,
}

impl CallTrace {
    pub fn start(tracer: &dyn Tracer, name: &str, endpoint: &str) -> Self {
        let mut span = tracer.start_span(name);
        span.set_tag("chat.endpoint", endpoint);
        Self { span: Some(span) }
    }

    pub fn enter(&mut self, phase: Phase) {
        trace!("entering phase {}", phase.as_str());
        if let Some(span) = &mut self.span {
            span.set_tag("chat.phase", phase.as_str());
        }
    }

    pub fn complete(mut self) {
        self.enter(Phase::Completed);
        self.end();
    }

    pub fn fail(mut self, err: &Error) {
        self.enter(Phase::Failed);
        if let Some(span) = &mut self.span {
            span.set_tag("error", err.message());
        }
        self.end();
    }

    pub fn finish<T>(self, result: &Result<T, Error>) {
        match result {
            Ok(_) => self.complete(),
            Err(err) => self.fail(err),
        }
    }

    fn end(&mut self) {
        if let Some(span) = self.span.take() {
            span.finish();
        }
    }
}

impl Drop for CallTrace {
    fn drop(&mut self) {
        if self.span.is_some() {
            self.enter(Phase::Cancelled);
            self.end();
        }
    }
}
