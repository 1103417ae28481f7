use std::time::Instant;

use wenxin_model::{TraceSpan, Tracer};

/// A [`Tracer`] that reports finished spans as `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTracer;

struct LogSpan {
    name: String,
    tags: Vec<(String, String)>,
    started_at: Instant,
}

impl TraceSpan for LogSpan {
    fn set_tag(&mut self, key: &str, value: &str) {
        match self.tags.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => value.clone_into(v),
            None => self.tags.push((key.to_owned(), value.to_owned())),
        }
    }

    fn finish(self: Box<Self>) {
        let elapsed = self.started_at.elapsed();
        debug!(
            span = %self.name,
            elapsed_ms = elapsed.as_millis() as u64,
            tags = ?self.tags,
            "span finished"
        );
    }
}

impl Tracer for LogTracer {
    fn start_span(&self, name: &str) -> Box<dyn TraceSpan> {
        trace!(span = %name, "span started");
        Box::new(LogSpan {
            name: name.to_owned(),
            tags: Vec::new(),
            started_at: Instant::now(),
        })
    }
}
