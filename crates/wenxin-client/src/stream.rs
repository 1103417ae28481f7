use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures_util::Stream;
use pin_project_lite::pin_project;
use wenxin_model::{BodyStream, Error};

use crate::call::CallTrace;
use crate::io::Lines;
use crate::proto::{StreamLine, parse_stream_line};

type PinnedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type NextChunk<B> = Result<(Option<String>, Lines<B>), Error>;

pin_project! {
    /// Text fragments of a streaming chat response, in arrival order.
    ///
    /// The stream ends after the body has been fully received, or right
    /// after yielding an error. An error is yielded when reading the body
    /// fails, and also when the service sends its error envelope
    /// (`error_code`/`error_msg`) as a line of the body. Malformed lines
    /// are skipped. Dropping the stream closes the connection.
    pub struct ChatStream<B> {
        next_chunk_fut: Option<PinnedFuture<NextChunk<B>>>,
        delivered: usize,
        call: Option<CallTrace>,
    }
}

impl<B: BodyStream> ChatStream<B> {
    #[inline]
    pub(crate) fn new(body: B) -> Self {
        let lines = Lines::new(body);
        Self {
            next_chunk_fut: Some(Box::pin(next_chunk(lines))),
            delivered: 0,
            call: None,
        }
    }

    /// Ends `call` together with this stream.
    #[inline]
    pub(crate) fn with_call(mut self, call: CallTrace) -> Self {
        self.call = Some(call);
        self
    }

    /// Returns how many fragments have been yielded so far.
    #[inline]
    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

impl<B: BodyStream> Stream for ChatStream<B> {
    type Item = Result<String, Error>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let Some(next_chunk_fut) = this.next_chunk_fut else {
            return Poll::Ready(None);
        };
        let (chunk, lines) = match ready!(next_chunk_fut.as_mut().poll(cx)) {
            Ok((Some(chunk), lines)) => (chunk, lines),
            Ok((None, _)) => {
                *this.next_chunk_fut = None;
                if let Some(call) = this.call.take() {
                    call.complete();
                }
                return Poll::Ready(None);
            }
            Err(err) => {
                *this.next_chunk_fut = None;
                if let Some(call) = this.call.take() {
                    call.fail(&err);
                }
                return Poll::Ready(Some(Err(err)));
            }
        };

        // The body may still have more lines, create a new future for the
        // next chunk.
        *this.next_chunk_fut = Some(Box::pin(next_chunk(lines)));
        *this.delivered += 1;

        Poll::Ready(Some(Ok(chunk)))
    }
}

async fn next_chunk<B: BodyStream>(mut lines: Lines<B>) -> NextChunk<B> {
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return Ok((None, lines)),
            Err(err) => return Err(Error::stream(err)),
        };
        if line.trim_ascii().is_empty() {
            continue;
        }

        match parse_stream_line(&line) {
            Ok(StreamLine::Chunk(text)) => return Ok((Some(text), lines)),
            Ok(StreamLine::Empty) => {}
            Ok(StreamLine::Remote(err)) => return Err(Error::stream(err)),
            Err(err) => {
                warn!(
                    "skipping malformed stream line `{}`: {err}",
                    String::from_utf8_lossy(&line)
                );
            }
        }
    }
}
