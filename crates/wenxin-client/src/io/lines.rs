#[cfg(test)]
use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};
use wenxin_model::{BodyStream, TransportError};

/// A type for reading newline-delimited lines from a body stream.
pub struct Lines<B> {
    buf: BytesMut,
    body: B,
    finished: bool,
}

impl<B: BodyStream> Lines<B> {
    #[inline]
    pub fn new(body: B) -> Self {
        Self {
            buf: BytesMut::new(),
            body,
            finished: false,
        }
    }

    /// Returns the next line without its line terminator.
    ///
    /// Empty lines are returned as well. A trailing fragment without line
    /// feed is returned as the last line once the body is exhausted.
    pub async fn next_line(&mut self) -> Result<Option<Bytes>, TransportError> {
        loop {
            if let Some(line) = self.try_take_line() {
                return Ok(Some(line));
            }

            if self.finished {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(self.buf.split().freeze()));
            }

            // Not enough data for a line, read more from the body.
            match self.body.next_chunk().await? {
                Some(chunk) => self.buf.extend_from_slice(&chunk),
                None => self.finished = true,
            }
        }
    }

    fn try_take_line(&mut self) -> Option<Bytes> {
        // Only line feed terminates a line, a preceding carriage return is
        // dropped with it.
        let eol_idx = self.buf.iter().position(|b| *b == b'\n')?;
        let mut line = self.buf.split_to(eol_idx + 1);
        line.truncate(eol_idx);
        if line.last() == Some(&b'\r') {
            line.truncate(eol_idx - 1);
        }
        Some(line.freeze())
    }
}

/// A body that yields preset chunks.
#[cfg(test)]
pub struct VecBody(pub VecDeque<Result<Bytes, TransportError>>);

#[cfg(test)]
impl BodyStream for VecBody {
    fn next_chunk(
        &mut self,
    ) -> impl Future<Output = Result<Option<Bytes>, TransportError>> + Send
    {
        std::future::ready(self.0.pop_front().transpose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(chunks: &[&'static [u8]]) -> VecBody {
        VecBody(
            chunks
                .iter()
                .map(|chunk| Ok(Bytes::from_static(chunk)))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_normal_lines() {
        let mut lines = Lines::new(body(&[b"hello\n", b"bye\n"]));
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "hello");
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "bye");
        assert_eq!(lines.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_split_across_chunks() {
        let mut lines =
            Lines::new(body(&[b"hel", b"lo\r\nb", b"ye\n\n", b"tail"]));
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "hello");
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "bye");
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "");
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "tail");
        assert_eq!(lines.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_multibyte_split() {
        let text = "你好\n".as_bytes();
        let (head, tail) = text.split_at(2);
        let mut lines = Lines::new(VecBody(
            vec![
                Ok(Bytes::copy_from_slice(head)),
                Ok(Bytes::copy_from_slice(tail)),
            ]
            .into(),
        ));
        let line = lines.next_line().await.unwrap().unwrap();
        assert_eq!(std::str::from_utf8(&line).unwrap(), "你好");
    }

    #[tokio::test]
    async fn test_body_error() {
        let mut lines = Lines::new(VecBody(
            vec![
                Ok(Bytes::from_static(b"one\ntw")),
                Err(TransportError::new("connection reset")),
            ]
            .into(),
        ));
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "one");
        let err = lines.next_line().await.unwrap_err();
        assert_eq!(err.message(), "connection reset");
    }
}
