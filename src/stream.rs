//! Async draining of readers.
//!
//! [`ReaderStream`] adapts any [`Reader`] into a `futures::Stream`, for
//! consumers that already live in async code. Feature-gated behind
//! `#[cfg(feature = "async")]`.
//!
//! Readers never block, so the stream is always ready: it yields every
//! available warning, then ends at exhaustion. A failure is yielded once as
//! `Err` and ends the stream.

use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use futures::stream::{FusedStream, Stream};

use crate::error::{Error, Result};
use crate::reader::Reader;
use crate::warning::SharedWarning;

/// Stream over the warnings of a reader.
///
/// # Example
///
/// ```rust
/// use futures::StreamExt;
/// use undercurrent::stream::ReaderStream;
/// use undercurrent::{warning, Collector, Writer};
///
/// # tokio_test::block_on(async {
/// let collector = Collector::new();
/// collector.write_warning(warning::new("a")).unwrap();
/// collector.write_warning(warning::new("b")).unwrap();
///
/// let messages: Vec<String> = ReaderStream::new(&collector)
///     .map(|w| w.unwrap().to_string())
///     .collect()
///     .await;
///
/// assert_eq!(messages, vec!["a", "b"]);
/// # });
/// ```
#[derive(Debug)]
pub struct ReaderStream<R> {
    reader: R,
    done: bool,
}

impl<R: Reader> ReaderStream<R> {
    /// Create a stream over `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }

    /// Consume the stream, returning the reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Reader + Unpin> Stream for ReaderStream<R> {
    type Item = Result<SharedWarning, Error>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }

        match this.reader.read_warning() {
            Ok(Some(warning)) => Poll::Ready(Some(Ok(warning))),
            Ok(None) => {
                this.done = true;
                Poll::Ready(None)
            }
            Err(err) => {
                this.done = true;
                Poll::Ready(Some(Err(err)))
            }
        }
    }
}

impl<R: Reader + Unpin> FusedStream for ReaderStream<R> {
    fn is_terminated(&self) -> bool {
        self.done
    }
}
