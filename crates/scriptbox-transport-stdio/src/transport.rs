//! Line-delimited JSON transport over stdin/stdout.
//!
//! Each message is a single line terminated by `\n`, in both directions.

use std::io::ErrorKind as IoErrorKind;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use scriptbox_protocol::EngineMessage;
use scriptbox_runtime::{Outbox, RuntimeError};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{AnyDelimiterCodec, FramedRead};
use tracing::{debug, trace, warn};

use crate::error::TransportError;

/// Reads host messages from stdin, writes engine messages to stdout.
///
/// Generic over reader/writer for testability.
pub struct StdioTransport<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a new transport with the given reader and writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Splits the transport into its inbound line stream and outbound writer.
    pub fn into_parts(self) -> (InboundLines<R>, LineWriter<W>) {
        (InboundLines::new(self.reader), LineWriter::new(self.writer))
    }
}

/// Stream of inbound lines.
///
/// Reads are cancel-safe: a partially received line stays buffered until
/// the rest arrives. Lines that are not valid UTF-8 are skipped; a read
/// error ends the stream like EOF does.
pub struct InboundLines<R> {
    frames: FramedRead<R, AnyDelimiterCodec>,
    done: bool,
}

impl<R: AsyncRead + Unpin> InboundLines<R> {
    pub fn new(reader: R) -> Self {
        let codec = AnyDelimiterCodec::new(b"\n".to_vec(), b"\n".to_vec());
        Self {
            frames: FramedRead::new(reader, codec),
            done: false,
        }
    }
}

impl<R: AsyncRead + Unpin> Stream for InboundLines<R> {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<String>> {
        while !self.done {
            match ready!(self.frames.poll_next_unpin(cx)) {
                Some(Ok(bytes)) => match String::from_utf8(bytes.to_vec()) {
                    Ok(line) => {
                        let line = line.trim_end_matches('\r').to_string();
                        trace!(len = line.len(), "read message");
                        return Poll::Ready(Some(line));
                    }
                    Err(_) => debug!("skipping input line that is not UTF-8"),
                },
                Some(Err(e)) => {
                    warn!(error = %e, "stdin read failed; treating as end of input");
                    self.done = true;
                }
                None => self.done = true,
            }
        }
        Poll::Ready(None)
    }
}

/// Writes one engine message per line, flushing after each.
pub struct LineWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes `message` followed by a newline and flushes.
    pub async fn write_line(&mut self, message: &str) -> Result<(), TransportError> {
        trace!(len = message.len(), "writing message");
        let write = async {
            self.writer.write_all(message.as_bytes()).await?;
            self.writer.write_all(b"\n").await?;
            self.writer.flush().await
        };
        write.await.map_err(|e| {
            if e.kind() == IoErrorKind::BrokenPipe {
                TransportError::Closed
            } else {
                TransportError::Write(e.to_string())
            }
        })
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait(?Send)]
impl<W: AsyncWrite + Unpin> Outbox for LineWriter<W> {
    async fn send(&mut self, message: EngineMessage) -> Result<(), RuntimeError> {
        let json = message
            .to_json()
            .map_err(|e| RuntimeError::Delivery(e.to_string()))?;
        self.write_line(&json).await.map_err(|e| match e {
            TransportError::Closed => RuntimeError::ChannelClosed,
            other => RuntimeError::Delivery(other.to_string()),
        })
    }
}
