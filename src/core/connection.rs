use std::fmt;
use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};

use crate::proto::codec::{Decoder, Encoder};
use crate::proto::frame::Frame;

const READ_CHUNK: usize = 4096;

/// A connection to a Redis server.
///
/// Wraps an underlying stream (TCP, TLS, etc.) and handles RESP frame
/// encoding and decoding. Used directly for the connection handshake, then
/// [`split`](Connection::split) into halves owned by the multiplexer tasks.
pub struct Connection<S> {
    stream: S,
    decoder: Decoder,
    encoder: Encoder,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new connection with no timeouts configured.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            decoder: Decoder::new(),
            encoder: Encoder::new(),
            read_timeout: None,
            write_timeout: None,
        }
    }

    /// Configures read and write timeouts for this connection.
    pub fn with_timeouts(
        mut self,
        read_timeout: Option<Duration>,
        write_timeout: Option<Duration>,
    ) -> Self {
        self.read_timeout = read_timeout;
        self.write_timeout = write_timeout;
        self
    }

    /// Writes a frame to the connection.
    pub async fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        write_frame(&mut self.stream, &mut self.encoder, self.write_timeout, frame).await
    }

    /// Reads one complete frame, performing as many socket reads as needed.
    pub async fn read_frame(&mut self) -> crate::Result<Frame> {
        read_frame(&mut self.stream, &mut self.decoder, self.read_timeout).await
    }

    /// Writes a frame and reads the reply to it.
    pub async fn request(&mut self, frame: &Frame) -> crate::Result<Frame> {
        self.write_frame(frame).await?;
        self.read_frame().await
    }

    /// Splits the connection into independently owned read and write halves.
    ///
    /// Bytes already buffered by the decoder stay with the reader.
    pub fn split(self) -> (ConnectionReader<S>, ConnectionWriter<S>) {
        let (read_half, write_half) = tokio::io::split(self.stream);
        (
            ConnectionReader {
                stream: read_half,
                decoder: self.decoder,
                read_timeout: self.read_timeout,
            },
            ConnectionWriter {
                stream: write_half,
                encoder: self.encoder,
                write_timeout: self.write_timeout,
            },
        )
    }
}

impl<S> fmt::Debug for Connection<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("stream", &self.stream)
            .field("read_timeout", &self.read_timeout)
            .field("write_timeout", &self.write_timeout)
            .finish()
    }
}

/// Read half of a split [`Connection`].
pub struct ConnectionReader<S> {
    stream: ReadHalf<S>,
    decoder: Decoder,
    read_timeout: Option<Duration>,
}

impl<S> ConnectionReader<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Reads one complete frame.
    pub async fn read_frame(&mut self) -> crate::Result<Frame> {
        read_frame(&mut self.stream, &mut self.decoder, self.read_timeout).await
    }
}

/// Write half of a split [`Connection`].
pub struct ConnectionWriter<S> {
    stream: WriteHalf<S>,
    encoder: Encoder,
    write_timeout: Option<Duration>,
}

impl<S> ConnectionWriter<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Writes a frame.
    pub async fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        write_frame(&mut self.stream, &mut self.encoder, self.write_timeout, frame).await
    }
}

async fn write_frame<W>(
    stream: &mut W,
    encoder: &mut Encoder,
    timeout: Option<Duration>,
    frame: &Frame,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    encoder.encode(frame);
    let data = encoder.take();
    match timeout {
        Some(limit) => tokio::time::timeout(limit, stream.write_all(&data))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "write timed out"))?,
        None => stream.write_all(&data).await,
    }
}

async fn read_frame<R>(
    stream: &mut R,
    decoder: &mut Decoder,
    timeout: Option<Duration>,
) -> crate::Result<Frame>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; READ_CHUNK];
    loop {
        if let Some(frame) = decoder.decode()? {
            return Ok(frame);
        }

        let n = match timeout {
            Some(limit) => tokio::time::timeout(limit, stream.read(&mut buf))
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "read timed out"))??,
            None => stream.read(&mut buf).await?,
        };
        if n == 0 {
            return Err(crate::Error::protocol("connection closed"));
        }
        decoder.append(&buf[..n]);
    }
}
