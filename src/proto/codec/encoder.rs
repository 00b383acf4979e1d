use bytes::{BufMut, BytesMut};

use crate::proto::frame::Frame;

const CRLF: &[u8] = b"\r\n";

/// A RESP encoder that converts [`Frame`] values to bytes.
///
/// Frames accumulate in an internal buffer until [`take`](Encoder::take) is
/// called, so several commands can be written with a single syscall.
///
/// # Example
///
/// ```
/// use redkey::proto::codec::Encoder;
/// use redkey::proto::frame::Frame;
///
/// let mut encoder = Encoder::new();
/// encoder.encode(&Frame::simple("OK"));
/// assert_eq!(&encoder.take()[..], b"+OK\r\n");
/// ```
#[derive(Debug, Default)]
pub struct Encoder {
    buf: BytesMut,
}

impl Encoder {
    /// Creates a new encoder with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes a frame into the internal buffer.
    pub fn encode(&mut self, frame: &Frame) {
        match frame {
            Frame::SimpleString(s) => self.line(b'+', s),
            Frame::Error(e) => self.line(b'-', e),
            Frame::Integer(n) => self.header(b':', *n),
            Frame::BulkString(Some(data)) => {
                self.header(b'$', data.len() as i64);
                self.buf.extend_from_slice(data);
                self.buf.extend_from_slice(CRLF);
            }
            Frame::BulkString(None) => self.header(b'$', -1),
            Frame::Array(items) => {
                self.header(b'*', items.len() as i64);
                for item in items {
                    self.encode(item);
                }
            }
            Frame::Null => self.header(b'*', -1),
        }
    }

    /// Number of encoded bytes waiting in the buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true when nothing is waiting in the buffer.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Takes the encoded data, leaving the encoder empty and reusable.
    pub fn take(&mut self) -> BytesMut {
        self.buf.split()
    }

    fn line(&mut self, prefix: u8, body: &[u8]) {
        self.buf.reserve(body.len() + 3);
        self.buf.put_u8(prefix);
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(CRLF);
    }

    fn header(&mut self, prefix: u8, n: i64) {
        self.line(prefix, n.to_string().as_bytes());
    }
}
