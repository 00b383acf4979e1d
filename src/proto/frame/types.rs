use bytes::Bytes;

/// A RESP2 frame.
///
/// - SimpleString: status replies such as `OK` or `PONG`
/// - Error: error replies, kept as raw bytes until a caller interprets them
/// - Integer: counts, flags and lengths
/// - BulkString: binary-safe payloads, `None` for the nil bulk string
/// - Array: commands and multi-value replies
/// - Null: the nil array
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Simple string (+OK).
    SimpleString(Vec<u8>),
    /// Error (-ERR).
    Error(Vec<u8>),
    /// Integer (:1000).
    Integer(i64),
    /// Bulk string ($6\r\nfoobar).
    BulkString(Option<Bytes>),
    /// Array (*2\r\n...).
    Array(Vec<Frame>),
    /// Null (*-1).
    Null,
}

impl Frame {
    /// Builds a simple string frame.
    #[inline]
    pub fn simple(s: impl AsRef<[u8]>) -> Self {
        Frame::SimpleString(s.as_ref().to_vec())
    }

    /// Builds an error frame.
    #[inline]
    pub fn error(message: impl AsRef<[u8]>) -> Self {
        Frame::Error(message.as_ref().to_vec())
    }

    /// Builds a non-nil bulk string frame.
    #[inline]
    pub fn bulk(data: impl Into<Bytes>) -> Self {
        Frame::BulkString(Some(data.into()))
    }

    /// The nil bulk string, `$-1`.
    #[inline]
    pub fn nil() -> Self {
        Frame::BulkString(None)
    }

    /// Returns true for both nil encodings (`$-1` and `*-1`).
    pub fn is_nil(&self) -> bool {
        matches!(self, Frame::Null | Frame::BulkString(None))
    }

    /// Returns true if this is an error reply.
    pub fn is_error(&self) -> bool {
        matches!(self, Frame::Error(_))
    }

    /// Borrows the payload of a simple or bulk string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Frame::SimpleString(s) => Some(s),
            Frame::BulkString(Some(b)) => Some(b),
            _ => None,
        }
    }
}
