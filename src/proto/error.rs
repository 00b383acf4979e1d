use std::io;

use thiserror::Error;

/// Result type alias for redkey operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the client and the key handles.
///
/// Key handles add exactly one error of their own,
/// [`InvalidClient`](Error::InvalidClient). Everything else comes out of the
/// command client and is handed back to the caller untouched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The client failed the capability probe, or handle metadata tried to
    /// shadow a reserved attribute.
    #[error("invalid client: {message}")]
    InvalidClient {
        /// Why the client or metadata was rejected.
        message: String,
    },

    /// An IO error occurred.
    #[error("IO error: {source}")]
    Io {
        /// The underlying IO error.
        #[from]
        source: io::Error,
    },

    /// A reply did not have the shape the command promises.
    #[error("protocol error: {message}")]
    Protocol {
        /// Description of the error.
        message: String,
    },

    /// The server returned an error reply.
    #[error("server error: {message}")]
    Server {
        /// Error message from server.
        message: String,
    },

    /// Authentication failed.
    #[error("authentication failed")]
    Auth,

    /// Invalid argument provided.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of invalid argument.
        message: String,
    },

    /// The byte stream from the server is not valid RESP.
    #[error("decode error: {source}")]
    Decode {
        /// Underlying decode error.
        #[from]
        source: DecodeError,
    },
}

impl Error {
    /// Returns true if a handle rejected its client or metadata.
    pub fn is_invalid_client(&self) -> bool {
        matches!(self, Error::InvalidClient { .. })
    }

    /// Returns true for failures surfaced by the command client: transport,
    /// protocol and server errors.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Io { .. }
                | Error::Protocol { .. }
                | Error::Server { .. }
                | Error::Auth
                | Error::Decode { .. }
        )
    }

    pub(crate) fn invalid_client(message: impl Into<String>) -> Self {
        Error::InvalidClient {
            message: message.into(),
        }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Error::Protocol {
            message: message.into(),
        }
    }

    pub(crate) fn server(message: &[u8]) -> Self {
        Error::Server {
            message: String::from_utf8_lossy(message).into_owned(),
        }
    }

    pub(crate) fn broken_pipe() -> Self {
        Error::Io {
            source: io::Error::new(io::ErrorKind::BrokenPipe, "connection closed"),
        }
    }
}

/// Error returned when the RESP decoder meets malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The first byte of a frame is not a RESP2 type marker.
    #[error("unknown frame type: {0:?}")]
    UnknownType(char),

    /// A length or integer line did not parse as a signed 64-bit integer.
    #[error("invalid integer: {0:?}")]
    InvalidInteger(String),

    /// A negative length other than the nil marker `-1`.
    #[error("invalid length: {0}")]
    InvalidLength(i64),

    /// The frame is larger than the decoder accepts.
    #[error("frame exceeds maximum size of {max} bytes")]
    TooLarge {
        /// The configured bound.
        max: usize,
    },

    /// A bulk string payload was not followed by CRLF.
    #[error("bulk string is missing its CRLF terminator")]
    MissingTerminator,

    /// Arrays are nested deeper than the decoder accepts.
    #[error("arrays nested deeper than {max} levels")]
    TooDeep {
        /// The nesting bound.
        max: usize,
    },
}
