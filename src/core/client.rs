use std::future::Future;

use crate::core::command::{self, Cmd};
use crate::proto::error::{Error, Result};
use crate::proto::frame::Frame;

/// The capability surface key handles are built on: run one command, get
/// its reply.
///
/// [`Client`](crate::Client) is the bundled implementation. Anything else
/// that can carry a [`Cmd`] to a Redis-compatible store (a pooled client, a
/// test double) can implement it too.
pub trait CommandClient: Send + Sync {
    /// Sends one command and resolves to its reply.
    ///
    /// Error replies are surfaced as [`Error::Server`], never as an
    /// `Ok(Frame::Error(_))`.
    fn execute(&self, cmd: Cmd) -> impl Future<Output = Result<Frame>> + Send;

    /// Checks that the client is live and speaks the protocol.
    ///
    /// The default sends `PING` and expects `PONG`.
    fn probe(&self) -> impl Future<Output = Result<()>> + Send {
        async move {
            let reply = self.execute(command::ping()).await?;
            match reply.as_bytes() {
                Some(pong) if pong.eq_ignore_ascii_case(b"PONG") => Ok(()),
                _ => Err(Error::protocol(format!("unexpected PING reply: {reply:?}"))),
            }
        }
    }
}
