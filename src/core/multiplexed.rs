use std::fmt;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, instrument};

use crate::core::connection::{Connection, ConnectionReader, ConnectionWriter};
use crate::proto::frame::Frame;

type Responder = oneshot::Sender<crate::Result<Frame>>;

/// A request sent to the multiplexer.
struct Request {
    frame: Frame,
    response_tx: Responder,
}

/// A handle to a multiplexed connection.
///
/// Cheap to clone and shareable across tasks. Requests are written in the
/// order they are queued and Redis answers in the same order, so replies
/// are paired with waiters first-in first-out.
#[derive(Clone)]
pub struct MultiplexedConnection {
    sender: mpsc::Sender<Request>,
}

impl MultiplexedConnection {
    /// Creates a new multiplexed connection and spawns its IO tasks.
    ///
    /// `queue_size` bounds the number of requests waiting to be written.
    pub fn new<S>(connection: Connection<S>, queue_size: usize) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (reader, writer) = connection.split();
        let (request_tx, request_rx) = mpsc::channel(queue_size);
        let (waiter_tx, waiter_rx) = mpsc::channel(queue_size);

        tokio::spawn(run_writer(writer, request_rx, waiter_tx));
        tokio::spawn(run_reader(reader, waiter_rx));

        Self { sender: request_tx }
    }

    /// Sends a command frame and awaits its reply.
    #[instrument(skip(self, frame), level = "debug")]
    pub async fn send_command(&self, frame: Frame) -> crate::Result<Frame> {
        let (response_tx, response_rx) = oneshot::channel();
        self.sender
            .send(Request { frame, response_tx })
            .await
            .map_err(|_| crate::Error::broken_pipe())?;

        response_rx
            .await
            .map_err(|_| crate::Error::broken_pipe())?
    }

    /// Returns true once the IO tasks have shut down.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl fmt::Debug for MultiplexedConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiplexedConnection")
            .field("closed", &self.is_closed())
            .finish()
    }
}

async fn run_writer<S>(
    mut writer: ConnectionWriter<S>,
    mut request_rx: mpsc::Receiver<Request>,
    waiter_tx: mpsc::Sender<Responder>,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    while let Some(req) = request_rx.recv().await {
        debug!(frame = ?req.frame, "sending frame");
        if let Err(e) = writer.write_frame(&req.frame).await {
            error!(error = ?e, "failed to write frame");
            let _ = req.response_tx.send(Err(crate::Error::Io { source: e }));
            return;
        }

        // Reader task is gone; the connection is dead.
        if waiter_tx.send(req.response_tx).await.is_err() {
            return;
        }
    }
}

async fn run_reader<S>(mut reader: ConnectionReader<S>, mut waiter_rx: mpsc::Receiver<Responder>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    while let Some(tx) = waiter_rx.recv().await {
        match reader.read_frame().await {
            Ok(frame) => {
                debug!(?frame, "received frame");
                let _ = tx.send(Ok(frame));
            }
            Err(e) => {
                error!(error = ?e, "failed to read frame");
                let _ = tx.send(Err(e));
                // Closing the receiver fails every queued waiter with broken pipe.
                return;
            }
        }
    }
}
