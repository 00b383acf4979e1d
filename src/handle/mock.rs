//! Recording [`CommandClient`] for handle unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::core::command::Cmd;
use crate::core::CommandClient;
use crate::proto::error::{Error, Result};
use crate::proto::frame::Frame;

/// Answers PING itself and replays scripted replies for everything else.
#[derive(Default)]
pub(crate) struct MockClient {
    sent: Mutex<Vec<Vec<String>>>,
    replies: Mutex<VecDeque<Result<Frame>>>,
    ping_reply: Option<Frame>,
}

impl MockClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A client whose PING is answered with `reply` instead of PONG.
    pub(crate) fn with_ping_reply(reply: Frame) -> Self {
        Self {
            ping_reply: Some(reply),
            ..Self::default()
        }
    }

    pub(crate) fn reply(&self, frame: Frame) -> &Self {
        self.replies.lock().unwrap().push_back(Ok(frame));
        self
    }

    pub(crate) fn fail(&self, error: Error) -> &Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Every command sent so far, PING included.
    pub(crate) fn sent(&self) -> Vec<Vec<String>> {
        self.sent.lock().unwrap().clone()
    }

    /// The most recent command.
    pub(crate) fn last(&self) -> Vec<String> {
        self.sent().pop().unwrap_or_default()
    }
}

impl CommandClient for MockClient {
    async fn execute(&self, cmd: Cmd) -> Result<Frame> {
        let parts: Vec<String> = cmd
            .parts()
            .iter()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .collect();
        let is_ping = parts[0] == "PING";
        self.sent.lock().unwrap().push(parts);

        let frame = if is_ping {
            Ok(self.ping_reply.clone().unwrap_or_else(|| Frame::simple("PONG")))
        } else {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::protocol("no reply scripted")))
        };
        frame.and_then(crate::core::reply::parse_frame_response)
    }
}
