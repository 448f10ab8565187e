//! In-memory transport for exercising sessions without hardware

use async_trait::async_trait;
use sf8xxx_core::{Result, Sf8Error};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::serial_driver::SerialTransport;

#[derive(Debug)]
enum MockReply {
    Bytes(Vec<u8>),
    Disconnected,
}

#[derive(Debug, Default)]
struct MockState {
    replies: VecDeque<MockReply>,
    sent: Vec<Vec<u8>>,
    closed: bool,
}

/// Scripted transport: replies are served in order, every written frame is recorded
///
/// An empty reply queue behaves like a board that stays silent until the deadline.
#[derive(Debug)]
pub struct MockTransport {
    port_path: String,
    state: Arc<Mutex<MockState>>,
}

/// Inspection handle that stays valid after the transport moves into a session
#[derive(Debug, Clone)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    // A panicking test thread must not hide the recorded frames from others
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTransport {
    pub fn new(port_path: &str) -> Self {
        Self {
            port_path: port_path.to_string(),
            state: Arc::default(),
        }
    }

    pub fn handle(&self) -> MockHandle {
        MockHandle {
            state: Arc::clone(&self.state),
        }
    }

    /// Builder-style variant of [`MockHandle::queue_reply`]
    pub fn with_reply(self, reply: &[u8]) -> Self {
        self.handle().queue_reply(reply);
        self
    }
}

impl MockHandle {
    pub fn queue_reply(&self, reply: &[u8]) {
        lock(&self.state).replies.push_back(MockReply::Bytes(reply.to_vec()));
    }

    /// Next transaction fails as if the cable was pulled
    pub fn queue_disconnect(&self) {
        lock(&self.state).replies.push_back(MockReply::Disconnected);
    }

    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        lock(&self.state).sent.clone()
    }

    pub fn pending_replies(&self) -> usize {
        lock(&self.state).replies.len()
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }
}

#[async_trait]
impl SerialTransport for MockTransport {
    async fn transaction(&mut self, frame: &[u8]) -> Result<Vec<u8>> {
        let mut state = lock(&self.state);
        state.sent.push(frame.to_vec());

        match state.replies.pop_front() {
            Some(MockReply::Bytes(bytes)) => Ok(bytes),
            Some(MockReply::Disconnected) => Err(Sf8Error::DeviceDisconnected(
                "Serial port returned EOF - device may have been unplugged".to_string(),
            )),
            None => Ok(Vec::new()),
        }
    }

    fn clear_input_buffer(&mut self) -> Result<()> {
        Ok(())
    }

    fn port_path(&self) -> Option<&str> {
        Some(&self.port_path)
    }
}

impl Drop for MockTransport {
    fn drop(&mut self) {
        lock(&self.state).closed = true;
    }
}
