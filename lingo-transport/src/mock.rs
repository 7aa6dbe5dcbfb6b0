//! Scripted in-memory transport for tests.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::Stream;
use tokio::sync::Mutex;

use crate::error::{Result, TransportError};
use crate::events::RoomEvent;
use crate::transport::{BoxedRoomSession, RoomSession, RoomTransport};
use crate::types::{ConnectParams, TransportParams, TransportType};

/// Transport that never touches the network.
///
/// Sessions replay a scripted sequence of [`RoomEvent`]s and record
/// everything sent to them, so pipelines and flows can be exercised
/// without a real room.
pub struct MockTransport {
    transport_type: TransportType,
    params: TransportParams,
    script: Vec<RoomEvent>,
    fail_connect: Option<String>,
    connects: Arc<std::sync::Mutex<Vec<ConnectParams>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            transport_type: TransportType::Daily,
            params: TransportParams::for_transport(TransportType::Daily),
            script: Vec::new(),
            fail_connect: None,
            connects: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// Queue an event for sessions to replay.
    pub fn with_event(mut self, event: RoomEvent) -> Self {
        self.script.push(event);
        self
    }

    /// Queue several events at once.
    pub fn with_events(mut self, events: impl IntoIterator<Item = RoomEvent>) -> Self {
        self.script.extend(events);
        self
    }

    /// Make `connect` fail with a connection error.
    pub fn failing(mut self, msg: impl Into<String>) -> Self {
        self.fail_connect = Some(msg.into());
        self
    }

    /// Parameters passed to every `connect` call so far.
    pub fn connect_params(&self) -> Vec<ConnectParams> {
        self.connects.lock().expect("connects lock poisoned").clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomTransport for MockTransport {
    fn transport_type(&self) -> TransportType {
        self.transport_type
    }

    fn params(&self) -> &TransportParams {
        &self.params
    }

    async fn connect(&self, connect: ConnectParams) -> Result<BoxedRoomSession> {
        self.connects.lock().expect("connects lock poisoned").push(connect);

        if let Some(msg) = &self.fail_connect {
            return Err(TransportError::connection(msg.clone()));
        }

        Ok(Box::new(MockRoomSession::new(self.script.clone())))
    }
}

/// A scripted session handed out by [`MockTransport`].
pub struct MockRoomSession {
    session_id: String,
    connected: AtomicBool,
    script: Mutex<VecDeque<RoomEvent>>,
    sent_audio: Mutex<Vec<Vec<u8>>>,
    sent_text: Mutex<Vec<String>>,
}

impl MockRoomSession {
    pub fn new(script: Vec<RoomEvent>) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            connected: AtomicBool::new(true),
            script: Mutex::new(script.into()),
            sent_audio: Mutex::new(Vec::new()),
            sent_text: Mutex::new(Vec::new()),
        }
    }

    /// Audio chunks the agent has sent so far.
    pub async fn sent_audio(&self) -> Vec<Vec<u8>> {
        self.sent_audio.lock().await.clone()
    }

    /// Text messages the agent has sent so far.
    pub async fn sent_text(&self) -> Vec<String> {
        self.sent_text.lock().await.clone()
    }
}

#[async_trait]
impl RoomSession for MockRoomSession {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn send_audio(&self, audio: &[u8]) -> Result<()> {
        if !self.is_connected() {
            return Err(TransportError::SessionClosed);
        }
        self.sent_audio.lock().await.push(audio.to_vec());
        Ok(())
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        if !self.is_connected() {
            return Err(TransportError::SessionClosed);
        }
        self.sent_text.lock().await.push(text.to_string());
        Ok(())
    }

    async fn next_event(&self) -> Option<Result<RoomEvent>> {
        let next = self.script.lock().await.pop_front();
        match next {
            Some(event) => Some(Ok(event)),
            None => {
                self.connected.store(false, Ordering::SeqCst);
                None
            }
        }
    }

    fn events(&self) -> Pin<Box<dyn Stream<Item = Result<RoomEvent>> + Send + '_>> {
        Box::pin(futures::stream::unfold(self, |session| async move {
            let event = session.next_event().await?;
            Some((event, session))
        }))
    }

    async fn close(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}
