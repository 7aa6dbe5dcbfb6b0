//! WebSocket-backed room transport.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::stream::Stream;
use futures::{SinkExt, StreamExt};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::error::{Result, TransportError};
use crate::events::{ClientEvent, RoomEvent};
use crate::transport::{BoxedRoomSession, RoomSession, RoomTransport};
use crate::types::{ConnectParams, TransportParams, TransportType};

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;
type WsSink = futures::stream::SplitSink<WsStream, Message>;
type WsSource = futures::stream::SplitStream<WsStream>;

/// Room transport over a WebSocket connection.
///
/// Dials the room URL, presents the access token in a join envelope, then
/// exchanges JSON [`RoomEvent`]s / [`ClientEvent`]s for the life of the
/// session.
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    transport_type: TransportType,
    params: TransportParams,
}

impl WebSocketTransport {
    /// Create a transport with the preset media settings for `transport_type`.
    pub fn new(transport_type: TransportType) -> Self {
        Self { transport_type, params: TransportParams::for_transport(transport_type) }
    }

    /// Override the media settings.
    pub fn with_params(mut self, params: TransportParams) -> Self {
        self.params = params;
        self
    }
}

#[async_trait]
impl RoomTransport for WebSocketTransport {
    fn transport_type(&self) -> TransportType {
        self.transport_type
    }

    fn params(&self) -> &TransportParams {
        &self.params
    }

    async fn connect(&self, connect: ConnectParams) -> Result<BoxedRoomSession> {
        let request = connect.url.as_str().into_client_request().map_err(|e| {
            TransportError::connection(format!("Failed to create client request: {}", e))
        })?;

        let (stream, _response) = connect_async(request)
            .await
            .map_err(|e| TransportError::connection(format!("WebSocket connect error: {}", e)))?;

        let (sink, source) = stream.split();

        let session = WsRoomSession {
            session_id: uuid::Uuid::new_v4().to_string(),
            connected: Arc::new(AtomicBool::new(true)),
            sender: Arc::new(Mutex::new(sink)),
            receiver: Arc::new(Mutex::new(source)),
            out_sample_rate: self.params.audio_out_sample_rate,
        };

        tracing::info!(
            transport = %self.transport_type,
            url = %connect.url,
            "joining room"
        );

        let media = serde_json::to_value(&self.params)
            .map_err(|e| TransportError::protocol(format!("Serialize error: {}", e)))?;
        session.send_raw(&ClientEvent::Join { token: connect.token, media: Some(media) }).await?;

        Ok(Box::new(session))
    }
}

/// A live WebSocket room session.
pub struct WsRoomSession {
    session_id: String,
    connected: Arc<AtomicBool>,
    sender: Arc<Mutex<WsSink>>,
    receiver: Arc<Mutex<WsSource>>,
    out_sample_rate: u32,
}

impl WsRoomSession {
    async fn send_raw(&self, event: &ClientEvent) -> Result<()> {
        let msg = serde_json::to_string(event)
            .map_err(|e| TransportError::protocol(format!("JSON serialize error: {}", e)))?;

        let mut sender = self.sender.lock().await;
        sender
            .send(Message::Text(msg.into()))
            .await
            .map_err(|e| TransportError::connection(format!("Send error: {}", e)))?;

        Ok(())
    }

    async fn receive_raw(&self) -> Option<Result<RoomEvent>> {
        let mut receiver = self.receiver.lock().await;

        match receiver.next().await {
            Some(Ok(Message::Text(text))) => Some(
                serde_json::from_str(&text)
                    .map_err(|e| TransportError::protocol(format!("Parse error: {}", e))),
            ),
            Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                Ok(text) => Some(
                    serde_json::from_str(&text)
                        .map_err(|e| TransportError::protocol(format!("Parse error: {}", e))),
                ),
                Err(e) => Some(Err(TransportError::protocol(format!(
                    "Invalid UTF-8 in binary message: {}",
                    e
                )))),
            },
            Some(Ok(Message::Close(_))) => {
                self.connected.store(false, Ordering::SeqCst);
                None
            }
            Some(Ok(_)) => Some(Ok(RoomEvent::Unknown)),
            Some(Err(e)) => {
                self.connected.store(false, Ordering::SeqCst);
                Some(Err(TransportError::connection(format!("Receive error: {}", e))))
            }
            None => {
                self.connected.store(false, Ordering::SeqCst);
                None
            }
        }
    }
}

#[async_trait]
impl RoomSession for WsRoomSession {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn send_audio(&self, audio: &[u8]) -> Result<()> {
        self.send_raw(&ClientEvent::AudioOutput {
            audio: audio.to_vec(),
            sample_rate: self.out_sample_rate,
        })
        .await
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        self.send_raw(&ClientEvent::TextOutput { text: text.to_string() }).await
    }

    async fn next_event(&self) -> Option<Result<RoomEvent>> {
        self.receive_raw().await
    }

    fn events(&self) -> Pin<Box<dyn Stream<Item = Result<RoomEvent>> + Send + '_>> {
        Box::pin(futures::stream::unfold(self, |session| async move {
            let event = session.receive_raw().await?;
            Some((event, session))
        }))
    }

    async fn close(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);

        self.send_raw(&ClientEvent::Leave).await?;

        let mut sender = self.sender.lock().await;
        sender
            .send(Message::Close(None))
            .await
            .map_err(|e| TransportError::connection(format!("Close error: {}", e)))?;

        Ok(())
    }
}

impl std::fmt::Debug for WsRoomSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsRoomSession")
            .field("session_id", &self.session_id)
            .field("connected", &self.connected.load(Ordering::SeqCst))
            .finish()
    }
}
