//! Core RoomTransport and RoomSession trait definitions.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::Result;
use crate::events::RoomEvent;
use crate::types::{ConnectParams, TransportParams, TransportType};

/// A factory for room sessions.
///
/// Each transport kind (hosted rooms, telephony, WebRTC) is represented by
/// an implementation of this trait, so the rest of the agent never cares
/// how the user is reached.
///
/// # Example
///
/// ```rust,ignore
/// use lingo_transport::{ConnectParams, RoomTransport, WebSocketTransport, TransportType};
///
/// let transport = WebSocketTransport::new(TransportType::Daily);
/// let session = transport
///     .connect(ConnectParams::new(room_url, room_token))
///     .await?;
/// ```
#[async_trait]
pub trait RoomTransport: Send + Sync {
    /// The transport kind this factory produces sessions for.
    fn transport_type(&self) -> TransportType;

    /// Media settings sessions will be joined with.
    fn params(&self) -> &TransportParams;

    /// Dial the room and present the join envelope.
    ///
    /// `connect.url` and `connect.token` are used exactly as given. The
    /// room, not this method, decides whether the token is valid.
    async fn connect(&self, connect: ConnectParams) -> Result<BoxedRoomSession>;
}

/// A live bidirectional session with a media room.
#[async_trait]
pub trait RoomSession: Send + Sync {
    /// Get the session ID.
    fn session_id(&self) -> &str;

    /// Check if the session is currently connected.
    fn is_connected(&self) -> bool;

    /// Send a chunk of agent speech to the room.
    async fn send_audio(&self, audio: &[u8]) -> Result<()>;

    /// Send a text message to the room chat.
    async fn send_text(&self, text: &str) -> Result<()>;

    /// Get the next event from the room.
    ///
    /// Returns `None` when the session is closed.
    async fn next_event(&self) -> Option<Result<RoomEvent>>;

    /// Get a stream of room events.
    fn events(&self) -> Pin<Box<dyn Stream<Item = Result<RoomEvent>> + Send + '_>>;

    /// Leave the room and close the connection.
    async fn close(&self) -> Result<()>;
}

/// A boxed session type for dynamic dispatch.
pub type BoxedRoomSession = Box<dyn RoomSession>;

/// A shared transport type for thread-safe access.
pub type BoxedTransport = std::sync::Arc<dyn RoomTransport>;
