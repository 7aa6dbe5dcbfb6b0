//! # lingo-transport
//!
//! Media room transports for the ConvoLingo voice agent.
//!
//! A transport is how the agent reaches its user: a hosted media room, a
//! telephony bridge, or a direct browser connection. All of them share one
//! session protocol, so the pipeline and flows never care which one is in
//! use.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────┐   connect(url, token)   ┌──────────────────┐
//!   │ RoomTransport├─────────────────────────►   RoomSession    │
//!   │  (factory)   │                         │ (live bidirectional
//!   └──────────────┘                         │  event stream)   │
//!                                            └──────────────────┘
//! ```
//!
//! - [`TransportType`] picks a [`TransportParams`] preset (hosted rooms get
//!   room-side transcription, telephony is pinned to 8 kHz).
//! - [`WebSocketTransport`] is the production implementation: it dials the
//!   room URL, presents the token in a join envelope, and exchanges JSON
//!   events.
//! - [`MockTransport`] replays scripted events for tests.
//!
//! ## Example
//!
//! ```rust,ignore
//! use lingo_transport::{ConnectParams, RoomEvent, RoomTransport, TransportType, WebSocketTransport};
//!
//! let transport = WebSocketTransport::new(TransportType::Daily);
//! let session = transport.connect(ConnectParams::new(url, token)).await?;
//!
//! while let Some(event) = session.next_event().await {
//!     match event? {
//!         RoomEvent::Audio { audio, .. } => { /* feed the pipeline */ }
//!         RoomEvent::Left { .. } => break,
//!         _ => {}
//!     }
//! }
//! ```

pub mod error;
pub mod events;
pub mod mock;
pub mod transport;
pub mod types;
pub mod ws;

pub use error::{Result, TransportError};
pub use events::{ClientEvent, RoomEvent};
pub use mock::{MockRoomSession, MockTransport};
pub use transport::{BoxedRoomSession, BoxedTransport, RoomSession, RoomTransport};
pub use types::{ConnectParams, TransportParams, TransportType, VadConfig};
pub use ws::WebSocketTransport;
