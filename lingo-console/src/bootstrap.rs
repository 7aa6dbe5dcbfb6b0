//! Mounting the console onto a surface.

use std::env;

use lingo_transport::{ConnectParams, TransportType};

use crate::error::Result;
use crate::surface::{MountId, ROOT_ANCHOR, Surface};
use crate::ui::SessionUi;

/// The two strings the console needs to join a room.
///
/// Built once at startup and passed by value into [`bootstrap`], so
/// nothing downstream reads the environment. Missing variables become
/// empty strings rather than errors: the shim performs no validation
/// and the room decides what to do with what it is handed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsoleConfig {
    /// Room URL, from `DAILY_ROOM_URL`.
    pub room_url: String,
    /// Room access token, from `DAILY_ROOM_TOKEN`.
    pub room_token: String,
}

impl ConsoleConfig {
    pub fn new(room_url: impl Into<String>, room_token: impl Into<String>) -> Self {
        Self { room_url: room_url.into(), room_token: room_token.into() }
    }

    /// Reads `DAILY_ROOM_URL` and `DAILY_ROOM_TOKEN`, defaulting each
    /// missing variable to the empty string.
    pub fn from_env() -> Self {
        Self {
            room_url: env::var("DAILY_ROOM_URL").unwrap_or_default(),
            room_token: env::var("DAILY_ROOM_TOKEN").unwrap_or_default(),
        }
    }

    /// The connection parameters, carried verbatim.
    pub fn connect_params(&self) -> ConnectParams {
        ConnectParams::new(&self.room_url, &self.room_token)
    }
}

/// Mounts the session UI under the root anchor.
///
/// One transition, unmounted to mounted: build the connection
/// parameters from the config strings untouched, render the UI against
/// the hosted-rooms transport, and attach the tree under
/// [`ROOT_ANCHOR`]. Every failure (missing anchor, UI refusing to
/// render) propagates unmodified; there is no retry and no local
/// recovery.
pub fn bootstrap(
    surface: &mut Surface,
    ui: &dyn SessionUi,
    config: ConsoleConfig,
) -> Result<MountId> {
    let params = config.connect_params();
    let tree = ui.render(TransportType::Daily, &params)?;
    surface.mount(ROOT_ANCHOR, tree)
}
