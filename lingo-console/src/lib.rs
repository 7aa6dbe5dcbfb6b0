//! # lingo-console
//!
//! The console frontend for the ConvoLingo voice agent.
//!
//! ## Overview
//!
//! The console is a prebuilt session UI mounted onto a [`Surface`] and
//! wired to a media room:
//!
//! - [`ConsoleConfig`] carries the room URL and token, read once from
//!   the environment and passed by value from then on.
//! - [`bootstrap`] performs the single startup action: build the
//!   connection parameters, render the [`SessionUi`] for the
//!   hosted-rooms transport, and mount the tree under the `"root"`
//!   anchor. No validation, no retry; failures propagate untouched.
//! - [`ConsoleApp`] then drives the live session: room events print to
//!   the terminal, typed lines go to the room.
//!
//! ## Example
//!
//! ```rust
//! use lingo_console::{ConsoleConfig, ConsoleTemplate, Surface, bootstrap};
//!
//! let mut surface = Surface::with_root();
//! let config = ConsoleConfig::new("wss://rooms.example/demo", "tok-demo");
//! let mount = bootstrap(&mut surface, &ConsoleTemplate::new(), config).unwrap();
//! assert_eq!(mount.anchor(), "root");
//! ```

pub mod app;
pub mod bootstrap;
pub mod error;
pub mod surface;
pub mod ui;

pub use app::ConsoleApp;
pub use bootstrap::{ConsoleConfig, bootstrap};
pub use error::{ConsoleError, Result};
pub use surface::{MountId, ROOT_ANCHOR, Surface, ViewNode};
pub use ui::{ConsoleTemplate, SessionUi};
