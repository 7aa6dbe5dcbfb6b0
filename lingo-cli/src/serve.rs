use std::net::SocketAddr;

use anyhow::Result;
use lingo_core::AppConfig;
use lingo_server::ServerState;
use lingo_transport::ConnectParams;

/// Runs the console dev server, handing out whatever room the
/// environment configures.
pub async fn run_serve(port: u16, config: &AppConfig) -> Result<()> {
    let connect = ConnectParams::new(
        config.room_url.clone().unwrap_or_default(),
        config.room_token.clone().unwrap_or_default(),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    lingo_server::serve(addr, ServerState::new(connect)).await?;
    Ok(())
}
