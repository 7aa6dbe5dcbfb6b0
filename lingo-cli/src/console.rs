use anyhow::Result;
use lingo_console::{ConsoleApp, ConsoleConfig, ConsoleTemplate, Surface, bootstrap};
use lingo_transport::{TransportType, WebSocketTransport};

/// Mounts the console and drives a live session against the room.
pub async fn run_console(config: ConsoleConfig) -> Result<()> {
    let mut surface = Surface::with_root();
    let template = ConsoleTemplate::new();

    let mount = bootstrap(&mut surface, &template, config.clone())?;
    tracing::debug!(%mount, "Console mounted");

    let transport = WebSocketTransport::new(TransportType::Daily);
    let session = template.connect(&transport, config.connect_params()).await?;

    ConsoleApp::new(session).run().await?;
    Ok(())
}
