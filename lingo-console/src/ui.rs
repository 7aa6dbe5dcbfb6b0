//! The session UI capability and the console implementation of it.

use lingo_transport::{
    BoxedRoomSession, ConnectParams, RoomTransport, TransportType,
};

use crate::error::Result;
use crate::surface::ViewNode;

/// Renders a session UI for a transport and its connection parameters.
///
/// This is the seam between the bootstrap shim and the component that
/// actually owns the session: production uses [`ConsoleTemplate`],
/// tests substitute a recording fake. Implementations receive the
/// parameters exactly as configured and decide for themselves what an
/// empty URL or token means.
pub trait SessionUi: Send + Sync {
    fn render(&self, transport: TransportType, params: &ConnectParams) -> Result<ViewNode>;
}

/// The prebuilt console: status line, transcript, controls, wrapped in
/// the theme and fullscreen containers.
#[derive(Debug, Clone, Default)]
pub struct ConsoleTemplate;

impl ConsoleTemplate {
    pub fn new() -> Self {
        Self
    }

    /// Opens the room session the rendered console will drive.
    pub async fn connect(
        &self,
        transport: &dyn RoomTransport,
        params: ConnectParams,
    ) -> Result<BoxedRoomSession> {
        Ok(transport.connect(params).await?)
    }
}

impl SessionUi for ConsoleTemplate {
    fn render(&self, transport: TransportType, _params: &ConnectParams) -> Result<ViewNode> {
        // Connection parameters configure the session, not the tree;
        // in particular the token never appears in rendered output.
        Ok(ViewNode::new("theme").with_child(
            ViewNode::new("fullscreen").with_child(
                ViewNode::new("console")
                    .with_child(
                        ViewNode::new("status").with_child(ViewNode::new(transport.as_str())),
                    )
                    .with_child(ViewNode::new("transcript"))
                    .with_child(ViewNode::new("controls")),
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_transport::MockTransport;

    #[test]
    fn test_console_tree_shape() {
        let tree = ConsoleTemplate::new()
            .render(TransportType::Daily, &ConnectParams::new("wss://rooms.example/demo", "tok"))
            .unwrap();

        assert_eq!(tree.name(), "theme");
        assert_eq!(tree.children()[0].name(), "fullscreen");
        let console = tree.find("console").unwrap();
        assert_eq!(console.children().len(), 3);
        assert!(tree.find("daily").is_some());
    }

    #[test]
    fn test_render_never_leaks_the_token() {
        let tree = ConsoleTemplate::new()
            .render(TransportType::Daily, &ConnectParams::new("wss://x", "tok-secret"))
            .unwrap();
        assert!(tree.find("tok-secret").is_none());
    }

    #[tokio::test]
    async fn test_connect_passes_params_through() {
        let transport = MockTransport::new();
        let template = ConsoleTemplate::new();

        let session = template
            .connect(&transport, ConnectParams::new("wss://rooms.example/demo", "tok-demo"))
            .await
            .unwrap();
        assert!(session.is_connected());

        let connects = transport.connect_params();
        assert_eq!(connects[0].url, "wss://rooms.example/demo");
        assert_eq!(connects[0].token, "tok-demo");
    }
}
