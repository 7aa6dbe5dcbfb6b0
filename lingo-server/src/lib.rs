//! # lingo-server
//!
//! Development server for the ConvoLingo console.
//!
//! Serves the prebuilt console page and hands out the room's connection
//! parameters at runtime, so credentials live in the server's
//! environment instead of being baked into the page. CORS is wide open:
//! this is a local development tool, not a deployment surface.
//!
//! Routes:
//!
//! - `GET /` - the console page
//! - `GET /api/health` - liveness probe
//! - `POST /api/connect` - the room's [`ConnectParams`] as JSON

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use lingo_transport::ConnectParams;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

const CONSOLE_PAGE: &str = include_str!("../assets/console.html");

/// What the server hands to consoles that ask to connect.
#[derive(Debug, Clone)]
pub struct ServerState {
    connect: ConnectParams,
}

impl ServerState {
    /// Wraps the room parameters to hand out. Empty strings are handed
    /// out as-is; whether they are usable is the room's decision.
    pub fn new(connect: ConnectParams) -> Self {
        Self { connect }
    }
}

/// Builds the router with permissive CORS and request tracing.
pub fn create_app(state: ServerState) -> Router {
    let api_router = Router::new()
        .route("/health", get(health_check))
        .route("/connect", post(connect))
        .with_state(state);

    Router::new().route("/", get(console_page)).nest("/api", api_router).layer(
        ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
            CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
        ),
    )
}

/// Serves the app on `addr` until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: ServerState) -> std::io::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Console server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down console server");
        })
        .await
}

async fn console_page() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], Html(CONSOLE_PAGE))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn connect(State(state): State<ServerState>) -> Json<ConnectParams> {
    Json(state.connect.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        create_app(ServerState::new(ConnectParams::new("wss://rooms.example/demo", "tok-demo")))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_console_page_served_at_root() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 256 * 1024).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("id=\"root\""));
        // Credentials never appear in the served page.
        assert!(!page.contains("tok-demo"));
    }

    #[tokio::test]
    async fn test_connect_hands_out_room_params() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/connect")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["url"], "wss://rooms.example/demo");
        assert_eq!(json["token"], "tok-demo");
    }

    #[tokio::test]
    async fn test_connect_passes_empty_params_through() {
        let app = create_app(ServerState::new(ConnectParams::new("", "")));
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/connect")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["url"], "");
        assert_eq!(json["token"], "");
    }

    #[tokio::test]
    async fn test_connect_rejects_get() {
        let response = app()
            .oneshot(Request::builder().uri("/api/connect").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
