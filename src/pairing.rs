//! Pairing endpoint: shows the current login QR code while the device is
//! unpaired.
//!
//! Each QR code the transport reports is printed to the terminal and served
//! as a PNG over HTTP. The server starts with the first code and stops once
//! pairing completes.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use meow_channels::whatsapp::{generate_qr_image, generate_qr_terminal};
use meow_core::config::PairingConfig;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Latest QR code, rendered as PNG.
#[derive(Clone, Default)]
pub struct PairingState {
    png: Arc<RwLock<Option<Vec<u8>>>>,
}

impl PairingState {
    async fn set(&self, png: Vec<u8>) {
        *self.png.write().await = Some(png);
    }
}

async fn qr_png(State(state): State<PairingState>) -> Response {
    match state.png.read().await.as_ref() {
        Some(png) => ([(header::CONTENT_TYPE, "image/png")], png.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "no pairing code yet").into_response(),
    }
}

fn route_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Build the pairing router.
pub fn router(path: &str, state: PairingState) -> Router {
    Router::new()
        .route(&route_path(path), get(qr_png))
        .with_state(state)
}

async fn serve(config: PairingConfig, state: PairingState) {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("pairing server failed to bind to {addr}: {e}");
            return;
        }
    };

    info!(
        "Scan the QR code at http://{addr}{}",
        route_path(&config.path)
    );
    if let Err(e) = axum::serve(listener, router(&config.path, state)).await {
        error!("pairing server error: {e}");
    }
}

/// Follow the transport's pairing signals until the device is paired or
/// the transport drops its senders.
pub async fn run_pairing(
    config: PairingConfig,
    mut qr_rx: mpsc::Receiver<String>,
    mut done_rx: mpsc::Receiver<bool>,
) {
    let state = PairingState::default();
    let mut server: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            code = qr_rx.recv() => {
                let Some(code) = code else { break };
                match generate_qr_terminal(&code) {
                    Ok(text) => info!("Scan this QR code with WhatsApp:\n{text}"),
                    Err(e) => warn!("failed to render QR code for the terminal: {e}"),
                }
                match generate_qr_image(&code) {
                    Ok(png) => state.set(png).await,
                    Err(e) => {
                        error!("failed to render QR image: {e}");
                        continue;
                    }
                }
                if server.is_none() {
                    server = Some(tokio::spawn(serve(config.clone(), state.clone())));
                }
            }
            done = done_rx.recv() => {
                match done {
                    Some(true) => info!("WhatsApp pairing complete"),
                    Some(false) => warn!("WhatsApp pairing failed"),
                    None => {}
                }
                break;
            }
        }
    }

    if let Some(handle) = server {
        handle.abort();
        info!("pairing server stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn get_req(path: &str) -> Request<Body> {
        Request::get(path).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_no_code_yet_is_404() {
        let app = router("/login", PairingState::default());
        let resp = app.oneshot(get_req("/login")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serves_latest_png() {
        let state = PairingState::default();
        state.set(vec![1, 2, 3]).await;
        state.set(vec![0x89, b'P', b'N', b'G']).await;

        let resp = router("/login", state)
            .oneshot(get_req("/login"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/png");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), &[0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_path_without_slash_and_other_paths() {
        let state = PairingState::default();
        state.set(vec![1]).await;
        let app = router("qr", state);

        let resp = app.clone().oneshot(get_req("/qr")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = app.oneshot(get_req("/login")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_run_pairing_stops_on_done() {
        let (qr_tx, qr_rx) = mpsc::channel(4);
        let (done_tx, done_rx) = mpsc::channel(1);
        let config = PairingConfig {
            host: "127.0.0.1".into(),
            port: 0,
            path: "/login".into(),
        };
        let task = tokio::spawn(run_pairing(config, qr_rx, done_rx));

        qr_tx.send("2@pairing-ref,abc,def".into()).await.unwrap();
        done_tx.send(true).await.unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_pairing_ends_when_senders_drop() {
        let (qr_tx, qr_rx) = mpsc::channel::<String>(1);
        let (done_tx, done_rx) = mpsc::channel::<bool>(1);
        drop(qr_tx);
        drop(done_tx);
        tokio::time::timeout(
            std::time::Duration::from_secs(5),
            run_pairing(PairingConfig::default(), qr_rx, done_rx),
        )
        .await
        .unwrap();
    }
}
