use crate::app::AppState;
use crate::error::Result;
use crate::signaling::{SignalingEvent, SignalingService};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use huddle_core::{ClientMessage, ConnectionId};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Response {
    let origin = headers.get(header::ORIGIN);
    if !state.allowed_origin.permits(origin) {
        warn!("Rejected WebSocket upgrade from origin {:?}", origin);
        return StatusCode::FORBIDDEN.into_response();
    }

    let service = state.signaling.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

pub fn parse_frame(text: &str) -> Result<ClientMessage> {
    Ok(serde_json::from_str(text)?)
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let id = ConnectionId::new();
    info!("New WebSocket connection: {}", id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_peer(id, tx);
    if let Err(e) = service.submit(id, SignalingEvent::Connected).await {
        error!("Cannot register connection {}: {}", id, e);
        service.remove_peer(&id);
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match parse_frame(text.as_str()) {
                        Ok(signal) => {
                            let event = SignalingEvent::Message(signal);
                            if let Err(e) = service.submit(id, event).await {
                                error!("Hub died: {}", e);
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid frame from {}: {}", id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_peer(&id);
    if let Err(e) = service.submit(id, SignalingEvent::Disconnected).await {
        error!("Cannot clean up connection {}: {}", id, e);
    }
    info!("WebSocket disconnected: {}", id);
}
