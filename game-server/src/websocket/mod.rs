use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

use crate::game_manager::GameManager;
use game_types::{ClientMessage, ErrorKind};

pub mod connection;
pub mod handlers;


pub use connection::ConnectionManager;
use handlers::MessageHandler;

pub async fn handle_connection(
    websocket: WebSocket,
    game_manager: Arc<GameManager>,
) {
    let (mut ws_sender, mut ws_receiver) = websocket.split();

    // Registers the outbound channel and queues the welcome message
    let (player_id, message_receiver) = game_manager.player_connected().await;
    info!("New WebSocket connection: {}", player_id);

    let message_handler = MessageHandler::new(player_id, game_manager);

    // Handle incoming messages
    let incoming_handler = {
        let message_handler = message_handler.clone();

        async move {
            while let Some(result) = ws_receiver.next().await {
                match result {
                    Ok(msg) => {
                        if let Err(e) = handle_message(msg, &message_handler).await {
                            error!("Error handling message for {}: {}", player_id, e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("WebSocket error for {}: {}", player_id, e);
                        break;
                    }
                }
            }
        }
    };

    // Handle outgoing messages
    let outgoing_handler = {
        async move {
            let mut receiver = message_receiver;

            while let Some(message) = receiver.recv().await {
                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to serialize message: {:?}", e);
                        continue;
                    }
                };

                if let Err(e) = ws_sender.send(Message::text(json)).await {
                    warn!("Failed to send message to {}: {:?}", player_id, e);
                    break;
                }
            }
        }
    };

    tokio::select! {
        _ = incoming_handler => {},
        _ = outgoing_handler => {},
    }

    info!("Connection {} disconnected", player_id);
    message_handler.handle_disconnect().await;
}

/// Returns `Err` only when the reply channel is closed. Malformed input is
/// reported to the sender and the connection stays open.
async fn handle_message(msg: Message, message_handler: &MessageHandler) -> Result<(), String> {
    // Only handle text messages
    if !msg.is_text() {
        return Ok(());
    }

    let text = msg.to_str().map_err(|_| "Invalid text message")?;

    let client_message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            warn!(
                "Dropping malformed message from {}: {}",
                message_handler.player_id(),
                e
            );
            return message_handler
                .send_error(ErrorKind::Protocol, format!("Invalid message: {}", e))
                .await;
        }
    };

    message_handler.handle_message(client_message).await
}
