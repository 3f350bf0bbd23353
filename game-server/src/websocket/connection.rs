use game_types::{PlayerId, ServerMessage};
use std::collections::HashMap;
use tokio::sync::{RwLock, mpsc};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Connection {
    pub id: PlayerId,
    pub sender: mpsc::UnboundedSender<ServerMessage>,
}

impl Connection {
    pub fn new(id: PlayerId) -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { id, sender }, receiver)
    }

    pub fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .map_err(|_| "Connection closed".to_string())
    }
}

/// Outbound channels of every open WebSocket, keyed by the player behind it.
pub struct ConnectionManager {
    connections: RwLock<HashMap<PlayerId, Connection>>,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create_connection(&self, id: PlayerId) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (conn, receiver) = Connection::new(id);

        {
            let mut connections = self.connections.write().await;
            connections.insert(id, conn);
        }

        receiver
    }

    pub async fn remove_connection(&self, id: PlayerId) -> bool {
        let mut connections = self.connections.write().await;
        connections.remove(&id).is_some()
    }

    pub async fn send_to_connection(
        &self,
        id: PlayerId,
        message: ServerMessage,
    ) -> Result<(), String> {
        let connections = self.connections.read().await;
        if let Some(connection) = connections.get(&id) {
            connection.send_message(message)
        } else {
            Err("Connection not found".to_string())
        }
    }

    /// Send to every open connection. Returns how many accepted the message.
    pub async fn broadcast(&self, message: ServerMessage) -> usize {
        self.send_where(message, |_| true).await
    }

    pub async fn broadcast_except(&self, excluded: PlayerId, message: ServerMessage) -> usize {
        self.send_where(message, |id| id != excluded).await
    }

    async fn send_where(&self, message: ServerMessage, include: impl Fn(PlayerId) -> bool) -> usize {
        let connections = self.connections.read().await;
        let mut delivered = 0;
        for connection in connections.values().filter(|c| include(c.id)) {
            match connection.send_message(message.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Failed to send to {}: {}", connection.id, e),
            }
        }
        delivered
    }

    pub async fn connection_count(&self) -> usize {
        let connections = self.connections.read().await;
        connections.len()
    }
}
