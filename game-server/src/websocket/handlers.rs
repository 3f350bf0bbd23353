use std::sync::Arc;
use tracing::{debug, info};

use crate::game_manager::GameManager;
use game_types::{ClientMessage, ErrorKind, PlayerId, RawGuess};

#[derive(Clone)]
pub struct MessageHandler {
    player_id: PlayerId,
    game_manager: Arc<GameManager>,
}

impl MessageHandler {
    pub fn new(player_id: PlayerId, game_manager: Arc<GameManager>) -> Self {
        Self {
            player_id,
            game_manager,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    /// Route one client message into the game. Rejected actions are reported
    /// back to this player only; an `Err` means the connection is gone.
    pub async fn handle_message(&self, message: ClientMessage) -> Result<(), String> {
        let result = match message {
            ClientMessage::SetName { name } => self.handle_set_name(&name).await,
            ClientMessage::SubmitGuess { guess } => self.handle_submit_guess(&guess).await,
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                debug!("Rejected action from {}: {}", self.player_id, e);
                self.send_error(e.kind(), e.to_string()).await
            }
        }
    }

    pub async fn send_error(&self, kind: ErrorKind, message: String) -> Result<(), String> {
        self.game_manager
            .send_error(self.player_id, kind, message)
            .await
    }

    pub async fn handle_disconnect(&self) {
        info!("Handling disconnect for player {}", self.player_id);
        self.game_manager.player_disconnected(self.player_id).await;
    }

    async fn handle_set_name(&self, name: &str) -> Result<(), game_core::GameError> {
        self.game_manager.player_named(self.player_id, name).await
    }

    async fn handle_submit_guess(&self, guess: &RawGuess) -> Result<(), game_core::GameError> {
        self.game_manager.player_guessed(self.player_id, guess).await
    }
}
