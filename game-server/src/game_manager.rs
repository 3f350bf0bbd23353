use std::sync::{Arc, Weak};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

use crate::config::ConfigError;
use crate::websocket::connection::ConnectionManager;
use game_core::{GameError, GameEvent, GameRules, GameSession, Recipient, TimerToken};
use game_types::{
    ErrorKind, LeaderboardEntry, PlayerId, RawGuess, RoundSummary, ServerMessage, SessionStatus,
};

fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

/// Owns the single game session and applies the events it produces.
///
/// Every entry point locks the session, runs one step and delivers the
/// resulting events before releasing the lock, so players always observe
/// events in the order the step produced them.
pub struct GameManager {
    session: Mutex<GameSession>,
    connection_manager: Arc<ConnectionManager>,
    timer_sender: mpsc::UnboundedSender<TimerToken>,
}

impl GameManager {
    pub fn new(
        connection_manager: Arc<ConnectionManager>,
        rules: GameRules,
    ) -> Result<Arc<Self>, ConfigError> {
        let session = GameSession::with_random_targets(rules)
            .map_err(|e| ConfigError::Rules(format!("{:#}", e)))?;
        Ok(Self::with_session(connection_manager, session))
    }

    /// Wrap an existing session and start the task that runs its timers.
    pub fn with_session(
        connection_manager: Arc<ConnectionManager>,
        session: GameSession,
    ) -> Arc<Self> {
        let (timer_sender, timer_receiver) = mpsc::unbounded_channel();
        let manager = Arc::new(Self {
            session: Mutex::new(session),
            connection_manager,
            timer_sender,
        });

        tokio::spawn(run_timers(Arc::downgrade(&manager), timer_receiver));
        manager
    }

    pub fn connection_manager(&self) -> &Arc<ConnectionManager> {
        &self.connection_manager
    }

    /// Register a new connection. The outbound channel exists before the
    /// welcome message is dispatched.
    pub async fn player_connected(&self) -> (PlayerId, mpsc::UnboundedReceiver<ServerMessage>) {
        let mut session = self.session.lock().await;
        let (player_id, events) = session.player_connected(now());
        let receiver = self.connection_manager.create_connection(player_id).await;
        self.dispatch(events).await;
        (player_id, receiver)
    }

    pub async fn player_named(&self, player_id: PlayerId, name: &str) -> Result<(), GameError> {
        let mut session = self.session.lock().await;
        let events = session.player_named(player_id, name, now())?;
        self.dispatch(events).await;
        Ok(())
    }

    pub async fn player_guessed(
        &self,
        player_id: PlayerId,
        guess: &RawGuess,
    ) -> Result<(), GameError> {
        let mut session = self.session.lock().await;
        let events = session.player_guessed(player_id, guess, now())?;
        self.dispatch(events).await;
        Ok(())
    }

    pub async fn player_disconnected(&self, player_id: PlayerId) {
        let mut session = self.session.lock().await;
        self.connection_manager.remove_connection(player_id).await;
        let events = session.player_disconnected(player_id, now());
        self.dispatch(events).await;
    }

    pub async fn timer_fired(&self, token: TimerToken) {
        let mut session = self.session.lock().await;
        let events = session.timer_fired(token, now());
        self.dispatch(events).await;
    }

    pub async fn send_error(
        &self,
        player_id: PlayerId,
        kind: ErrorKind,
        message: String,
    ) -> Result<(), String> {
        self.connection_manager
            .send_to_connection(player_id, ServerMessage::Error { kind, message })
            .await
    }

    pub async fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.session.lock().await.leaderboard()
    }

    pub async fn status(&self) -> SessionStatus {
        self.session.lock().await.status(now())
    }

    pub async fn round_history(&self) -> Vec<RoundSummary> {
        self.session.lock().await.round_history().to_vec()
    }

    /// Apply events in order. Called with the session lock held.
    async fn dispatch(&self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::Deliver { recipient, message } => match recipient {
                    Recipient::Player(player_id) => {
                        if let Err(e) = self
                            .connection_manager
                            .send_to_connection(player_id, message)
                            .await
                        {
                            warn!("Failed to send to {}: {}", player_id, e);
                        }
                    }
                    Recipient::All => {
                        self.connection_manager.broadcast(message).await;
                    }
                    Recipient::AllExcept(excluded) => {
                        self.connection_manager
                            .broadcast_except(excluded, message)
                            .await;
                    }
                },
                GameEvent::Schedule { token, delay } => {
                    debug!("Scheduling {:?} in {:?}", token, delay);
                    let sender = self.timer_sender.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = sender.send(token);
                    });
                }
            }
        }
    }
}

/// Feed due timer tokens back into the session until the manager is dropped.
async fn run_timers(
    manager: Weak<GameManager>,
    mut receiver: mpsc::UnboundedReceiver<TimerToken>,
) {
    while let Some(token) = receiver.recv().await {
        let Some(manager) = manager.upgrade() else {
            break;
        };
        manager.timer_fired(token).await;
    }
    info!("Timer task stopped");
}
