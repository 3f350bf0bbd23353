#![allow(dead_code)]

use game_core::{GameRules, GameSession, TargetGenerator};
use game_server::game_manager::GameManager;
use game_server::websocket::connection::ConnectionManager;
use game_types::{PlayerId, ServerMessage};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Targets handed out in order; the last one repeats
pub struct ScriptedTargets(VecDeque<u16>);

impl TargetGenerator for ScriptedTargets {
    fn next_target(&mut self, _min: u16, _max: u16) -> u16 {
        match self.0.len() {
            0 => 123,
            1 => self.0[0],
            _ => self.0.pop_front().unwrap_or(123),
        }
    }
}

/// A connected test client: its id plus everything the server sent it
pub struct TestPlayer {
    pub id: PlayerId,
    pub receiver: UnboundedReceiver<ServerMessage>,
}

impl TestPlayer {
    /// Drain every message delivered so far
    pub fn drain(&mut self) -> Vec<ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = self.receiver.try_recv() {
            messages.push(message);
        }
        messages
    }
}

/// Test setup that provides all necessary components
pub struct TestGameServerSetup {
    pub connection_manager: Arc<ConnectionManager>,
    pub game_manager: Arc<GameManager>,
}

impl TestGameServerSetup {
    pub fn new(rules: GameRules, targets: &[u16]) -> Self {
        let connection_manager = Arc::new(ConnectionManager::new());
        let session = GameSession::new(
            rules,
            Box::new(ScriptedTargets(targets.iter().copied().collect())),
        )
        .expect("Test rules should be valid");

        Self {
            connection_manager: connection_manager.clone(),
            game_manager: GameManager::with_session(connection_manager, session),
        }
    }

    pub fn with_defaults(targets: &[u16]) -> Self {
        Self::new(GameRules::default(), targets)
    }

    pub async fn connect(&self) -> TestPlayer {
        let (id, receiver) = self.game_manager.player_connected().await;
        TestPlayer { id, receiver }
    }

    /// Connect and name a player
    pub async fn join(&self, name: &str) -> TestPlayer {
        let player = self.connect().await;
        self.game_manager
            .player_named(player.id, name)
            .await
            .expect("Naming a fresh player should succeed");
        player
    }

    pub async fn join_many(&self, names: &[&str]) -> Vec<TestPlayer> {
        let mut players = Vec::new();
        for name in names {
            players.push(self.join(name).await);
        }
        players
    }
}

/// Let spawned timers run while the paused clock moves forward
pub async fn advance(duration: std::time::Duration) {
    tokio::time::sleep(duration).await;
}

pub fn count(messages: &[ServerMessage], check_fn: impl Fn(&ServerMessage) -> bool) -> usize {
    messages.iter().filter(|m| check_fn(m)).count()
}

pub fn find<'a>(
    messages: &'a [ServerMessage],
    check_fn: impl Fn(&ServerMessage) -> bool,
) -> Option<&'a ServerMessage> {
    messages.iter().find(|m| check_fn(m))
}
