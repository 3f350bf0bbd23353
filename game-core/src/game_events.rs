use game_types::{PlayerId, ServerMessage};
use std::time::Duration;

use crate::{TimerKind, TimerToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Player(PlayerId),
    All,
    AllExcept(PlayerId),
}

impl Recipient {
    pub fn includes(&self, player_id: PlayerId) -> bool {
        match self {
            Recipient::Player(id) => *id == player_id,
            Recipient::All => true,
            Recipient::AllExcept(id) => *id != player_id,
        }
    }
}

/// Side effect requested by the game core, applied by the runtime in order.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Deliver {
        recipient: Recipient,
        message: ServerMessage,
    },
    Schedule {
        token: TimerToken,
        delay: Duration,
    },
}

impl GameEvent {
    pub fn message(&self) -> Option<&ServerMessage> {
        match self {
            GameEvent::Deliver { message, .. } => Some(message),
            GameEvent::Schedule { .. } => None,
        }
    }

    pub fn scheduled_kind(&self) -> Option<TimerKind> {
        match self {
            GameEvent::Schedule { token, .. } => Some(token.kind),
            GameEvent::Deliver { .. } => None,
        }
    }
}

/// Ordered collector for the events of one logical step.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send_to(&mut self, player_id: PlayerId, message: ServerMessage) {
        self.deliver(Recipient::Player(player_id), message);
    }

    pub fn broadcast(&mut self, message: ServerMessage) {
        self.deliver(Recipient::All, message);
    }

    pub fn broadcast_except(&mut self, excluded: PlayerId, message: ServerMessage) {
        self.deliver(Recipient::AllExcept(excluded), message);
    }

    pub fn deliver(&mut self, recipient: Recipient, message: ServerMessage) {
        self.events.push(GameEvent::Deliver { recipient, message });
    }

    pub fn schedule(&mut self, token: TimerToken, delay: Duration) {
        self.events.push(GameEvent::Schedule { token, delay });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<GameEvent> {
        self.events
    }
}
