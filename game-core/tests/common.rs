#![allow(dead_code)]

use game_core::{GameError, GameEvent, GameRules, GameSession, TargetGenerator, TimerToken};
use game_types::{PlayerId, RawGuess, ServerMessage};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Hands out targets in order, repeating the last one when exhausted
pub struct FixedTargets {
    queue: VecDeque<u16>,
    last: u16,
}

impl FixedTargets {
    pub fn new(targets: &[u16]) -> Self {
        Self {
            queue: targets.iter().copied().collect(),
            last: targets.last().copied().unwrap_or(123),
        }
    }
}

impl TargetGenerator for FixedTargets {
    fn next_target(&mut self, _min: u16, _max: u16) -> u16 {
        self.queue.pop_front().unwrap_or(self.last)
    }
}

/// Drives a session on a simulated clock, firing scheduled timers in due order
pub struct Harness {
    pub session: GameSession,
    pub now: Instant,
    pending: Vec<(Instant, TimerToken)>,
    delivered: Vec<GameEvent>,
}

impl Harness {
    pub fn new(rules: GameRules, targets: &[u16]) -> Self {
        Self {
            session: GameSession::new(rules, Box::new(FixedTargets::new(targets)))
                .expect("test rules should be valid"),
            now: Instant::now(),
            pending: Vec::new(),
            delivered: Vec::new(),
        }
    }

    pub fn with_defaults(targets: &[u16]) -> Self {
        Self::new(GameRules::default(), targets)
    }

    fn record(&mut self, events: Vec<GameEvent>) {
        for event in events {
            if let GameEvent::Schedule { token, delay } = &event {
                self.pending.push((self.now + *delay, *token));
            }
            self.delivered.push(event);
        }
    }

    pub fn connect(&mut self) -> PlayerId {
        let (player_id, events) = self.session.player_connected(self.now);
        self.record(events);
        player_id
    }

    pub fn join(&mut self, name: &str) -> PlayerId {
        let player_id = self.connect();
        let events = self
            .session
            .player_named(player_id, name, self.now)
            .expect("naming a fresh player should succeed");
        self.record(events);
        player_id
    }

    pub fn guess(&mut self, player_id: PlayerId, value: i64) -> Result<(), GameError> {
        let events = self
            .session
            .player_guessed(player_id, &RawGuess::Number(value), self.now)?;
        self.record(events);
        Ok(())
    }

    pub fn disconnect(&mut self, player_id: PlayerId) {
        let events = self.session.player_disconnected(player_id, self.now);
        self.record(events);
    }

    /// Move the clock forward, firing every timer that comes due on the way
    pub fn advance(&mut self, by: Duration) {
        let until = self.now + by;
        loop {
            let next = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, (due, _))| *due <= until)
                .min_by_key(|(_, (due, _))| *due)
                .map(|(index, _)| index);
            let Some(index) = next else {
                break;
            };
            let (due, token) = self.pending.remove(index);
            self.now = due;
            let events = self.session.timer_fired(token, self.now);
            self.record(events);
        }
        self.now = until;
    }

    /// Advance to the moment the first round of the first match starts
    pub fn run_until_first_round(&mut self) {
        let rules = self.session.rules().clone();
        self.advance(rules.first_match_delay + rules.round_start_delay);
    }

    /// Drain everything delivered so far
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.delivered)
    }

    pub fn all_messages(&self) -> Vec<&ServerMessage> {
        self.delivered.iter().filter_map(GameEvent::message).collect()
    }

    pub fn messages_for(&self, player_id: PlayerId) -> Vec<&ServerMessage> {
        self.delivered
            .iter()
            .filter_map(|event| match event {
                GameEvent::Deliver { recipient, message } if recipient.includes(player_id) => {
                    Some(message)
                }
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, check_fn: impl Fn(&ServerMessage) -> bool) -> usize {
        self.all_messages().into_iter().filter(|m| check_fn(m)).count()
    }
}

/// Named player's lifetime total
pub fn total_score(harness: &Harness, player_id: PlayerId) -> u32 {
    harness
        .session
        .registry()
        .get(player_id)
        .map(|p| p.total_score)
        .unwrap_or_default()
}
