use game_types::{
    LeaderboardEntry, MatchPhase, PlayerId, RawGuess, RoundSummary, ServerMessage, SessionStatus,
};
use anyhow::Result;
use std::time::Instant;
use tracing::{debug, info};

use crate::{
    EventQueue, GameError, GameEvent, GameRules, MatchController, RandomTargets, SessionRegistry,
    TargetGenerator, TimerToken,
};

/// The whole game: every player plus the match they share.
///
/// Each entry point is one logical step. It mutates the session and returns
/// the ordered events the runtime must apply before handling anything else.
pub struct GameSession {
    rules: GameRules,
    registry: SessionRegistry,
    matches: MatchController,
    targets: Box<dyn TargetGenerator>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("rules", &self.rules)
            .field("registry", &self.registry)
            .field("matches", &self.matches)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Fails if the rules are inconsistent, before any round can draw a target.
    pub fn new(rules: GameRules, targets: Box<dyn TargetGenerator>) -> Result<Self> {
        rules.validate()?;
        Ok(Self {
            rules,
            registry: SessionRegistry::new(),
            matches: MatchController::new(),
            targets,
        })
    }

    pub fn with_random_targets(rules: GameRules) -> Result<Self> {
        Self::new(rules, Box::new(RandomTargets))
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn matches(&self) -> &MatchController {
        &self.matches
    }

    pub fn player_connected(&mut self, _now: Instant) -> (PlayerId, Vec<GameEvent>) {
        let player_id = self.registry.connect();
        info!(
            "Player {} connected ({} connected)",
            player_id,
            self.registry.connected_count()
        );

        let mut events = EventQueue::new();
        events.send_to(
            player_id,
            ServerMessage::Connected {
                player_id,
                message: "Connected to server. Enter your name to join.".to_string(),
            },
        );
        (player_id, events.into_events())
    }

    pub fn player_named(
        &mut self,
        player_id: PlayerId,
        requested: &str,
        now: Instant,
    ) -> Result<Vec<GameEvent>, GameError> {
        let player = self
            .registry
            .get_mut(player_id)
            .ok_or(GameError::UnknownPlayer)?;
        if player.is_named() {
            return Err(GameError::NameAlreadySet);
        }

        let name = player.resolve_name(requested);
        player.display_name = Some(name.clone());
        info!("Player {} is now known as {}", player_id, name);

        let mut events = EventQueue::new();
        events.send_to(
            player_id,
            ServerMessage::NameConfirmed {
                name: name.clone(),
                message: format!("Welcome, {}!", name),
            },
        );

        if let Some(round) = self.matches.active_round() {
            events.send_to(
                player_id,
                ServerMessage::WaitingForRound {
                    current_round: round.number,
                    total_rounds: self.rules.rounds_per_match,
                    remaining_ms: round.remaining(now).as_millis() as u64,
                    message: "Round in progress. Wait for the next round to start.".to_string(),
                },
            );
        } else if self.matches.phase() != MatchPhase::Active {
            let next_match_in = if self.matches.would_schedule_start() {
                Some(self.rules.first_match_delay)
            } else {
                self.matches.next_match_in(now)
            };
            if let Some(delay) = next_match_in {
                events.send_to(
                    player_id,
                    ServerMessage::WaitingForMatch {
                        next_match_in_ms: delay.as_millis() as u64,
                        message: format!(
                            "Next match starts in {} seconds.",
                            delay.as_millis().div_ceil(1000)
                        ),
                    },
                );
            }
        }

        events.broadcast(ServerMessage::PlayerJoined {
            player_name: name,
            total_players: self.registry.named_count() as u32,
        });
        events.broadcast(ServerMessage::Leaderboard {
            entries: self.registry.leaderboard(),
        });

        self.matches.on_player_named(&self.rules, &mut events, now);
        Ok(events.into_events())
    }

    pub fn player_guessed(
        &mut self,
        player_id: PlayerId,
        guess: &RawGuess,
        now: Instant,
    ) -> Result<Vec<GameEvent>, GameError> {
        let mut events = EventQueue::new();
        self.matches.submit_guess(
            player_id,
            guess,
            &self.rules,
            &mut self.registry,
            &mut events,
            now,
        )?;
        Ok(events.into_events())
    }

    pub fn player_disconnected(&mut self, player_id: PlayerId, _now: Instant) -> Vec<GameEvent> {
        let mut events = EventQueue::new();
        let Some(player) = self.registry.remove(player_id) else {
            debug!("Disconnect for unknown player {}", player_id);
            return events.into_events();
        };

        let player_name = player
            .display_name
            .unwrap_or_else(|| "A player".to_string());
        info!(
            "Player {} ({}) disconnected ({} connected)",
            player_id,
            player_name,
            self.registry.connected_count()
        );

        events.broadcast(ServerMessage::PlayerLeft {
            player_name,
            total_players: self.registry.named_count() as u32,
        });
        self.matches
            .on_player_left(&self.rules, &self.registry, &mut events);
        events.broadcast(ServerMessage::Leaderboard {
            entries: self.registry.leaderboard(),
        });
        events.into_events()
    }

    pub fn timer_fired(&mut self, token: TimerToken, now: Instant) -> Vec<GameEvent> {
        let mut events = EventQueue::new();
        self.matches.handle_timer(
            token,
            &self.rules,
            &mut self.registry,
            self.targets.as_mut(),
            &mut events,
            now,
        );
        events.into_events()
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.registry.leaderboard()
    }

    /// Completed rounds of the current (or just finished) match.
    pub fn round_history(&self) -> &[RoundSummary] {
        self.matches.history()
    }

    pub fn status(&self, now: Instant) -> SessionStatus {
        let round = self.matches.current_round();
        let active = self.matches.active_round();
        SessionStatus {
            phase: self.matches.phase(),
            match_number: self.matches.match_number(),
            round_number: round.map(|r| r.number),
            total_rounds: self.rules.rounds_per_match,
            round_active: active.is_some(),
            round_remaining_ms: active.map(|r| r.remaining(now).as_millis() as u64),
            next_match_in_ms: self
                .matches
                .next_match_in(now)
                .map(|d| d.as_millis() as u64),
            connected_players: self.registry.connected_count() as u32,
            named_players: self.registry.named_count() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Recipient, TimerKind};
    use game_types::ErrorKind;
    use std::time::Duration;

    struct Fixed(u16);

    impl TargetGenerator for Fixed {
        fn next_target(&mut self, _min: u16, _max: u16) -> u16 {
            self.0
        }
    }

    fn session() -> GameSession {
        GameSession::new(GameRules::default(), Box::new(Fixed(123))).unwrap()
    }

    fn messages_for(events: &[GameEvent], player_id: PlayerId) -> Vec<&ServerMessage> {
        events
            .iter()
            .filter_map(|event| match event {
                GameEvent::Deliver { recipient, message } if recipient.includes(player_id) => {
                    Some(message)
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_connect_sends_id_to_new_player() {
        let mut session = session();
        let (player_id, events) = session.player_connected(Instant::now());

        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            GameEvent::Deliver {
                recipient: Recipient::Player(player_id),
                message: ServerMessage::Connected {
                    player_id,
                    message: "Connected to server. Enter your name to join.".to_string(),
                },
            }
        );
        assert_eq!(session.status(Instant::now()).connected_players, 1);
    }

    #[test]
    fn test_inconsistent_rules_rejected() {
        let rules = GameRules {
            guess_min: 900,
            guess_max: 100,
            ..GameRules::default()
        };
        let error = GameSession::with_random_targets(rules).unwrap_err();
        assert!(error.to_string().contains("range is empty"));

        let rules = GameRules {
            round_duration: Duration::MAX,
            ..GameRules::default()
        };
        assert!(GameSession::new(rules, Box::new(Fixed(123))).is_err());
    }

    #[test]
    fn test_naming_event_order() {
        let mut session = session();
        let now = Instant::now();
        let (alice, _) = session.player_connected(now);

        let events = session.player_named(alice, "  Alice  ", now).unwrap();
        let messages = messages_for(&events, alice);

        assert!(matches!(messages[0], ServerMessage::NameConfirmed { name, .. } if name == "Alice"));
        assert!(matches!(
            messages[1],
            ServerMessage::WaitingForMatch {
                next_match_in_ms: 3000,
                ..
            }
        ));
        assert!(matches!(
            messages[2],
            ServerMessage::PlayerJoined {
                total_players: 1,
                ..
            }
        ));
        assert!(matches!(messages[3], ServerMessage::Leaderboard { entries } if entries.len() == 1));
        assert_eq!(events.last().and_then(GameEvent::scheduled_kind), Some(TimerKind::MatchStart));
    }

    #[test]
    fn test_second_naming_rejected() {
        let mut session = session();
        let now = Instant::now();
        let (alice, _) = session.player_connected(now);
        session.player_named(alice, "Alice", now).unwrap();

        let error = session.player_named(alice, "Mallory", now).unwrap_err();
        assert_eq!(error, GameError::NameAlreadySet);
        assert_eq!(error.kind(), ErrorKind::StateConflict);
        assert_eq!(session.leaderboard()[0].name, "Alice");
    }

    #[test]
    fn test_guess_before_any_round() {
        let mut session = session();
        let now = Instant::now();
        let (alice, _) = session.player_connected(now);
        session.player_named(alice, "Alice", now).unwrap();

        let error = session
            .player_guessed(alice, &RawGuess::Number(123), now)
            .unwrap_err();
        assert_eq!(error, GameError::NoActiveRound);
    }

    #[test]
    fn test_unnamed_disconnect_announced_as_a_player() {
        let mut session = session();
        let now = Instant::now();
        let (alice, _) = session.player_connected(now);
        let (ghost, _) = session.player_connected(now);
        session.player_named(alice, "Alice", now).unwrap();

        let events = session.player_disconnected(ghost, now);
        assert!(matches!(
            events[0].message(),
            Some(ServerMessage::PlayerLeft { player_name, total_players: 1 }) if player_name == "A player"
        ));
        assert!(session.player_disconnected(ghost, now).is_empty());
        assert_eq!(session.status(now).connected_players, 1);
    }
}
