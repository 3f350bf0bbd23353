use game_types::{GuessRecord, PlayerId, RawGuess, RoundSummary, RoundWinner, ServerMessage};
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::{
    Digits, EventQueue, GameError, GameRules, ScoringEngine, SessionRegistry, TimerKind,
    TimerSlots, digits_of, evaluate_guess,
};

/// Source of round targets.
pub trait TargetGenerator: Send {
    fn next_target(&mut self, min: u16, max: u16) -> u16;
}

/// Uniform draw over the configured guess range.
#[derive(Debug, Default)]
pub struct RandomTargets;

impl TargetGenerator for RandomTargets {
    fn next_target(&mut self, min: u16, max: u16) -> u16 {
        rand::thread_rng().gen_range(min..=max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Active,
    Ended,
}

#[derive(Debug)]
pub struct Round {
    pub number: u32,
    pub target_number: u16,
    pub target_digits: Digits,
    pub started_at: Instant,
    pub ends_at: Instant,
    pub duration: Duration,
    phase: RoundPhase,
    winners_snapshot: Option<Vec<RoundWinner>>,
}

impl Round {
    /// Start a round: reset round-scoped player state, arm the expiry timer and
    /// announce the round to everyone.
    #[allow(clippy::too_many_arguments)]
    pub fn begin(
        number: u32,
        match_number: u32,
        target_number: u16,
        rules: &GameRules,
        registry: &mut SessionRegistry,
        timers: &mut TimerSlots,
        events: &mut EventQueue,
        now: Instant,
    ) -> Self {
        for player in registry.players_mut() {
            player.reset_round();
        }

        let round = Self {
            number,
            target_number,
            target_digits: digits_of(target_number),
            started_at: now,
            ends_at: now + rules.round_duration,
            duration: rules.round_duration,
            phase: RoundPhase::Active,
            winners_snapshot: None,
        };

        info!(
            "Round {}/{} of match {} started with {} participants",
            number,
            rules.rounds_per_match,
            match_number,
            registry.participants().count()
        );
        debug!("Round {} target: {}", number, target_number);

        events.broadcast(ServerMessage::RoundStart {
            match_number,
            round_number: number,
            total_rounds: rules.rounds_per_match,
            round_duration_ms: rules.round_duration.as_millis() as u64,
            message: format!(
                "Round {}/{} started! You have {} seconds.",
                number,
                rules.rounds_per_match,
                rules.round_duration.as_secs()
            ),
        });

        let token = timers.arm(TimerKind::RoundExpiry);
        events.schedule(token, rules.round_duration);

        round
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == RoundPhase::Active
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.ends_at.saturating_duration_since(now)
    }

    /// True once everyone has won and the early end is already scheduled.
    pub fn is_ending_early(&self) -> bool {
        self.winners_snapshot.is_some()
    }

    /// Evaluate one guess from a round participant.
    #[allow(clippy::too_many_arguments)]
    pub fn submit_guess(
        &mut self,
        player_id: PlayerId,
        raw: &RawGuess,
        rules: &GameRules,
        registry: &mut SessionRegistry,
        timers: &mut TimerSlots,
        events: &mut EventQueue,
        now: Instant,
    ) -> Result<(), GameError> {
        if !self.is_active() {
            return Err(GameError::NoActiveRound);
        }

        let player = registry.get_mut(player_id).ok_or(GameError::UnknownPlayer)?;
        if !player.is_named() {
            return Err(GameError::NameRequired);
        }
        if !player.in_round {
            return Err(GameError::NotParticipating);
        }
        if player.has_won_round {
            return Err(GameError::AlreadyWonRound);
        }

        let guess = raw
            .as_integer()
            .filter(|value| rules.guess_in_range(*value))
            .ok_or(GameError::InvalidGuess {
                min: rules.guess_min,
                max: rules.guess_max,
            })? as u16;

        let elapsed = self.elapsed(now);
        let result = evaluate_guess(&digits_of(guess), &self.target_digits);

        player.guess_count += 1;
        player.round_guesses.push(GuessRecord {
            guess,
            correct: result.correct,
            misplaced: result.misplaced,
            elapsed_ms: elapsed.as_millis() as u64,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });

        if !result.is_win {
            debug!(
                "{} guessed {}: {} correct, {} misplaced",
                player.name(),
                guess,
                result.correct,
                result.misplaced
            );
            events.send_to(
                player_id,
                ServerMessage::Hint {
                    guess,
                    result,
                    guess_count: player.guess_count,
                    guess_history: player.round_guesses.clone(),
                    remaining_ms: self.remaining(now).as_millis() as u64,
                    message: format!(
                        "{} correct, {} misplaced",
                        result.correct, result.misplaced
                    ),
                },
            );
            return Ok(());
        }

        let score = ScoringEngine::round_score(elapsed, self.duration, player.guess_count);
        player.record_win(score);

        info!(
            "{} solved round {} for {} points in {} guesses",
            player.name(),
            self.number,
            score,
            player.guess_count
        );

        events.send_to(
            player_id,
            ServerMessage::CorrectGuess {
                guess,
                result,
                score,
                match_score: player.match_score,
                total_score: player.total_score + player.match_score,
                guess_count: player.guess_count,
                guess_history: player.round_guesses.clone(),
            },
        );
        events.broadcast_except(
            player_id,
            ServerMessage::PlayerWonRound {
                player_name: player.name().to_string(),
                score,
                guess_count: player.guess_count,
            },
        );
        events.broadcast(ServerMessage::Leaderboard {
            entries: registry.leaderboard(),
        });

        self.schedule_early_end(rules, registry, timers, events);
        Ok(())
    }

    /// Schedule the early end once every participant has won. Winners are fixed
    /// at this point; the grace window cannot change them.
    pub fn schedule_early_end(
        &mut self,
        rules: &GameRules,
        registry: &SessionRegistry,
        timers: &mut TimerSlots,
        events: &mut EventQueue,
    ) -> bool {
        if !self.is_active() || self.is_ending_early() || !registry.all_participants_won() {
            return false;
        }

        info!("Every player solved round {}, ending early", self.number);
        self.winners_snapshot = Some(self.collect_winners(registry));
        let token = timers.arm(TimerKind::EarlyRoundEnd);
        events.schedule(token, rules.early_end_grace);
        true
    }

    /// Participants who won this round, best score first.
    pub fn collect_winners(&self, registry: &SessionRegistry) -> Vec<RoundWinner> {
        let mut winners: Vec<RoundWinner> = registry
            .participants()
            .filter(|p| p.has_won_round)
            .map(|p| RoundWinner {
                player_id: p.id,
                name: p.name().to_string(),
                score: p.round_score,
                guesses: p.guess_count,
            })
            .collect();
        winners.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.guesses.cmp(&b.guesses))
                .then_with(|| a.name.cmp(&b.name))
        });
        winners
    }

    /// End the round. Returns `None` if it already ended.
    pub fn finish(
        &mut self,
        early_end: bool,
        rules: &GameRules,
        registry: &SessionRegistry,
        timers: &mut TimerSlots,
        events: &mut EventQueue,
    ) -> Option<RoundSummary> {
        if !self.is_active() {
            return None;
        }

        timers.cancel(TimerKind::RoundExpiry);
        timers.cancel(TimerKind::EarlyRoundEnd);
        self.phase = RoundPhase::Ended;

        let winners = match self.winners_snapshot.take() {
            Some(snapshot) => snapshot,
            None => self.collect_winners(registry),
        };

        if early_end {
            info!("Round {} ended early, target was {}", self.number, self.target_number);
        } else {
            info!("Round {} timed out, target was {}", self.number, self.target_number);
        }

        let message = if winners.is_empty() {
            format!(
                "Time's up! Nobody cracked it. The number was {}.",
                self.target_number
            )
        } else {
            let names = winners
                .iter()
                .map(|w| format!("{} (+{})", w.name, w.score))
                .collect::<Vec<_>>()
                .join(", ");
            if early_end {
                format!(
                    "Everyone solved it, round over early! Winners: {}. The number was {}.",
                    names, self.target_number
                )
            } else {
                format!(
                    "Round over! Winners: {}. The number was {}.",
                    names, self.target_number
                )
            }
        };

        events.broadcast(ServerMessage::RoundEnd {
            round_number: self.number,
            target_number: self.target_number,
            winners: winners.clone(),
            has_more_rounds: self.number < rules.rounds_per_match,
            early_end,
            message,
        });
        events.broadcast(ServerMessage::Leaderboard {
            entries: registry.leaderboard(),
        });

        Some(RoundSummary {
            round_number: self.number,
            target_number: self.target_number,
            winners,
            early_end,
        })
    }
}
