use game_types::{MatchPhase, PlayerId, RawGuess, RoundSummary, ServerMessage};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::{
    EventQueue, GameError, GameRules, Round, SessionRegistry, TargetGenerator, TimerKind,
    TimerSlots, TimerToken,
};

/// Drives rounds within a match and the countdown between matches.
#[derive(Debug)]
pub struct MatchController {
    phase: MatchPhase,
    match_number: u32,
    round: Option<Round>,
    history: Vec<RoundSummary>,
    timers: TimerSlots,
    next_match_at: Option<Instant>,
    countdown_remaining: Duration,
}

impl Default for MatchController {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchController {
    pub fn new() -> Self {
        Self {
            phase: MatchPhase::AwaitingPlayers,
            match_number: 0,
            round: None,
            history: Vec::new(),
            timers: TimerSlots::new(),
            next_match_at: None,
            countdown_remaining: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn match_number(&self) -> u32 {
        self.match_number
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn active_round(&self) -> Option<&Round> {
        self.round.as_ref().filter(|round| round.is_active())
    }

    pub fn history(&self) -> &[RoundSummary] {
        &self.history
    }

    pub fn timers(&self) -> &TimerSlots {
        &self.timers
    }

    /// Time until the next scheduled match start, if one is scheduled.
    pub fn next_match_in(&self, now: Instant) -> Option<Duration> {
        self.next_match_at
            .map(|at| at.saturating_duration_since(now))
    }

    /// A named player arrived. Schedules a delayed match start when nothing is
    /// running or pending.
    pub fn on_player_named(&mut self, rules: &GameRules, events: &mut EventQueue, now: Instant) {
        if self.phase != MatchPhase::AwaitingPlayers || self.timers.is_armed(TimerKind::MatchStart)
        {
            return;
        }

        info!(
            "Scheduling match {} in {:?}",
            self.match_number + 1,
            rules.first_match_delay
        );
        self.phase = MatchPhase::Starting;
        self.next_match_at = Some(now + rules.first_match_delay);
        let token = self.timers.arm(TimerKind::MatchStart);
        events.schedule(token, rules.first_match_delay);
    }

    /// Whether naming now would schedule a fresh match start.
    pub fn would_schedule_start(&self) -> bool {
        self.phase == MatchPhase::AwaitingPlayers && !self.timers.is_armed(TimerKind::MatchStart)
    }

    pub fn start_match(
        &mut self,
        rules: &GameRules,
        registry: &mut SessionRegistry,
        events: &mut EventQueue,
    ) {
        if self.phase == MatchPhase::Active {
            return;
        }

        self.match_number += 1;
        self.phase = MatchPhase::Active;
        self.round = None;
        self.history.clear();
        self.next_match_at = None;
        self.timers.cancel(TimerKind::MatchStart);
        self.timers.cancel(TimerKind::CountdownTick);

        for player in registry.players_mut() {
            player.reset_match();
        }

        info!(
            "Match {} started with {} named players",
            self.match_number,
            registry.named_count()
        );

        events.broadcast(ServerMessage::MatchStart {
            match_number: self.match_number,
            total_rounds: rules.rounds_per_match,
            message: format!("New match started! (Match #{})", self.match_number),
        });

        let token = self.timers.arm(TimerKind::RoundStart);
        events.schedule(token, rules.round_start_delay);
    }

    pub fn start_round(
        &mut self,
        rules: &GameRules,
        registry: &mut SessionRegistry,
        targets: &mut dyn TargetGenerator,
        events: &mut EventQueue,
        now: Instant,
    ) {
        if self.phase != MatchPhase::Active || self.active_round().is_some() {
            return;
        }

        let number = self.history.len() as u32 + 1;
        if number > rules.rounds_per_match {
            self.end_match(rules, registry, events, now);
            return;
        }

        let target = targets.next_target(rules.guess_min, rules.guess_max);
        self.round = Some(Round::begin(
            number,
            self.match_number,
            target,
            rules,
            registry,
            &mut self.timers,
            events,
            now,
        ));
    }

    pub fn submit_guess(
        &mut self,
        player_id: PlayerId,
        raw: &RawGuess,
        rules: &GameRules,
        registry: &mut SessionRegistry,
        events: &mut EventQueue,
        now: Instant,
    ) -> Result<(), GameError> {
        match self.round.as_mut() {
            Some(round) if round.is_active() => round.submit_guess(
                player_id,
                raw,
                rules,
                registry,
                &mut self.timers,
                events,
                now,
            ),
            _ => Err(GameError::NoActiveRound),
        }
    }

    /// A player left; the remaining participants may all have won already.
    pub fn on_player_left(
        &mut self,
        rules: &GameRules,
        registry: &SessionRegistry,
        events: &mut EventQueue,
    ) {
        if let Some(round) = self.round.as_mut() {
            round.schedule_early_end(rules, registry, &mut self.timers, events);
        }
    }

    pub fn end_round(
        &mut self,
        early_end: bool,
        rules: &GameRules,
        registry: &SessionRegistry,
        events: &mut EventQueue,
    ) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let Some(summary) = round.finish(early_end, rules, registry, &mut self.timers, events)
        else {
            return;
        };

        let finished = summary.round_number;
        self.history.push(summary);

        let next = if finished < rules.rounds_per_match {
            TimerKind::RoundStart
        } else {
            TimerKind::MatchEnd
        };
        let token = self.timers.arm(next);
        events.schedule(token, rules.inter_round_delay);
    }

    pub fn end_match(
        &mut self,
        rules: &GameRules,
        registry: &mut SessionRegistry,
        events: &mut EventQueue,
        now: Instant,
    ) {
        if self.phase != MatchPhase::Active {
            return;
        }

        let results = registry.match_results();
        for player in registry.players_mut() {
            player.bank_match_score();
        }

        self.phase = MatchPhase::Countdown;
        self.round = None;
        self.timers.cancel(TimerKind::RoundStart);
        self.timers.cancel(TimerKind::RoundExpiry);
        self.timers.cancel(TimerKind::EarlyRoundEnd);

        info!(
            "Match {} finished after {} rounds, leader: {}",
            self.match_number,
            self.history.len(),
            results.first().map(|r| r.name.as_str()).unwrap_or("nobody")
        );

        events.broadcast(ServerMessage::MatchEnd {
            match_number: self.match_number,
            results,
            next_match_in_ms: rules.match_countdown.as_millis() as u64,
        });
        events.broadcast(ServerMessage::Leaderboard {
            entries: registry.leaderboard(),
        });

        self.next_match_at = Some(now + rules.match_countdown);
        let token = self.timers.arm(TimerKind::MatchStart);
        events.schedule(token, rules.match_countdown);

        self.countdown_remaining = rules.match_countdown;
        let token = self.timers.arm(TimerKind::CountdownTick);
        events.schedule(token, rules.countdown_tick);
    }

    /// Run a scheduled step. Stale or cancelled tokens are ignored.
    pub fn handle_timer(
        &mut self,
        token: TimerToken,
        rules: &GameRules,
        registry: &mut SessionRegistry,
        targets: &mut dyn TargetGenerator,
        events: &mut EventQueue,
        now: Instant,
    ) {
        if !self.timers.claim(token) {
            debug!("Ignoring stale timer {:?}", token);
            return;
        }

        match token.kind {
            TimerKind::MatchStart => {
                if registry.is_empty() {
                    info!("No players connected, waiting for someone to join");
                    self.phase = MatchPhase::AwaitingPlayers;
                    self.next_match_at = None;
                    self.timers.cancel(TimerKind::CountdownTick);
                } else {
                    self.start_match(rules, registry, events);
                }
            }
            TimerKind::RoundStart => self.start_round(rules, registry, targets, events, now),
            TimerKind::RoundExpiry => self.end_round(false, rules, registry, events),
            TimerKind::EarlyRoundEnd => self.end_round(true, rules, registry, events),
            TimerKind::MatchEnd => self.end_match(rules, registry, events, now),
            TimerKind::CountdownTick => self.countdown_tick(rules, events),
        }
    }

    fn countdown_tick(&mut self, rules: &GameRules, events: &mut EventQueue) {
        if self.phase != MatchPhase::Countdown {
            return;
        }

        self.countdown_remaining = self.countdown_remaining.saturating_sub(rules.countdown_tick);
        if self.countdown_remaining.is_zero() {
            return;
        }

        let remaining_ms = self.countdown_remaining.as_millis() as u64;
        events.broadcast(ServerMessage::MatchCountdown {
            remaining_seconds: remaining_ms.div_ceil(1000) as u32,
        });

        let token = self.timers.arm(TimerKind::CountdownTick);
        events.schedule(token, rules.countdown_tick);
    }
}
