use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::PlayerId;

/// Feedback for a single guess against the round's target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessFeedback {
    pub correct: u8,   // Green - right digit, right position
    pub misplaced: u8, // Yellow - digit present elsewhere in the target
    pub is_win: bool,
}

/// One entry of a player's per-round guess history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessRecord {
    pub guess: u16,
    pub correct: u8,
    pub misplaced: u8,
    pub elapsed_ms: u64,
    pub timestamp: String, // ISO 8601 string
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundWinner {
    pub player_id: PlayerId,
    pub name: String,
    pub score: u32,
    pub guesses: u32,
}

/// Completed-round summary appended to the match history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundSummary {
    pub round_number: u32,
    pub target_number: u16,
    pub winners: Vec<RoundWinner>,
    pub early_end: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MatchResult {
    pub player_id: PlayerId,
    pub name: String,
    pub match_score: u32,
    pub rounds_won: u32,
    pub total_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub total_score: u32,
    pub match_score: u32,
    pub rounds_won: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum MatchPhase {
    AwaitingPlayers, // Nothing running, nothing scheduled
    Starting,        // First match scheduled
    Active,          // Match in progress (round running or between rounds)
    Countdown,       // Between matches
}

/// Read-only snapshot served over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionStatus {
    pub phase: MatchPhase,
    pub match_number: u32,
    pub round_number: Option<u32>,
    pub total_rounds: u32,
    pub round_active: bool,
    pub round_remaining_ms: Option<u64>,
    pub next_match_in_ms: Option<u64>,
    pub connected_players: u32,
    pub named_players: u32,
}
