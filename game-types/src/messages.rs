use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{
    ErrorKind, GuessFeedback, GuessRecord, LeaderboardEntry, MatchResult, PlayerId, RawGuess,
    RoundWinner,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    SetName { name: String },
    SubmitGuess { guess: RawGuess },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    Connected {
        player_id: PlayerId,
        message: String,
    },
    NameConfirmed {
        name: String,
        message: String,
    },
    WaitingForRound {
        current_round: u32,
        total_rounds: u32,
        remaining_ms: u64,
        message: String,
    },
    WaitingForMatch {
        next_match_in_ms: u64,
        message: String,
    },
    MatchStart {
        match_number: u32,
        total_rounds: u32,
        message: String,
    },
    RoundStart {
        match_number: u32,
        round_number: u32,
        total_rounds: u32,
        round_duration_ms: u64,
        message: String,
    },
    Hint {
        guess: u16,
        result: GuessFeedback,
        guess_count: u32,
        guess_history: Vec<GuessRecord>,
        remaining_ms: u64,
        message: String,
    },
    CorrectGuess {
        guess: u16,
        result: GuessFeedback,
        score: u32,
        match_score: u32,
        total_score: u32,
        guess_count: u32,
        guess_history: Vec<GuessRecord>,
    },
    PlayerWonRound {
        player_name: String,
        score: u32,
        guess_count: u32,
    },
    RoundEnd {
        round_number: u32,
        target_number: u16,
        winners: Vec<RoundWinner>,
        has_more_rounds: bool,
        early_end: bool,
        message: String,
    },
    MatchEnd {
        match_number: u32,
        results: Vec<MatchResult>,
        next_match_in_ms: u64,
    },
    MatchCountdown {
        remaining_seconds: u32,
    },
    Leaderboard {
        entries: Vec<LeaderboardEntry>,
    },
    PlayerJoined {
        player_name: String,
        total_players: u32,
    },
    PlayerLeft {
        player_name: String,
        total_players: u32,
    },
    Error {
        kind: ErrorKind,
        message: String,
    },
}
