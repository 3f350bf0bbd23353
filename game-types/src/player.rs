use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Per-connection identity. Allocated on connect, never reused.
pub type PlayerId = Uuid;

/// Raw guess value as sent by a client.
///
/// Browsers send either a JSON number or the text of an input field, so both
/// shapes are accepted and validated later by the game core. Any other JSON
/// value lands in `Other` and the game core rejects it as an invalid guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum RawGuess {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl RawGuess {
    /// Integer value of the guess, if it has one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RawGuess::Number(value) => Some(*value),
            RawGuess::Text(text) => text.trim().parse::<i64>().ok(),
            RawGuess::Other(_) => None,
        }
    }
}

impl From<i64> for RawGuess {
    fn from(value: i64) -> Self {
        RawGuess::Number(value)
    }
}

impl From<&str> for RawGuess {
    fn from(value: &str) -> Self {
        RawGuess::Text(value.to_string())
    }
}
