use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Category of an error reported to a single player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ErrorKind {
    Validation,    // Malformed or out-of-range input
    StateConflict, // Valid input that the current game state does not allow
    Protocol,      // Unparseable or unknown inbound message
}
