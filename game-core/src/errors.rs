use game_types::ErrorKind;
use thiserror::Error;

/// Rejection of an inbound player action. No state is changed when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Please enter a valid number between {min} and {max}.")]
    InvalidGuess { min: u16, max: u16 },
    #[error("There is no active round right now. Please wait.")]
    NoActiveRound,
    #[error("You must set your name first.")]
    NameRequired,
    #[error("You already won this round! Wait for the next round.")]
    AlreadyWonRound,
    #[error("This round started before you joined. You can play from the next round.")]
    NotParticipating,
    #[error("Your name is already set.")]
    NameAlreadySet,
    #[error("Unknown player")]
    UnknownPlayer,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::InvalidGuess { .. } => ErrorKind::Validation,
            GameError::NoActiveRound
            | GameError::NameRequired
            | GameError::AlreadyWonRound
            | GameError::NotParticipating
            | GameError::NameAlreadySet
            | GameError::UnknownPlayer => ErrorKind::StateConflict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            GameError::InvalidGuess { min: 100, max: 999 }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(GameError::AlreadyWonRound.kind(), ErrorKind::StateConflict);
        assert_eq!(GameError::NoActiveRound.kind(), ErrorKind::StateConflict);
    }

    #[test]
    fn test_error_messages_are_human_readable() {
        let message = GameError::InvalidGuess { min: 100, max: 999 }.to_string();
        assert_eq!(message, "Please enter a valid number between 100 and 999.");
    }
}
