use anyhow::{Result, anyhow};
use std::time::Duration;

/// Longest delay any rule may configure.
pub const MAX_RULE_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Timing and range constants governing the game loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRules {
    pub round_duration: Duration,
    pub inter_round_delay: Duration,
    pub rounds_per_match: u32,
    pub match_countdown: Duration,
    pub guess_min: u16,
    pub guess_max: u16,
    pub first_match_delay: Duration,  // After the first player names themselves
    pub round_start_delay: Duration,  // Between match start and its first round
    pub early_end_grace: Duration,    // Between "everyone won" and the round end
    pub countdown_tick: Duration,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            round_duration: Duration::from_secs(60),
            inter_round_delay: Duration::from_secs(5),
            rounds_per_match: 5,
            match_countdown: Duration::from_secs(45),
            guess_min: 100,
            guess_max: 999,
            first_match_delay: Duration::from_secs(3),
            round_start_delay: Duration::from_secs(2),
            early_end_grace: Duration::from_secs(1),
            countdown_tick: Duration::from_secs(1),
        }
    }
}

impl GameRules {
    pub fn validate(&self) -> Result<()> {
        if self.rounds_per_match == 0 {
            return Err(anyhow!("A match needs at least one round"));
        }
        if self.round_duration.is_zero() {
            return Err(anyhow!("Round duration must be greater than zero"));
        }
        if self.countdown_tick.is_zero() {
            return Err(anyhow!("Countdown tick must be greater than zero"));
        }
        let durations = [
            ("round_duration", self.round_duration),
            ("inter_round_delay", self.inter_round_delay),
            ("match_countdown", self.match_countdown),
            ("first_match_delay", self.first_match_delay),
            ("round_start_delay", self.round_start_delay),
            ("early_end_grace", self.early_end_grace),
            ("countdown_tick", self.countdown_tick),
        ];
        for (name, duration) in durations {
            if duration > MAX_RULE_DURATION {
                return Err(anyhow!(
                    "{} of {}s exceeds the {}s limit",
                    name,
                    duration.as_secs(),
                    MAX_RULE_DURATION.as_secs()
                ));
            }
        }
        if self.guess_min > self.guess_max {
            return Err(anyhow!(
                "Guess range is empty: {} > {}",
                self.guess_min,
                self.guess_max
            ));
        }
        if self.guess_max > 999 {
            return Err(anyhow!(
                "Guesses are three digits, {} is out of range",
                self.guess_max
            ));
        }
        Ok(())
    }

    pub fn guess_in_range(&self, value: i64) -> bool {
        value >= self.guess_min as i64 && value <= self.guess_max as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_valid() {
        let rules = GameRules::default();
        assert!(rules.validate().is_ok());
        assert!(rules.guess_in_range(100));
        assert!(rules.guess_in_range(999));
        assert!(!rules.guess_in_range(99));
        assert!(!rules.guess_in_range(1000));
    }

    #[test]
    fn test_invalid_rules() {
        let rules = GameRules {
            rounds_per_match: 0,
            ..GameRules::default()
        };
        assert!(rules.validate().unwrap_err().to_string().contains("at least one round"));

        let rules = GameRules {
            guess_min: 500,
            guess_max: 400,
            ..GameRules::default()
        };
        assert!(rules.validate().unwrap_err().to_string().contains("range is empty"));

        let rules = GameRules {
            guess_max: 1200,
            ..GameRules::default()
        };
        assert!(rules.validate().is_err());

        let rules = GameRules {
            round_duration: Duration::ZERO,
            ..GameRules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_oversized_durations_rejected() {
        let rules = GameRules {
            round_duration: Duration::MAX,
            ..GameRules::default()
        };
        assert!(rules.validate().unwrap_err().to_string().contains("round_duration"));

        let rules = GameRules {
            match_countdown: MAX_RULE_DURATION + Duration::from_secs(1),
            ..GameRules::default()
        };
        assert!(rules.validate().unwrap_err().to_string().contains("match_countdown"));

        let rules = GameRules {
            inter_round_delay: MAX_RULE_DURATION,
            ..GameRules::default()
        };
        assert!(rules.validate().is_ok());
    }
}
