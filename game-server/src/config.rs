use game_core::GameRules;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
    #[error("invalid game rules: {0}")]
    Rules(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub round_duration_ms: u64,
    pub inter_round_delay_ms: u64,
    pub rounds_per_match: u32,
    pub match_countdown_ms: u64,
    pub guess_min: u16,
    pub guess_max: u16,
    pub first_match_delay_ms: u64,
    pub round_start_delay_ms: u64,
    pub early_end_grace_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup, falling back to defaults for missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &'static str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| default.to_string())
        };

        let config = Self {
            host: read("HOST", "127.0.0.1"),
            port: parse("PORT", read("PORT", "8080"))?,
            round_duration_ms: parse("ROUND_DURATION_MS", read("ROUND_DURATION_MS", "60000"))?,
            inter_round_delay_ms: parse(
                "INTER_ROUND_DELAY_MS",
                read("INTER_ROUND_DELAY_MS", "5000"),
            )?,
            rounds_per_match: parse("ROUNDS_PER_MATCH", read("ROUNDS_PER_MATCH", "5"))?,
            match_countdown_ms: parse("MATCH_COUNTDOWN_MS", read("MATCH_COUNTDOWN_MS", "45000"))?,
            guess_min: parse("GUESS_MIN", read("GUESS_MIN", "100"))?,
            guess_max: parse("GUESS_MAX", read("GUESS_MAX", "999"))?,
            first_match_delay_ms: parse(
                "FIRST_MATCH_DELAY_MS",
                read("FIRST_MATCH_DELAY_MS", "3000"),
            )?,
            round_start_delay_ms: parse(
                "ROUND_START_DELAY_MS",
                read("ROUND_START_DELAY_MS", "2000"),
            )?,
            early_end_grace_ms: parse("EARLY_END_GRACE_MS", read("EARLY_END_GRACE_MS", "1000"))?,
        };

        config
            .rules()
            .validate()
            .map_err(|e| ConfigError::Rules(format!("{:#}", e)))?;
        Ok(config)
    }

    pub fn rules(&self) -> GameRules {
        GameRules {
            round_duration: Duration::from_millis(self.round_duration_ms),
            inter_round_delay: Duration::from_millis(self.inter_round_delay_ms),
            rounds_per_match: self.rounds_per_match,
            match_countdown: Duration::from_millis(self.match_countdown_ms),
            guess_min: self.guess_min,
            guess_max: self.guess_max,
            first_match_delay: Duration::from_millis(self.first_match_delay_ms),
            round_start_delay: Duration::from_millis(self.round_start_delay_ms),
            early_end_grace: Duration::from_millis(self.early_end_grace_ms),
            ..GameRules::default()
        }
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

impl Default for Config {
    fn default() -> Self {
        let rules = GameRules::default();
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            round_duration_ms: rules.round_duration.as_millis() as u64,
            inter_round_delay_ms: rules.inter_round_delay.as_millis() as u64,
            rounds_per_match: rules.rounds_per_match,
            match_countdown_ms: rules.match_countdown.as_millis() as u64,
            guess_min: rules.guess_min,
            guess_max: rules.guess_max,
            first_match_delay_ms: rules.first_match_delay.as_millis() as u64,
            round_start_delay_ms: rules.round_start_delay.as_millis() as u64,
            early_end_grace_ms: rules.early_end_grace.as_millis() as u64,
        }
    }
}
