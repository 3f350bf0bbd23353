use game_types::{GuessRecord, LeaderboardEntry, MatchResult, PlayerId};

/// Longest display name kept after trimming.
pub const MAX_NAME_LENGTH: usize = 20;

/// Server-side state of one connected session.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: Option<String>,
    pub total_score: u32,
    pub match_score: u32,
    pub rounds_won: u32,
    pub round_score: u32,
    pub guess_count: u32,
    pub has_won_round: bool,
    pub in_round: bool, // Named when the current round started
    pub round_guesses: Vec<GuessRecord>,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            display_name: None,
            total_score: 0,
            match_score: 0,
            rounds_won: 0,
            round_score: 0,
            guess_count: 0,
            has_won_round: false,
            in_round: false,
            round_guesses: Vec::new(),
        }
    }

    pub fn is_named(&self) -> bool {
        self.display_name.is_some()
    }

    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }

    /// Name used when the player asks for an empty one.
    pub fn default_name(&self) -> String {
        let simple = self.id.simple().to_string();
        format!("Player{}", &simple[..4])
    }

    /// Trim and truncate a requested name, falling back to the id-derived default.
    pub fn resolve_name(&self, requested: &str) -> String {
        let trimmed: String = requested.trim().chars().take(MAX_NAME_LENGTH).collect();
        let trimmed = trimmed.trim_end().to_string();
        if trimmed.is_empty() {
            self.default_name()
        } else {
            trimmed
        }
    }

    /// Reset round-scoped fields. Only named players take part in the new round.
    pub fn reset_round(&mut self) {
        self.round_score = 0;
        self.guess_count = 0;
        self.has_won_round = false;
        self.in_round = self.is_named();
        self.round_guesses.clear();
    }

    pub fn reset_match(&mut self) {
        self.match_score = 0;
        self.rounds_won = 0;
    }

    /// Fold the finished match into the lifetime total.
    pub fn bank_match_score(&mut self) {
        self.total_score += self.match_score;
    }

    pub fn record_win(&mut self, score: u32) {
        self.round_score = score;
        self.match_score += score;
        self.rounds_won += 1;
        self.has_won_round = true;
    }

    pub fn to_leaderboard_entry(&self) -> LeaderboardEntry {
        LeaderboardEntry {
            player_id: self.id,
            name: self.name().to_string(),
            total_score: self.total_score,
            match_score: self.match_score,
            rounds_won: self.rounds_won,
        }
    }

    pub fn to_match_result(&self) -> MatchResult {
        MatchResult {
            player_id: self.id,
            name: self.name().to_string(),
            match_score: self.match_score,
            rounds_won: self.rounds_won,
            total_score: self.total_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_resolve_name() {
        let player = Player::new(Uuid::new_v4());
        assert_eq!(player.resolve_name("  Alice "), "Alice");
        assert_eq!(player.resolve_name(""), player.default_name());
        assert_eq!(player.resolve_name("   "), player.default_name());
        assert!(player.default_name().starts_with("Player"));
        assert_eq!(player.default_name().len(), "Player".len() + 4);

        let long = "A".repeat(40);
        assert_eq!(player.resolve_name(&long).chars().count(), MAX_NAME_LENGTH);
    }

    #[test]
    fn test_round_reset_only_enrolls_named_players() {
        let mut unnamed = Player::new(Uuid::new_v4());
        unnamed.reset_round();
        assert!(!unnamed.in_round);

        let mut named = Player::new(Uuid::new_v4());
        named.display_name = Some("Bob".to_string());
        named.guess_count = 4;
        named.has_won_round = true;
        named.reset_round();
        assert!(named.in_round);
        assert_eq!(named.guess_count, 0);
        assert!(!named.has_won_round);
    }

    #[test]
    fn test_match_score_banking() {
        let mut player = Player::new(Uuid::new_v4());
        player.record_win(120);
        player.record_win(80);
        assert_eq!(player.match_score, 200);
        assert_eq!(player.rounds_won, 2);

        player.bank_match_score();
        assert_eq!(player.total_score, 200);

        player.reset_match();
        assert_eq!(player.match_score, 0);
        assert_eq!(player.total_score, 200);
    }
}
