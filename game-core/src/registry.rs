use game_types::{LeaderboardEntry, MatchResult, PlayerId};
use std::collections::HashMap;
use uuid::Uuid;

use crate::Player;

/// Every connected session, named or not.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    players: HashMap<PlayerId, Player>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh player record and return its id.
    pub fn connect(&mut self) -> PlayerId {
        let mut id = Uuid::new_v4();
        while self.players.contains_key(&id) {
            id = Uuid::new_v4();
        }
        self.players.insert(id, Player::new(id));
        id
    }

    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        self.players.remove(&id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }

    pub fn connected_count(&self) -> usize {
        self.players.len()
    }

    pub fn named_count(&self) -> usize {
        self.named().count()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn named(&self) -> impl Iterator<Item = &Player> {
        self.players.values().filter(|p| p.is_named())
    }

    /// Named players taking part in the current round.
    pub fn participants(&self) -> impl Iterator<Item = &Player> {
        self.named().filter(|p| p.in_round)
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.values_mut()
    }

    /// True when at least one player is in the round and every one of them won it.
    pub fn all_participants_won(&self) -> bool {
        let mut participants = self.participants().peekable();
        participants.peek().is_some() && participants.all(|p| p.has_won_round)
    }

    /// Named players ordered by total score, then match score.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> =
            self.named().map(Player::to_leaderboard_entry).collect();
        entries.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then(b.match_score.cmp(&a.match_score))
                .then_with(|| a.name.cmp(&b.name))
        });
        entries
    }

    /// Named players ordered by match score. Totals are as of before banking.
    pub fn match_results(&self) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = self.named().map(Player::to_match_result).collect();
        results.sort_by(|a, b| {
            b.match_score
                .cmp(&a.match_score)
                .then(b.rounds_won.cmp(&a.rounds_won))
                .then_with(|| a.name.cmp(&b.name))
        });
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(registry: &mut SessionRegistry, name: &str) -> PlayerId {
        let id = registry.connect();
        registry.get_mut(id).unwrap().display_name = Some(name.to_string());
        id
    }

    #[test]
    fn test_connect_and_remove() {
        let mut registry = SessionRegistry::new();
        let first = registry.connect();
        let second = registry.connect();
        assert_ne!(first, second);
        assert_eq!(registry.connected_count(), 2);
        assert_eq!(registry.named_count(), 0);

        assert!(registry.remove(first).is_some());
        assert!(registry.remove(first).is_none());
        assert_eq!(registry.connected_count(), 1);
    }

    #[test]
    fn test_leaderboard_excludes_unnamed_and_orders_scores() {
        let mut registry = SessionRegistry::new();
        let alice = named(&mut registry, "Alice");
        let bob = named(&mut registry, "Bob");
        let carol = named(&mut registry, "Carol");
        registry.connect();

        registry.get_mut(alice).unwrap().total_score = 300;
        registry.get_mut(bob).unwrap().total_score = 300;
        registry.get_mut(bob).unwrap().match_score = 50;
        registry.get_mut(carol).unwrap().total_score = 400;

        let board = registry.leaderboard();
        let names: Vec<&str> = board.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Bob", "Alice"]);
    }

    #[test]
    fn test_all_participants_won() {
        let mut registry = SessionRegistry::new();
        assert!(!registry.all_participants_won());

        let alice = named(&mut registry, "Alice");
        let bob = named(&mut registry, "Bob");
        registry.connect();
        for player in registry.players_mut() {
            player.reset_round();
        }

        registry.get_mut(alice).unwrap().has_won_round = true;
        assert!(!registry.all_participants_won());

        registry.get_mut(bob).unwrap().has_won_round = true;
        assert!(registry.all_participants_won());

        // A late joiner does not hold the round open
        named(&mut registry, "Late");
        assert!(registry.all_participants_won());
    }

    #[test]
    fn test_match_results_sorted_by_match_score() {
        let mut registry = SessionRegistry::new();
        let alice = named(&mut registry, "Alice");
        let bob = named(&mut registry, "Bob");
        registry.get_mut(alice).unwrap().match_score = 120;
        registry.get_mut(bob).unwrap().match_score = 340;

        let results = registry.match_results();
        assert_eq!(results[0].name, "Bob");
        assert_eq!(results[1].name, "Alice");
    }
}
