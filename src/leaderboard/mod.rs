//! Leaderboard ordering by conservative score
//!
//! Standings are sorted on `rating - 2 * rating_deviation` so a racer with a
//! handful of lucky results cannot outrank an established one. Racers with
//! fewer than the configured number of races are flagged provisional.

use crate::rating::storage::RatingEntry;
use crate::types::CompetitorId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based position
    pub position: usize,
    pub competitor_id: CompetitorId,
    pub rating: f64,
    pub rating_deviation: f64,
    pub conservative_score: f64,
    pub races_played: u64,
    pub provisional: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub standings: Vec<Standing>,
}

impl Leaderboard {
    pub fn from_entries<'a, I>(entries: I, provisional_race_threshold: u64) -> Self
    where
        I: IntoIterator<Item = &'a RatingEntry>,
    {
        let mut rows: Vec<&RatingEntry> = entries.into_iter().collect();
        rows.sort_by(|a, b| compare_entries(a, b));

        let standings = rows
            .into_iter()
            .enumerate()
            .map(|(index, entry)| Standing {
                position: index + 1,
                competitor_id: entry.competitor_id.clone(),
                rating: entry.rating.rating,
                rating_deviation: entry.rating.rating_deviation,
                conservative_score: entry.rating.conservative_score(),
                races_played: entry.races_played,
                provisional: entry.is_provisional(provisional_race_threshold),
            })
            .collect();

        Self { standings }
    }

    pub fn len(&self) -> usize {
        self.standings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }

    pub fn leader(&self) -> Option<&Standing> {
        self.standings.first()
    }

    pub fn position_of(&self, competitor_id: &str) -> Option<usize> {
        self.standings
            .iter()
            .find(|standing| standing.competitor_id == competitor_id)
            .map(|standing| standing.position)
    }

    /// Standings with enough races to be trusted
    pub fn established(&self) -> impl Iterator<Item = &Standing> {
        self.standings.iter().filter(|standing| !standing.provisional)
    }
}

/// Conservative score descending, then rating descending, then id ascending
fn compare_entries(a: &RatingEntry, b: &RatingEntry) -> Ordering {
    b.rating
        .conservative_score()
        .total_cmp(&a.rating.conservative_score())
        .then_with(|| b.rating.rating.total_cmp(&a.rating.rating))
        .then_with(|| a.competitor_id.cmp(&b.competitor_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CompetitorRating;

    fn entry(id: &str, rating: f64, deviation: f64, races: u64) -> RatingEntry {
        let mut entry = RatingEntry::new(
            id.to_string(),
            CompetitorRating::new(rating, deviation, 0.06),
        );
        entry.races_played = races;
        entry
    }

    #[test]
    fn test_ordering_by_conservative_score() {
        let entries = vec![
            entry("newcomer", 1700.0, 300.0, 1),
            entry("veteran", 1600.0, 60.0, 40),
            entry("regular", 1550.0, 80.0, 12),
        ];
        let board = Leaderboard::from_entries(&entries, 5);

        let ids: Vec<&str> = board
            .standings
            .iter()
            .map(|s| s.competitor_id.as_str())
            .collect();
        assert_eq!(ids, vec!["veteran", "regular", "newcomer"]);
        assert_eq!(board.leader().unwrap().conservative_score, 1480.0);
        assert_eq!(board.position_of("newcomer"), Some(3));
        assert_eq!(board.position_of("ghost"), None);
    }

    #[test]
    fn test_equal_rating_lower_deviation_wins() {
        let entries = vec![
            entry("shaky", 1500.0, 120.0, 10),
            entry("steady", 1500.0, 70.0, 10),
        ];
        let board = Leaderboard::from_entries(&entries, 5);
        assert_eq!(board.leader().unwrap().competitor_id, "steady");
    }

    #[test]
    fn test_ties_break_on_rating_then_id() {
        let entries = vec![
            entry("zed", 1500.0, 100.0, 10),
            entry("amy", 1500.0, 100.0, 10),
            entry("high", 1700.0, 200.0, 10),
        ];
        let board = Leaderboard::from_entries(&entries, 5);

        let ids: Vec<&str> = board
            .standings
            .iter()
            .map(|s| s.competitor_id.as_str())
            .collect();
        assert_eq!(ids, vec!["high", "amy", "zed"]);
    }

    #[test]
    fn test_provisional_flag() {
        let entries = vec![
            entry("fresh", 1500.0, 200.0, 4),
            entry("settled", 1500.0, 200.0, 5),
        ];
        let board = Leaderboard::from_entries(&entries, 5);

        let fresh = board
            .standings
            .iter()
            .find(|s| s.competitor_id == "fresh")
            .unwrap();
        assert!(fresh.provisional);
        assert_eq!(board.established().count(), 1);
    }

    #[test]
    fn test_empty_leaderboard() {
        let entries: Vec<RatingEntry> = Vec::new();
        let board = Leaderboard::from_entries(&entries, 5);
        assert!(board.is_empty());
        assert!(board.leader().is_none());
    }
}
