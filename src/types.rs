//! Common types used throughout the rating engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillratings::glicko2::Glicko2Rating;
use uuid::Uuid;

/// Unique identifier for racers
pub type CompetitorId = String;

/// Unique identifier for recorded races
pub type RaceId = Uuid;

/// Number of rating deviations subtracted from the rating for leaderboard ordering
pub const CONSERVATIVE_DEVIATION_FACTOR: f64 = 2.0;

/// Skill belief for a single competitor on the Glicko-2 scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompetitorRating {
    pub rating: f64,
    pub rating_deviation: f64,
    pub volatility: f64,
}

impl Default for CompetitorRating {
    fn default() -> Self {
        Self {
            rating: 1500.0,
            rating_deviation: 350.0,
            volatility: 0.06,
        }
    }
}

impl CompetitorRating {
    pub fn new(rating: f64, rating_deviation: f64, volatility: f64) -> Self {
        Self {
            rating,
            rating_deviation,
            volatility,
        }
    }

    /// Lower confidence bound used as the sortable leaderboard key
    pub fn conservative_score(&self) -> f64 {
        conservative_score(self.rating, self.rating_deviation)
    }

    /// Check the invariants a rating must hold before it can enter a rating period
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.rating.is_finite() {
            return Err(format!("rating must be finite, got {}", self.rating));
        }
        if !self.rating_deviation.is_finite() || self.rating_deviation <= 0.0 {
            return Err(format!(
                "rating deviation must be positive, got {}",
                self.rating_deviation
            ));
        }
        if !self.volatility.is_finite() || self.volatility <= 0.0 {
            return Err(format!(
                "volatility must be positive, got {}",
                self.volatility
            ));
        }
        Ok(())
    }
}

/// `rating - 2 * rating_deviation`
pub fn conservative_score(rating: f64, rating_deviation: f64) -> f64 {
    rating - CONSERVATIVE_DEVIATION_FACTOR * rating_deviation
}

impl From<Glicko2Rating> for CompetitorRating {
    fn from(rating: Glicko2Rating) -> Self {
        Self {
            rating: rating.rating,
            rating_deviation: rating.deviation,
            volatility: rating.volatility,
        }
    }
}

impl From<CompetitorRating> for Glicko2Rating {
    fn from(rating: CompetitorRating) -> Self {
        Self {
            rating: rating.rating,
            deviation: rating.rating_deviation,
            volatility: rating.volatility,
        }
    }
}

/// Finishing position of one competitor in a race (1 = winner)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceFinish {
    pub competitor_id: CompetitorId,
    pub rank: u32,
}

/// One race as submitted for scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceOutcome {
    #[serde(default = "crate::utils::generate_race_id")]
    pub race_id: RaceId,
    pub recorded_at: DateTime<Utc>,
    /// Everyone who started the race
    pub roster: Vec<CompetitorId>,
    /// Recorded finishing ranks; may omit roster entries
    pub finishes: Vec<RaceFinish>,
}

impl RaceOutcome {
    /// Build a race where every roster member has a recorded finish
    pub fn from_finishes(recorded_at: DateTime<Utc>, finishes: Vec<RaceFinish>) -> Self {
        Self {
            race_id: crate::utils::generate_race_id(),
            recorded_at,
            roster: finishes.iter().map(|f| f.competitor_id.clone()).collect(),
            finishes,
        }
    }

    /// Finishes as (competitor, rank) pairs
    pub fn rankings(&self) -> Vec<(CompetitorId, u32)> {
        self.finishes
            .iter()
            .map(|f| (f.competitor_id.clone(), f.rank))
            .collect()
    }
}

/// Rating change information for a competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub competitor_id: CompetitorId,
    pub old_rating: CompetitorRating,
    pub new_rating: CompetitorRating,
    /// Effective rank used for the update
    pub rank: u32,
}

impl RatingChange {
    pub fn rating_delta(&self) -> f64 {
        self.new_rating.rating - self.old_rating.rating
    }

    pub fn conservative_score(&self) -> f64 {
        self.new_rating.conservative_score()
    }
}
