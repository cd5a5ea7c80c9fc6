//! Rating system configuration

use crate::error::RatingError;
use crate::types::CompetitorRating;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What to do with a roster entry that has no recorded finishing rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingResultPolicy {
    /// Refuse to score the race
    #[default]
    Reject,
    /// Score the competitor as finishing at `worst_rank`
    WorstRank,
}

impl FromStr for MissingResultPolicy {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "worst_rank" | "worst-rank" => Ok(Self::WorstRank),
            other => Err(RatingError::ConfigurationError {
                message: format!("Unknown missing result policy: {}", other),
            }),
        }
    }
}

/// Glicko-2 tuning and seeding parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// System constant constraining volatility change
    pub tau: f64,
    /// Stop criterion for the volatility iteration
    pub convergence_tolerance: f64,
    pub initial_rating: f64,
    pub initial_deviation: f64,
    pub initial_volatility: f64,
    /// Rank assigned to competitors without a result under `WorstRank`
    pub worst_rank: u32,
    pub missing_result_policy: MissingResultPolicy,
    /// Competitors with fewer races than this are provisional
    pub provisional_race_threshold: u64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            tau: 0.5,
            convergence_tolerance: 0.000_001,
            initial_rating: 1500.0,
            initial_deviation: 350.0,
            initial_volatility: 0.06,
            worst_rank: 12,
            missing_result_policy: MissingResultPolicy::Reject,
            provisional_race_threshold: 5,
        }
    }
}

impl RatingConfig {
    /// Seed rating for newly registered competitors
    pub fn initial_rating(&self) -> CompetitorRating {
        CompetitorRating {
            rating: self.initial_rating,
            rating_deviation: self.initial_deviation,
            volatility: self.initial_volatility,
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.tau.is_finite() || self.tau <= 0.0 {
            return Err(RatingError::ConfigurationError {
                message: "Tau must be positive".to_string(),
            }
            .into());
        }

        if !self.convergence_tolerance.is_finite() || self.convergence_tolerance <= 0.0 {
            return Err(RatingError::ConfigurationError {
                message: "Convergence tolerance must be positive".to_string(),
            }
            .into());
        }

        if let Err(reason) = self.initial_rating().validate() {
            return Err(RatingError::ConfigurationError {
                message: format!("Invalid initial rating: {}", reason),
            }
            .into());
        }

        if self.worst_rank == 0 {
            return Err(RatingError::ConfigurationError {
                message: "Worst rank must be at least 1".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
