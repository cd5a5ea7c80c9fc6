//! Rating calculator trait and implementations
//!
//! This module defines the interface for rating calculations and provides
//! trivial implementations for tests and fallbacks.

use crate::error::RatingError;
use crate::types::{CompetitorId, CompetitorRating, RatingChange};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of a rating calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingCalculationResult {
    /// Rating changes for all competitors, in roster order
    pub rating_changes: Vec<RatingChange>,
    /// Quality score of the race (0.0 to 1.0, higher is closer)
    pub race_quality: f64,
}

impl RatingCalculationResult {
    /// Updated rating per competitor
    pub fn new_ratings(&self) -> HashMap<CompetitorId, CompetitorRating> {
        self.rating_changes
            .iter()
            .map(|change| (change.competitor_id.clone(), change.new_rating))
            .collect()
    }

    /// Updated conservative score per competitor
    pub fn conservative_scores(&self) -> HashMap<CompetitorId, f64> {
        self.rating_changes
            .iter()
            .map(|change| (change.competitor_id.clone(), change.conservative_score()))
            .collect()
    }

    pub fn change_for(&self, competitor_id: &str) -> Option<&RatingChange> {
        self.rating_changes
            .iter()
            .find(|change| change.competitor_id == competitor_id)
    }
}

/// Trait for calculating rating changes after races
pub trait RatingCalculator: Send + Sync {
    /// Calculate rating changes for competitors based on race results
    ///
    /// # Arguments
    /// * `competitors` - List of (competitor_id, current_rating) pairs
    /// * `rankings` - List of (competitor_id, rank) pairs where 1 = first place
    ///
    /// # Returns
    /// Result containing rating changes and race quality
    fn calculate_rating_changes(
        &self,
        competitors: &[(CompetitorId, CompetitorRating)],
        rankings: &[(CompetitorId, u32)],
    ) -> crate::error::Result<RatingCalculationResult>;

    /// Get the initial rating for new competitors
    fn get_initial_rating(&self) -> CompetitorRating;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;

    /// Update configuration from JSON
    fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()>;
}

/// Unchanged ratings for every competitor, ranks taken from `rankings`
fn unchanged(
    competitors: &[(CompetitorId, CompetitorRating)],
    rankings: &[(CompetitorId, u32)],
) -> Vec<RatingChange> {
    competitors
        .iter()
        .map(|(competitor_id, rating)| {
            let rank = rankings
                .iter()
                .find(|(id, _)| id == competitor_id)
                .map(|(_, rank)| *rank)
                .unwrap_or(1);

            RatingChange {
                competitor_id: competitor_id.clone(),
                old_rating: *rating,
                new_rating: *rating,
                rank,
            }
        })
        .collect()
}

/// Rating calculator that never changes ratings
#[derive(Debug, Clone, Default)]
pub struct NoOpRatingCalculator {
    initial_rating: CompetitorRating,
}

impl NoOpRatingCalculator {
    pub fn new(initial_rating: CompetitorRating) -> Self {
        Self { initial_rating }
    }
}

impl RatingCalculator for NoOpRatingCalculator {
    fn calculate_rating_changes(
        &self,
        competitors: &[(CompetitorId, CompetitorRating)],
        rankings: &[(CompetitorId, u32)],
    ) -> crate::error::Result<RatingCalculationResult> {
        if competitors.is_empty() {
            return Err(RatingError::NoCompetitors.into());
        }

        Ok(RatingCalculationResult {
            rating_changes: unchanged(competitors, rankings),
            race_quality: 1.0,
        })
    }

    fn get_initial_rating(&self) -> CompetitorRating {
        self.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "no_op",
            "initial_rating": self.initial_rating,
        })
    }

    fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()> {
        if let Some(rating) = config.get("initial_rating") {
            self.initial_rating =
                serde_json::from_value(rating.clone()).map_err(|e| {
                    RatingError::ConfigurationError {
                        message: format!("Invalid initial rating: {}", e),
                    }
                })?;
        }
        Ok(())
    }
}

type CalculationCall = (
    Vec<(CompetitorId, CompetitorRating)>,
    Vec<(CompetitorId, u32)>,
);

/// Mock rating calculator for testing
#[derive(Debug, Default)]
pub struct MockRatingCalculator {
    calculation_calls: std::sync::Mutex<Vec<CalculationCall>>,
    fixed_result: std::sync::RwLock<Option<RatingCalculationResult>>,
    fail_with: std::sync::RwLock<Option<RatingError>>,
    initial_rating: CompetitorRating,
}

impl MockRatingCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a fixed result to return for all calculations
    pub fn set_fixed_result(&self, result: RatingCalculationResult) {
        if let Ok(mut fixed) = self.fixed_result.write() {
            *fixed = Some(result);
        }
    }

    /// Make every following calculation fail
    pub fn set_failure(&self, error: RatingError) {
        if let Ok(mut fail_with) = self.fail_with.write() {
            *fail_with = Some(error);
        }
    }

    /// Get all calculation calls made (for testing)
    pub fn get_calculation_calls(&self) -> Vec<CalculationCall> {
        self.calculation_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl RatingCalculator for MockRatingCalculator {
    fn calculate_rating_changes(
        &self,
        competitors: &[(CompetitorId, CompetitorRating)],
        rankings: &[(CompetitorId, u32)],
    ) -> crate::error::Result<RatingCalculationResult> {
        if let Ok(mut calls) = self.calculation_calls.lock() {
            calls.push((competitors.to_vec(), rankings.to_vec()));
        }

        if let Ok(fail_with) = self.fail_with.read() {
            if let Some(error) = fail_with.as_ref() {
                return Err(error.clone().into());
            }
        }

        if let Ok(fixed) = self.fixed_result.read() {
            if let Some(result) = fixed.as_ref() {
                return Ok(result.clone());
            }
        }

        Ok(RatingCalculationResult {
            rating_changes: unchanged(competitors, rankings),
            race_quality: 0.8,
        })
    }

    fn get_initial_rating(&self) -> CompetitorRating {
        self.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "mock",
            "initial_rating": self.initial_rating,
        })
    }

    fn update_config(&mut self, _config: serde_json::Value) -> crate::error::Result<()> {
        Ok(())
    }
}
