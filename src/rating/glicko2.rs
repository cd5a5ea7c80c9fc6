//! Glicko-2 rating engine for free-for-all races
//!
//! Each race is one rating period. The finishing order is expanded into the
//! full round-robin of head-to-head results (see [`crate::rating::matches`])
//! and every competitor is updated against the pre-race ratings of all the
//! others using the Glicko-2 implementation from the skillratings crate.

use crate::config::rating::RatingConfig;
use crate::error::RatingError;
use crate::rating::calculator::{RatingCalculationResult, RatingCalculator};
use crate::rating::matches::{
    opponent_results, resolve_ranks, sort_by_rank, synthesize_pairwise_matches,
};
use crate::types::{CompetitorId, CompetitorRating, RatingChange};
use skillratings::glicko2::{glicko2_rating_period, Glicko2Config, Glicko2Rating};
use std::collections::HashMap;
use tracing::debug;

/// Glicko-2 rating calculator implementation
#[derive(Debug, Clone, Default)]
pub struct Glicko2RatingCalculator {
    config: RatingConfig,
}

impl Glicko2RatingCalculator {
    /// Create a new Glicko-2 rating calculator
    pub fn new(config: RatingConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn rating_config(&self) -> &RatingConfig {
        &self.config
    }

    fn glicko2_config(&self) -> Glicko2Config {
        Glicko2Config {
            tau: self.config.tau,
            convergence_tolerance: self.config.convergence_tolerance,
        }
    }

    /// Compute every competitor's rating after one race.
    ///
    /// `outcomes` maps competitor ids to finishing ranks (1 = winner, equal
    /// ranks are draws). A roster of one is returned unchanged. The result
    /// lists competitors in roster order.
    pub fn compute_updated_ratings(
        &self,
        competitors: &[(CompetitorId, CompetitorRating)],
        outcomes: &HashMap<CompetitorId, u32>,
    ) -> crate::error::Result<RatingCalculationResult> {
        let mut ranked = resolve_ranks(competitors, outcomes, &self.config)?;

        if ranked.len() < 2 {
            debug!("Race with a single competitor, ratings unchanged");
            return Ok(RatingCalculationResult {
                rating_changes: ranked
                    .into_iter()
                    .map(|competitor| RatingChange {
                        competitor_id: competitor.competitor_id,
                        old_rating: competitor.rating,
                        new_rating: competitor.rating,
                        rank: competitor.rank,
                    })
                    .collect(),
                race_quality: 0.0,
            });
        }

        let race_quality = self.calculate_race_quality(
            &ranked.iter().map(|c| c.rating).collect::<Vec<_>>(),
        );

        sort_by_rank(&mut ranked);
        let matches = synthesize_pairwise_matches(&ranked);
        let results = opponent_results(&ranked, &matches);
        let glicko2_config = self.glicko2_config();

        debug!(
            "Rating race with {} competitors ({} pairwise matches)",
            ranked.len(),
            matches.len()
        );

        let mut rating_changes = Vec::with_capacity(ranked.len());
        for (competitor, results) in ranked.iter().zip(&results) {
            let player: Glicko2Rating = competitor.rating.into();
            let new_rating: CompetitorRating =
                glicko2_rating_period(&player, results, &glicko2_config).into();

            if let Err(reason) = new_rating.validate() {
                return Err(RatingError::InvalidRating {
                    competitor_id: competitor.competitor_id.clone(),
                    reason: format!("update produced an invalid rating: {}", reason),
                }
                .into());
            }

            rating_changes.push((
                competitor.roster_index,
                RatingChange {
                    competitor_id: competitor.competitor_id.clone(),
                    old_rating: competitor.rating,
                    new_rating,
                    rank: competitor.rank,
                },
            ));
        }

        rating_changes.sort_by_key(|(roster_index, _)| *roster_index);

        Ok(RatingCalculationResult {
            rating_changes: rating_changes
                .into_iter()
                .map(|(_, change)| change)
                .collect(),
            race_quality,
        })
    }

    /// Probability that `player` beats `opponent` head to head
    pub fn expected_score(&self, player: &CompetitorRating, opponent: &CompetitorRating) -> f64 {
        let (expected, _) = skillratings::glicko2::expected_score(
            &Glicko2Rating::from(*player),
            &Glicko2Rating::from(*opponent),
        );
        expected
    }

    /// Get quality score for a race (0.0 to 1.0, higher is closer).
    ///
    /// Mean over every pairing of how close the head-to-head expectation is
    /// to a coin flip.
    pub fn calculate_race_quality(&self, ratings: &[CompetitorRating]) -> f64 {
        if ratings.len() < 2 {
            return 0.0;
        }

        let mut total = 0.0;
        let mut pairs = 0usize;
        for (i, player) in ratings.iter().enumerate() {
            for opponent in &ratings[i + 1..] {
                let expected = self.expected_score(player, opponent);
                total += 1.0 - (2.0 * expected - 1.0).abs();
                pairs += 1;
            }
        }

        (total / pairs as f64).clamp(0.0, 1.0)
    }
}

impl RatingCalculator for Glicko2RatingCalculator {
    fn calculate_rating_changes(
        &self,
        competitors: &[(CompetitorId, CompetitorRating)],
        rankings: &[(CompetitorId, u32)],
    ) -> crate::error::Result<RatingCalculationResult> {
        let mut outcomes = HashMap::with_capacity(rankings.len());
        for (competitor_id, rank) in rankings {
            if outcomes.insert(competitor_id.clone(), *rank).is_some() {
                return Err(RatingError::DuplicateCompetitor {
                    competitor_id: competitor_id.clone(),
                }
                .into());
            }
        }

        self.compute_updated_ratings(competitors, &outcomes)
    }

    fn get_initial_rating(&self) -> CompetitorRating {
        self.config.initial_rating()
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()> {
        let new_config: RatingConfig = serde_json::from_value(config).map_err(|e| {
            RatingError::ConfigurationError {
                message: format!("Invalid Glicko-2 configuration: {}", e),
            }
        })?;

        new_config.validate()?;
        self.config = new_config;
        Ok(())
    }
}
