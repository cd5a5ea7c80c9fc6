//! Rating storage interface and implementations
//!
//! This module defines the interface for persisting and retrieving competitor
//! ratings, with an in-memory implementation. Entries are never removed.

use crate::error::RatingError;
use crate::types::{CompetitorId, CompetitorRating};
use crate::utils::current_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Storage entry for a competitor's rating with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub competitor_id: CompetitorId,
    pub rating: CompetitorRating,
    pub races_played: u64,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RatingEntry {
    /// Create a new rating entry for a new competitor
    pub fn new(competitor_id: CompetitorId, initial_rating: CompetitorRating) -> Self {
        let now = current_timestamp();
        Self {
            competitor_id,
            rating: initial_rating,
            races_played: 0,
            last_updated: now,
            created_at: now,
        }
    }

    /// Update the rating and increment races played
    pub fn update_rating(&mut self, new_rating: CompetitorRating) {
        self.rating = new_rating;
        self.races_played += 1;
        self.last_updated = current_timestamp();
    }

    /// Too few races for the rating to be trusted
    pub fn is_provisional(&self, provisional_race_threshold: u64) -> bool {
        self.races_played < provisional_race_threshold
    }
}

/// Trait for rating storage operations
pub trait RatingStorage: Send + Sync {
    /// Get a competitor's rating entry
    fn get_rating(&self, competitor_id: &str) -> crate::error::Result<Option<RatingEntry>>;

    /// Store or update a competitor's rating
    fn store_rating(&self, entry: RatingEntry) -> crate::error::Result<()>;

    /// Get ratings for multiple competitors; unknown ids are absent from the map
    fn get_ratings(
        &self,
        competitor_ids: &[CompetitorId],
    ) -> crate::error::Result<HashMap<CompetitorId, RatingEntry>>;

    /// Store multiple rating updates atomically
    fn store_ratings(&self, entries: Vec<RatingEntry>) -> crate::error::Result<()>;

    /// Get all competitors with ratings
    fn get_all_ratings(&self) -> crate::error::Result<HashMap<CompetitorId, RatingEntry>>;

    /// Get total number of rated competitors
    fn get_competitor_count(&self) -> crate::error::Result<usize>;
}

fn lock_error(kind: &str) -> RatingError {
    RatingError::StorageError {
        message: format!("Failed to acquire ratings {} lock", kind),
    }
}

/// In-memory rating storage implementation
#[derive(Debug, Default)]
pub struct InMemoryRatingStorage {
    ratings: RwLock<HashMap<CompetitorId, RatingEntry>>,
}

impl InMemoryRatingStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RatingStorage for InMemoryRatingStorage {
    fn get_rating(&self, competitor_id: &str) -> crate::error::Result<Option<RatingEntry>> {
        let ratings = self.ratings.read().map_err(|_| lock_error("read"))?;

        Ok(ratings.get(competitor_id).cloned())
    }

    fn store_rating(&self, entry: RatingEntry) -> crate::error::Result<()> {
        let mut ratings = self.ratings.write().map_err(|_| lock_error("write"))?;

        ratings.insert(entry.competitor_id.clone(), entry);
        Ok(())
    }

    fn get_ratings(
        &self,
        competitor_ids: &[CompetitorId],
    ) -> crate::error::Result<HashMap<CompetitorId, RatingEntry>> {
        let ratings = self.ratings.read().map_err(|_| lock_error("read"))?;

        let mut result = HashMap::new();
        for competitor_id in competitor_ids {
            if let Some(entry) = ratings.get(competitor_id) {
                result.insert(competitor_id.clone(), entry.clone());
            }
        }

        Ok(result)
    }

    fn store_ratings(&self, entries: Vec<RatingEntry>) -> crate::error::Result<()> {
        let mut ratings = self.ratings.write().map_err(|_| lock_error("write"))?;

        for entry in entries {
            ratings.insert(entry.competitor_id.clone(), entry);
        }

        Ok(())
    }

    fn get_all_ratings(&self) -> crate::error::Result<HashMap<CompetitorId, RatingEntry>> {
        let ratings = self.ratings.read().map_err(|_| lock_error("read"))?;

        Ok(ratings.clone())
    }

    fn get_competitor_count(&self) -> crate::error::Result<usize> {
        let ratings = self.ratings.read().map_err(|_| lock_error("read"))?;

        Ok(ratings.len())
    }
}
