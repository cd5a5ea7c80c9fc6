//! Race recording on top of a rating calculator and storage
//!
//! A race touches the ratings of everyone in it and the update for a racer
//! depends on their pre-race rating, so races must be applied one at a time.
//! The recorder holds a lock across load, compute and store.

use crate::error::RatingError;
use crate::rating::calculator::{RatingCalculationResult, RatingCalculator};
use crate::rating::storage::{RatingEntry, RatingStorage};
use crate::types::{CompetitorId, CompetitorRating, RaceOutcome};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Applies race results to stored ratings
pub struct RaceRecorder {
    storage: Arc<dyn RatingStorage>,
    calculator: Arc<dyn RatingCalculator>,
    write_lock: Mutex<()>,
}

impl RaceRecorder {
    pub fn new(storage: Arc<dyn RatingStorage>, calculator: Arc<dyn RatingCalculator>) -> Self {
        Self {
            storage,
            calculator,
            write_lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &Arc<dyn RatingStorage> {
        &self.storage
    }

    /// Create a rating entry seeded with the calculator's initial rating
    pub fn register_competitor(&self, competitor_id: &str) -> crate::error::Result<RatingEntry> {
        let _guard = self.write_lock.lock().map_err(|_| RatingError::StorageError {
            message: "Race recorder lock poisoned".to_string(),
        })?;

        self.register_locked(competitor_id)
    }

    fn register_locked(&self, competitor_id: &str) -> crate::error::Result<RatingEntry> {
        if self.storage.get_rating(competitor_id)?.is_some() {
            return Err(RatingError::CompetitorAlreadyRegistered {
                competitor_id: competitor_id.to_string(),
            }
            .into());
        }

        let entry = RatingEntry::new(
            competitor_id.to_string(),
            self.calculator.get_initial_rating(),
        );
        self.storage.store_rating(entry.clone())?;
        debug!("Registered competitor {}", competitor_id);

        Ok(entry)
    }

    /// Score one race and persist every participant's new rating.
    ///
    /// Nothing is written if any participant is unknown or the calculation
    /// fails.
    pub fn record_race(&self, race: &RaceOutcome) -> crate::error::Result<RatingCalculationResult> {
        let _guard = self.write_lock.lock().map_err(|_| RatingError::StorageError {
            message: "Race recorder lock poisoned".to_string(),
        })?;

        self.record_locked(race)
    }

    fn record_locked(&self, race: &RaceOutcome) -> crate::error::Result<RatingCalculationResult> {
        let mut entries = self.storage.get_ratings(&race.roster)?;
        let result = self.apply_race(race, &mut entries)?;
        self.storage.store_ratings(entries.into_values().collect())?;

        info!(
            "Recorded race {} with {} competitors",
            race.race_id,
            race.roster.len()
        );

        Ok(result)
    }

    /// Score `race` against `entries` and update them in place.
    /// `entries` is untouched when this fails.
    fn apply_race(
        &self,
        race: &RaceOutcome,
        entries: &mut HashMap<CompetitorId, RatingEntry>,
    ) -> crate::error::Result<RatingCalculationResult> {
        let competitors: Vec<(CompetitorId, CompetitorRating)> = race
            .roster
            .iter()
            .map(|competitor_id| {
                entries
                    .get(competitor_id)
                    .map(|entry| (competitor_id.clone(), entry.rating))
                    .ok_or_else(|| RatingError::CompetitorNotFound {
                        competitor_id: competitor_id.clone(),
                    })
            })
            .collect::<Result<_, _>>()?;

        let result = self
            .calculator
            .calculate_rating_changes(&competitors, &race.rankings())?;

        for change in &result.rating_changes {
            if let Some(entry) = entries.get_mut(&change.competitor_id) {
                entry.update_rating(change.new_rating);
            }
        }
        debug!("Applied race {}", race.race_id);

        Ok(result)
    }

    /// Record races in chronological order, registering unseen competitors.
    ///
    /// All updates are staged and written in one batch at the end, so a
    /// failing race leaves storage exactly as it was.
    pub fn replay(
        &self,
        races: &[RaceOutcome],
    ) -> crate::error::Result<Vec<RatingCalculationResult>> {
        let mut ordered: Vec<&RaceOutcome> = races.iter().collect();
        ordered.sort_by_key(|race| race.recorded_at);

        let _guard = self.write_lock.lock().map_err(|_| RatingError::StorageError {
            message: "Race recorder lock poisoned".to_string(),
        })?;

        let mut competitor_ids: Vec<CompetitorId> = ordered
            .iter()
            .flat_map(|race| race.roster.iter().cloned())
            .collect();
        competitor_ids.sort();
        competitor_ids.dedup();

        let mut staged = self.storage.get_ratings(&competitor_ids)?;
        for competitor_id in competitor_ids {
            if !staged.contains_key(&competitor_id) {
                debug!("Registering competitor {} for replay", competitor_id);
                let entry = RatingEntry::new(
                    competitor_id.clone(),
                    self.calculator.get_initial_rating(),
                );
                staged.insert(competitor_id, entry);
            }
        }

        let mut results = Vec::with_capacity(ordered.len());
        for race in ordered {
            results.push(self.apply_race(race, &mut staged)?);
        }

        self.storage.store_ratings(staged.into_values().collect())?;

        info!("Replayed {} races", results.len());
        Ok(results)
    }
}
