//! Test fixtures shared by the integration tests

use chrono::{DateTime, Duration, TimeZone, Utc};
use kart_rating::rating::{Glicko2RatingCalculator, InMemoryRatingStorage, RaceRecorder};
use kart_rating::{CompetitorId, CompetitorRating, RaceFinish, RaceOutcome};
use std::collections::HashMap;
use std::sync::Arc;

/// Start of the fixture "season"
pub fn season_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 19, 0, 0).unwrap()
}

/// Race at `minutes` after the season start, finishing in the given order
pub fn race_at(minutes: i64, finishes: &[(&str, u32)]) -> RaceOutcome {
    RaceOutcome::from_finishes(
        season_start() + Duration::minutes(minutes),
        finishes
            .iter()
            .map(|(id, rank)| RaceFinish {
                competitor_id: id.to_string(),
                rank: *rank,
            })
            .collect(),
    )
}

/// Race where the listed order is the finishing order
pub fn ordered_race(minutes: i64, order: &[&str]) -> RaceOutcome {
    let finishes: Vec<(&str, u32)> = order
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i as u32 + 1))
        .collect();
    race_at(minutes, &finishes)
}

pub fn fresh_roster(ids: &[&str]) -> Vec<(CompetitorId, CompetitorRating)> {
    ids.iter()
        .map(|id| (id.to_string(), CompetitorRating::default()))
        .collect()
}

pub fn rank_map(pairs: &[(&str, u32)]) -> HashMap<CompetitorId, u32> {
    pairs.iter().map(|(id, r)| (id.to_string(), *r)).collect()
}

/// Recorder backed by in-memory storage and the default Glicko-2 engine
pub fn create_test_system() -> (RaceRecorder, Arc<InMemoryRatingStorage>) {
    let storage = Arc::new(InMemoryRatingStorage::new());
    let recorder = RaceRecorder::new(
        storage.clone(),
        Arc::new(Glicko2RatingCalculator::default()),
    );
    (recorder, storage)
}

/// Full twelve-racer grid
pub const GRID: [&str; 12] = [
    "mario",
    "luigi",
    "peach",
    "daisy",
    "yoshi",
    "toad",
    "koopa",
    "shy_guy",
    "wario",
    "waluigi",
    "bowser",
    "dk",
];
