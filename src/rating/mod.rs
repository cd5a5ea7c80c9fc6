//! Rating system built on Glicko-2
//!
//! This module turns race results into pairwise matches, runs the Glicko-2
//! rating period through the skillratings crate, and persists the outcome.

pub mod calculator;
pub mod glicko2;
pub mod matches;
pub mod recorder;
pub mod storage;

// Re-export commonly used types
pub use calculator::{RatingCalculationResult, RatingCalculator};
pub use glicko2::Glicko2RatingCalculator;
pub use matches::{MatchScore, PairwiseMatch};
pub use recorder::RaceRecorder;
pub use storage::{InMemoryRatingStorage, RatingEntry, RatingStorage};
