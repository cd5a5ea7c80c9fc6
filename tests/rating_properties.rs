//! Property tests for the Glicko-2 race engine

use kart_rating::rating::Glicko2RatingCalculator;
use kart_rating::{CompetitorId, CompetitorRating};
use proptest::prelude::*;
use std::collections::HashMap;

type Race = (Vec<(CompetitorId, CompetitorRating)>, HashMap<CompetitorId, u32>);

fn arb_rating() -> impl Strategy<Value = CompetitorRating> {
    (1000.0f64..2200.0, 40.0f64..350.0, 0.04f64..0.08)
        .prop_map(|(rating, deviation, volatility)| {
            CompetitorRating::new(rating, deviation, volatility)
        })
}

/// Ratings close enough that every head-to-head carries information
fn arb_comparable_rating() -> impl Strategy<Value = CompetitorRating> {
    (1300.0f64..1700.0, 100.0f64..350.0, 0.05f64..0.07)
        .prop_map(|(rating, deviation, volatility)| {
            CompetitorRating::new(rating, deviation, volatility)
        })
}

fn race_from(entries: Vec<(CompetitorRating, u32)>) -> Race {
    let mut competitors = Vec::with_capacity(entries.len());
    let mut outcomes = HashMap::with_capacity(entries.len());
    for (i, (rating, rank)) in entries.into_iter().enumerate() {
        let id = format!("racer{}", i);
        competitors.push((id.clone(), rating));
        outcomes.insert(id, rank);
    }
    (competitors, outcomes)
}

/// Roster of 2..=12 racers with arbitrary ratings and ranks in 1..=12
fn arb_race() -> impl Strategy<Value = Race> {
    prop::collection::vec((arb_rating(), 1u32..=12), 2..=12).prop_map(race_from)
}

fn arb_comparable_race() -> impl Strategy<Value = Race> {
    prop::collection::vec((arb_comparable_rating(), 1u32..=12), 2..=12).prop_map(race_from)
}

proptest! {
    #[test]
    fn prop_deterministic((competitors, outcomes) in arb_race()) {
        let calculator = Glicko2RatingCalculator::default();
        let first = calculator.compute_updated_ratings(&competitors, &outcomes).unwrap();
        let second = calculator.compute_updated_ratings(&competitors, &outcomes).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_every_racer_updated_and_valid((competitors, outcomes) in arb_race()) {
        let calculator = Glicko2RatingCalculator::default();
        let result = calculator.compute_updated_ratings(&competitors, &outcomes).unwrap();

        prop_assert_eq!(result.rating_changes.len(), competitors.len());
        for (change, (id, rating)) in result.rating_changes.iter().zip(&competitors) {
            prop_assert_eq!(&change.competitor_id, id);
            prop_assert_eq!(change.old_rating, *rating);
            prop_assert_eq!(change.rank, outcomes[id]);
            prop_assert!(change.new_rating.validate().is_ok());
        }
        prop_assert!((0.0..=1.0).contains(&result.race_quality));
    }

    #[test]
    fn prop_deviation_shrinks_for_comparable_racers(
        (competitors, outcomes) in arb_comparable_race()
    ) {
        let calculator = Glicko2RatingCalculator::default();
        let result = calculator.compute_updated_ratings(&competitors, &outcomes).unwrap();

        for change in &result.rating_changes {
            prop_assert!(change.new_rating.rating_deviation <= change.old_rating.rating_deviation);
        }
    }

    #[test]
    fn prop_winner_gains_loser_drops(n in 2usize..=12) {
        let competitors: Vec<(CompetitorId, CompetitorRating)> = (0..n)
            .map(|i| (format!("racer{}", i), CompetitorRating::default()))
            .collect();
        let outcomes: HashMap<CompetitorId, u32> = (0..n)
            .map(|i| (format!("racer{}", i), i as u32 + 1))
            .collect();

        let calculator = Glicko2RatingCalculator::default();
        let result = calculator.compute_updated_ratings(&competitors, &outcomes).unwrap();

        prop_assert!(result.rating_changes[0].rating_delta() > 0.0);
        prop_assert!(result.rating_changes[n - 1].rating_delta() < 0.0);
    }

    #[test]
    fn prop_equal_ratings_equal_ranks_stay_equal(
        rating in arb_rating(),
        shared_rank in 1u32..=6,
        others in prop::collection::vec((arb_rating(), 1u32..=12), 0..=8),
    ) {
        let mut competitors = vec![
            ("twin_a".to_string(), rating),
            ("twin_b".to_string(), rating),
        ];
        let mut outcomes = HashMap::new();
        outcomes.insert("twin_a".to_string(), shared_rank);
        outcomes.insert("twin_b".to_string(), shared_rank);
        for (i, (other, rank)) in others.into_iter().enumerate() {
            let id = format!("other{}", i);
            competitors.push((id.clone(), other));
            outcomes.insert(id, rank);
        }

        let calculator = Glicko2RatingCalculator::default();
        let result = calculator.compute_updated_ratings(&competitors, &outcomes).unwrap();
        let ratings = result.new_ratings();
        prop_assert_eq!(ratings["twin_a"], ratings["twin_b"]);
    }

    #[test]
    fn prop_conservative_score_prefers_lower_deviation(
        rating in 1000.0f64..2200.0,
        low in 30.0f64..200.0,
        gap in 0.1f64..150.0,
    ) {
        let steady = CompetitorRating::new(rating, low, 0.06);
        let shaky = CompetitorRating::new(rating, low + gap, 0.06);
        prop_assert!(steady.conservative_score() > shaky.conservative_score());
    }
}

#[test]
fn test_single_racer_is_noop() {
    let calculator = Glicko2RatingCalculator::default();
    let rating = CompetitorRating::new(1730.0, 64.0, 0.0598);
    let outcomes: HashMap<CompetitorId, u32> = [("solo".to_string(), 1)].into_iter().collect();

    let result = calculator
        .compute_updated_ratings(&[("solo".to_string(), rating)], &outcomes)
        .unwrap();

    assert_eq!(result.rating_changes[0].new_rating, rating);
}
