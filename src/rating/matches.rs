//! Round-robin match synthesis for free-for-all races
//!
//! Glicko-2 rates one-on-one games. A race between N competitors is turned
//! into every implied head-to-head result: the better (numerically smaller)
//! rank wins, equal ranks draw. All matches of one race form a single rating
//! period.

use crate::config::rating::{MissingResultPolicy, RatingConfig};
use crate::error::RatingError;
use crate::types::{CompetitorId, CompetitorRating};
use serde::{Deserialize, Serialize};
use skillratings::glicko2::Glicko2Rating;
use skillratings::Outcomes;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Result of a synthesized match from the first competitor's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchScore {
    Win,
    Draw,
    Loss,
}

impl MatchScore {
    /// Compare two ranks, lower rank is better
    pub fn from_ranks(first_rank: u32, second_rank: u32) -> Self {
        match first_rank.cmp(&second_rank) {
            std::cmp::Ordering::Less => MatchScore::Win,
            std::cmp::Ordering::Equal => MatchScore::Draw,
            std::cmp::Ordering::Greater => MatchScore::Loss,
        }
    }

    /// 1, 0.5 or 0
    pub fn points(self) -> f64 {
        match self {
            MatchScore::Win => 1.0,
            MatchScore::Draw => 0.5,
            MatchScore::Loss => 0.0,
        }
    }

    /// Same match seen from the other side
    pub fn reversed(self) -> Self {
        match self {
            MatchScore::Win => MatchScore::Loss,
            MatchScore::Draw => MatchScore::Draw,
            MatchScore::Loss => MatchScore::Win,
        }
    }

    pub fn to_outcome(self) -> Outcomes {
        match self {
            MatchScore::Win => Outcomes::WIN,
            MatchScore::Draw => Outcomes::DRAW,
            MatchScore::Loss => Outcomes::LOSS,
        }
    }
}

/// Roster member with the rank used for this race
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCompetitor {
    pub competitor_id: CompetitorId,
    pub rating: CompetitorRating,
    pub rank: u32,
    /// Position in the caller's roster
    pub roster_index: usize,
}

/// Synthesized head-to-head between two positions of the rank-sorted roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairwiseMatch {
    pub first: usize,
    pub second: usize,
    pub score: MatchScore,
}

/// Validate the roster against the recorded ranks and attach an effective rank
/// to every competitor. The result keeps roster order.
pub fn resolve_ranks(
    competitors: &[(CompetitorId, CompetitorRating)],
    outcomes: &HashMap<CompetitorId, u32>,
    config: &RatingConfig,
) -> crate::error::Result<Vec<RankedCompetitor>> {
    if competitors.is_empty() {
        return Err(RatingError::NoCompetitors.into());
    }

    let mut seen = HashSet::with_capacity(competitors.len());
    for (competitor_id, rating) in competitors {
        if !seen.insert(competitor_id.as_str()) {
            return Err(RatingError::DuplicateCompetitor {
                competitor_id: competitor_id.clone(),
            }
            .into());
        }
        if let Err(reason) = rating.validate() {
            return Err(RatingError::InvalidRating {
                competitor_id: competitor_id.clone(),
                reason,
            }
            .into());
        }
    }

    // Sorted so the reported id does not depend on hash order
    let mut unknown: Vec<&CompetitorId> = outcomes
        .keys()
        .filter(|id| !seen.contains(id.as_str()))
        .collect();
    unknown.sort();
    if let Some(competitor_id) = unknown.first() {
        return Err(RatingError::UnknownCompetitor {
            competitor_id: (*competitor_id).clone(),
        }
        .into());
    }

    // A missing result never places ahead of a recorded finish
    let missing_rank = outcomes.values().copied().fold(config.worst_rank, u32::max);

    competitors
        .iter()
        .enumerate()
        .map(|(roster_index, (competitor_id, rating))| -> crate::error::Result<_> {
            let rank = match outcomes.get(competitor_id) {
                Some(rank) => *rank,
                None => match config.missing_result_policy {
                    MissingResultPolicy::Reject => {
                        return Err(RatingError::MissingResult {
                            competitor_id: competitor_id.clone(),
                        }
                        .into())
                    }
                    MissingResultPolicy::WorstRank => {
                        warn!(
                            "No result for {}, scoring as rank {}",
                            competitor_id, missing_rank
                        );
                        missing_rank
                    }
                },
            };

            Ok(RankedCompetitor {
                competitor_id: competitor_id.clone(),
                rating: *rating,
                rank,
                roster_index,
            })
        })
        .collect()
}

/// Sort best rank first. Stable, so tied competitors keep roster order.
pub fn sort_by_rank(ranked: &mut [RankedCompetitor]) {
    ranked.sort_by_key(|competitor| competitor.rank);
}

/// One match for every unordered pair, `first < second`, in sorted order
pub fn synthesize_pairwise_matches(ranked: &[RankedCompetitor]) -> Vec<PairwiseMatch> {
    let n = ranked.len();
    let mut matches = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for first in 0..n {
        for second in (first + 1)..n {
            matches.push(PairwiseMatch {
                first,
                second,
                score: MatchScore::from_ranks(ranked[first].rank, ranked[second].rank),
            });
        }
    }

    matches
}

/// Rating-period input for every sorted position: each opponent's pre-race
/// rating together with the result from that position's point of view.
/// Opponents appear in sorted order.
pub fn opponent_results(
    ranked: &[RankedCompetitor],
    matches: &[PairwiseMatch],
) -> Vec<Vec<(Glicko2Rating, Outcomes)>> {
    let mut by_position: Vec<Vec<(usize, MatchScore)>> = vec![Vec::new(); ranked.len()];
    for m in matches {
        by_position[m.first].push((m.second, m.score));
        by_position[m.second].push((m.first, m.score.reversed()));
    }

    by_position
        .into_iter()
        .map(|mut opponents| {
            opponents.sort_by_key(|(opponent, _)| *opponent);
            opponents
                .into_iter()
                .map(|(opponent, score)| (ranked[opponent].rating.into(), score.to_outcome()))
                .collect()
        })
        .collect()
}
