//! Ranking of titles worth watching next.

use std::cmp::Ordering;

use crate::matcher::TitleIndex;

/// A title offered by the remote service, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub title: Option<String>,
    /// Percentage score (0–100), if known.
    pub score: Option<f64>,
    pub url: Option<String>,
}

/// A candidate that passed the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Pick {
    pub title: String,
    pub score: f64,
    pub url: Option<String>,
}

/// Keep titled candidates that are not in `local` (exact key) and whose score
/// is at least `min_score`, best first. Unscored candidates count as 0.
pub fn rank(candidates: Vec<Candidate>, local: &TitleIndex, min_score: u32) -> Vec<Pick> {
    let min_score = f64::from(min_score);
    let mut picks: Vec<Pick> = candidates
        .into_iter()
        .filter_map(|c| {
            let title = c.title.filter(|t| !t.trim().is_empty())?;
            let score = c.score.unwrap_or(0.0);
            if score < min_score || local.contains(&title) {
                return None;
            }
            Some(Pick {
                title,
                score,
                url: c.url,
            })
        })
        .collect();

    picks.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    picks
}

/// Weighted mean of a `(score, amount)` distribution; `None` when empty.
pub fn mean_score(distribution: &[(u32, u64)]) -> Option<f64> {
    let (sum, count) = distribution
        .iter()
        .fold((0.0, 0u64), |(sum, count), &(score, amount)| {
            (sum + f64::from(score) * amount as f64, count + amount)
        });
    (count > 0).then(|| sum / count as f64)
}
