//! Total watch time of a title and every sequel reachable from it.

use std::collections::{HashSet, VecDeque};
use std::fmt::Display;
use std::future::Future;

/// One title in a sequel chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainNode {
    pub id: u64,
    pub title: String,
    pub episodes: Option<u32>,
    /// Minutes per episode.
    pub duration: Option<u32>,
    /// Media ids of direct anime sequels.
    pub sequels: Vec<u64>,
}

impl ChainNode {
    /// Viewing minutes once `deduction` minutes per episode are skipped.
    /// Unknown episode count or duration yields 0.
    pub fn minutes(&self, deduction: u32) -> u64 {
        match (self.episodes, self.duration) {
            (Some(episodes), Some(duration)) => {
                u64::from(episodes) * u64::from(duration.saturating_sub(deduction))
            }
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTimeReport {
    pub first_title: String,
    pub first_episodes: u32,
    pub first_minutes: u64,
    /// Distinct titles visited, the starting one included.
    pub titles_visited: usize,
    pub total_episodes: u64,
    pub total_minutes: u64,
}

/// Breadth-first walk over sequels starting at `start`.
///
/// `fetch` loads a node by media id. Every id is loaded at most once, so
/// cyclic relation graphs terminate. Sequels that fail to load or no longer
/// exist are logged and skipped.
pub async fn estimate<F, Fut, E>(start: ChainNode, mut fetch: F, deduction: u32) -> WatchTimeReport
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Option<ChainNode>, E>>,
    E: Display,
{
    let mut report = WatchTimeReport {
        first_title: start.title.clone(),
        first_episodes: start.episodes.unwrap_or(0),
        first_minutes: start.minutes(deduction),
        titles_visited: 0,
        total_episodes: 0,
        total_minutes: 0,
    };

    let mut visited = HashSet::from([start.id]);
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        tracing::debug!(id = node.id, title = %node.title, "counting watch time");
        report.titles_visited += 1;
        report.total_episodes += u64::from(node.episodes.unwrap_or(0));
        report.total_minutes += node.minutes(deduction);

        for id in node.sequels {
            if !visited.insert(id) {
                continue;
            }
            match fetch(id).await {
                Ok(Some(sequel)) => queue.push_back(sequel),
                Ok(None) => tracing::warn!(id, "sequel not found, skipping"),
                Err(e) => tracing::warn!(id, error = %e, "failed to load sequel, skipping"),
            }
        }
    }

    report
}
