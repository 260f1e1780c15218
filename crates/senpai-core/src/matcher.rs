use std::collections::HashSet;

use difflib::sequencematcher::SequenceMatcher;

use crate::normalize::{loose_key, title_key};

/// How a title was found in a [`TitleIndex`].
#[derive(Debug, Clone, PartialEq)]
pub enum MatchLevel {
    /// Same title key.
    Exact,
    /// Same loose key (ordinals, season words, punctuation ignored).
    Loose,
    /// Similarity ratio above the threshold.
    Fuzzy(f64),
}

/// A set of titles that can be searched exactly, loosely and fuzzily.
///
/// Strategy mirrors the usual exact → normalized → fuzzy cascade.
#[derive(Debug, Default, Clone)]
pub struct TitleIndex {
    keys: Vec<String>,
    exact: HashSet<String>,
    loose: HashSet<String>,
}

impl TitleIndex {
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for title in titles {
            let key = title_key(title.as_ref());
            if key.is_empty() || !index.exact.insert(key.clone()) {
                continue;
            }
            index.loose.insert(loose_key(&key));
            index.keys.push(key);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Exact title-key membership.
    pub fn contains(&self, title: &str) -> bool {
        self.exact.contains(&title_key(title))
    }

    /// Find `title` in the index. `threshold` is the minimum (exclusive)
    /// similarity ratio for a fuzzy hit.
    pub fn find(&self, title: &str, threshold: f64) -> Option<MatchLevel> {
        let key = title_key(title);
        if self.exact.contains(&key) {
            return Some(MatchLevel::Exact);
        }
        if self.loose.contains(&loose_key(&key)) {
            return Some(MatchLevel::Loose);
        }
        self.keys
            .iter()
            .map(|known| similarity(&key, known))
            .filter(|ratio| *ratio > threshold)
            .fold(None, |best: Option<f64>, r| Some(best.map_or(r, |b| b.max(r))))
            .map(MatchLevel::Fuzzy)
    }
}

/// Gestalt pattern-matching similarity (Ratcliff/Obershelp) over characters,
/// in `0.0..=1.0`. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    f64::from(SequenceMatcher::new(&a, &b).ratio())
}
