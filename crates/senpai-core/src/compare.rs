//! Cross-user comparison: what another user completed that we have not.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::SenpaiError;
use crate::matcher::TitleIndex;
use crate::normalize::title_key;

const NO_GENRE: &str = "Unknown";

/// A completed title from another user's list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTitle {
    pub title: String,
    pub genres: Vec<String>,
}

impl RemoteTitle {
    pub fn new(title: impl Into<String>, genres: Vec<String>) -> Self {
        Self {
            title: title.into(),
            genres,
        }
    }

    fn primary_genre(&self) -> &str {
        self.genres.first().map(String::as_str).unwrap_or(NO_GENRE)
    }
}

#[derive(Debug, Clone)]
pub struct Comparison {
    /// Distinct completed titles on the remote list.
    pub remote_total: usize,
    pub unseen: Vec<RemoteTitle>,
}

impl Comparison {
    /// Whether the unseen list is long enough to offer a dump file.
    pub fn overflows(&self, threshold: usize) -> bool {
        self.unseen.len() >= threshold
    }
}

/// Keep the remote titles that neither match a local title exactly nor
/// loosely nor with a similarity ratio above `threshold`.
pub fn compare(remote: Vec<RemoteTitle>, local: &TitleIndex, threshold: f64) -> Comparison {
    let mut keys = HashSet::new();
    let distinct: Vec<RemoteTitle> = remote
        .into_iter()
        .filter(|r| keys.insert(title_key(&r.title)))
        .collect();
    let remote_total = distinct.len();

    let unseen = distinct
        .into_iter()
        .filter(|r| match local.find(&r.title, threshold) {
            Some(level) => {
                tracing::debug!(title = %r.title, ?level, "remote title already seen");
                false
            }
            None => true,
        })
        .collect();

    Comparison {
        remote_total,
        unseen,
    }
}

/// Titles grouped under their first genre, genres and titles sorted.
pub fn group_by_genre(titles: &[RemoteTitle]) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for t in titles {
        groups
            .entry(t.primary_genre().to_string())
            .or_default()
            .push(t.title.clone());
    }
    for list in groups.values_mut() {
        list.sort();
    }
    groups
}

pub fn render_dump(titles: &[RemoteTitle], by_genre: bool) -> String {
    let mut out = String::new();
    if by_genre {
        for (genre, list) in group_by_genre(titles) {
            out.push_str(&format!("[{genre}]\n"));
            for title in list {
                out.push_str(&format!("- {title}\n"));
            }
            out.push('\n');
        }
    } else {
        for t in titles {
            out.push_str(&format!("- {}\n", t.title));
        }
    }
    out
}

pub fn write_dump(path: &Path, titles: &[RemoteTitle], by_genre: bool) -> Result<(), SenpaiError> {
    std::fs::write(path, render_dump(titles, by_genre))?;
    tracing::info!(path = %path.display(), count = titles.len(), "comparison dump written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str, genres: &[&str]) -> RemoteTitle {
        RemoteTitle::new(title, genres.iter().map(|g| g.to_string()).collect())
    }

    #[test]
    fn test_identically_keyed_titles_are_excluded() {
        let local = TitleIndex::new(["Hunterxhunter (2011)", "sousou no frieren"]);
        let result = compare(
            vec![
                titled("HUNTER×HUNTER (2011)", &["Action"]),
                titled("Sousou  no Frieren", &["Drama"]),
                titled("Mushishi", &["Slice of Life"]),
            ],
            &local,
            0.8,
        );
        assert_eq!(result.remote_total, 3);
        assert_eq!(result.unseen.len(), 1);
        assert_eq!(result.unseen[0].title, "Mushishi");
    }

    #[test]
    fn test_fuzzy_near_miss_is_excluded() {
        let local = TitleIndex::new(["Kaguya-sama wa Kokurasetai: Ultra Romantic"]);
        let result = compare(
            vec![titled("Kaguya-sama wa Kokurasetai - Ultra Romantic", &[])],
            &local,
            0.8,
        );
        assert!(result.unseen.is_empty());
    }

    #[test]
    fn test_duplicate_remote_titles_count_once() {
        let result = compare(
            vec![titled("Monster", &[]), titled("monster", &[])],
            &TitleIndex::default(),
            0.8,
        );
        assert_eq!(result.remote_total, 1);
        assert_eq!(result.unseen.len(), 1);
    }

    #[test]
    fn test_overflow_threshold_is_inclusive() {
        let titles: Vec<RemoteTitle> = (0..21)
            .map(|i| RemoteTitle::new(format!("Show {i}"), vec![]))
            .collect();
        let result = Comparison {
            remote_total: 21,
            unseen: titles,
        };
        assert!(result.overflows(21));
        assert!(!result.overflows(22));
    }

    #[test]
    fn test_group_by_primary_genre() {
        let titles = vec![
            titled("B", &["Drama", "Action"]),
            titled("A", &["Drama"]),
            titled("C", &[]),
        ];
        let groups = group_by_genre(&titles);
        assert_eq!(groups["Drama"], vec!["A".to_string(), "B".to_string()]);
        assert_eq!(groups["Unknown"], vec!["C".to_string()]);
        assert!(!groups.contains_key("Action"));
    }

    #[test]
    fn test_write_dump_grouped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.txt");
        write_dump(&path, &[titled("Mushishi", &["Mystery"])], true).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[Mystery]\n- Mushishi\n\n");
    }
}
