use serde::{Deserialize, Serialize};

use crate::normalize::title_key;

/// User's watch status for a local entry; one status file per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WatchStatus {
    Watching,
    OnHold,
    Dropped,
    PlanToWatch,
    Completed,
}

impl WatchStatus {
    /// Lookup precedence used when reporting where a title lives locally.
    pub const ALL: &[WatchStatus] = &[
        Self::Watching,
        Self::OnHold,
        Self::Dropped,
        Self::PlanToWatch,
        Self::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Watching => "Currently watching",
            Self::OnHold => "On hold",
            Self::Dropped => "Dropped",
            Self::PlanToWatch => "Plan to watch",
            Self::Completed => "Watched",
        }
    }

    /// AniList `MediaListStatus` value.
    pub fn to_anilist_str(self) -> &'static str {
        match self {
            Self::Watching => "CURRENT",
            Self::OnHold => "PAUSED",
            Self::Dropped => "DROPPED",
            Self::PlanToWatch => "PLANNING",
            Self::Completed => "COMPLETED",
        }
    }

    pub fn from_anilist_str(s: &str) -> Option<Self> {
        match s {
            "CURRENT" | "REPEATING" => Some(Self::Watching),
            "PAUSED" => Some(Self::OnHold),
            "DROPPED" => Some(Self::Dropped),
            "PLANNING" => Some(Self::PlanToWatch),
            "COMPLETED" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The number recorded next to a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Completed with a 1–10 rating.
    Rating(u8),
    /// Episodes watched so far.
    Progress(u32),
    None,
}

/// One line of a status file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEntry {
    pub title: String,
    pub metric: Metric,
}

impl WatchEntry {
    /// Surrounding whitespace is dropped from `title`; status files never keep it.
    pub fn new(title: impl Into<String>, metric: Metric) -> Self {
        let title: String = title.into();
        Self {
            title: title.trim().to_string(),
            metric,
        }
    }

    /// Parse a status-file line: `Title: 8`, `Title: 12 episodes` or `Title`.
    ///
    /// Splits on the last `": "` and only treats the suffix as a metric when it
    /// is numeric, so titles like `Naruto: Shippuuden` survive intact.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some((title, suffix)) = line.rsplit_once(": ") {
            let suffix = suffix.trim();
            let title = title.trim();
            if !title.is_empty() {
                if let Some(count) = suffix
                    .strip_suffix("episodes")
                    .or_else(|| suffix.strip_suffix("episode"))
                {
                    if let Ok(n) = count.trim().parse::<u32>() {
                        return Some(Self::new(title, Metric::Progress(n)));
                    }
                } else if let Ok(n) = suffix.parse::<u8>() {
                    return Some(Self::new(title, Metric::Rating(n)));
                }
            }
        }

        Some(Self::new(line, Metric::None))
    }

    /// Render back to a status-file line (without the newline).
    pub fn to_line(&self) -> String {
        match self.metric {
            Metric::Rating(r) => format!("{}: {r}", self.title),
            Metric::Progress(n) => format!("{}: {n} episodes", self.title),
            Metric::None => self.title.clone(),
        }
    }

    pub fn key(&self) -> String {
        title_key(&self.title)
    }
}
