//! Title normalization.
//!
//! Two strengths are provided:
//!
//! - [`title_key`] is the identity of a watch entry. It only folds case,
//!   width and look-alike separators so that two spellings of the *same* string
//!   collide. Every write to a status file and every lookup goes through it.
//! - [`loose_key`] additionally rewrites ordinals and season keywords and erases
//!   punctuation. It is only used as an extra equality pass when comparing lists
//!   that come from different sources.

use unicode_normalization::UnicodeNormalization;

/// Entry identity: NFKC + case folding, separator unification, whitespace collapse.
pub fn title_key(s: &str) -> String {
    let s = unicode_fold(s);
    let s = unify_separators(&s);
    collapse_whitespace(&s)
}

/// Aggressive comparison key built on top of [`title_key`].
///
/// `"Attack on Titan: 2nd Season"` and `"Attack on Titan Season 2"` both
/// become `"attack on titan 2"`.
pub fn loose_key(s: &str) -> String {
    let s = title_key(s);
    let s = convert_ordinals(&s);
    let s = erase_punctuation(&s);
    let s = normalize_season_keywords(&s);
    collapse_whitespace(&s)
}

/// NFKC folds fullwidth forms and composes diacritics; then lowercase.
fn unicode_fold(s: &str) -> String {
    s.nfkc().collect::<String>().to_lowercase()
}

fn unify_separators(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{00D7}' | '\u{2715}' | '\u{2716}' => 'x',
            '\u{2019}' | '\u{2018}' | '\u{02BC}' | '`' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2010}' | '\u{2011}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            '\u{FF5E}' | '\u{301C}' => '~',
            c => c,
        })
        .collect()
}

/// "1st" → "1", "2nd" → "2", "3rd" → "3", "4th" → "4".
fn convert_ordinals(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            ["st", "nd", "rd", "th"]
                .iter()
                .find_map(|suffix| word.strip_suffix(suffix))
                .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
                .unwrap_or(word)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop "season"/"cour"/"part" keywords so "season 2" and "2 season" agree.
fn normalize_season_keywords(s: &str) -> String {
    s.split_whitespace()
        .filter(|word| !matches!(*word, "season" | "cour" | "part"))
        .map(|word| match word.strip_prefix('s') {
            Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
                digits
            }
            _ => word,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replace punctuation and symbols with spaces, keeping alphanumerics.
fn erase_punctuation(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
