//! Human-readable durations.

const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 1440;
const MINUTES_PER_YEAR: u64 = 525_600;

/// `H hours, M minutes`.
pub fn hours_minutes(minutes: u64) -> String {
    format!(
        "{} hours, {} minutes",
        minutes / MINUTES_PER_HOUR,
        minutes % MINUTES_PER_HOUR
    )
}

/// `D days, H hours, M minutes`.
pub fn days_hours_minutes(minutes: u64) -> String {
    let days = minutes / MINUTES_PER_DAY;
    let rest = minutes % MINUTES_PER_DAY;
    format!("{days} days, {}", hours_minutes(rest))
}

/// `Y years, D days, H hours, M minutes`. Leading zero years and days are
/// dropped; hours and minutes are always shown.
pub fn watch_time(minutes: u64) -> String {
    let years = minutes / MINUTES_PER_YEAR;
    let rest = minutes % MINUTES_PER_YEAR;
    if years > 0 {
        format!("{years} years, {}", days_hours_minutes(rest))
    } else if rest >= MINUTES_PER_DAY {
        days_hours_minutes(rest)
    } else {
        hours_minutes(rest)
    }
}

/// Countdown until the next episode airs, from a number of seconds.
pub fn countdown(seconds: i64) -> String {
    if seconds <= 0 {
        return "airing now".into();
    }
    let minutes = seconds as u64 / 60;
    let days = minutes / MINUTES_PER_DAY;
    let hours = minutes % MINUTES_PER_DAY / MINUTES_PER_HOUR;
    let mins = minutes % MINUTES_PER_HOUR;
    if days > 0 {
        format!("{days}d {hours}h {mins}m")
    } else if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_minutes() {
        assert_eq!(hours_minutes(0), "0 hours, 0 minutes");
        assert_eq!(hours_minutes(125), "2 hours, 5 minutes");
    }

    #[test]
    fn test_days_hours_minutes() {
        assert_eq!(days_hours_minutes(1441), "1 days, 0 hours, 1 minutes");
        assert_eq!(days_hours_minutes(59), "0 days, 0 hours, 59 minutes");
    }

    #[test]
    fn test_watch_time_drops_leading_zero_units() {
        assert_eq!(watch_time(45), "0 hours, 45 minutes");
        assert_eq!(watch_time(61), "1 hours, 1 minutes");
        assert_eq!(watch_time(1440), "1 days, 0 hours, 0 minutes");
        assert_eq!(
            watch_time(525_600 + 1440 + 60 + 1),
            "1 years, 1 days, 1 hours, 1 minutes"
        );
    }

    #[test]
    fn test_countdown() {
        assert_eq!(countdown(-5), "airing now");
        assert_eq!(countdown(59), "0m");
        assert_eq!(countdown(3 * 86_400 + 2 * 3600 + 120), "3d 2h 2m");
        assert_eq!(countdown(3600 + 60), "1h 1m");
    }
}
