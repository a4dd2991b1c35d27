use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static TIME_QUANTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9]+)\s*(minutes|minute|min|seconds|second|sec)")
        .expect("Invalid time quantity pattern")
});

/// Countdown length in seconds for a step, if it mentions one
///
/// Only the first time quantity counts; "no timer" is `None`, never `Some(0)`.
pub fn detect_duration(step: &str) -> Option<u64> {
    let caps = TIME_QUANTITY.captures(step)?;

    let amount: u64 = match caps[1].parse() {
        Ok(amount) => amount,
        Err(e) => {
            debug!("Ignoring oversized time quantity {:?}: {}", &caps[1], e);
            return None;
        }
    };

    if caps[2].to_ascii_lowercase().starts_with('m') {
        amount.checked_mul(60)
    } else {
        Some(amount)
    }
}

/// Format seconds as `mm:ss` for the countdown display
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes() {
        assert_eq!(detect_duration("Simmer for 10 minutes"), Some(600));
        assert_eq!(detect_duration("Bake 1 minute more"), Some(60));
        assert_eq!(detect_duration("Rest 5min"), Some(300));
    }

    #[test]
    fn test_seconds() {
        assert_eq!(detect_duration("Wait 45 seconds"), Some(45));
        assert_eq!(detect_duration("Pulse for 1 second"), Some(1));
        assert_eq!(detect_duration("Blend 30 sec"), Some(30));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(detect_duration("SIMMER 3 MINUTES"), Some(180));
        assert_eq!(detect_duration("Whisk 20 Seconds"), Some(20));
    }

    #[test]
    fn test_no_duration() {
        assert_eq!(detect_duration("Season to taste"), None);
        assert_eq!(detect_duration(""), None);
        assert_eq!(detect_duration("Use 2 eggs"), None);
    }

    #[test]
    fn test_zero_is_distinct_from_none() {
        assert_eq!(detect_duration("Cook 0 minutes"), Some(0));
    }

    #[test]
    fn test_first_match_only() {
        assert_eq!(detect_duration("Boil 10 minutes, then rest 30 seconds"), Some(600));
        // Ranges are not interpreted; the first number wins.
        assert_eq!(detect_duration("Roast 10-15 minutes"), Some(900));
    }

    #[test]
    fn test_overflow_is_no_match() {
        assert_eq!(detect_duration("Wait 99999999999999999999999 seconds"), None);
        assert_eq!(detect_duration("Wait 18446744073709551615 minutes"), None);
    }

    #[test]
    fn test_only_ascii_digits_count() {
        assert_eq!(detect_duration("Boil \u{ff11}\u{ff10} minutes, then rest 5 min"), Some(300));
        assert_eq!(detect_duration("Simmer \u{0663} minutes"), None);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(6000), "100:00");
    }
}
