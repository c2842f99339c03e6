//! Countdown label formatting.

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Format milliseconds as `H:MM:SS`, dropping empty leading groups.
///
/// `5_000` → `"5"`, `65_000` → `"1:05"`, `3_605_000` → `"1:00:05"`.
/// Sub-second remainders are truncated.
pub fn format_hms(millis: u64) -> String {
    let hours = millis / MS_PER_HOUR;
    let minutes = (millis / MS_PER_MINUTE) % 60;
    let seconds = (millis / MS_PER_SECOND) % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else if minutes > 0 {
        format!("{minutes}:{seconds:02}")
    } else {
        seconds.to_string()
    }
}

/// Whether a tick lands on a whole second, i.e. the label needs refreshing.
pub fn is_second_boundary(millis: u64) -> bool {
    millis % MS_PER_SECOND == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_each_width() {
        assert_eq!(format_hms(0), "0");
        assert_eq!(format_hms(5_000), "5");
        assert_eq!(format_hms(59_999), "59");
        assert_eq!(format_hms(60_000), "1:00");
        assert_eq!(format_hms(65_000), "1:05");
        assert_eq!(format_hms(3_600_000), "1:00:00");
        assert_eq!(format_hms(3_605_000), "1:00:05");
        assert_eq!(format_hms(36_000_000 + 61_000), "10:01:01");
    }

    #[test]
    fn hours_are_not_wrapped_at_a_day() {
        assert_eq!(format_hms(25 * MS_PER_HOUR), "25:00:00");
    }

    #[test]
    fn second_boundaries() {
        assert!(is_second_boundary(0));
        assert!(is_second_boundary(3_000));
        assert!(!is_second_boundary(2_900));
    }

    proptest! {
        #[test]
        fn label_round_trips_whole_seconds(secs in 0u64..360_000) {
            let label = format_hms(secs * MS_PER_SECOND);
            let parsed = label
                .split(':')
                .fold(0u64, |acc, part| acc * 60 + part.parse::<u64>().unwrap());
            prop_assert_eq!(parsed, secs);
        }
    }
}
