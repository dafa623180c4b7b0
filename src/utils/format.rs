//! Display formatting helpers

use std::time::Duration;

/// `MM:SS` for a countdown, truncating fractional seconds
pub fn format_remaining(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

/// Uptime as `1h 2m 3s`, `2m 3s` or `3s`
pub fn format_uptime(duration: Duration) -> String {
    let hours = duration.as_secs() / 3600;
    let minutes = (duration.as_secs() % 3600) / 60;
    let seconds = duration.as_secs() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_truncates_to_whole_seconds() {
        assert_eq!(format_remaining(300.0), "05:00");
        assert_eq!(format_remaining(59.999), "00:59");
        assert_eq!(format_remaining(780.4), "13:00");
        assert_eq!(format_remaining(0.0), "00:00");
        assert_eq!(format_remaining(-3.0), "00:00");
        assert_eq!(format_remaining(f64::NAN), "00:00");
    }

    #[test]
    fn uptime_picks_largest_unit() {
        assert_eq!(format_uptime(Duration::from_secs(5)), "5s");
        assert_eq!(format_uptime(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_uptime(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
