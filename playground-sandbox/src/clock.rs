/// Below this share of the limit the timer is shown as running low.
pub const LOW_TIME_PERCENT: f64 = 20.0;

/// Formats seconds as `MM:SS`. Minutes are not wrapped at 60.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Remaining time as a percentage of the limit (100 when the limit is 0).
pub fn time_percent(remaining: u32, limit: u32) -> f64 {
    if limit == 0 {
        return 100.0;
    }
    f64::from(remaining) / f64::from(limit) * 100.0
}

pub fn is_time_low(remaining: u32, limit: u32) -> bool {
    time_percent(remaining, limit) < LOW_TIME_PERCENT
}
