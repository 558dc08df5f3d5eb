//! Clock face helpers.

/// Format seconds as `MM:SS`. Minutes are not capped at two digits.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// 0.0 .. 1.0 fraction of `total_secs` already elapsed.
pub fn progress(time_left_secs: u64, total_secs: u64) -> f64 {
    if total_secs == 0 {
        return 0.0;
    }
    let elapsed = total_secs.saturating_sub(time_left_secs);
    elapsed as f64 / total_secs as f64
}
