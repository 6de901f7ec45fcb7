//! Countdown text and progress helpers shared by both timer profiles.

/// Render seconds as `M:SS`.
///
/// Minutes are not wrapped into hours, so a 75 minute practice reads `75:00`.
pub fn format_time(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// 0.0 .. 100.0 share of `total` already spent.
pub fn progress_pct(elapsed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (elapsed as f64 / total as f64 * 100.0).min(100.0)
}
