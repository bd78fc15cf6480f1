//! Shared formatting helpers for CLI commands.

use console::{style, StyledObject};

use udm_dash::completion::CompletionTier;
use udm_dash::models::{MatchingStatus, UdmStatus};

/// Format a number with thousand separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();
    let chunks: Vec<_> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();
    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Truncate a string to `max_len` characters with ellipsis.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format seconds as `h:mm:ss`, or `m:ss` under an hour.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// Text progress bar, `width` cells wide, for a percentage in `0..=100`.
pub fn text_bar(percent: u16, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Style a matching status for terminal output.
pub fn status_style(status: MatchingStatus) -> StyledObject<&'static str> {
    let s = style(status.as_str());
    match status {
        MatchingStatus::Complete => s.green(),
        MatchingStatus::Partial => s.blue(),
        MatchingStatus::Warning => s.yellow(),
        MatchingStatus::Pending => s.cyan(),
        MatchingStatus::NoMetadata => s.dim(),
        MatchingStatus::Orphan => s.red(),
    }
}

pub fn udm_status_style(status: UdmStatus) -> StyledObject<&'static str> {
    let s = style(status.as_str());
    match status {
        UdmStatus::Complete => s.green(),
        UdmStatus::Pending => s.dim(),
        UdmStatus::Warning => s.yellow(),
        UdmStatus::Error => s.red(),
    }
}

/// Style a completion percentage by tier.
pub fn completion_style(percentage: u32) -> StyledObject<String> {
    let s = style(format!("{}%", percentage));
    match CompletionTier::from_percentage(percentage) {
        CompletionTier::Complete => s.green(),
        CompletionTier::Partial => s.yellow(),
        CompletionTier::Sparse => s.red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_truncate_string_is_char_safe() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("WSOP_2024_MAIN_EVENT.mp4", 10), "WSOP_20...");
        assert_eq!(truncate_string("포커포커포커", 5), "포커...");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(65.4), "1:05");
        assert_eq!(format_duration(3725.0), "1:02:05");
        assert_eq!(format_duration(-3.0), "0:00");
    }

    #[test]
    fn test_text_bar() {
        assert_eq!(text_bar(50, 10), "█████░░░░░");
        assert_eq!(text_bar(0, 4), "░░░░");
        assert_eq!(text_bar(100, 4), "████");
    }
}
