use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Keystrokes that make up one "word" for wpm purposes
pub const CHARS_PER_WORD: f64 = 5.0;

/// Final score handed to the results screen when a session completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub wpm: u32,
    pub accuracy: u32,
}

/// Words per minute from correct keystrokes over the elapsed time.
///
/// Returns 0 when the elapsed time is too small to produce a finite value.
pub fn words_per_minute(correct: usize, elapsed: Duration) -> u32 {
    let minutes = elapsed.as_secs_f64() / 60.0;
    let wpm = ((correct as f64 / CHARS_PER_WORD) / minutes).round();

    match wpm {
        w if w.is_finite() && w >= 0.0 => w.min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

/// Share of judged keystrokes that were correct, as a whole percentage.
pub fn accuracy_percent(correct: usize, errors: usize) -> u32 {
    let total = correct + errors;
    if total == 0 {
        return 100;
    }

    ((correct as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wpm_one_minute() {
        assert_eq!(words_per_minute(50, Duration::from_secs(60)), 10);
    }

    #[test]
    fn test_wpm_rounds() {
        // 12 chars over 30s -> 2.4 words / 0.5 min = 4.8
        assert_eq!(words_per_minute(12, Duration::from_secs(30)), 5);
    }

    #[test]
    fn test_wpm_zero_elapsed() {
        assert_eq!(words_per_minute(0, Duration::ZERO), 0);
        assert_eq!(words_per_minute(5, Duration::ZERO), 0);
    }

    #[test]
    fn test_wpm_no_correct_chars() {
        assert_eq!(words_per_minute(0, Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_accuracy_no_input() {
        assert_eq!(accuracy_percent(0, 0), 100);
    }

    #[test]
    fn test_accuracy_mixed() {
        assert_eq!(accuracy_percent(1, 1), 50);
        assert_eq!(accuracy_percent(2, 1), 67);
        assert_eq!(accuracy_percent(0, 4), 0);
        assert_eq!(accuracy_percent(3, 0), 100);
    }

    #[test]
    fn test_session_result_serializes() {
        let json = serde_json::to_string(&SessionResult { wpm: 42, accuracy: 97 }).unwrap();
        assert_eq!(json, r#"{"wpm":42,"accuracy":97}"#);
    }
}
