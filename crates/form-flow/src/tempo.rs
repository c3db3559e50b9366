//! Typing cadence.
//!
//! Text is typed character by character so per-keystroke listeners fire,
//! but a long value at the base cadence would stretch a single field into
//! multi-second territory; the delay shrinks once the full cadence would
//! blow the ceiling.

use std::time::Duration;

/// Ceiling on total typing time for one field.
const MAX_FIELD_TYPING: Duration = Duration::from_secs(3);

pub(crate) fn keystroke_delay(text: &str, base: Duration) -> Duration {
    let keys = text.chars().count() as u32;
    if keys == 0 {
        return base;
    }
    base.min(MAX_FIELD_TYPING / keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_values_keep_the_base_cadence() {
        let base = Duration::from_millis(30);
        assert_eq!(keystroke_delay("hello", base), base);
        assert_eq!(keystroke_delay("", base), base);
    }

    #[test]
    fn long_values_shrink_the_delay() {
        let base = Duration::from_millis(30);
        let long = "x".repeat(1000);
        let delay = keystroke_delay(&long, base);
        assert!(delay < base);
        assert_eq!(delay, Duration::from_secs(3) / 1000);
    }
}
