use std::time::Duration;

/// Horizontal fixation point as a fraction of the display width.
pub const DEFAULT_FIXATION_RATIO: f64 = 0.35;

/// Word length that gets exactly one base interval.
const NEUTRAL_WORD_LEN: f64 = 5.0;
const ORP_RATIO: f64 = 0.35;
const LENGTH_FACTOR_PER_CHAR: f64 = 0.05;
const MIN_LENGTH_FACTOR: f64 = 0.5;

/// Milliseconds a word of `word_len` characters stays on screen at `wpm`.
///
/// Words longer than five characters get proportionally more time. The
/// factor never drops below one half so short words at high rates do not
/// flash by. A rate of zero is treated as one word per minute.
pub fn word_delay_ms(word_len: usize, wpm: u32) -> f64 {
    let base = 60_000.0 / f64::from(wpm.max(1));
    let length_factor =
        (1.0 + (word_len as f64 - NEUTRAL_WORD_LEN) * LENGTH_FACTOR_PER_CHAR).max(MIN_LENGTH_FACTOR);
    base * length_factor
}

pub fn word_delay(word_len: usize, wpm: u32) -> Duration {
    Duration::from_nanos((word_delay_ms(word_len, wpm) * 1_000_000.0).round() as u64)
}

/// Index (in chars) of the optimal recognition point: `floor(len * 0.35)`
/// computed in `f64`, so lengths such as 180 land on 62 rather than 63.
/// `None` for an empty word.
pub fn orp_index(word_len: usize) -> Option<usize> {
    if word_len == 0 {
        None
    } else {
        Some((word_len as f64 * ORP_RATIO).floor() as usize)
    }
}

/// Character count used for both timing and ORP placement.
pub fn word_len(word: &str) -> usize {
    word.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn neutral_word_gets_base_delay() {
        assert_close(word_delay_ms(5, 300), 200.0);
    }

    #[test]
    fn long_words_take_longer() {
        assert_close(word_delay_ms(10, 300), 250.0);
        assert_close(word_delay_ms(15, 300), 300.0);
    }

    #[test]
    fn short_words_scale_down_linearly() {
        // 1 + (-5 * 0.05) = 0.75, above the floor
        assert_close(word_delay_ms(0, 300), 150.0);
        // 1 + (-4 * 0.05) = 0.8
        assert_close(word_delay_ms(1, 300), 160.0);
    }

    #[test]
    fn length_factor_never_drops_below_half() {
        for len in 0..=64 {
            for wpm in [1, 100, 300, 1000, 5000] {
                let base = 60_000.0 / f64::from(wpm);
                assert!(word_delay_ms(len, wpm) >= base * MIN_LENGTH_FACTOR);
            }
        }
        assert_close(word_delay_ms(0, 300) / 200.0, 0.75);
    }

    #[test]
    fn zero_rate_does_not_divide_by_zero() {
        assert_close(word_delay_ms(5, 0), 60_000.0);
    }

    #[test]
    fn duration_matches_millis() {
        assert_eq!(word_delay(5, 300).as_millis(), 200);
        assert_eq!(word_delay(10, 300).as_millis(), 250);
        assert_eq!(word_delay(5, 1000).as_millis(), 60);
    }

    #[test]
    fn orp_follows_floor_of_35_percent() {
        assert_eq!(orp_index(5), Some(1));
        assert_eq!(orp_index(1), Some(0));
        assert_eq!(orp_index(2), Some(0));
        assert_eq!(orp_index(3), Some(1));
        assert_eq!(orp_index(20), Some(7));
        assert_eq!(orp_index(0), None);
    }

    #[test]
    fn orp_uses_float_floor_for_long_tokens() {
        assert_eq!(orp_index(100), Some(35));
        assert_eq!(orp_index(180), Some(62));
        assert_eq!(orp_index(340), Some(118));
        assert_eq!(orp_index(181), Some(63));
    }

    #[test]
    fn word_len_counts_chars_not_bytes() {
        assert_eq!(word_len("hello"), 5);
        assert_eq!(word_len("café"), 4);
        assert_eq!(word_len(""), 0);
    }
}
