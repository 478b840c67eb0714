//! Text metrics shared by every result-shaping strategy.
//!
//! Lengths are counted in Unicode scalar values so the blocking and streaming
//! paths derive identical numbers from identical strings.

/// Length of `text` in Unicode scalar values.
pub fn text_length(text: &str) -> usize {
    text.chars().count()
}

/// Number of whitespace-delimited, non-empty tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Round to the nearest integer, ties toward positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// `round((1 - result/input) * 100)`. Zero when the input is empty.
pub fn compression_ratio(input_len: usize, result_len: usize) -> i64 {
    if input_len == 0 {
        return 0;
    }
    round_half_up((1.0 - result_len as f64 / input_len as f64) * 100.0)
}

/// `round(|1 - result/input| * 100)`. Zero when the input is empty.
pub fn change_ratio(input_len: usize, result_len: usize) -> i64 {
    if input_len == 0 {
        return 0;
    }
    round_half_up((1.0 - result_len as f64 / input_len as f64).abs() * 100.0)
}
