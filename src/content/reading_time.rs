//! Reading time estimate

use serde::Serialize;

/// Default reading speed
pub const WORDS_PER_MINUTE: usize = 200;

/// Estimated reading time for a body of text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingTime {
    /// Display string, e.g. "3 min read"
    pub text: String,
    pub minutes: f64,
    pub words: usize,
}

/// Estimate reading time from a word count.
///
/// Minutes are rounded to two decimals and then up to a whole minute, so any
/// non-empty text reads as at least "1 min read" and an empty one as "0 min read".
pub fn reading_time(text: &str, words_per_minute: usize) -> ReadingTime {
    let words = count_words(text);
    let minutes = words as f64 / words_per_minute.max(1) as f64;
    let displayed = ((minutes * 100.0).round() / 100.0).ceil() as u64;

    ReadingTime {
        text: format!("{} min read", displayed),
        minutes,
        words,
    }
}

/// Count whitespace-separated words; every CJK character is a word of its own
pub fn count_words(text: &str) -> usize {
    let mut words = 0;
    let mut in_word = false;

    for c in text.chars() {
        if is_cjk(c) {
            words += 1;
            in_word = false;
        } else if c.is_whitespace() {
            in_word = false;
        } else if !in_word {
            words += 1;
            in_word = true;
        }
    }

    words
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30ff}'   // Hiragana, Katakana
        | '\u{3400}'..='\u{4dbf}' // CJK Extension A
        | '\u{4e00}'..='\u{9fff}' // CJK Unified Ideographs
        | '\u{ac00}'..='\u{d7af}' // Hangul Syllables
        | '\u{f900}'..='\u{faff}' // CJK Compatibility Ideographs
        | '\u{20000}'..='\u{2a6df}')
}
