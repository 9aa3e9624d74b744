//! Token estimation utilities

const CJK_CHARS_PER_TOKEN: f64 = 2.0;
const SYMBOL_CHARS_PER_TOKEN: f64 = 2.5;
const OTHER_CHARS_PER_TOKEN: f64 = 4.0;

const CODE_SYMBOLS: &str = "{}()[];:,.<>";

/// Estimate token count from character classes.
///
/// Each character is weighted by its class:
/// - CJK ideographs, kana and hangul: ~2.0 chars/token
/// - Code punctuation (`{ } ( ) [ ] ; : , . < >`): ~2.5 chars/token
/// - Everything else: ~4.0 chars/token
///
/// Every character adds a non-negative amount, so appending text never lowers
/// the estimate.
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }

    let mut cjk = 0usize;
    let mut symbols = 0usize;
    let mut other = 0usize;

    for c in text.chars() {
        if is_cjk(c) {
            cjk += 1;
        } else if CODE_SYMBOLS.contains(c) {
            symbols += 1;
        } else {
            other += 1;
        }
    }

    let estimate = cjk as f64 / CJK_CHARS_PER_TOKEN
        + symbols as f64 / SYMBOL_CHARS_PER_TOKEN
        + other as f64 / OTHER_CHARS_PER_TOKEN;

    estimate as usize
}

/// Four-characters-per-token estimate, kept for comparisons against older reports.
pub fn estimate_tokens_simple(text: &str) -> usize {
    text.chars().count() / 4
}

fn is_cjk(c: char) -> bool {
    matches!(
        c as u32,
        0x4E00..=0x9FFF     // CJK unified ideographs
        | 0x3400..=0x4DBF   // extension A
        | 0xF900..=0xFAFF   // compatibility ideographs
        | 0x3040..=0x309F   // hiragana
        | 0x30A0..=0x30FF   // katakana
        | 0x1100..=0x11FF   // hangul jamo
        | 0xAC00..=0xD7AF   // hangul syllables
    )
}
