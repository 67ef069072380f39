// Text folding and phrase matching for name and keyword lookups.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold text for comparison: lowercase, strip diacritics, drop apostrophes
/// and periods, turn any other punctuation into whitespace and collapse runs
/// of spaces.
///
/// `"Nikola Jokić"` and `"nikola jokic"` fold to the same string, as do
/// `"Gilgeous-Alexander"` and `"gilgeous alexander"`.
pub fn fold(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        match c {
            // Dropped so "P.J." and "PJ" fold alike.
            '\'' | '\u{2019}' | '`' | '.' => {}
            // Letters that do not decompose under NFD.
            'đ' | 'Đ' => out.push('d'),
            'ø' | 'Ø' => out.push('o'),
            'ł' | 'Ł' => out.push('l'),
            'ı' => out.push('i'),
            'ß' => out.push_str("ss"),
            'æ' | 'Æ' => out.push_str("ae"),
            c if c.is_alphanumeric() => out.extend(c.to_lowercase()),
            _ => out.push(' '),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split folded text into words.
pub fn words(folded: &str) -> Vec<&str> {
    folded.split_whitespace().collect()
}

/// Whether `phrase` occurs in `text` as a run of whole words.
///
/// Both arguments are expected to be folded already.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    let phrase_words = words(phrase);
    if phrase_words.is_empty() {
        return false;
    }
    let text_words = words(text);
    text_words
        .windows(phrase_words.len())
        .any(|window| window == phrase_words.as_slice())
}
