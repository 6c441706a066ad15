//! Text normalization for the free-text conference search.
//!
//! Key transformations:
//! - Convert to lowercase
//! - Remove accents/diacritics (é → e, ü → u, etc.)
//! - Normalize whitespace
//! - Handle special characters that don't decompose

use unicode_normalization::UnicodeNormalization;

/// Normalize text for matching purposes.
///
/// Transformations applied:
/// 1. Replace special characters that don't decompose (ł, ø, æ, etc.)
/// 2. Unicode NFD normalization (decompose characters)
/// 3. Remove combining diacritical marks (accents)
/// 4. Convert to lowercase
/// 5. Normalize whitespace (collapse multiple spaces, trim)
///
/// # Examples
///
/// ```
/// use aideadlines::utils::normalize_text;
///
/// assert_eq!(normalize_text("Montréal, Canada"), "montreal, canada");
/// assert_eq!(normalize_text("  Rio   de Janeiro "), "rio de janeiro");
/// assert_eq!(normalize_text("Zürich"), "zurich");
/// ```
pub fn normalize_text(text: &str) -> String {
    replace_special_chars(text)
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// True when the normalized `needle` occurs in the normalized `haystack`.
///
/// A blank needle matches everything.
///
/// # Examples
///
/// ```
/// use aideadlines::utils::text_matches;
///
/// assert!(text_matches("Kraków, Poland", "krakow"));
/// assert!(text_matches("NeurIPS", "  neur "));
/// assert!(!text_matches("ICML", "iclr"));
/// ```
pub fn text_matches(haystack: &str, needle: &str) -> bool {
    let needle = normalize_text(needle);
    needle.is_empty() || normalize_text(haystack).contains(&needle)
}

/// Replace special characters that don't decompose via Unicode NFD.
///
/// Some characters like Ł, Ø, Æ are distinct letters, not accented versions,
/// so they need explicit replacement for normalization.
fn replace_special_chars(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'Ł' => 'L',
            'ł' => 'l',
            'Ø' => 'O',
            'ø' => 'o',
            'Æ' => 'A',
            'æ' => 'a',
            'ß' => 's',
            'Ð' | 'Đ' => 'D',
            'ð' | 'đ' => 'd',
            'Þ' => 'T',
            'þ' => 't',
            'İ' => 'I',
            'ı' => 'i',
            _ => c,
        })
        .collect()
}

/// Check if a character is a combining diacritical mark.
fn is_combining_mark(c: char) -> bool {
    // See: https://unicode.org/charts/PDF/U0300.pdf
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}
