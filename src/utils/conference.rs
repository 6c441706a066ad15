/// Conference id utilities
///
/// Ids are lowercase slugs in the format: {title}{two-digit year}
/// Examples: neurips26, iclr26, cvpr25

/// Parse a conference id into (series, year) components
///
/// # Examples
/// ```
/// use aideadlines::utils::parse_conference_id;
///
/// assert_eq!(parse_conference_id("neurips26"), Some(("neurips".to_string(), 2026)));
/// assert_eq!(parse_conference_id("ICLR2025"), Some(("iclr".to_string(), 2025)));
/// assert_eq!(parse_conference_id("neurips"), None); // missing year
/// ```
pub fn parse_conference_id(id: &str) -> Option<(String, i32)> {
    let id = id.trim().to_lowercase();
    let digits_at = id
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;

    let (series, year_str) = id.split_at(digits_at);
    if series.is_empty() {
        return None;
    }

    let year: i32 = year_str.parse().ok()?;
    let year = match year_str.len() {
        2 => 2000 + year,
        4 if (1980..=2100).contains(&year) => year,
        _ => return None,
    };

    Some((series.to_string(), year))
}

/// Generate the conventional id from a title and year
///
/// # Examples
/// ```
/// use aideadlines::utils::make_conference_id;
///
/// assert_eq!(make_conference_id("NeurIPS", 2026), "neurips26");
/// assert_eq!(make_conference_id("ACM MM", 2025), "acmmm25");
/// ```
pub fn make_conference_id(title: &str, year: i32) -> String {
    let series: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    format!("{}{:02}", series, year.rem_euclid(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_digit_year() {
        assert_eq!(parse_conference_id("neurips26"), Some(("neurips".to_string(), 2026)));
        assert_eq!(parse_conference_id("eccv24"), Some(("eccv".to_string(), 2024)));
    }

    #[test]
    fn test_parse_four_digit_year() {
        assert_eq!(parse_conference_id("iclr2025"), Some(("iclr".to_string(), 2025)));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(parse_conference_id("CVPR25"), Some(("cvpr".to_string(), 2025)));
    }

    #[test]
    fn test_series_with_digits() {
        assert_eq!(parse_conference_id("3dv26"), Some(("3dv".to_string(), 2026)));
    }

    #[test]
    fn test_invalid_ids() {
        assert_eq!(parse_conference_id("neurips"), None);
        assert_eq!(parse_conference_id("2026"), None);
        assert_eq!(parse_conference_id("aaai202"), None);
        assert_eq!(parse_conference_id(""), None);
    }

    #[test]
    fn test_make_id() {
        assert_eq!(make_conference_id("NeurIPS", 2026), "neurips26");
        assert_eq!(make_conference_id("ICML", 2030), "icml30");
        assert_eq!(make_conference_id("Interspeech", 2005), "interspeech05");
    }
}
