//! Country extraction from free-text `place` strings.
//!
//! The country is whatever follows the last comma. No lookup against a real
//! country list is done, so "Remote" or "Online" come back verbatim.

/// Extract the country token from a place string.
///
/// # Examples
/// ```
/// use aideadlines::utils::extract_country;
///
/// assert_eq!(extract_country(Some("Vancouver, BC, Canada")), Some("Canada"));
/// assert_eq!(extract_country(Some("City, ST, Country.")), Some("Country"));
/// assert_eq!(extract_country(Some("Remote")), Some("Remote"));
/// assert_eq!(extract_country(Some("")), None);
/// assert_eq!(extract_country(None), None);
/// ```
pub fn extract_country(place: Option<&str>) -> Option<&str> {
    let last = place?.rsplit(',').next()?.trim();
    let country = last.strip_suffix('.').unwrap_or(last);
    if country.is_empty() {
        None
    } else {
        Some(country)
    }
}
