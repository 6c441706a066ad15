use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::deadline::{Deadline, DeadlineRecord, DeadlineShape, LegacyDeadlineRule, RecordDeadlines};
use crate::utils::extract_country;

/// ERA venue classification
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
pub enum EraRating {
    #[serde(alias = "a")]
    A,
    #[serde(alias = "b")]
    B,
    #[serde(alias = "c")]
    C,
}

impl EraRating {
    pub const ALL: [EraRating; 3] = [EraRating::A, EraRating::B, EraRating::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            EraRating::A => "A",
            EraRating::B => "B",
            EraRating::C => "C",
        }
    }

    /// Case-insensitive parse of a single rating letter
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "A" | "a" => Some(EraRating::A),
            "B" | "b" => Some(EraRating::B),
            "C" | "c" => Some(EraRating::C),
            _ => None,
        }
    }
}

/// One conference-year as written in a data file.
///
/// Accepts both the legacy single-`deadline` shape and the current
/// `deadlines:` list shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConferenceRecord {
    pub title: String,
    pub year: i32,
    pub id: String,
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub paperslink: Option<String>,
    #[serde(default)]
    pub pwclink: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    #[serde(default, alias = "sub")]
    pub tags: Vec<String>,
    #[serde(default, alias = "eraRating")]
    pub era_rating: Option<EraRating>,
    #[serde(default)]
    pub hindex: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,

    // Legacy shape
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default, alias = "abstractDeadline")]
    pub abstract_deadline: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,

    // Current shape
    #[serde(default)]
    pub deadlines: Option<Vec<DeadlineRecord>>,
}

impl ConferenceRecord {
    /// True when the record carries both a `deadlines` list and legacy fields
    pub fn has_mixed_shapes(&self) -> bool {
        self.deadlines.is_some() && (self.deadline.is_some() || self.abstract_deadline.is_some())
    }

    /// The deadline fields in their declared shape. The list shape wins when
    /// both are present.
    pub fn record_deadlines(&self) -> RecordDeadlines {
        match &self.deadlines {
            Some(list) => RecordDeadlines::Current(list.clone()),
            None if self.deadline.is_none() && self.abstract_deadline.is_none() => {
                RecordDeadlines::Current(Vec::new())
            }
            None => RecordDeadlines::Legacy {
                deadline: self.deadline.clone(),
                abstract_deadline: self.abstract_deadline.clone(),
                timezone: self.timezone.clone(),
            },
        }
    }

    /// Normalize into the representation used by every derived view.
    pub fn into_entry(self, rule: LegacyDeadlineRule) -> ConferenceEntry {
        let source = self.record_deadlines();
        let deadlines = source.normalize(rule);

        let mut tags: Vec<String> = self
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        tags.sort();
        tags.dedup();

        let country = extract_country(self.place.as_deref()).map(str::to_string);

        ConferenceEntry {
            id: self.id,
            title: self.title,
            full_name: self.full_name,
            year: self.year,
            link: self.link,
            paperslink: self.paperslink,
            pwclink: self.pwclink,
            place: self.place,
            country,
            date: self.date,
            start: self.start,
            end: self.end,
            tags,
            era_rating: self.era_rating,
            hindex: self.hindex,
            note: self.note,
            deadline_shape: source.shape(),
            deadlines,
        }
    }
}

/// Normalized conference entry
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ConferenceEntry {
    pub id: String,
    pub title: String,
    pub full_name: Option<String>,
    pub year: i32,
    pub link: Option<String>,
    pub paperslink: Option<String>,
    pub pwclink: Option<String>,
    /// Free-text "City, ..., Country"
    pub place: Option<String>,
    /// Derived from `place`: the text after its last comma
    pub country: Option<String>,
    /// Human-readable conference dates
    pub date: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Sorted, without duplicates
    pub tags: Vec<String>,
    pub era_rating: Option<EraRating>,
    pub hindex: Option<f64>,
    pub note: Option<String>,
    /// Shape the deadlines were written in
    pub deadline_shape: DeadlineShape,
    pub deadlines: Vec<Deadline>,
}

impl ConferenceEntry {
    /// Country derived from `place`
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Full name when known, otherwise the short title
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeadlineType;

    const LEGACY: &str = r#"
title: CVPR
year: 2026
id: cvpr26
fullName: IEEE/CVF Conference on Computer Vision and Pattern Recognition
link: https://cvpr.thecvf.com/
deadline: '2025-11-14 23:59:59'
abstract_deadline: '2025-11-07 23:59:59'
timezone: America/Los_Angeles
place: Denver, CO, USA
date: June 3-7, 2026
start: 2026-06-03
end: 2026-06-07
tags: [computer vision, machine learning, computer vision]
eraRating: a
hindex: 440
"#;

    const CURRENT: &str = r#"
title: NeurIPS
year: 2026
id: neurips26
full_name: Conference on Neural Information Processing Systems
place: San Diego, CA, USA
era_rating: A
tags: [machine learning]
deadlines:
  - type: abstract
    label: Abstract submission
    date: '2026-05-08 23:59:59'
    timezone: AoE
  - type: paper
    date: '2026-05-15 23:59:59'
"#;

    #[test]
    fn test_parse_legacy_record() {
        let record: ConferenceRecord = serde_yaml::from_str(LEGACY).unwrap();
        assert_eq!(record.era_rating, Some(EraRating::A));
        assert!(!record.has_mixed_shapes());

        let entry = record.into_entry(LegacyDeadlineRule::Infer);
        assert_eq!(entry.deadline_shape, DeadlineShape::Legacy);
        assert_eq!(entry.tags, vec!["computer vision", "machine learning"]);
        assert_eq!(entry.start, NaiveDate::from_ymd_opt(2026, 6, 3));
        let kinds: Vec<_> = entry.deadlines.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DeadlineType::Abstract, DeadlineType::Paper]);
        assert!(entry.deadlines.iter().all(|d| d.timezone == "America/Los_Angeles"));
    }

    #[test]
    fn test_parse_current_record() {
        let record: ConferenceRecord = serde_yaml::from_str(CURRENT).unwrap();
        let entry = record.into_entry(LegacyDeadlineRule::Infer);
        assert_eq!(entry.deadline_shape, DeadlineShape::Current);
        assert_eq!(entry.deadlines.len(), 2);
        assert_eq!(entry.deadlines[0].label, "Abstract submission");
        assert_eq!(entry.deadlines[1].label, "Paper deadline");
        assert_eq!(entry.deadlines[1].timezone, "AoE");
        assert_eq!(entry.country(), Some("USA"));
    }

    #[test]
    fn test_list_shape_wins_over_legacy() {
        let yaml = format!("{CURRENT}deadline: '2026-01-01 00:00'\n");
        let record: ConferenceRecord = serde_yaml::from_str(&yaml).unwrap();
        assert!(record.has_mixed_shapes());
        let entry = record.into_entry(LegacyDeadlineRule::Infer);
        assert_eq!(entry.deadline_shape, DeadlineShape::Current);
        assert_eq!(entry.deadlines.len(), 2);
    }

    #[test]
    fn test_record_without_deadlines() {
        let record: ConferenceRecord =
            serde_yaml::from_str("title: Workshop\nyear: 2026\nid: ws26\n").unwrap();
        let entry = record.into_entry(LegacyDeadlineRule::Infer);
        assert!(entry.deadlines.is_empty());
        assert_eq!(entry.country(), None);
        assert_eq!(entry.display_name(), "Workshop");
    }

    #[test]
    fn test_unknown_rating_rejected() {
        let result: Result<ConferenceRecord, _> =
            serde_yaml::from_str("title: X\nyear: 2026\nid: x26\nera_rating: D\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_rating_parse() {
        assert_eq!(EraRating::parse("b"), Some(EraRating::B));
        assert_eq!(EraRating::parse(" C "), Some(EraRating::C));
        assert_eq!(EraRating::parse("A*"), None);
    }

    #[test]
    fn test_serialize_includes_country() {
        let record: ConferenceRecord = serde_yaml::from_str(CURRENT).unwrap();
        let entry = record.into_entry(LegacyDeadlineRule::Infer);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["country"], "USA");
        assert_eq!(json["era_rating"], "A");
        assert_eq!(json["deadline_shape"], "current");
        assert_eq!(json["deadlines"][1]["type"], "paper");
    }

    #[test]
    fn test_openapi_schema_lists_country() {
        use utoipa::PartialSchema;

        let schema = serde_json::to_value(ConferenceEntry::schema()).unwrap();
        assert!(schema["properties"]["country"].is_object(), "{schema}");
        assert!(schema["properties"]["place"].is_object());
    }
}
