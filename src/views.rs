//! Derived views over the conference list.
//!
//! Everything here is a pure function of its input. The repository computes
//! the catalogs and the sorted timeline once when it is built.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::models::{ConferenceEntry, Deadline, DeadlineType};

/// Distinct countries across all entries, sorted ascending.
pub fn country_catalog(entries: &[ConferenceEntry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(ConferenceEntry::country)
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Distinct tags across all entries, sorted ascending.
pub fn tag_catalog(entries: &[ConferenceEntry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|e| e.tags.iter().map(String::as_str))
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Position of one resolved deadline inside an entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineSlot {
    pub entry: usize,
    pub deadline: usize,
    pub instant: DateTime<Utc>,
}

/// A deadline paired with its conference and absolute instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadlineItem<'a> {
    pub conference: &'a ConferenceEntry,
    pub deadline: &'a Deadline,
    pub instant: DateTime<Utc>,
}

impl<'a> DeadlineItem<'a> {
    pub fn from_slot(entries: &'a [ConferenceEntry], slot: &TimelineSlot) -> Option<Self> {
        let conference = entries.get(slot.entry)?;
        let deadline = conference.deadlines.get(slot.deadline)?;
        Some(Self {
            conference,
            deadline,
            instant: slot.instant,
        })
    }
}

/// Sort key: instant, then conference id, then deadline type.
fn timeline_key<'a>(
    entries: &'a [ConferenceEntry],
    slot: &TimelineSlot,
) -> (DateTime<Utc>, &'a str, DeadlineType) {
    let entry = &entries[slot.entry];
    (slot.instant, entry.id.as_str(), entry.deadlines[slot.deadline].kind)
}

/// Resolve every deadline and sort chronologically.
///
/// Deadlines whose date or timezone cannot be interpreted are left out and
/// logged.
pub fn build_timeline(entries: &[ConferenceEntry]) -> Vec<TimelineSlot> {
    let mut slots = Vec::new();

    for (entry_idx, entry) in entries.iter().enumerate() {
        for (deadline_idx, deadline) in entry.deadlines.iter().enumerate() {
            match deadline.resolve() {
                Ok(instant) => slots.push(TimelineSlot {
                    entry: entry_idx,
                    deadline: deadline_idx,
                    instant,
                }),
                Err(e) => warn!(
                    conference = %entry.id,
                    deadline = %deadline.kind,
                    "Skipping deadline: {}",
                    e
                ),
            }
        }
    }

    // Stable sort keeps file order for deadlines that compare equal
    slots.sort_by(|a, b| timeline_key(entries, a).cmp(&timeline_key(entries, b)));

    slots
}

/// Flatten all resolvable deadlines into one chronological sequence.
pub fn flatten_deadlines(entries: &[ConferenceEntry]) -> Vec<DeadlineItem<'_>> {
    build_timeline(entries)
        .iter()
        .filter_map(|slot| DeadlineItem::from_slot(entries, slot))
        .collect()
}

/// Suffix of a sorted timeline strictly after `now`.
pub fn upcoming_slots(slots: &[TimelineSlot], now: DateTime<Utc>) -> &[TimelineSlot] {
    let start = slots.partition_point(|slot| slot.instant <= now);
    &slots[start..]
}

/// Suffix of a sorted deadline sequence strictly after `now`.
pub fn upcoming<'s, 'a>(
    items: &'s [DeadlineItem<'a>],
    now: DateTime<Utc>,
) -> &'s [DeadlineItem<'a>] {
    let start = items.partition_point(|item| item.instant <= now);
    &items[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConferenceRecord, DeadlineType, LegacyDeadlineRule};

    fn entries(yaml: &str) -> Vec<ConferenceEntry> {
        let records: Vec<ConferenceRecord> = serde_yaml::from_str(yaml).unwrap();
        records
            .into_iter()
            .map(|r| r.into_entry(LegacyDeadlineRule::Infer))
            .collect()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn labels(items: &[DeadlineItem<'_>]) -> Vec<String> {
        items
            .iter()
            .map(|i| format!("{}/{}", i.conference.id, i.deadline.kind))
            .collect()
    }

    const SCENARIO: &str = r#"
- title: NeurIPS
  year: 2026
  id: neurips26
  place: San Diego, CA, USA
  deadlines:
    - type: paper
      date: '2026-05-15 23:59:59'
      timezone: AoE
- title: ICLR
  year: 2026
  id: iclr26
  place: Rio de Janeiro, Brazil
  deadlines:
    - type: abstract
      date: '2026-01-20 23:59:59'
      timezone: UTC
"#;

    #[test]
    fn test_country_catalog_scenario() {
        let entries = entries(SCENARIO);
        assert_eq!(country_catalog(&entries), vec!["Brazil", "USA"]);
    }

    #[test]
    fn test_country_catalog_dedup_sorted() {
        let entries = entries(
            r#"
- {title: A, year: 2026, id: a26, place: "Paris, France"}
- {title: B, year: 2026, id: b26, place: "Lyon, France."}
- {title: C, year: 2026, id: c26, place: "Remote"}
- {title: D, year: 2026, id: d26, place: ""}
- {title: E, year: 2026, id: e26}
- {title: F, year: 2026, id: f26, place: "Austin, TX, USA"}
"#,
        );
        let catalog = country_catalog(&entries);
        assert_eq!(catalog, vec!["France", "Remote", "USA"]);
        assert_eq!(country_catalog(&entries), catalog);
    }

    #[test]
    fn test_country_catalog_case_sensitive() {
        let entries = entries(
            r#"
- {title: A, year: 2026, id: a26, place: "usa"}
- {title: B, year: 2026, id: b26, place: "USA"}
"#,
        );
        assert_eq!(country_catalog(&entries), vec!["USA", "usa"]);
    }

    #[test]
    fn test_tag_catalog() {
        let entries = entries(
            r#"
- {title: A, year: 2026, id: a26, tags: [nlp, machine learning]}
- {title: B, year: 2026, id: b26, tags: [computer vision, nlp]}
"#,
        );
        assert_eq!(tag_catalog(&entries), vec!["computer vision", "machine learning", "nlp"]);
    }

    #[test]
    fn test_flatten_scenario_order() {
        let entries = entries(SCENARIO);
        let items = flatten_deadlines(&entries);
        assert_eq!(labels(&items), vec!["iclr26/abstract", "neurips26/paper"]);
        assert_eq!(items[1].instant, utc("2026-05-15T11:59:59Z"));
    }

    #[test]
    fn test_tie_break_by_id_then_type() {
        let entries = entries(
            r#"
- title: B
  year: 2026
  id: b26
  deadlines:
    - {type: abstract, date: '2026-03-01 12:00:00', timezone: UTC}
- title: A
  year: 2026
  id: a26
  deadlines:
    - {type: submission, date: '2026-03-01 12:00:00', timezone: UTC}
    - {type: abstract, date: '2026-03-02 00:00:00', timezone: UTC+12}
"#,
        );
        // a26/abstract resolves to 2026-03-01T12:00:00Z as well
        let items = flatten_deadlines(&entries);
        assert_eq!(
            labels(&items),
            vec!["a26/abstract", "a26/submission", "b26/abstract"]
        );
    }

    #[test]
    fn test_timezones_resolve_before_sorting() {
        let entries = entries(
            r#"
- title: West
  year: 2026
  id: west26
  deadlines:
    - {type: paper, date: '2026-02-01 20:00:00', timezone: America/Los_Angeles}
- title: East
  year: 2026
  id: east26
  deadlines:
    - {type: paper, date: '2026-02-02 02:00:00', timezone: Asia/Tokyo}
"#,
        );
        // Tokyo 02:00 is 17:00Z on Feb 1; LA 20:00 is 04:00Z on Feb 2
        let items = flatten_deadlines(&entries);
        assert_eq!(labels(&items), vec!["east26/paper", "west26/paper"]);
    }

    #[test]
    fn test_unparseable_deadlines_are_skipped() {
        let entries = entries(
            r#"
- title: A
  year: 2026
  id: a26
  deadlines:
    - {type: abstract, date: TBA, timezone: AoE}
    - {type: paper, date: '2026-04-01', timezone: Moon/Base}
    - {type: camera_ready, date: '2026-06-01', timezone: AoE}
"#,
        );
        let items = flatten_deadlines(&entries);
        assert_eq!(labels(&items), vec!["a26/camera_ready"]);
    }

    #[test]
    fn test_legacy_records_flatten() {
        let entries = entries(
            r#"
- title: Old
  year: 2026
  id: old26
  deadline: '2026-03-01 23:59:59'
  timezone: AoE
"#,
        );
        let items = flatten_deadlines(&entries);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].deadline.kind, DeadlineType::Submission);
        assert_eq!(items[0].instant, utc("2026-03-01T11:59:59Z"));
        // Source record is untouched by flattening
        assert_eq!(flatten_deadlines(&entries), items);
    }

    #[test]
    fn test_upcoming_excludes_past_and_now() {
        let entries = entries(SCENARIO);
        let items = flatten_deadlines(&entries);

        let before_both = utc("2025-12-01T00:00:00Z");
        assert_eq!(upcoming(&items, before_both).len(), 2);

        let between = utc("2026-02-01T00:00:00Z");
        assert_eq!(labels(upcoming(&items, between)), vec!["neurips26/paper"]);

        let exactly = utc("2026-05-15T11:59:59Z");
        assert!(upcoming(&items, exactly).is_empty());
    }

    #[test]
    fn test_upcoming_slots_matches_items() {
        let entries = entries(SCENARIO);
        let slots = build_timeline(&entries);
        let now = utc("2026-02-01T00:00:00Z");
        let remaining = upcoming_slots(&slots, now);
        assert_eq!(remaining.len(), 1);
        let item = DeadlineItem::from_slot(&entries, &remaining[0]).unwrap();
        assert_eq!(item.conference.id, "neurips26");
    }

    #[test]
    fn test_empty_input() {
        let entries: Vec<ConferenceEntry> = Vec::new();
        assert!(country_catalog(&entries).is_empty());
        assert!(tag_catalog(&entries).is_empty());
        assert!(flatten_deadlines(&entries).is_empty());
        assert!(build_timeline(&entries).is_empty());
    }
}
