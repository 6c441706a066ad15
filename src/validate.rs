//! Data-file checks run by the `check_conferences` tool.
//!
//! The server tolerates everything reported here (it drops duplicates and
//! skips unresolvable deadlines); these checks exist so the problems get
//! fixed in the data files.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::LegacyDeadlineRule;
use crate::repository::LoadedRecord;
use crate::utils::{extract_country, make_conference_id, parse_conference_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub source: String,
    pub conference: String,
    pub message: String,
}

impl Finding {
    fn new(severity: Severity, loaded: &LoadedRecord, message: impl Into<String>) -> Self {
        Self {
            severity,
            source: loaded.source.display().to_string(),
            conference: loaded.record.id.clone(),
            message: message.into(),
        }
    }
}

pub fn has_errors(findings: &[Finding]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Error)
}

/// Check every record, in order.
pub fn check_records(records: &[LoadedRecord], rule: LegacyDeadlineRule) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut first_seen: HashMap<&str, &LoadedRecord> = HashMap::new();

    for loaded in records {
        let record = &loaded.record;

        if let Some(first) = first_seen.get(record.id.as_str()) {
            findings.push(Finding::new(
                Severity::Error,
                loaded,
                format!("duplicate id, first defined in {}", first.source.display()),
            ));
        } else {
            first_seen.insert(record.id.as_str(), loaded);
        }

        match parse_conference_id(&record.id) {
            Some((_, id_year)) if id_year != record.year => findings.push(Finding::new(
                Severity::Error,
                loaded,
                format!("id implies year {id_year} but year is {}", record.year),
            )),
            _ => {
                let expected = make_conference_id(&record.title, record.year);
                if record.id != expected {
                    findings.push(Finding::new(
                        Severity::Warning,
                        loaded,
                        format!("id does not follow the title+year convention (expected {expected})"),
                    ));
                }
            }
        }

        if extract_country(record.place.as_deref()).is_none() {
            findings.push(Finding::new(
                Severity::Warning,
                loaded,
                "no country can be derived from place",
            ));
        }

        if let (Some(start), Some(end)) = (record.start, record.end) {
            if start > end {
                findings.push(Finding::new(
                    Severity::Error,
                    loaded,
                    format!("start {start} is after end {end}"),
                ));
            }
        }

        if record.has_mixed_shapes() {
            findings.push(Finding::new(
                Severity::Warning,
                loaded,
                "both a deadlines list and legacy deadline fields are present; the legacy fields are ignored",
            ));
        }

        let deadlines = record.record_deadlines().normalize(rule);
        if deadlines.is_empty() {
            findings.push(Finding::new(Severity::Warning, loaded, "no deadlines"));
        }
        for deadline in &deadlines {
            if let Err(e) = deadline.resolve() {
                findings.push(Finding::new(
                    Severity::Error,
                    loaded,
                    format!("{} deadline: {}", deadline.kind, e),
                ));
            }
        }
    }

    findings
}
