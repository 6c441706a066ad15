use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Timezone name used when a record does not declare one.
pub const DEFAULT_TIMEZONE: &str = "AoE";

/// Offset of the "Anywhere on Earth" zone, in seconds east of UTC.
const AOE_OFFSET_SECS: i32 = 12 * 3600;

/// Kind of a deadline.
///
/// Declaration order is the catalog order and is used as the last tie-break
/// when two deadlines fall on the same instant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineType {
    Abstract,
    Paper,
    Submission,
    Supplementary,
    ReviewRelease,
    RebuttalStart,
    RebuttalEnd,
    RebuttalAndRevision,
    Notification,
    CameraReady,
    Registration,
    Commitment,
    Other,
}

impl DeadlineType {
    pub const ALL: [DeadlineType; 13] = [
        DeadlineType::Abstract,
        DeadlineType::Paper,
        DeadlineType::Submission,
        DeadlineType::Supplementary,
        DeadlineType::ReviewRelease,
        DeadlineType::RebuttalStart,
        DeadlineType::RebuttalEnd,
        DeadlineType::RebuttalAndRevision,
        DeadlineType::Notification,
        DeadlineType::CameraReady,
        DeadlineType::Registration,
        DeadlineType::Commitment,
        DeadlineType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeadlineType::Abstract => "abstract",
            DeadlineType::Paper => "paper",
            DeadlineType::Submission => "submission",
            DeadlineType::Supplementary => "supplementary",
            DeadlineType::ReviewRelease => "review_release",
            DeadlineType::RebuttalStart => "rebuttal_start",
            DeadlineType::RebuttalEnd => "rebuttal_end",
            DeadlineType::RebuttalAndRevision => "rebuttal_and_revision",
            DeadlineType::Notification => "notification",
            DeadlineType::CameraReady => "camera_ready",
            DeadlineType::Registration => "registration",
            DeadlineType::Commitment => "commitment",
            DeadlineType::Other => "other",
        }
    }

    /// Label shown when the data file does not provide one
    pub fn default_label(&self) -> &'static str {
        match self {
            DeadlineType::Abstract => "Abstract deadline",
            DeadlineType::Paper => "Paper deadline",
            DeadlineType::Submission => "Submission deadline",
            DeadlineType::Supplementary => "Supplementary material deadline",
            DeadlineType::ReviewRelease => "Reviews released",
            DeadlineType::RebuttalStart => "Rebuttal period starts",
            DeadlineType::RebuttalEnd => "Rebuttal period ends",
            DeadlineType::RebuttalAndRevision => "Rebuttal and revision deadline",
            DeadlineType::Notification => "Author notification",
            DeadlineType::CameraReady => "Camera-ready deadline",
            DeadlineType::Registration => "Registration deadline",
            DeadlineType::Commitment => "Commitment deadline",
            DeadlineType::Other => "Deadline",
        }
    }
}

impl fmt::Display for DeadlineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeadlineError {
    #[error("unparseable deadline date: {value:?}")]
    InvalidDate { value: String },

    #[error("unknown timezone: {value:?}")]
    UnknownTimezone { value: String },

    #[error("{date} does not exist in timezone {timezone}")]
    NonexistentLocalTime { date: String, timezone: String },
}

/// A parsed deadline timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineZone {
    /// "Anywhere on Earth", pinned to UTC+12.
    AnywhereOnEarth,
    Fixed(FixedOffset),
    Named(Tz),
}

impl DeadlineZone {
    /// Parse `AoE`, `UTC`/`GMT`/`Z`, `UTC+H[:MM]`-style offsets or an IANA name.
    pub fn parse(raw: &str) -> Result<Self, DeadlineError> {
        let value = raw.trim();
        let unknown = || DeadlineError::UnknownTimezone {
            value: raw.to_string(),
        };

        if value.eq_ignore_ascii_case("aoe") {
            return Ok(DeadlineZone::AnywhereOnEarth);
        }
        if ["utc", "gmt", "z"].iter().any(|z| value.eq_ignore_ascii_case(z)) {
            return FixedOffset::east_opt(0)
                .map(DeadlineZone::Fixed)
                .ok_or_else(unknown);
        }

        let prefix = value.get(..3).unwrap_or_default();
        if prefix.eq_ignore_ascii_case("utc") || prefix.eq_ignore_ascii_case("gmt") {
            let offset = value.get(3..).unwrap_or_default();
            return parse_offset(offset)
                .map(DeadlineZone::Fixed)
                .ok_or_else(unknown);
        }

        value
            .parse::<Tz>()
            .map(DeadlineZone::Named)
            .map_err(|_| unknown())
    }

    /// Convert a wall-clock time in this zone to an absolute instant.
    ///
    /// Ambiguous local times (DST fall-back) resolve to the earlier instant.
    pub fn resolve(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            DeadlineZone::AnywhereOnEarth => FixedOffset::east_opt(AOE_OFFSET_SECS)?
                .from_local_datetime(&local)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
            DeadlineZone::Fixed(offset) => offset
                .from_local_datetime(&local)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
            DeadlineZone::Named(tz) => tz
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl FromStr for DeadlineZone {
    type Err = DeadlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeadlineZone::parse(s)
    }
}

/// Parse "+5", "-7", "+05:30", "+0530" into an offset.
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let mut chars = raw.chars();
    let sign = match chars.next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    let rest = chars.as_str();
    if !rest.chars().all(|c| c.is_ascii_digit() || c == ':') {
        return None;
    }

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };
    if hours.is_empty() || !hours.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes >= 60 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Parse a deadline wall-clock time.
///
/// A bare date means the end of that day.
pub fn parse_deadline_datetime(raw: &str) -> Result<NaiveDateTime, DeadlineError> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    let value = raw.trim();
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }

    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59);
    match (NaiveDate::parse_from_str(value, "%Y-%m-%d"), end_of_day) {
        (Ok(date), Some(time)) => Ok(date.and_time(time)),
        _ => Err(DeadlineError::InvalidDate {
            value: raw.to_string(),
        }),
    }
}

/// Normalized deadline attached to a conference entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Deadline {
    #[serde(rename = "type")]
    pub kind: DeadlineType,
    pub label: String,
    /// Wall-clock date as written in the data file
    pub date: String,
    /// `AoE`, a UTC offset or an IANA zone name
    pub timezone: String,
}

impl Deadline {
    pub fn new(kind: DeadlineType, date: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            kind,
            label: kind.default_label().to_string(),
            date: date.into(),
            timezone: timezone.into(),
        }
    }

    /// The absolute instant of this deadline.
    pub fn resolve(&self) -> Result<DateTime<Utc>, DeadlineError> {
        let local = parse_deadline_datetime(&self.date)?;
        let zone = DeadlineZone::parse(&self.timezone)?;
        zone.resolve(local)
            .ok_or_else(|| DeadlineError::NonexistentLocalTime {
                date: self.date.clone(),
                timezone: self.timezone.clone(),
            })
    }
}

/// A deadline as written in the current `deadlines:` list shape
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeadlineRecord {
    #[serde(rename = "type")]
    pub kind: DeadlineType,
    #[serde(default)]
    pub label: Option<String>,
    pub date: String,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl DeadlineRecord {
    pub fn into_deadline(self) -> Deadline {
        let label = self
            .label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| self.kind.default_label().to_string());
        Deadline {
            kind: self.kind,
            label,
            date: self.date,
            timezone: self
                .timezone
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        }
    }
}

/// Which type a legacy single `deadline` field becomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyDeadlineRule {
    /// `paper` when an abstract deadline precedes it, otherwise `submission`
    #[default]
    Infer,
    Paper,
    Submission,
}

impl LegacyDeadlineRule {
    pub fn main_deadline_type(&self, has_abstract: bool) -> DeadlineType {
        match self {
            LegacyDeadlineRule::Infer if has_abstract => DeadlineType::Paper,
            LegacyDeadlineRule::Infer => DeadlineType::Submission,
            LegacyDeadlineRule::Paper => DeadlineType::Paper,
            LegacyDeadlineRule::Submission => DeadlineType::Submission,
        }
    }
}

impl FromStr for LegacyDeadlineRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "infer" => Ok(LegacyDeadlineRule::Infer),
            "paper" => Ok(LegacyDeadlineRule::Paper),
            "submission" => Ok(LegacyDeadlineRule::Submission),
            other => Err(format!(
                "unknown legacy deadline type {other:?} (expected infer, paper or submission)"
            )),
        }
    }
}

/// Deadline fields of a record, in whichever shape the data file used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordDeadlines {
    Legacy {
        deadline: Option<String>,
        abstract_deadline: Option<String>,
        timezone: Option<String>,
    },
    Current(Vec<DeadlineRecord>),
}

impl RecordDeadlines {
    pub fn shape(&self) -> DeadlineShape {
        match self {
            RecordDeadlines::Legacy { .. } => DeadlineShape::Legacy,
            RecordDeadlines::Current(_) => DeadlineShape::Current,
        }
    }

    /// Resolve into the normalized list. Legacy fields become one or two
    /// synthesized entries, abstract first.
    pub fn normalize(&self, rule: LegacyDeadlineRule) -> Vec<Deadline> {
        match self {
            RecordDeadlines::Current(records) => records
                .iter()
                .cloned()
                .map(DeadlineRecord::into_deadline)
                .collect(),
            RecordDeadlines::Legacy {
                deadline,
                abstract_deadline,
                timezone,
            } => {
                let timezone = timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
                let mut deadlines = Vec::with_capacity(2);
                if let Some(date) = abstract_deadline {
                    deadlines.push(Deadline::new(DeadlineType::Abstract, date, timezone));
                }
                if let Some(date) = deadline {
                    let kind = rule.main_deadline_type(abstract_deadline.is_some());
                    deadlines.push(Deadline::new(kind, date, timezone));
                }
                deadlines
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineShape {
    Legacy,
    Current,
}
