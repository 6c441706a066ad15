//! The conference record store.
//!
//! Records are read once from YAML at startup, normalized, and de-duplicated
//! by id (first occurrence wins). Derived catalogs and the sorted deadline
//! timeline are computed here once, since the record list never changes
//! after load.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::{DataError, DataResult};
use crate::filter::{FilterCache, FilterState};
use crate::models::{ConferenceEntry, ConferenceRecord, LegacyDeadlineRule};
use crate::views::{self, DeadlineItem, TimelineSlot};

/// A record together with the file it came from
#[derive(Debug, Clone)]
pub struct LoadedRecord {
    pub source: PathBuf,
    pub record: ConferenceRecord,
}

fn is_yaml_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"))
}

/// YAML files in `dir`, sorted by file name
fn yaml_files(dir: &Path) -> DataResult<Vec<PathBuf>> {
    let read_dir = fs::read_dir(dir).map_err(|source| DataError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for item in read_dir {
        let item = item.map_err(|source| DataError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = item.path();
        if is_yaml_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Conference series names in a data directory (file stems), sorted.
pub fn conference_names(dir: &Path) -> DataResult<Vec<String>> {
    if !dir.is_dir() {
        return Err(DataError::NotFound(dir.to_path_buf()));
    }
    let mut names: Vec<String> = yaml_files(dir)?
        .iter()
        .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
        .collect();
    names.sort();
    Ok(names)
}

/// Parse one YAML document holding a list of records.
pub fn parse_records(yaml: &str, source: &Path) -> DataResult<Vec<ConferenceRecord>> {
    // An empty file is an empty list
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yaml::from_str(yaml).map_err(|source_err| DataError::Yaml {
        path: source.to_path_buf(),
        source: source_err,
    })
}

fn load_file(path: &Path) -> DataResult<Vec<LoadedRecord>> {
    let content = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_records(&content, path)?
        .into_iter()
        .map(|record| LoadedRecord {
            source: path.to_path_buf(),
            record,
        })
        .collect())
}

/// Read every record under `path`, which is either a single YAML file or a
/// directory of them. Order: file name, then position within the file.
pub fn load_records(path: &Path) -> DataResult<Vec<LoadedRecord>> {
    if path.is_file() {
        return load_file(path);
    }
    if !path.is_dir() {
        return Err(DataError::NotFound(path.to_path_buf()));
    }

    let mut records = Vec::new();
    for file in yaml_files(path)? {
        records.extend(load_file(&file)?);
    }
    Ok(records)
}

/// Immutable snapshot of all conference entries plus derived views
#[derive(Debug)]
pub struct ConferenceRepository {
    entries: Vec<ConferenceEntry>,
    countries: Vec<String>,
    tags: Vec<String>,
    timeline: Vec<TimelineSlot>,
    filter_cache: FilterCache,
}

impl ConferenceRepository {
    /// Load and normalize all records under `path`.
    pub fn load(path: &Path, rule: LegacyDeadlineRule) -> DataResult<Self> {
        let records = load_records(path)?;
        info!("Loaded {} conference records from {}", records.len(), path.display());
        Ok(Self::from_records(records.into_iter().map(|r| r.record), rule))
    }

    pub fn from_yaml_str(yaml: &str, rule: LegacyDeadlineRule) -> DataResult<Self> {
        let records = parse_records(yaml, Path::new("<inline>"))?;
        Ok(Self::from_records(records, rule))
    }

    pub fn from_records(
        records: impl IntoIterator<Item = ConferenceRecord>,
        rule: LegacyDeadlineRule,
    ) -> Self {
        Self::from_entries(records.into_iter().map(|r| r.into_entry(rule)).collect())
    }

    /// Build from normalized entries. Later entries reusing an id are dropped.
    pub fn from_entries(entries: Vec<ConferenceEntry>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(entries.len());
        for entry in entries {
            if seen.contains(&entry.id) {
                warn!(conference = %entry.id, "Ignoring duplicate conference id");
                continue;
            }
            seen.insert(entry.id.clone());
            unique.push(entry);
        }

        let countries = views::country_catalog(&unique);
        let tags = views::tag_catalog(&unique);
        let timeline = views::build_timeline(&unique);

        Self {
            entries: unique,
            countries,
            tags,
            timeline,
            filter_cache: FilterCache::default(),
        }
    }

    pub fn entries(&self) -> &[ConferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ConferenceEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Sorted, distinct countries
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Sorted, distinct tags
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Every resolvable deadline in chronological order
    pub fn timeline(&self) -> Vec<DeadlineItem<'_>> {
        self.items(&self.timeline)
    }

    /// Deadlines strictly after `now`, in chronological order
    pub fn upcoming(&self, now: DateTime<Utc>) -> Vec<DeadlineItem<'_>> {
        self.items(views::upcoming_slots(&self.timeline, now))
    }

    fn items(&self, slots: &[TimelineSlot]) -> Vec<DeadlineItem<'_>> {
        slots
            .iter()
            .filter_map(|slot| DeadlineItem::from_slot(&self.entries, slot))
            .collect()
    }

    /// Entries matching `state`, in load order
    pub fn filtered(&self, state: &FilterState) -> Vec<&ConferenceEntry> {
        if state.is_empty() {
            return self.entries.iter().collect();
        }
        self.filter_cache
            .matching_indices(&self.entries, state)
            .iter()
            .filter_map(|&idx| self.entries.get(idx))
            .collect()
    }
}
