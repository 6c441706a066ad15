//! User-selected filter criteria.
//!
//! A `FilterState` is immutable; every change goes through
//! [`FilterState::apply`] which returns the next state.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use serde::Deserialize;
use utoipa::IntoParams;

use crate::models::{ConferenceEntry, EraRating};
use crate::utils::text_matches;
use crate::views::DeadlineItem;

/// Filter criteria. An empty dimension does not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterState {
    pub countries: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub ratings: BTreeSet<EraRating>,
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    SetCountries(BTreeSet<String>),
    ToggleCountry(String),
    ClearCountries,
    SetTags(BTreeSet<String>),
    ToggleTag(String),
    SetRatings(BTreeSet<EraRating>),
    ToggleRating(EraRating),
    SetQuery(Option<String>),
    ClearAll,
}

fn toggle<T: Ord>(mut set: BTreeSet<T>, value: T) -> BTreeSet<T> {
    if !set.remove(&value) {
        set.insert(value);
    }
    set
}

impl FilterState {
    /// Next state after `action`. `self` is left untouched.
    pub fn apply(&self, action: FilterAction) -> FilterState {
        let mut next = self.clone();
        match action {
            FilterAction::SetCountries(countries) => next.countries = countries,
            FilterAction::ToggleCountry(country) => {
                next.countries = toggle(next.countries, country)
            }
            FilterAction::ClearCountries => next.countries.clear(),
            FilterAction::SetTags(tags) => next.tags = tags,
            FilterAction::ToggleTag(tag) => next.tags = toggle(next.tags, tag),
            FilterAction::SetRatings(ratings) => next.ratings = ratings,
            FilterAction::ToggleRating(rating) => next.ratings = toggle(next.ratings, rating),
            FilterAction::SetQuery(query) => {
                next.query = query.filter(|q| !q.trim().is_empty())
            }
            FilterAction::ClearAll => next = FilterState::default(),
        }
        next
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
            && self.tags.is_empty()
            && self.ratings.is_empty()
            && self.query.is_none()
    }

    /// Number of selected values across all dimensions, the query counting as one
    pub fn active_count(&self) -> usize {
        self.countries.len()
            + self.tags.len()
            + self.ratings.len()
            + usize::from(self.query.is_some())
    }

    fn matches_country(&self, entry: &ConferenceEntry) -> bool {
        if self.countries.is_empty() {
            return true;
        }
        entry
            .country()
            .is_some_and(|country| self.countries.contains(country))
    }

    fn matches_tags(&self, entry: &ConferenceEntry) -> bool {
        self.tags.is_empty() || entry.tags.iter().any(|tag| self.tags.contains(tag))
    }

    fn matches_rating(&self, entry: &ConferenceEntry) -> bool {
        self.ratings.is_empty()
            || entry
                .era_rating
                .is_some_and(|rating| self.ratings.contains(&rating))
    }

    fn matches_query(&self, entry: &ConferenceEntry) -> bool {
        let Some(query) = self.query.as_deref() else {
            return true;
        };
        [
            Some(entry.title.as_str()),
            entry.full_name.as_deref(),
            Some(entry.id.as_str()),
            entry.place.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| text_matches(field, query))
    }

    /// AND across dimensions, OR within a dimension.
    pub fn matches(&self, entry: &ConferenceEntry) -> bool {
        self.matches_country(entry)
            && self.matches_tags(entry)
            && self.matches_rating(entry)
            && self.matches_query(entry)
    }

    /// Parse the comma-separated query-string form.
    ///
    /// Unknown rating letters are ignored.
    pub fn from_params(params: &FilterParams) -> FilterState {
        let split = |raw: Option<&str>| -> BTreeSet<String> {
            split_list(raw.unwrap_or_default()).into_iter().collect()
        };

        FilterState {
            countries: split(params.countries.as_deref()),
            tags: split(params.tags.as_deref()),
            ratings: split(params.ratings.as_deref())
                .iter()
                .filter_map(|r| EraRating::parse(r))
                .collect(),
            query: params
                .q
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_string),
        }
    }

    /// Query-string pairs for this state, omitting empty dimensions
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let join = |set: &BTreeSet<String>| join_list(set.iter().map(String::as_str));
        let mut pairs = Vec::new();
        if !self.countries.is_empty() {
            pairs.push(("countries", join(&self.countries)));
        }
        if !self.tags.is_empty() {
            pairs.push(("tags", join(&self.tags)));
        }
        if !self.ratings.is_empty() {
            let ratings: Vec<&str> = self.ratings.iter().map(EraRating::as_str).collect();
            pairs.push(("ratings", ratings.join(",")));
        }
        if let Some(query) = &self.query {
            pairs.push(("q", query.clone()));
        }
        pairs
    }
}

/// Split a comma-separated list. `\,` is a literal comma and `\\` a literal
/// backslash. Items are trimmed; empty items are dropped.
pub fn split_list(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped @ (',' | '\\')) => current.push(escaped),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            ',' => items.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    items.push(current);

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Inverse of [`split_list`].
pub fn join_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items
        .into_iter()
        .map(|item| item.replace('\\', "\\\\").replace(',', "\\,"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Filter query parameters shared by the API and the HTML pages
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterParams {
    /// Comma-separated countries, e.g. `USA,Brazil`
    pub countries: Option<String>,
    /// Comma-separated tags; write a comma inside a tag as `\,`
    pub tags: Option<String>,
    /// Comma-separated ERA ratings, e.g. `A,B`
    pub ratings: Option<String>,
    /// Free-text search over title, full name, id and place
    pub q: Option<String>,
}

/// Entries matching `state`, in input order.
pub fn filter_entries<'a>(
    entries: &'a [ConferenceEntry],
    state: &FilterState,
) -> Vec<&'a ConferenceEntry> {
    entries.iter().filter(|entry| state.matches(entry)).collect()
}

/// Deadline items whose conference matches `state`, order preserved.
pub fn filter_deadlines<'a>(
    items: impl IntoIterator<Item = DeadlineItem<'a>>,
    state: &FilterState,
) -> Vec<DeadlineItem<'a>> {
    items
        .into_iter()
        .filter(|item| state.matches(item.conference))
        .collect()
}

/// Remembers the entry indices matching the most recently requested state.
#[derive(Debug, Default)]
pub struct FilterCache {
    last: Mutex<Option<(FilterState, Arc<[usize]>)>>,
}

impl FilterCache {
    pub fn matching_indices(
        &self,
        entries: &[ConferenceEntry],
        state: &FilterState,
    ) -> Arc<[usize]> {
        let mut guard = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some((cached_state, indices)) = guard.as_ref() {
            if cached_state == state {
                return Arc::clone(indices);
            }
        }

        let indices: Arc<[usize]> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| state.matches(entry))
            .map(|(idx, _)| idx)
            .collect();
        *guard = Some((state.clone(), Arc::clone(&indices)));
        indices
    }
}
