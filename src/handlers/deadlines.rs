use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::app::AppState;
use crate::filter::{filter_deadlines, FilterParams, FilterState};
use crate::models::DeadlineType;
use crate::views::DeadlineItem;

// Fields are spelled out rather than flattening `FilterParams`: serde_urlencoded
// cannot deserialize `include_past` as a bool through `#[serde(flatten)]`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeadlineParams {
    /// Comma-separated countries, e.g. `USA,Brazil`
    pub countries: Option<String>,
    /// Comma-separated tags; write a comma inside a tag as `\,`
    pub tags: Option<String>,
    /// Comma-separated ERA ratings, e.g. `A,B`
    pub ratings: Option<String>,
    /// Free-text search over title, full name, id and place
    pub q: Option<String>,
    /// Include deadlines that have already passed (default: false)
    pub include_past: Option<bool>,
}

impl DeadlineParams {
    fn filter_state(&self) -> FilterState {
        FilterState::from_params(&FilterParams {
            countries: self.countries.clone(),
            tags: self.tags.clone(),
            ratings: self.ratings.clone(),
            q: self.q.clone(),
        })
    }
}

/// One deadline of one conference, with its resolved instant
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeadlineResponse {
    pub conference_id: String,
    pub title: String,
    pub year: i32,
    pub country: Option<String>,
    #[serde(rename = "type")]
    pub kind: DeadlineType,
    pub label: String,
    /// Wall-clock date as written in the data file
    pub date: String,
    pub timezone: String,
    /// The deadline as a UTC instant
    pub instant: DateTime<Utc>,
    pub link: Option<String>,
}

impl From<&DeadlineItem<'_>> for DeadlineResponse {
    fn from(item: &DeadlineItem<'_>) -> Self {
        let conference = item.conference;
        Self {
            conference_id: conference.id.clone(),
            title: conference.title.clone(),
            year: conference.year,
            country: conference.country().map(str::to_string),
            kind: item.deadline.kind,
            label: item.deadline.label.clone(),
            date: item.deadline.date.clone(),
            timezone: item.deadline.timezone.clone(),
            instant: item.instant,
            link: conference.link.clone(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/deadlines",
    tag = "deadlines",
    params(DeadlineParams),
    responses(
        (status = 200, description = "Deadlines in chronological order; only upcoming ones unless include_past is set", body = Vec<DeadlineResponse>)
    )
)]
pub async fn list_deadlines(
    State(repo): State<AppState>,
    Query(params): Query<DeadlineParams>,
) -> Json<Vec<DeadlineResponse>> {
    let items = if params.include_past.unwrap_or(false) {
        repo.timeline()
    } else {
        repo.upcoming(Utc::now())
    };
    let deadlines = filter_deadlines(items, &params.filter_state())
        .iter()
        .map(DeadlineResponse::from)
        .collect();
    Json(deadlines)
}
