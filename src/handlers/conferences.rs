use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::app::AppState;
use crate::filter::{FilterParams, FilterState};
use crate::models::ConferenceEntry;

#[utoipa::path(
    get,
    path = "/api/conferences",
    tag = "conferences",
    params(FilterParams),
    responses(
        (status = 200, description = "Conferences matching the filter, in data-file order", body = Vec<ConferenceEntry>)
    )
)]
pub async fn list_conferences(
    State(repo): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Json<Vec<ConferenceEntry>> {
    let state = FilterState::from_params(&params);
    let conferences = repo.filtered(&state).into_iter().cloned().collect();
    Json(conferences)
}

#[utoipa::path(
    get,
    path = "/api/conferences/{id}",
    tag = "conferences",
    params(("id" = String, Path, description = "Conference id (e.g., neurips26)")),
    responses(
        (status = 200, description = "Conference found", body = ConferenceEntry),
        (status = 404, description = "Conference not found")
    )
)]
pub async fn get_conference(
    State(repo): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConferenceEntry>, StatusCode> {
    // Ids are lowercase in the data files; accept NEURIPS26 as well
    repo.get(&id)
        .or_else(|| repo.get(&id.to_lowercase()))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[utoipa::path(
    get,
    path = "/api/countries",
    tag = "conferences",
    responses(
        (status = 200, description = "Sorted, distinct countries derived from conference places", body = Vec<String>)
    )
)]
pub async fn list_countries(State(repo): State<AppState>) -> Json<Vec<String>> {
    Json(repo.countries().to_vec())
}

#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "conferences",
    responses(
        (status = 200, description = "Sorted, distinct conference tags", body = Vec<String>)
    )
)]
pub async fn list_tags(State(repo): State<AppState>) -> Json<Vec<String>> {
    Json(repo.tags().to_vec())
}
