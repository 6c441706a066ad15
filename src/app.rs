//! HTTP router: JSON API, HTML pages and the OpenAPI documentation.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::{ConferenceEntry, Deadline, DeadlineShape, DeadlineType, EraRating};
use crate::repository::ConferenceRepository;

/// Shared, read-only application state
pub type AppState = Arc<ConferenceRepository>;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AI Conference Deadlines API",
        description = "Upcoming submission deadlines of AI conferences, with country, tag and rating filters"
    ),
    paths(
        handlers::conferences::list_conferences,
        handlers::conferences::get_conference,
        handlers::conferences::list_countries,
        handlers::conferences::list_tags,
        handlers::deadlines::list_deadlines,
    ),
    components(schemas(
        ConferenceEntry,
        Deadline,
        DeadlineType,
        DeadlineShape,
        EraRating,
        handlers::deadlines::DeadlineResponse,
    )),
    tags(
        (name = "conferences", description = "Conference records and filter catalogs"),
        (name = "deadlines", description = "Chronological deadline timeline")
    )
)]
pub struct ApiDoc;

pub fn router(repo: AppState) -> Router {
    Router::new()
        // HTML pages
        .route("/", get(handlers::web::home))
        .route("/conference/{id}", get(handlers::web::conference_detail))
        // JSON API
        .route("/api/conferences", get(handlers::list_conferences))
        .route("/api/conferences/{id}", get(handlers::get_conference))
        .route("/api/deadlines", get(handlers::list_deadlines))
        .route("/api/countries", get(handlers::list_countries))
        .route("/api/tags", get(handlers::list_tags))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(repo)
}
