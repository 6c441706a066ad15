use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;

use crate::app::AppState;
use crate::models::ConferenceEntry;

#[derive(Template)]
#[template(path = "conference_detail.html")]
struct ConferenceDetailTemplate {
    conference: ConferenceDetail,
    deadlines: Vec<DeadlineDetail>,
}

struct ConferenceDetail {
    id: String,
    title: String,
    year: i32,
    full_name: String,
    place: String,
    country: String,
    dates: String,
    link: String,
    paperslink: String,
    pwclink: String,
    tags: String,
    era_rating: String,
    hindex: String,
    note: String,
}

struct DeadlineDetail {
    label: String,
    kind: String,
    local_time: String,
    utc_time: String,
    passed: bool,
}

fn or_dash(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| String::from("-"))
}

fn conference_detail_view(entry: &ConferenceEntry) -> ConferenceDetail {
    let dates = match (&entry.date, entry.start, entry.end) {
        (Some(date), _, _) => date.clone(),
        (None, Some(start), Some(end)) => format!("{} to {}", start, end),
        (None, Some(start), None) => start.to_string(),
        _ => String::from("-"),
    };

    ConferenceDetail {
        id: entry.id.clone(),
        title: entry.title.clone(),
        year: entry.year,
        full_name: entry.display_name().to_string(),
        place: or_dash(entry.place.as_deref()),
        country: or_dash(entry.country()),
        dates,
        link: entry.link.clone().unwrap_or_default(),
        paperslink: entry.paperslink.clone().unwrap_or_default(),
        pwclink: entry.pwclink.clone().unwrap_or_default(),
        tags: if entry.tags.is_empty() {
            String::from("-")
        } else {
            entry.tags.join(", ")
        },
        era_rating: or_dash(entry.era_rating.as_ref().map(|r| r.as_str())),
        hindex: entry
            .hindex
            .map(|h| h.to_string())
            .unwrap_or_else(|| String::from("-")),
        note: entry.note.clone().unwrap_or_default(),
    }
}

pub async fn conference_detail(
    State(repo): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, StatusCode> {
    let entry = repo
        .get(&id)
        .or_else(|| repo.get(&id.to_lowercase()))
        .ok_or(StatusCode::NOT_FOUND)?;

    let now = Utc::now();
    let deadlines = entry
        .deadlines
        .iter()
        .map(|deadline| {
            let instant = deadline.resolve();
            DeadlineDetail {
                label: deadline.label.clone(),
                kind: deadline.kind.to_string(),
                local_time: format!("{} ({})", deadline.date, deadline.timezone),
                utc_time: match &instant {
                    Ok(instant) => instant.format("%Y-%m-%d %H:%M UTC").to_string(),
                    Err(e) => e.to_string(),
                },
                passed: instant.is_ok_and(|instant| instant <= now),
            }
        })
        .collect();

    let template = ConferenceDetailTemplate {
        conference: conference_detail_view(entry),
        deadlines,
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
