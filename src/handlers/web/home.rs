use askama::Template;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;
use serde::Deserialize;

use crate::app::AppState;
use crate::filter::{filter_deadlines, FilterAction, FilterParams, FilterState};
use crate::menu::{transition, MenuEvent, MenuState};
use crate::models::EraRating;

/// Query string of the home page: the filter plus the menu state
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    #[serde(flatten)]
    pub filter: FilterParams,
    pub menu: Option<String>,
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    total_conferences: usize,
    deadlines: Vec<DeadlineRow>,
    menu: MenuView,
    active_count: usize,
    query: String,
    hidden_fields: Vec<HiddenField>,
    clear_all_href: String,
}

struct DeadlineRow {
    conference_id: String,
    title: String,
    label: String,
    local_time: String,
    utc_time: String,
    place: String,
    tags: String,
}

struct MenuView {
    is_open: bool,
    country_panel: bool,
    open_href: String,
    close_href: String,
    select_country_href: String,
    back_href: String,
    clear_href: String,
    selected_countries: String,
    countries: Vec<ToggleOption>,
    tags: Vec<ToggleOption>,
    ratings: Vec<ToggleOption>,
}

struct ToggleOption {
    name: String,
    selected: bool,
    href: String,
}

struct HiddenField {
    name: &'static str,
    value: String,
}

/// URL of the home page showing `filter` with the menu in `menu`.
pub fn page_href(menu: MenuState, filter: &FilterState) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    if let Some(param) = menu.as_param() {
        serializer.append_pair("menu", param);
    }
    for (name, value) in filter.to_pairs() {
        serializer.append_pair(name, &value);
    }
    let query = serializer.finish();
    if query.is_empty() {
        String::from("/")
    } else {
        format!("/?{}", query)
    }
}

fn menu_view(
    menu: MenuState,
    filter: &FilterState,
    countries: &[String],
    tags: &[String],
) -> MenuView {
    let after = |event: MenuEvent| {
        let (next_menu, next_filter) = transition(menu, filter, event);
        page_href(next_menu, &next_filter)
    };
    let toggle = |name: String, selected: bool, action: FilterAction| ToggleOption {
        href: page_href(menu, &filter.apply(action)),
        name,
        selected,
    };

    MenuView {
        is_open: menu.is_open(),
        country_panel: menu == MenuState::OpenCountryPanel,
        open_href: after(MenuEvent::Open),
        close_href: after(MenuEvent::Close),
        select_country_href: after(MenuEvent::SelectCountry),
        back_href: after(MenuEvent::Back),
        clear_href: after(MenuEvent::Clear),
        selected_countries: filter.countries.iter().cloned().collect::<Vec<_>>().join(", "),
        countries: countries
            .iter()
            .map(|c| {
                toggle(
                    c.clone(),
                    filter.countries.contains(c),
                    FilterAction::ToggleCountry(c.clone()),
                )
            })
            .collect(),
        tags: tags
            .iter()
            .map(|t| toggle(t.clone(), filter.tags.contains(t), FilterAction::ToggleTag(t.clone())))
            .collect(),
        ratings: EraRating::ALL
            .iter()
            .map(|&r| {
                toggle(
                    r.as_str().to_string(),
                    filter.ratings.contains(&r),
                    FilterAction::ToggleRating(r),
                )
            })
            .collect(),
    }
}

pub async fn home(
    State(repo): State<AppState>,
    Query(params): Query<HomeQuery>,
) -> Result<Response, StatusCode> {
    let filter = FilterState::from_params(&params.filter);
    let menu = MenuState::from_param(params.menu.as_deref());

    let deadlines = filter_deadlines(repo.upcoming(Utc::now()), &filter)
        .into_iter()
        .map(|item| DeadlineRow {
            conference_id: item.conference.id.clone(),
            title: format!("{} {}", item.conference.title, item.conference.year),
            label: item.deadline.label.clone(),
            local_time: format!("{} ({})", item.deadline.date, item.deadline.timezone),
            utc_time: item.instant.format("%Y-%m-%d %H:%M UTC").to_string(),
            place: item
                .conference
                .place
                .clone()
                .unwrap_or_else(|| String::from("-")),
            tags: item.conference.tags.join(", "),
        })
        .collect();

    // The search form resubmits every other part of the state
    let mut hidden_fields: Vec<HiddenField> = filter
        .to_pairs()
        .into_iter()
        .filter(|(name, _)| *name != "q")
        .map(|(name, value)| HiddenField { name, value })
        .collect();
    if let Some(param) = menu.as_param() {
        hidden_fields.push(HiddenField {
            name: "menu",
            value: param.to_string(),
        });
    }

    let template = HomeTemplate {
        total_conferences: repo.len(),
        deadlines,
        menu: menu_view(menu, &filter, repo.countries(), repo.tags()),
        active_count: filter.active_count(),
        query: filter.query.clone().unwrap_or_default(),
        hidden_fields,
        clear_all_href: page_href(menu, &filter.apply(FilterAction::ClearAll)),
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usa() -> FilterState {
        FilterState::default().apply(FilterAction::ToggleCountry("USA".into()))
    }

    #[test]
    fn test_page_href() {
        assert_eq!(page_href(MenuState::Closed, &FilterState::default()), "/");
        assert_eq!(page_href(MenuState::OpenRoot, &FilterState::default()), "/?menu=root");

        let filter = usa()
            .apply(FilterAction::ToggleCountry("South Korea".into()))
            .apply(FilterAction::SetQuery(Some("a&b".into())));
        assert_eq!(
            page_href(MenuState::OpenCountryPanel, &filter),
            "/?menu=country&countries=South+Korea%2CUSA&q=a%26b"
        );
    }

    #[test]
    fn test_menu_links_follow_transitions() {
        let countries = vec!["Brazil".to_string(), "USA".to_string()];
        let view = menu_view(MenuState::OpenCountryPanel, &usa(), &countries, &[]);

        assert!(view.is_open);
        assert!(view.country_panel);
        assert_eq!(view.back_href, "/?menu=root&countries=USA");
        assert_eq!(view.close_href, "/?countries=USA");
        assert_eq!(view.clear_href, "/?menu=country");
        // Opening is not applicable here, so the link keeps the page as is
        assert_eq!(view.open_href, "/?menu=country&countries=USA");

        assert_eq!(view.countries[0].name, "Brazil");
        assert!(!view.countries[0].selected);
        assert_eq!(view.countries[0].href, "/?menu=country&countries=Brazil%2CUSA");
        assert!(view.countries[1].selected);
        assert_eq!(view.countries[1].href, "/?menu=country");
        assert_eq!(view.ratings.len(), 3);
    }
}
