//! Filter menu state machine.
//!
//! ```text
//! Closed --Open--> OpenRoot --SelectCountry--> OpenCountryPanel
//!                  OpenRoot <--Back----------- OpenCountryPanel
//! any --Close / OutsideClick--> Closed
//! ```
//!
//! `Clear` empties the country selection without leaving the current state.

use crate::filter::{FilterAction, FilterState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MenuState {
    #[default]
    Closed,
    OpenRoot,
    OpenCountryPanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Open,
    SelectCountry,
    Back,
    Close,
    OutsideClick,
    Clear,
}

impl MenuState {
    /// Value of the `menu` query parameter; `None` when closed
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            MenuState::Closed => None,
            MenuState::OpenRoot => Some("root"),
            MenuState::OpenCountryPanel => Some("country"),
        }
    }

    pub fn from_param(raw: Option<&str>) -> MenuState {
        match raw.map(str::trim) {
            Some("root") => MenuState::OpenRoot,
            Some("country") => MenuState::OpenCountryPanel,
            _ => MenuState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        *self != MenuState::Closed
    }
}

/// Apply one menu event. Events that do not apply to the current state leave
/// it unchanged.
pub fn transition(
    menu: MenuState,
    filter: &FilterState,
    event: MenuEvent,
) -> (MenuState, FilterState) {
    use MenuEvent::*;
    use MenuState::*;

    match (menu, event) {
        (Closed, Open) => (OpenRoot, filter.clone()),
        (OpenRoot, SelectCountry) => (OpenCountryPanel, filter.clone()),
        (OpenCountryPanel, Back) => (OpenRoot, filter.clone()),
        (_, Close) | (_, OutsideClick) => (Closed, filter.clone()),
        (OpenRoot, Clear) | (OpenCountryPanel, Clear) => {
            (menu, filter.apply(FilterAction::ClearCountries))
        }
        (state, _) => (state, filter.clone()),
    }
}
