pub mod app;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod menu;
pub mod models;
pub mod repository;
pub mod utils;
pub mod validate;
pub mod views;

// Re-export commonly used items
pub use config::AppConfig;
pub use error::{DataError, DataResult};
pub use filter::{FilterAction, FilterParams, FilterState};
pub use menu::{transition, MenuEvent, MenuState};
pub use models::{
    ConferenceEntry, ConferenceRecord, Deadline, DeadlineError, DeadlineShape, DeadlineType,
    EraRating, LegacyDeadlineRule,
};
pub use repository::{ConferenceRepository, LoadedRecord};
pub use utils::{extract_country, make_conference_id, normalize_text, parse_conference_id};
pub use views::DeadlineItem;
