use std::sync::Arc;

use axum::Router;

use aideadlines::{app, ConferenceRepository, LegacyDeadlineRule};

/// Fixture data: far-future deadlines (2099) stay upcoming, 2001 ones are past.
pub const FIXTURE: &str = r#"
- title: NeurIPS
  year: 2099
  id: neurips99
  full_name: Conference on Neural Information Processing Systems
  place: San Diego, CA, USA
  tags: [machine learning]
  era_rating: A
  deadlines:
    - {type: abstract, date: '2099-05-11 23:59:59', timezone: AoE}
    - {type: paper, date: '2099-05-15 23:59:59', timezone: AoE}

- title: ICLR
  year: 2099
  id: iclr99
  place: Rio de Janeiro, Brazil
  tags: [machine learning, deep learning]
  era_rating: A
  deadlines:
    - {type: paper, date: '2099-05-15 11:59:59', timezone: UTC}

- title: ECCV
  year: 2099
  id: eccv99
  place: Malmö, Sweden
  tags: [computer vision]
  era_rating: B
  deadline: '2099-03-01'
  timezone: Europe/Stockholm

- title: CVPR
  year: 2001
  id: cvpr01
  place: Kauai, Hawaii, USA
  tags: [computer vision]
  deadline: '2001-11-01 23:59:59'
  timezone: America/Los_Angeles

- title: Workshop
  year: 2099
  id: workshop99
  tags: [nlp]
"#;

pub fn create_test_repository() -> ConferenceRepository {
    ConferenceRepository::from_yaml_str(FIXTURE, LegacyDeadlineRule::Infer)
        .expect("fixture YAML must parse")
}

/// Create the application router for testing
pub fn create_test_app() -> Router {
    app::router(Arc::new(create_test_repository()))
}
