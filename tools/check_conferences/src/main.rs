use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use aideadlines::repository::{conference_names, load_records};
use aideadlines::validate::{check_records, has_errors, Finding, Severity};
use aideadlines::{AppConfig, ConferenceRepository, LegacyDeadlineRule};

#[derive(Parser, Debug)]
#[command(name = "check_conferences")]
#[command(about = "Check conference data files for errors and list upcoming deadlines")]
struct Args {
    /// Directory of conference YAML files (default: DATA_DIR or data/conferences)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Only check this conference series (file name without extension)
    #[arg(short, long)]
    conference: Option<String>,

    /// List the conference series found in the data directory and exit
    #[arg(long)]
    list: bool,

    /// Print the findings as JSON
    #[arg(long)]
    json: bool,

    /// Also print the next N upcoming deadlines
    #[arg(long, value_name = "N")]
    upcoming: Option<usize>,

    /// Type of the legacy `deadline` field: infer, paper or submission
    #[arg(long)]
    legacy_deadline_type: Option<LegacyDeadlineRule>,
}

#[derive(Serialize)]
struct Report<'a> {
    records: usize,
    errors: usize,
    warnings: usize,
    findings: &'a [Finding],
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;
    let data_dir = args.data_dir.unwrap_or(config.data_dir);
    let rule = args
        .legacy_deadline_type
        .unwrap_or(config.legacy_deadline_rule);

    let names = conference_names(&data_dir)
        .with_context(|| format!("cannot list conferences in {}", data_dir.display()))?;

    if args.list {
        for name in &names {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut records = load_records(&data_dir)
        .with_context(|| format!("failed to load {}", data_dir.display()))?;

    if let Some(conference) = &args.conference {
        if !names.contains(conference) {
            anyhow::bail!("No data file for conference '{}' in {}", conference, data_dir.display());
        }
        records.retain(|loaded| {
            loaded
                .source
                .file_stem()
                .and_then(|stem| stem.to_str())
                .is_some_and(|stem| stem == conference)
        });
    }
    info!("Checking {} records from {}", records.len(), data_dir.display());

    let findings = check_records(&records, rule);
    let errors = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .count();
    let warnings = findings.len() - errors;

    if args.json {
        let report = Report {
            records: records.len(),
            errors,
            warnings,
            findings: &findings,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for finding in &findings {
            let level = match finding.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            println!(
                "{}: {} [{}]: {}",
                level, finding.source, finding.conference, finding.message
            );
        }
        println!(
            "{} records checked: {} errors, {} warnings",
            records.len(),
            errors,
            warnings
        );
    }

    if let Some(count) = args.upcoming {
        let repo = ConferenceRepository::from_records(records.into_iter().map(|r| r.record), rule);
        for item in repo.upcoming(Utc::now()).iter().take(count) {
            println!(
                "{}  {:<12} {} ({} {})",
                item.instant.format("%Y-%m-%d %H:%M UTC"),
                item.conference.id,
                item.deadline.label,
                item.deadline.date,
                item.deadline.timezone
            );
        }
    }

    if has_errors(&findings) {
        warn!("{} errors found", errors);
        anyhow::bail!("conference data has {} errors", errors);
    }

    Ok(())
}
