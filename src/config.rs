use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use directories::ProjectDirs;

use crate::domain::entities::event::EventStatus;
use crate::domain::entities::page::SortKey;
use crate::domain::entities::search::EventSearch;

pub const DB_PATH_ENV: &str = "GETINLINE_DB";

#[derive(Debug, Parser)]
#[command(name = "getinline", about = "Event and place admin queries", version)]
pub struct Cli {
    /// SQLite database file. Defaults to the platform data directory.
    #[arg(long, global = true, env = DB_PATH_ENV)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the schema if it does not exist.
    Init,
    /// Create the schema and insert demo places and events.
    Seed,
    /// List events joined with their place, one page at a time.
    Events(EventsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct EventsArgs {
    #[arg(long)]
    pub place_name: Option<String>,

    #[arg(long)]
    pub event_name: Option<String>,

    #[arg(long)]
    pub status: Option<EventStatus>,

    /// Lower bound for the event start, e.g. 2021-01-01T00:00.
    #[arg(long, value_parser = parse_datetime)]
    pub start_not_before: Option<NaiveDateTime>,

    /// Upper bound for the event end, e.g. 2021-01-02T00:00.
    #[arg(long, value_parser = parse_datetime)]
    pub end_not_after: Option<NaiveDateTime>,

    /// Zero-based page index.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub page: i64,

    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    pub size: i64,

    /// `field` or `field,asc|desc`; repeat for secondary keys.
    #[arg(long = "sort")]
    pub sort: Vec<SortKey>,
}

impl EventsArgs {
    pub fn search(&self) -> EventSearch {
        EventSearch {
            place_name_contains: self.place_name.clone(),
            event_name_contains: self.event_name.clone(),
            status: self.status,
            start_not_before: self.start_not_before,
            end_not_after: self.end_not_after,
        }
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| anyhow!("expected a datetime like 2021-01-01T09:00, got {value}"))
}

pub fn default_db_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "uno", "getinline")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_local_dir().join("events.sqlite"))
}

impl Cli {
    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.db {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::entities::condition::ViewColumn;

    #[test]
    fn parse_datetime_accepts_minutes_and_seconds() {
        let expected = NaiveDate::from_ymd_opt(2021, 1, 1)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
            .expect("fixture datetime should be valid");

        for input in ["2021-01-01T09:00", "2021-01-01T09:00:00", "2021-01-01 09:00"] {
            assert_eq!(parse_datetime(input).expect("datetime should parse"), expected);
        }
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn events_args_parse_filters_and_sort() {
        let cli = Cli::try_parse_from([
            "getinline",
            "--db",
            "/tmp/events.sqlite",
            "events",
            "--place-name",
            "배드민턴",
            "--status",
            "OPENED",
            "--start-not-before",
            "2021-01-01T00:00",
            "--page",
            "1",
            "--size",
            "5",
            "--sort",
            "placeName",
            "--sort",
            "eventName,desc",
        ])
        .expect("cli should parse");

        assert_eq!(cli.db_path().expect("db path"), PathBuf::from("/tmp/events.sqlite"));
        let Command::Events(args) = cli.command else {
            panic!("expected events command");
        };
        let search = args.search();
        assert_eq!(search.place_name_contains.as_deref(), Some("배드민턴"));
        assert_eq!(search.status, Some(EventStatus::Opened));
        assert_eq!(search.end_not_after, None);
        assert_eq!((args.page, args.size), (1, 5));
        assert_eq!(
            args.sort,
            vec![SortKey::asc(ViewColumn::PlaceName), SortKey::desc(ViewColumn::EventName)]
        );
    }

    #[test]
    fn unknown_sort_field_fails_to_parse() {
        let result = Cli::try_parse_from(["getinline", "events", "--sort", "eventType"]);
        assert!(result.is_err());
    }

    #[test]
    fn default_db_path_uses_app_directory() {
        let db_path = default_db_path().expect("default db path should resolve");
        let app_dir = db_path
            .parent()
            .and_then(|path| path.file_name())
            .and_then(|name| name.to_str())
            .expect("db path should include app directory");

        assert_eq!(
            db_path.file_name().and_then(|name| name.to_str()),
            Some("events.sqlite")
        );
        assert_eq!(app_dir, "getinline");
    }
}
