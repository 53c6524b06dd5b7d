use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use getinline::config::{Cli, Command, EventsArgs};
use getinline::domain::entities::page::PageRequest;
use getinline::infra::seed::seed_demo_data;
use getinline::infra::sqlite::repo::SqliteRepo;
use getinline::usecase::ports::repo::EventCatalog;
use getinline::usecase::services::query_service::EventQueryService;

fn main() {
    init_tracing();

    if let Err(err) = run(Cli::parse()) {
        let code = err
            .downcast_ref::<getinline::error::Error>()
            .map(getinline::error::Error::code)
            .unwrap_or(getinline::error::ErrorCode::InternalError);
        eprintln!("{}", code.message_with(&format!("{err:#}")));
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "getinline=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let db_path = cli.db_path()?;
    let repo = Arc::new(SqliteRepo::new(db_path.clone()));

    match cli.command {
        Command::Init => {
            repo.init()?;
            tracing::info!(db = %db_path.display(), "schema ready");
        }
        Command::Seed => {
            let summary = seed_demo_data(repo.as_ref())?;
            tracing::info!(
                db = %db_path.display(),
                places = summary.places,
                events = summary.events,
                "database seeded"
            );
        }
        Command::Events(args) => list_events(repo, &args)?,
    }

    Ok(())
}

fn list_events(repo: Arc<SqliteRepo>, args: &EventsArgs) -> Result<()> {
    let mut page = PageRequest::new(args.page, args.size)?;
    for key in &args.sort {
        page = page.with_sort_key(*key);
    }

    let service = EventQueryService::new(repo);
    let result = service.find_event_view_page(&args.search(), &page)?;

    let json = serde_json::to_string_pretty(&result).context("failed to render page as json")?;
    println!("{json}");
    Ok(())
}
