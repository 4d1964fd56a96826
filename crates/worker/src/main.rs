use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod pipeline;

#[derive(Debug, Parser)]
#[command(name = "scoreboard_worker")]
struct Args {
    /// Scores captured by the scraper: a JSON object keyed by symbol.
    #[arg(long)]
    scores: PathBuf,

    /// Date to file the run under (YYYY-MM-DD). Defaults to today's IST date.
    #[arg(long)]
    as_of_date: Option<String>,

    /// Where to write the ranked dashboard JSON. Overrides SCOREBOARD_OUTPUT_PATH.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Compute and log everything, write nothing.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = scoreboard_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let as_of_date = scoreboard_core::time::calendar::resolve_as_of_date(
        args.as_of_date.as_deref(),
        chrono::Utc::now(),
    )?;

    let req = pipeline::RunRequest {
        as_of_date,
        scores_path: args.scores,
        output_path: args.output.unwrap_or_else(|| settings.output_path.clone()),
        dry_run: args.dry_run,
    };

    match pipeline::run_daily(&settings, &req) {
        Ok(pipeline::RunSummary::Completed {
            ranked,
            movers,
            history_symbols,
        }) => {
            tracing::debug!(%as_of_date, ranked, movers, history_symbols, "worker finished");
            Ok(())
        }
        Ok(pipeline::RunSummary::DryRun { ranked, movers }) => {
            tracing::debug!(%as_of_date, ranked, movers, dry_run = true, "worker finished");
            Ok(())
        }
        Ok(pipeline::RunSummary::Locked) => Ok(()),
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(%as_of_date, error = %format!("{err:#}"), "scoring run failed");
            Err(err)
        }
    }
}

fn init_sentry(settings: &scoreboard_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
