use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tickerlens_core::ingest::screener::ScreenerClient;

mod refresh;

#[derive(Debug, Parser)]
#[command(name = "tickerlens_worker")]
struct Args {
    /// Stock list to refresh in place. Defaults to the dashboard's resolved stock list.
    #[arg(long)]
    stock_list: Option<PathBuf>,

    /// Milliseconds to wait between company page requests.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Only refresh the first N rows.
    #[arg(long)]
    limit: Option<usize>,

    /// Fetch everything but leave the file untouched.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = tickerlens_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let path = match args.stock_list {
        Some(p) => p,
        None => settings.resolve_stock_list_path()?,
    };

    let mut opts = refresh::RefreshOptions::from_env();
    if let Some(ms) = args.delay_ms {
        opts.delay = Duration::from_millis(ms);
    }
    opts.limit = args.limit;
    opts.dry_run = args.dry_run;

    let client = ScreenerClient::from_settings(&settings)?;

    tracing::info!(
        path = %path.display(),
        delay_ms = opts.delay.as_millis() as u64,
        limit = ?opts.limit,
        dry_run = opts.dry_run,
        "starting P/E refresh"
    );

    match refresh::refresh_pe_file(&client, &path, &opts).await {
        Ok(summary) => {
            tracing::info!(
                processed = summary.processed,
                updated = summary.updated,
                failures = summary.failures,
                "P/E refresh finished"
            );
            Ok(())
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %format!("{err:#}"), "P/E refresh failed");
            Err(err)
        }
    }
}

fn init_sentry(settings: &tickerlens_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
