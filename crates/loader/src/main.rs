use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trackstat_loader::{load_tracks, parse_csv_file, LoadError, LoadOptions, DEFAULT_BATCH_SIZE};

/// Load a tracks CSV export into the catalog database.
#[derive(Parser, Debug)]
#[command(name = "trackstat-loader")]
#[command(version)]
struct Cli {
    /// CSV file to import
    csv_path: PathBuf,

    /// Empty the table and reset ids before loading
    #[arg(long)]
    replace: bool,

    /// Rows per insert statement
    #[arg(long, env = "LOADER_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trackstat_loader=info,trackstat_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Load failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), LoadError> {
    if cli.batch_size == 0 {
        return Err(LoadError::Config("--batch-size must be at least 1".into()));
    }
    let options = LoadOptions {
        replace: cli.replace,
        batch_size: cli.batch_size,
    };

    // Parse fully before connecting so a bad file never touches the database.
    tracing::info!(path = %cli.csv_path.display(), "Reading CSV");
    let parsed = parse_csv_file(&cli.csv_path)?;

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| LoadError::Config("DATABASE_URL must be set".into()))?;

    let pool = trackstat_db::create_pool(&database_url).await?;
    trackstat_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    let result = load_tracks(&pool, parsed, &options).await;
    pool.close().await;
    let report = result?;

    tracing::info!(
        alias_set = report.alias_set,
        rows_read = report.rows_read,
        rows_dropped = report.rows_dropped,
        rows_merged = report.rows_merged,
        rows_loaded = report.rows_loaded,
        "Loaded {} tracks from {}",
        report.rows_loaded,
        cli.csv_path.display()
    );
    Ok(())
}
