use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use population_race::config::RaceConfig;
use population_race::cursor::YearCursor;
use population_race::format::render_frame;
use population_race::server::{self, AppState};
use population_race::timer::Ticker;
use population_race::{aggregate, load_csv_file, CountryTable, Race, RaceError};

#[derive(Parser)]
#[command(name = "population-race", about = "Population bar chart race, 1950 to 2021")]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(long, default_value = "population-race.toml", env = "POPULATION_RACE_CONFIG")]
    config: PathBuf,

    /// Override the CSV path from the config file.
    #[arg(long, env = "POPULATION_RACE_CSV")]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the population data API
    Serve(ServeArgs),
    /// Play the race in the terminal
    Race(RaceArgs),
}

#[derive(Args, Clone, Debug)]
struct ServeArgs {
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Clone, Debug)]
struct RaceArgs {
    /// First year to show.
    #[arg(long)]
    from: Option<i32>,
    /// Last year to show.
    #[arg(long)]
    to: Option<i32>,
    /// How many times to play the full range.
    #[arg(long, default_value_t = 1)]
    loops: u32,
    /// Width of the widest bar, in characters.
    #[arg(long, default_value_t = 50)]
    width: usize,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    tracing::info!(config = %cli.config.display(), "loading configuration");
    let mut config = match RaceConfig::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "failed to load config");
            std::process::exit(1);
        }
    };
    if let Some(csv) = cli.csv {
        config.data.csv_path = csv;
    }

    let result = match cli.command {
        Commands::Serve(args) => serve(config, args).await,
        Commands::Race(args) => play(config, args).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, status = e.status_code(), "population-race failed");
        std::process::exit(1);
    }
}

async fn serve(config: RaceConfig, args: ServeArgs) -> Result<(), RaceError> {
    let port = args.port.unwrap_or(config.server.port);
    let shutdown = CancellationToken::new();

    let token = shutdown.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutting down...");
        token.cancel();
    });

    server::run(port, AppState::new(config.data.csv_path), shutdown).await
}

async fn play(config: RaceConfig, args: RaceArgs) -> Result<(), RaceError> {
    let records = load_csv_file(&config.data.csv_path)?;
    let table = CountryTable::builtin();
    let buckets = Arc::new(aggregate(&records, table, config.data.unmapped));

    let full = YearCursor::for_buckets(&buckets);
    let cursor = YearCursor::new(
        args.from.unwrap_or(full.min()),
        args.to.unwrap_or(full.max()),
    );
    let steps = cursor.span().saturating_mul(u64::from(args.loops));
    tracing::info!(
        from = cursor.min(),
        to = cursor.max(),
        loops = args.loops,
        "starting race"
    );

    let mut race = Race::with_cursor(
        buckets,
        config.race.engine_options(),
        cursor,
        Instant::now(),
    );
    let interrupted = CancellationToken::new();
    let token = interrupted.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("interrupted");
        token.cancel();
    });

    let mut ticker = Ticker::start_child(config.race.step(), &interrupted);
    let mut shown = 0u64;
    while shown < steps {
        if ticker.tick().await.is_none() || ticker.is_stopped() {
            break;
        }
        let now = Instant::now();
        print!("{}", render_frame(race.frame(now), table, args.width));
        shown += 1;
        race.on_tick(now);
    }

    ticker.stop();
    Ok(())
}
