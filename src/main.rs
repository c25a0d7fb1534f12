use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use time::OffsetDateTime;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use undercut::config::DashboardConfig;
use undercut::gateway::{Gateway, HttpSource};
use undercut::jolpica::HistoryClient;
use undercut::openf1::LiveClient;
use undercut::poller::{DataSources, PollSettings, activate_dashboard};
use undercut::rate_limit::PacedLimiter;
use undercut::render::{render_dashboard, render_meetings, render_result, render_schedule, render_standings};
use undercut::store::{LastResultView, ViewStore};
use undercut::views::meetings::meetings;
use undercut::views::schedule::schedule;
use undercut::views::standings::{constructor_standings, driver_standings};

#[derive(Parser, Debug)]
#[command(name = "undercut", about = "Live Formula 1 dashboard in the terminal")]
struct Cli {
    /// Seconds between live refreshes; overrides `POLL_INTERVAL_SECS`.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Calendar season; overrides `SCHEDULE_SEASON`.
    #[arg(long)]
    schedule_season: Option<i32>,

    /// Championship season; overrides `STANDINGS_SEASON`.
    #[arg(long)]
    standings_season: Option<i32>,

    /// OpenF1 session key, or `latest`.
    #[arg(long, env = "OPENF1_SESSION_KEY", default_value = "latest")]
    session_key: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Follow the live session until Ctrl-C.
    Live,
    /// Driver and constructor championship tables.
    Standings,
    /// Season calendar with the next event marked.
    Schedule,
    /// Grand Prix meetings of the calendar season, from the live API.
    Meetings,
    /// Classification of one race, or the most recent one.
    Result(ResultArgs),
}

#[derive(Args, Debug)]
struct ResultArgs {
    /// Season of `--round`; defaults to the calendar season.
    #[arg(long, requires = "round")]
    season: Option<i32>,

    #[arg(long)]
    round: Option<u32>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    if let Some(secs) = cli.interval {
        config.poll_interval = Duration::from_secs(secs);
    }
    if let Some(season) = cli.schedule_season {
        config.schedule_season = season;
    }
    if let Some(season) = cli.standings_season {
        config.standings_season = season;
    }

    let source = match HttpSource::new(config.timeouts) {
        Ok(source) => source,
        Err(e) => {
            error!(error = %e, "failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };
    let limiter = PacedLimiter::per_second(config.rate_limit_per_sec);
    let gateway = Arc::new(Gateway::new(Arc::new(source), limiter));
    let sources = Arc::new(DataSources {
        live: LiveClient::new(gateway.clone(), config.endpoints.openf1_base_url.clone()),
        history: HistoryClient::new(gateway.clone(), config.endpoints.jolpica_base_url.clone()),
    });

    match cli.command {
        Command::Live => run_live(sources, &config, cli.session_key).await,
        Command::Standings => {
            let (drivers, constructors) = tokio::join!(
                sources.history.driver_standings(config.standings_season),
                sources.history.constructor_standings(config.standings_season),
            );
            print!(
                "{}",
                render_standings(
                    &driver_standings(&drivers.unwrap_or_default()),
                    &constructor_standings(&constructors.unwrap_or_default()),
                )
            );
        }
        Command::Schedule => {
            let races = sources.history.schedule(config.schedule_season).await.unwrap_or_default();
            let entries = schedule(&races, OffsetDateTime::now_utc(), config.schedule_window);
            print!("{}", render_schedule(&entries));
        }
        Command::Meetings => {
            let records = sources.live.meetings(config.schedule_season).await.unwrap_or_default();
            print!("{}", render_meetings(&meetings(&records)));
        }
        Command::Result(args) => {
            let race = match args.round {
                Some(round) => {
                    let season = args.season.unwrap_or(config.schedule_season);
                    sources.history.race_result(season, round).await
                }
                None => sources.history.last_result().await,
            };
            let view = race.as_ref().map(LastResultView::from_race);
            print!("{}", render_result(view.as_ref()));
        }
    }

    info!(failed_requests = gateway.failure_count(), "done");
    ExitCode::SUCCESS
}

async fn run_live(sources: Arc<DataSources>, config: &DashboardConfig, session_key: String) {
    let store = ViewStore::new(config.race_control_limit, config.schedule_window);
    let settings = PollSettings { session_key, ..PollSettings::from_config(config) };

    let mut updates = store.subscribe();
    let handle = activate_dashboard(sources, store.clone(), settings).await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = store.view(OffsetDateTime::now_utc()).await;
                println!("{}", render_dashboard(&view));
            }
            _ = &mut shutdown => {
                info!("interrupt received");
                break;
            }
        }
    }
    handle.stop();
}
