use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use tokio::net::TcpListener;
use tracing::info;
use trip_planner::{
    config::Config,
    models::ProgressEvent,
    pipeline::Stage,
    routes::create_router,
    utils::init_logger,
    AppState, TravelPipeline, TripRequest,
};

#[derive(Parser)]
#[command(name = "trip-planner", version, about = "AI travel itinerary planner")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the web form and JSON/SSE API (default)
    Serve,
    /// Plan a single trip from the terminal
    Plan {
        #[arg(long)]
        destination: String,
        /// First day of the trip (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the trip (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        preferences: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    let _log_guard = init_logger(&config.logging);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Plan { destination, start, end, preferences } => {
            let mut trip = TripRequest::new(destination, start, end);
            if let Some(preferences) = preferences {
                trip = trip.with_preferences(preferences);
            }
            plan(config, trip).await
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Configuration loaded: {:?}", config.server);

    let pipeline = TravelPipeline::from_config(&config)?;
    let state = AppState::new(config.clone(), pipeline);
    let app = create_router(state);

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

async fn plan(config: Config, trip: TripRequest) -> anyhow::Result<()> {
    let initial = trip.to_state()?;
    let pipeline = TravelPipeline::from_config(&config)?;

    eprintln!("{}", ProgressEvent::started().message);
    let mut itinerary = None;
    let mut events = Box::pin(pipeline.stream(initial));
    while let Some(event) = events.next().await {
        let event = event?;
        eprintln!("{}", ProgressEvent::completed(event.stage).message);
        if event.stage == Stage::Planning {
            itinerary = event.message().map(|m| m.content.clone());
        }
    }

    let itinerary = itinerary.ok_or_else(|| anyhow::anyhow!("pipeline ended without an itinerary"))?;
    println!("{}", itinerary);
    Ok(())
}
