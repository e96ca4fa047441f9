use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use weatherai::config::WeatherAiConfig;
use weatherai::logging::configure_logging;
use weatherai::moon::{MoonPhase, illumination_percent, lunar_age_days};
use weatherai::{
    GeminiClient, PromptBuilder, ResponseClassifier, SessionState, TimeFrame, Units,
    WeatherAiError, WeatherAssistant, WeatherQuery,
};

#[derive(Parser, Debug)]
#[command(
    name = "weatherai",
    author,
    version,
    about = "AI weather assistant: forecaster-style weather summaries from a hosted language model"
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the model for a forecast and print the report
    Forecast(ForecastArgs),
    /// Print the prompt that would be sent, without calling the API
    Prompt(PromptArgs),
    /// Classify weather text (argument or stdin) into an emoji
    Classify {
        /// Text to classify; read from stdin when omitted
        text: Option<String>,
    },
    /// Show the moon phase for now or a given instant
    Moon {
        /// RFC 3339 instant, e.g. 2024-01-01T00:00:00Z
        #[arg(long, value_parser = parse_instant)]
        date: Option<DateTime<Utc>>,
    },
    /// List favorite locations from the config file
    Favorites,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Forecast horizon: current, today, 24h, 3-days, weekly
    #[arg(short, long)]
    time_frame: Option<TimeFrame>,

    /// Ask for a brief answer instead of a detailed one
    #[arg(short, long, conflicts_with = "detailed")]
    brief: bool,

    /// Ask for a detailed answer even if the config defaults to brief
    #[arg(short, long)]
    detailed: bool,

    /// Temperature units: metric or imperial
    #[arg(short, long)]
    units: Option<Units>,
}

#[derive(Args, Debug)]
struct ForecastArgs {
    /// Location, e.g. "Tokyo" or "Berlin, Germany"
    location: Option<String>,

    /// Use the favorite at this index instead of a location
    #[arg(short, long, conflicts_with = "location")]
    favorite: Option<usize>,

    #[command(flatten)]
    query: QueryArgs,

    /// Gemini API key (overrides config and GEMINI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Model name, e.g. gemini-2.0-flash
    #[arg(long)]
    model: Option<String>,

    /// Include the current moon phase
    #[arg(long)]
    moon: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Print the prompt before the report
    #[arg(long)]
    show_prompt: bool,
}

#[derive(Args, Debug)]
struct PromptArgs {
    /// Location to build the prompt for
    location: String,

    #[command(flatten)]
    query: QueryArgs,
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 instant '{value}': {e}"))
}

/// Explicit `--brief` or `--detailed` wins over the configured default
fn detail_requested(args: &QueryArgs, config: &WeatherAiConfig) -> bool {
    match (args.brief, args.detailed) {
        (true, _) => false,
        (_, true) => true,
        _ => config.defaults.detailed,
    }
}

fn build_query(
    location: String,
    args: &QueryArgs,
    config: &WeatherAiConfig,
    now: DateTime<Local>,
) -> WeatherQuery {
    WeatherQuery::new(
        location,
        args.time_frame.unwrap_or(config.defaults.time_frame),
        now.naive_local(),
    )
    .with_detailed(detail_requested(args, config))
    .with_units(args.units.or(config.defaults.units))
}

async fn run_forecast(args: ForecastArgs, config: &WeatherAiConfig) -> Result<()> {
    let session = SessionState::from_env(args.api_key.clone(), config);
    let location = session.resolve_location(args.location.as_deref(), args.favorite)?;
    info!("Forecasting for '{}'", location);
    let credentials = session.credentials()?;

    let now = Local::now();
    let query = build_query(location, &args.query, config, now);

    let mut client = GeminiClient::new(&config.gemini)?;
    if let Some(model) = args.model {
        client = client.with_model(model);
    }
    let assistant = WeatherAssistant::new(client)
        .with_moon_phase(args.moon || config.defaults.show_moon_phase);

    if !args.json {
        eprintln!("Retrieving weather data... 🌌");
    }
    let report = assistant
        .forecast(query, credentials, now.with_timezone(&Utc))
        .await?;

    if args.show_prompt && !args.json {
        println!("{}", report.prompt);
        println!("---");
    }
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        println!("{report}");
    }
    Ok(())
}

fn run_prompt(args: PromptArgs, config: &WeatherAiConfig) -> Result<()> {
    let query = build_query(args.location, &args.query, config, Local::now());
    query.validate()?;
    print!("{}", PromptBuilder::new().build(&query));
    Ok(())
}

fn run_classify(text: Option<String>) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buffer)
                .map_err(WeatherAiError::from)?;
            String::from_utf8(buffer)
                .map_err(|_| WeatherAiError::validation("input is not valid UTF-8"))?
        }
    };

    let result = ResponseClassifier::new().classify(&text);
    match result.matched_keyword {
        Some(keyword) => println!("{} (matched \"{keyword}\")", result.emoji()),
        None => println!("{} (no keyword matched)", result.emoji()),
    }
    Ok(())
}

fn run_moon(date: Option<DateTime<Utc>>) {
    let instant = date.unwrap_or_else(Utc::now);
    println!("{}", MoonPhase::at(instant));
    println!(
        "   Illumination: {:.1}% (age {:.1} days)",
        illumination_percent(instant),
        lunar_age_days(instant)
    );
}

fn run_favorites(config: &WeatherAiConfig) {
    let session = SessionState::from_sources(None, config, None);
    if session.favorites().is_empty() {
        println!("No favorite locations configured. Add them under [defaults] favorites.");
        return;
    }
    for (index, favorite) in session.favorites().iter().enumerate() {
        println!("{index}: {favorite}");
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = WeatherAiConfig::load_from_path(cli.config.clone())?;
    let _guard = configure_logging(&config.logging, cli.verbose)?;

    let config_source = cli
        .config
        .clone()
        .or_else(WeatherAiConfig::get_config_path)
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    debug!("Using config from: {}", config_source);

    match cli.command {
        Command::Forecast(args) => run_forecast(args, &config).await,
        Command::Prompt(args) => run_prompt(args, &config),
        Command::Classify { text } => run_classify(text),
        Command::Moon { date } => {
            run_moon(date);
            Ok(())
        }
        Command::Favorites => {
            run_favorites(&config);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<WeatherAiError>() {
                Some(app_err) => eprintln!("{}", app_err.user_message()),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
