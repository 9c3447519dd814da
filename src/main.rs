use airport_locator::{
    AirportCatalog, AirportLocator, LocatorConfig, LocatorError, NominatimGeocoder,
    RuleBasedExtractor, logging,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

const SEPARATOR: &str = "----------------------------------------";

#[derive(Parser, Debug)]
#[command(
    name = "airport-locator",
    version,
    about = "Find the nearest airport to a free-text location description"
)]
struct Args {
    /// Configuration file (TOML)
    #[arg(long, env = "AIRPORT_LOCATOR_CONFIG")]
    config: Option<PathBuf>,

    /// Airport dataset CSV, overrides catalog.path
    #[arg(long)]
    airports: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match LocatorConfig::load_from_path(args.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = args.airports {
        config.catalog.path = path;
    }

    logging::init(&config.logging, args.verbose);

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &LocatorConfig) -> Result<(), LocatorError> {
    let catalog = Arc::new(AirportCatalog::load_or_download(&config.catalog).await?);
    info!(
        "Loaded {} airports across {} countries",
        catalog.len(),
        catalog.country_count()
    );

    let extractor = RuleBasedExtractor::from_config(&config.extractor, &catalog)?;
    let geocoder = NominatimGeocoder::new(&config.geocoder)?;
    let locator = AirportLocator::new(catalog, extractor, geocoder)
        .with_full_text_fallback(config.extractor.fallback_to_full_text);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout
            .write_all(b"Enter a location or 'exit' to quit: ")
            .await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        if input.eq_ignore_ascii_case("exit") {
            break;
        }
        if input.is_empty() {
            stdout.write_all(b"Please enter a valid location.\n").await?;
            continue;
        }

        let answer = match locator.locate(input).await {
            Ok(located) => located.to_string(),
            Err(failure) => failure.user_message(),
        };
        stdout
            .write_all(format!("{answer}\n{SEPARATOR}\n").as_bytes())
            .await?;
    }

    Ok(())
}
