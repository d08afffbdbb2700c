use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use meteo_core::{
    Config, CurrentWeather, Error, Location, LocationResolver, Transport, TransportEvent,
    WeatherReader,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Current weather lookup via Open-Meteo")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current weather for a place name.
    Show {
        /// City or place name.
        city: String,

        /// ISO 3166-1 alpha-2 country code filter, e.g. "FR".
        #[arg(long)]
        country: Option<String>,

        /// Print request lifecycle diagnostics to stderr.
        #[arg(long, short)]
        verbose: bool,
    },

    /// Interactively edit endpoints, timeout and retry settings.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { city, country, verbose } => {
                show(city, country.unwrap_or_default(), verbose).await
            }
            Command::Configure => configure(),
        }
    }
}

fn build_transport(config: &Config, verbose: bool) -> Transport {
    let mut transport = Transport::new()
        .with_timeout(config.request_timeout())
        .with_policy(config.retry_policy());

    if verbose {
        transport = transport.with_event_hook(Arc::new(|event: &TransportEvent| match event {
            TransportEvent::AttemptStarted { url, attempt } => {
                eprintln!("-> attempt {} GET {url}", attempt + 1);
            }
            TransportEvent::ResponseReceived { status, .. } => {
                eprintln!("<- status {status}");
            }
            TransportEvent::RetryScheduled { delay, .. } => {
                eprintln!("   retrying in {delay:?}");
            }
            TransportEvent::FailureClassified { error, .. } => {
                eprintln!("   failed: {error}");
            }
        }));
    }

    transport
}

async fn show(mut city: String, country: String, verbose: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let transport = build_transport(&config, verbose);
    let resolver = LocationResolver::with_endpoint(config.geocoding_url.clone(), transport.clone());
    let reader = WeatherReader::with_endpoint(config.forecast_url.clone(), transport);

    let location = loop {
        match resolver.resolve(&city, &country).await {
            Ok(location) => break location,
            Err(Error::LocationNotFound { .. }) => {
                eprintln!("No match for \"{city}\".");
                let retry = Text::new("Try another spelling (leave empty to give up):")
                    .prompt()
                    .context("Failed to read input")?;
                if retry.trim().is_empty() {
                    bail!("location not found: {city}");
                }
                city = retry;
            }
            Err(err) => return Err(err.into()),
        }
    };

    let weather = reader.read(location.latitude, location.longitude).await?;
    print_report(&location, &weather);

    Ok(())
}

fn print_report(location: &Location, weather: &CurrentWeather) {
    if location.country.is_empty() {
        println!("{}  ({:.4}, {:.4})", location.name, location.latitude, location.longitude);
    } else {
        println!(
            "{}, {}  ({:.4}, {:.4})",
            location.name, location.country, location.latitude, location.longitude
        );
    }
    if !location.timezone.is_empty() {
        println!("Timezone:    {}", location.timezone);
    }
    println!("Elevation:   {:.0} m", location.elevation);

    println!("Temperature: {}", fmt_opt(weather.temperature_c.map(|t| format!("{t:.1} °C"))));
    println!("Wind speed:  {}", fmt_opt(weather.wind_speed_kmh.map(|w| format!("{w:.1} km/h"))));
    println!("Conditions:  {}", fmt_opt(weather.weather_code.map(|c| format!("WMO code {c}"))));
    println!("Observed:    {}", fmt_opt(weather.observation_time.clone()));

    println!("Retrieved at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
}

fn fmt_opt(value: Option<String>) -> String {
    value.unwrap_or_else(|| "n/a".to_string())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    config.geocoding_url = Text::new("Geocoding endpoint:")
        .with_initial_value(&config.geocoding_url)
        .prompt()
        .context("Failed to read geocoding endpoint")?;

    config.forecast_url = Text::new("Forecast endpoint:")
        .with_initial_value(&config.forecast_url)
        .prompt()
        .context("Failed to read forecast endpoint")?;

    config.request_timeout_secs = CustomType::<u64>::new("Per-attempt timeout (seconds):")
        .with_default(config.request_timeout_secs)
        .with_error_message("Enter a whole number of seconds")
        .prompt()
        .context("Failed to read timeout")?;

    config.max_retries = CustomType::<u32>::new("Max retries:")
        .with_default(config.max_retries)
        .with_error_message("Enter a whole number")
        .prompt()
        .context("Failed to read retry count")?;

    config.save()?;
    println!("Saved {}", Config::config_file_path()?.display());

    Ok(())
}
