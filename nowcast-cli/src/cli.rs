use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, Select, Text};
use nowcast_core::{
    LocationSpec, QueryOptions, ResponseFormat, Units, WeatherClient, WeatherSnapshot,
    request::redacted,
};

use crate::config::{API_KEY_ENV, Config};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "nowcast", version, about = "Current weather conditions from the command line")]
pub struct Cli {
    /// Log requests and responses to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default query options.
    Configure,

    /// Show current weather for a location.
    Show {
        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// Print the snapshot as JSON. Needs the json response format.
        #[arg(long, conflicts_with = "format")]
        json: bool,

        /// Run the request on a blocking thread instead of the async client.
        #[arg(long)]
        blocking: bool,
    },

    /// Print the request URL without sending it (API key masked).
    Url {
        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        query: QueryArgs,
    },
}

/// Exactly one way of naming the location.
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct LocationArgs {
    /// City name, e.g. "London" or "London,uk".
    #[arg(long)]
    pub city: Option<String>,

    /// Provider city id.
    #[arg(long)]
    pub id: Option<i64>,

    /// Latitude and longitude.
    #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
    pub coords: Option<Vec<f64>>,

    /// Postal code and country code, e.g. `--zip 94040 us`.
    #[arg(long, num_args = 2, value_names = ["CODE", "COUNTRY"])]
    pub zip: Option<Vec<String>>,
}

impl LocationArgs {
    pub fn into_spec(self) -> Result<LocationSpec> {
        if let Some(name) = self.city {
            return Ok(LocationSpec::city(name));
        }
        if let Some(id) = self.id {
            return Ok(LocationSpec::city_id(id));
        }
        if let Some(coords) = self.coords {
            let &[lat, lon] = coords.as_slice() else {
                return Err(anyhow!("--coords takes exactly a latitude and a longitude"));
            };
            return Ok(LocationSpec::coordinates(lat, lon));
        }
        if let Some(zip) = self.zip {
            let [code, country] = <[String; 2]>::try_from(zip)
                .map_err(|_| anyhow!("--zip takes exactly a postal code and a country code"))?;
            return Ok(LocationSpec::zip(code, country));
        }

        Err(anyhow!("No location given. Use one of --city, --id, --coords or --zip."))
    }
}

/// Per-call overrides of the configured defaults.
#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// standard (Kelvin), metric or imperial.
    #[arg(long, value_parser = parse_units)]
    pub units: Option<Units>,

    /// Provider language code, e.g. "en", "de", "zh_cn".
    #[arg(long = "lang")]
    pub language: Option<String>,

    /// json, xml or html. Only json is shown as a parsed summary.
    #[arg(long, value_parser = parse_format)]
    pub format: Option<ResponseFormat>,
}

impl QueryArgs {
    pub fn apply(self, mut options: QueryOptions) -> QueryOptions {
        if let Some(units) = self.units {
            options = options.with_units(units);
        }
        if let Some(language) = self.language {
            options = options.with_language(language);
        }
        if let Some(format) = self.format {
            options = options.with_format(format);
        }
        options
    }
}

fn parse_units(value: &str) -> Result<Units, String> {
    Units::try_from(value).map_err(|e| e.to_string())
}

fn parse_format(value: &str) -> Result<ResponseFormat, String> {
    ResponseFormat::try_from(value).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                location,
                query,
                json,
                blocking,
            } => show(location, query, json, blocking).await,
            Command::Url { location, query } => {
                let config = Config::load()?;
                let api_key = config.resolve_api_key(env_api_key()).unwrap_or_default();
                let options = query.apply(config.query_options());

                let url =
                    WeatherClient::new(api_key).request_url(&location.into_spec()?, &options)?;
                println!("{}", redacted(&url));
                Ok(())
            }
        }
    }
}

fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV).ok()
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let units_cursor = Units::all().iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Default units:", Units::all().to_vec())
        .with_starting_cursor(units_cursor)
        .prompt()
        .context("Failed to read units")?;

    let current_language = config.query_options().language;
    let language = Text::new("Default language:")
        .with_default(&current_language)
        .prompt()
        .context("Failed to read language")?;
    config.language = Some(language.trim().to_string()).filter(|l| !l.is_empty());

    let format_cursor = ResponseFormat::all()
        .iter()
        .position(|f| *f == config.format)
        .unwrap_or(0);
    config.format = Select::new("Default response format:", ResponseFormat::all().to_vec())
        .with_starting_cursor(format_cursor)
        .prompt()
        .context("Failed to read response format")?;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(location: LocationArgs, query: QueryArgs, json: bool, blocking: bool) -> Result<()> {
    let config = Config::load()?;
    let api_key = config.resolve_api_key(env_api_key())?;
    let options = query.apply(config.query_options());
    check_json_flag(json, &options)?;
    let location = location.into_spec()?;
    let client = WeatherClient::new(api_key);

    if !options.format.is_structured() {
        let raw = if blocking {
            tokio::task::spawn_blocking(move || client.current_raw_blocking(&location, &options))
                .await
                .context("Blocking weather request did not complete")??
        } else {
            client.current_raw(&location, &options).await?
        };
        println!("{}", raw.body);
        return Ok(());
    }

    let units = options.units;
    let result = if blocking {
        tokio::task::spawn_blocking(move || client.current_blocking(&location, &options))
            .await
            .context("Blocking weather request did not complete")?
    } else {
        client.current(&location, &options).await
    };
    let snapshot = result.map_err(|err| {
        if err.is_invalid_query() {
            anyhow::Error::new(err).context("The provider did not recognise this location")
        } else {
            anyhow::Error::new(err).context("Failed to fetch current weather")
        }
    })?;

    if json {
        let text =
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
        println!("{text}");
    } else {
        print!("{}", render_snapshot(&snapshot, units, Local::now()));
    }
    Ok(())
}

/// `--json` prints a parsed snapshot, so the response format (possibly from config)
/// must be the structured one.
fn check_json_flag(json: bool, options: &QueryOptions) -> Result<()> {
    if json && !options.format.is_structured() {
        return Err(anyhow!(
            "--json needs the json response format, but the {} format is selected. \
             Pass --format json or drop --json.",
            options.format
        ));
    }
    Ok(())
}

/// Human-readable summary of a snapshot.
pub fn render_snapshot(
    snapshot: &WeatherSnapshot,
    units: Units,
    fetched_at: DateTime<Local>,
) -> String {
    format!(
        "{name} (#{id}) at {lat}, {lon}\n\
         {title}: {description}\n\
         Temperature: {temp} {temp_unit}\n\
         Pressure: {pressure} hPa, humidity: {humidity}%\n\
         Wind: {speed} {speed_unit} from {deg}°\n\
         Cloud cover: {clouds}%\n\
         Fetched at {fetched}\n",
        name = snapshot.city_name,
        id = snapshot.city_id,
        lat = snapshot.latitude,
        lon = snapshot.longitude,
        title = snapshot.title,
        description = snapshot.description,
        temp = snapshot.temperature,
        temp_unit = units.temperature_suffix(),
        pressure = snapshot.pressure,
        humidity = snapshot.humidity,
        speed = snapshot.wind_speed,
        speed_unit = units.speed_suffix(),
        deg = snapshot.wind_direction,
        clouds = snapshot.cloud_cover,
        fetched = fetched_at.format("%Y-%m-%d %H:%M"),
    )
}
