use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use moonsense_core::{
    CITY_OPTIONS, CityOption, Config, Coordinate, ResolvedBundle, UnitPreference, WeatherService,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "moonsense", version, about = "Weather and moon-phase companion")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com credential.
    Configure,

    /// Show the full weather bundle for a city or coordinate.
    Show {
        /// Preset id/name (e.g. "taipei") or free-text city to search for.
        city: Option<String>,

        /// Latitude, paired with --lon; overrides the city argument.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude, paired with --lat.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Unit system: metric or imperial.
        #[arg(long, default_value = "metric")]
        unit: String,

        /// Emit the raw bundle as JSON instead of formatted text.
        #[arg(long)]
        json: bool,
    },

    /// Show the current moon snapshot and the multi-day phase table.
    Moon {
        /// Preset id/name or free-text city; defaults to Taipei.
        city: Option<String>,
    },

    /// Show compact snapshots for the built-in city list.
    Cities {
        /// Unit system: metric or imperial.
        #[arg(long, default_value = "metric")]
        unit: String,
    },

    /// Search for a city by name.
    Search {
        query: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, lat, lon, unit, json } => {
                let unit = UnitPreference::try_from(unit.as_str())?;
                let service = service()?;
                let (name, coordinate) = resolve_location(&service, city, lat, lon).await?;
                let resolved =
                    service.fetch_bundle_or_sample(name.as_deref(), coordinate, unit).await;
                if json {
                    println!("{}", serde_json::to_string_pretty(&resolved.bundle)?);
                    if let Some(notice) = resolved.notice {
                        eprintln!("{notice}");
                    }
                } else {
                    print_bundle(&resolved);
                }
                Ok(())
            }
            Command::Moon { city } => {
                let service = service()?;
                let (_, coordinate) = resolve_location(&service, city, None, None).await?;
                let (details, notice) = service.moon_details(coordinate).await;
                let (phases, _) = service.moon_phases(coordinate).await;

                println!("{} — {} illuminated", details.phase_name, details.illumination);
                println!("Rise {}  Set {}", details.rise_time, details.set_time);
                println!("{}", details.mantra);
                println!();
                for entry in phases {
                    println!(
                        "{:<16} {:>4}  rise {:>8}  set {:>8}  {}",
                        entry.name,
                        entry.illumination,
                        entry.rise_time,
                        entry.set_time,
                        entry.energy_suggestion
                    );
                }
                if let Some(notice) = notice {
                    println!("\n{notice}");
                }
                Ok(())
            }
            Command::Cities { unit } => {
                let unit = UnitPreference::try_from(unit.as_str())?;
                let service = service()?;
                let snapshots = service.city_snapshots(CITY_OPTIONS, unit).await;
                for snapshot in snapshots {
                    println!(
                        "{:<14} {:>6}  [{}]",
                        snapshot.city,
                        snapshot.temperature,
                        snapshot.icon.as_str()
                    );
                }
                Ok(())
            }
            Command::Search { query } => {
                let service = service()?;
                let results = service.search_cities(&query).await;
                if results.is_empty() {
                    println!("No matches.");
                }
                for result in results {
                    println!(
                        "{}, {} ({:.4}, {:.4})",
                        result.name, result.country, result.lat, result.lon
                    );
                }
                Ok(())
            }
        }
    }
}

fn service() -> anyhow::Result<WeatherService> {
    let config = Config::load()?;
    Ok(WeatherService::from_config(&config))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let key = inquire::Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(key);
    config.save()?;
    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Resolve a location argument: explicit coordinates win, then the preset
/// table, then a live city search. With nothing given, fall back to the
/// first preset.
async fn resolve_location(
    service: &WeatherService,
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> anyhow::Result<(Option<String>, Coordinate)> {
    if let (Some(lat), Some(lon)) = (lat, lon) {
        return Ok((None, Coordinate::new(lat, lon)?));
    }

    let Some(city) = city else {
        let preset = &CITY_OPTIONS[0];
        return Ok((Some(preset.name.to_string()), preset.coordinate()));
    };

    if let Some(preset) = CityOption::find(&city) {
        return Ok((Some(preset.name.to_string()), preset.coordinate()));
    }

    let results = service.search_cities(&city).await;
    let hit = results
        .into_iter()
        .next()
        .with_context(|| format!("No city matching '{city}'"))?;
    let coordinate = Coordinate::new(hit.lat, hit.lon)?;
    Ok((Some(hit.name), coordinate))
}

fn print_bundle(resolved: &ResolvedBundle) {
    let bundle = &resolved.bundle;

    println!("{}  {}°", bundle.header.city, bundle.header.temperature);
    println!("{}", bundle.header.description);
    println!("{}", bundle.header.cosmic_whisper);
    println!();

    if !bundle.hourly.is_empty() {
        let times: Vec<&str> = bundle.hourly.iter().map(|h| h.time.as_str()).collect();
        let temps: Vec<String> = bundle.hourly.iter().map(|h| format!("{}°", h.temp)).collect();
        println!("Hourly: {}", times.join("  "));
        println!("        {}", temps.join("   "));
        println!();
    }

    for detail in &bundle.details {
        println!("{:<20} {}", detail.title, detail.value);
    }
    println!();

    for day in &bundle.daily {
        println!(
            "{:<6} {:<8} {:>4} / {:<4} [{}]  {}",
            day.day,
            day.date,
            day.high,
            day.low,
            day.icon.as_str(),
            day.summary
        );
    }
    println!();

    println!("Trend: {} ({})", bundle.temp_trend.indicator, bundle.temp_trend.hourly.join(" "));
    println!("Water: {} — {} ({})", bundle.water_temp.current, bundle.water_temp.suggestion, bundle.water_temp.trend);
    println!("Moon:  {} illuminated, rise {} set {}", bundle.moon.illumination, bundle.moon.rise_time, bundle.moon.set_time);
    println!();
    println!("{}", bundle.advice);
    println!("Updated {}", Local::now().format("%-I:%M %p"));

    if let Some(notice) = resolved.notice {
        println!("\n{notice}");
    }
}
