use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use reqwest::Client;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use swampcool_lib::{assess, Assessment, DecisionEngine, DecisionInputs, Forecast, OutputModel};
use tracing::Level;

mod config;
mod err;
mod fetch;
mod report;
mod weather;
use crate::config::Settings;
use crate::err::{SwampError, SwampResult};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Indoor thermometer reading (°F)
    #[arg(long, env = "SWAMPCOOL_INDOOR", required_unless_present = "lat")]
    indoor: Option<f64>,

    #[arg(long, env = "SWAMPCOOL_CONFIG")]
    config: Option<PathBuf>,

    /// weather.gov gridpoint forecast URL
    #[arg(long, env = "SWAMPCOOL_URL")]
    url: Option<String>,

    #[arg(long)]
    target: Option<f64>,

    #[arg(long)]
    min: Option<f64>,

    #[arg(long)]
    rh_max: Option<f64>,

    #[arg(long)]
    multiplier: Option<f64>,

    #[arg(long)]
    min_smart: Option<f64>,

    /// Decide for this local time instead of now, e.g. 2024-06-01T14:30:00
    #[arg(long)]
    at: Option<NaiveDateTime>,

    /// Resolve the forecast grid of this location
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Save the effective settings to the config file
    #[arg(long)]
    write_config: bool,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(url) = &self.url {
            settings.url = url.clone();
        }
        let t = &mut settings.thresholds;
        t.target = self.target.unwrap_or(t.target);
        t.min = self.min.unwrap_or(t.min);
        t.rh_max = self.rh_max.unwrap_or(t.rh_max);
        let s = &mut settings.smart;
        s.multiplier = self.multiplier.unwrap_or(s.multiplier);
        s.min_smart_value = self.min_smart.unwrap_or(s.min_smart_value);
    }
}

async fn forecast(
    client: &Client,
    settings: &Settings,
    now: NaiveDateTime,
) -> Result<Forecast, SwampError> {
    let doc = fetch::fetch_with_retry(
        client,
        &settings.url,
        Duration::from_secs(settings.retry_secs),
    )
    .await?;
    doc.fresh_forecast(
        weather::local_offset(),
        now,
        chrono::Duration::hours(settings.max_age_hours),
    )
}

#[tokio::main]
async fn main() -> SwampResult {
    let args = Args::parse();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(Level::from_str(&args.log_level)?)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let path = args.config.clone().unwrap_or_else(config::default_path);
    let mut settings = Settings::load(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;
    args.apply(&mut settings);

    let client = fetch::client(&settings.user_agent)?;

    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        settings.url = fetch::grid_url(&client, lat, lon)
            .await
            .context("Failed to resolve the forecast grid")?;
        println!("  Forecast grid for {lat},{lon}: {}", settings.url);
    }

    if args.write_config {
        settings.save(&path)?;
        tracing::info!("settings saved to {}", path.display());
    }

    let Some(indoor) = args.indoor else {
        return Ok(());
    };

    let now = args.at.unwrap_or_else(|| Local::now().naive_local());
    let model = OutputModel::default();

    let assessment = match forecast(&client, &settings, now).await {
        Ok(forecast) => Some(
            assess(&forecast, now, &model, &settings.locator(), settings.smart)
                .context("Forecast cannot be trusted")?,
        ),
        Err(e) if e.is_fatal() => return Err(e).context("Forecast cannot be trusted"),
        Err(e) => {
            tracing::warn!("{e}, deciding from the clock and thermometer only");
            None
        }
    };

    let flags = DecisionEngine::new(settings.thresholds).decide(&DecisionInputs {
        now: now.time(),
        indoor,
        forecast: assessment.as_ref().map(Assessment::reading),
    });
    tracing::info!("{:?}", flags.recommendation());

    print!("{}", report::summary(now.time(), assessment.as_ref(), &flags)?);
    Ok(())
}
