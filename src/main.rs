use anyhow::Result;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use survey_dashboard::aggregate::NumericPolicy;
use survey_dashboard::api::{FileSource, HttpSource, SurveySource};
use survey_dashboard::charts::{HtmlSurface, SurfaceSet, SvgSurface};
use survey_dashboard::dashboard::init_dashboard;
use survey_dashboard::{config, export};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Svg,
    Html,
    Both,
}

/// Render the survey dashboard charts from a published CSV export.
#[derive(Debug, Parser)]
#[command(name = "survey-dashboard", version)]
struct Cli {
    /// Published CSV export to fetch (overrides config and SURVEY_CSV_URL)
    #[arg(long)]
    url: Option<String>,

    /// Read the export from a local file instead of fetching it
    #[arg(long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Config file (defaults to ./config.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for charts and exports
    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Both)]
    format: OutputFormat,

    /// Only accept cells that are entirely numeric
    #[arg(long)]
    strict_numbers: bool,

    /// Also write the aggregated numbers to a CSV file
    #[arg(long)]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_deref())?;
    config.apply_env();
    if let Some(url) = cli.url {
        config.csv_url = url;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if cli.strict_numbers {
        config.numbers = NumericPolicy::Strict;
    }

    let mut surface = SurfaceSet::default();
    if matches!(cli.format, OutputFormat::Svg | OutputFormat::Both) {
        surface = surface.with(SvgSurface::new(&config.output_dir)?);
    }
    if matches!(cli.format, OutputFormat::Html | OutputFormat::Both) {
        surface = surface.with(HtmlSurface::new(&config.output_dir, config.title.clone()));
    }

    let (source, location): (Box<dyn SurveySource>, String) = match cli.file {
        Some(path) => (Box::new(FileSource), path.to_string_lossy().into_owned()),
        None => (Box::new(HttpSource::new()), config.csv_url.clone()),
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Loading survey from {}", location));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = init_dashboard(
        source.as_ref(),
        &location,
        &config.mounts,
        &config.settings(),
        &mut surface,
    )
    .await;
    spinner.finish_and_clear();

    // A failed initialization has already been logged; stop there.
    if let Some(aggregates) = outcome.aggregates() {
        info!("Charts written to {}", config.output_dir.display());

        if cli.export_summary {
            match export::export_summary_csv(aggregates, &config.output_dir) {
                Ok(path) => info!("Summary written to {}", path.display()),
                Err(e) => error!("Failed to export summary: {:#}", e),
            }
        }
    }

    Ok(())
}
