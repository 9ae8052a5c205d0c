use std::future::Future;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use farm_control::{PlayerStep, Session, SessionView};
use farm_core::{ExternalReading, FarmContent, ReadingVariant};
use farm_gateway::{PowerClient, ReadingQuery};
use farm_world::{build_initial_state, load_content};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "farm_cli", about = "Kilimotek farm simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the startup climate reading once and print it.
    Fetch {
        #[arg(long, default_value = "./content")]
        content_dir: String,
        /// Override the parameter set from content.
        #[arg(long, value_enum)]
        variant: Option<VariantArg>,
    },
    /// List the farm's zones.
    Zones {
        #[arg(long, default_value = "./content")]
        content_dir: String,
    },
    /// Play a scripted session and print the dashboard after every step.
    Play {
        #[arg(long, default_value = "./content")]
        content_dir: String,
        /// Skip the climate fetch and start from the fallback reading.
        #[arg(long)]
        offline: bool,
        /// `zone` clicks it on the map, `zone:action` acts on it,
        /// `:action` uses the control panel, `select:zone` selects.
        #[arg(long = "step", required = true)]
        steps: Vec<PlayerStep>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "snake_case")]
enum VariantArg {
    WithVegetation,
    PrecipitationOnly,
}

impl From<VariantArg> for ReadingVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::WithVegetation => ReadingVariant::WithVegetation,
            VariantArg::PrecipitationOnly => ReadingVariant::PrecipitationOnly,
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")?;
    Ok(runtime.block_on(future))
}

/// One gateway call. `Err` carries the display text of the failure; the
/// caller decides what to do with the fallback.
fn fetch_reading(
    content: &FarmContent,
    variant: ReadingVariant,
) -> Result<Result<ExternalReading, String>> {
    let client = PowerClient::from_def(&content.gateway).context("building HTTP client")?;
    let query = ReadingQuery::for_site(&content.site, variant);
    let result = block_on(client.fetch_reading(&query))?;
    Ok(result.map_err(|err| {
        tracing::warn!(kind = err.kind(), error = %err, "climate fetch failed");
        err.to_string()
    }))
}

fn fetch(content_dir: &str, variant: Option<VariantArg>) -> Result<()> {
    let content = load_content(content_dir)?;
    let variant = variant.map_or(content.gateway.variant, ReadingVariant::from);

    println!(
        "Site: {} (lat {}, lon {}) {}..{}",
        content.site.name,
        content.site.latitude,
        content.site.longitude,
        content.site.start,
        content.site.end,
    );
    match fetch_reading(&content, variant)? {
        Ok(reading) => print_reading("live", &reading),
        Err(reason) => {
            println!("WARNING: {} ({reason})", farm_control::FETCH_FAILED_WARNING);
            print_reading("fallback", &ExternalReading::FALLBACK);
        }
    }
    Ok(())
}

fn zones(content_dir: &str) -> Result<()> {
    let content = load_content(content_dir)?;
    let state = build_initial_state(&content);
    for zone in &state.zones {
        println!(
            "{:<10} {:<10} {:<16} map-click={}",
            zone.id.0,
            format!("{:?}", zone.kind).to_lowercase(),
            zone.label,
            zone.kind.default_action(),
        );
    }
    Ok(())
}

fn play(content_dir: &str, offline: bool, steps: &[PlayerStep]) -> Result<()> {
    let content = load_content(content_dir)?;
    let mut session = Session::new(build_initial_state(&content));

    if offline {
        session.fail_reading("climate fetch disabled (--offline)");
    } else {
        match fetch_reading(&content, content.gateway.variant)? {
            Ok(reading) => {
                session.load_reading(reading);
            }
            Err(reason) => {
                session.fail_reading(reason);
            }
        }
    }

    print_view(&session.view());
    println!("{}", "-".repeat(72));

    for (index, step) in steps.iter().enumerate() {
        let applied = session.perform(step);
        println!(
            "[step {:02}] {step}{}",
            index + 1,
            if applied { "" } else { "  (ignored)" },
        );
        print_view(&session.view());
    }

    println!("{}", "-".repeat(72));
    println!("Done. {} events recorded.", session.drain_events().len());
    Ok(())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_reading(source: &str, reading: &ExternalReading) {
    let vegetation = reading
        .vegetation_index
        .map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"));
    println!(
        "[{source}] precipitation={:.2} mm  vegetation_index={vegetation}",
        reading.precipitation
    );
}

fn print_view(view: &SessionView) {
    if let Some(warning) = &view.warning {
        println!("  WARNING: {warning}");
    }
    match &view.dashboard {
        Some(d) => println!(
            "  soil={:.0}%  rain={:.2}mm  ndvi={:.2}  livestock={:.0}%",
            d.soil_moisture, d.rainfall, d.crop_vigor_index, d.livestock_health,
        ),
        None => println!("  Loading NASA data..."),
    }
    let zones: Vec<String> = view
        .zones
        .iter()
        .map(|z| format!("{}={}", z.id, format!("{:?}", z.status).to_lowercase()))
        .collect();
    let selected = view
        .selected_zone
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    println!("  zones=[{}]  selected={selected}", zones.join(", "));
    if let Some(prompt) = &view.controls.prompt {
        println!("  {prompt}");
    }
    println!("  > {}", view.feedback);
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch {
            content_dir,
            variant,
        } => fetch(&content_dir, variant)?,
        Commands::Zones { content_dir } => zones(&content_dir)?,
        Commands::Play {
            content_dir,
            offline,
            steps,
        } => play(&content_dir, offline, &steps)?,
    }
    Ok(())
}
