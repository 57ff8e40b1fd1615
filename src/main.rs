//! Base-station twin entry point: CLI wiring and config-driven pipeline.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use tracing::info;

use cell_twin::config::TwinConfig;
use cell_twin::forecast::SeasonalNaiveForecast;
use cell_twin::io::export::{StationReport, export_report};
use cell_twin::kpi::KpiSummary;
use cell_twin::scenario::{self, REFERENCE};
use cell_twin::station::{SignalGenerator, floor_to_hour};

/// Cellular base-station digital twin.
///
/// Without `--config` or `--preset` the reference preset is used.
#[derive(Debug, Parser)]
#[command(name = "cell-twin", version, about)]
struct Cli {
    /// Load configuration from a TOML file
    #[arg(long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Use a built-in preset (reference, energy_saving, neighbor_offload)
    #[arg(long)]
    preset: Option<String>,

    /// Override random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override number of stations
    #[arg(long)]
    stations: Option<usize>,

    /// Override hours of history per station
    #[arg(long)]
    hours: Option<usize>,

    /// Station to report on (defaults to the first)
    #[arg(long)]
    station: Option<String>,

    /// Scenario name, e.g. "Energy-Saving Mode"
    #[arg(long)]
    scenario: Option<String>,

    /// Scenario fraction (savings depth or offloaded share)
    #[arg(long)]
    fraction: Option<f64>,

    /// Write CSV files for the selected station into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Start REST API server after reporting
    #[cfg(feature = "api")]
    #[arg(long)]
    serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

impl Cli {
    /// Resolves the base configuration and applies command-line overrides.
    fn twin_config(&self) -> Result<TwinConfig> {
        let mut cfg = if let Some(path) = &self.config {
            TwinConfig::from_toml_file(path)?
        } else if let Some(name) = &self.preset {
            TwinConfig::from_preset(name)?
        } else {
            TwinConfig::reference()
        };

        if let Some(seed) = self.seed {
            cfg.generator.seed = seed;
        }
        if let Some(n) = self.stations {
            cfg.generator.stations = n;
        }
        if let Some(h) = self.hours {
            cfg.generator.horizon_hours = h;
        }
        if let Some(name) = &self.scenario {
            cfg.scenario.name = name.clone();
        }
        if let Some(f) = self.fraction {
            cfg.scenario.savings_fraction = f;
            cfg.scenario.offload_fraction = f;
        }
        Ok(cfg)
    }
}

fn main() {
    cell_twin::logging::init();
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cfg = cli.twin_config()?;

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("{} configuration error(s)", errors.len());
    }

    let g = &cfg.generator;
    let end = floor_to_hour(Utc::now());
    let fleet = SignalGenerator::new(g.seed).generate(g.stations, g.horizon_hours, end);
    info!(
        stations = fleet.len(),
        hours = g.horizon_hours,
        seed = g.seed,
        "fleet generated"
    );

    let baseline = match &cli.station {
        Some(id) => fleet.get(id.as_str()).with_context(|| {
            let known: Vec<&str> = fleet.keys().map(String::as_str).collect();
            format!("unknown station \"{id}\", available: {}", known.join(", "))
        })?,
        None => fleet
            .values()
            .next()
            .context("fleet contains no stations")?,
    };

    let params = cfg.scenario.parameters();
    let transformed = scenario::apply(baseline, &cfg.scenario.name, &params);
    let label = cfg
        .scenario
        .resolve()
        .map_or_else(|| REFERENCE.to_string(), |s| s.to_string());
    let slug = cfg.scenario.resolve().map_or("reference", |s| s.slug());

    let base_kpi = KpiSummary::from_series(baseline);
    let scen_kpi = KpiSummary::from_series(&transformed);

    println!("Station {}", baseline.station_id);
    println!("\n== Baseline ==\n{base_kpi}");
    println!("\n== {label} ==\n{scen_kpi}");
    println!("\n== Change vs baseline ==\n{}", scen_kpi.delta(&base_kpi));

    let fc = &cfg.forecast;
    let points = SeasonalNaiveForecast::new(fc.seasonal_period).points(baseline, fc.steps);
    println!("\n== Traffic forecast ({} h) ==", fc.steps);
    for p in &points {
        println!("{}  {:>8.1} Mb/s", p.time.format("%Y-%m-%d %H:%M"), p.traffic_mbps);
    }

    let recs = cfg.recommender.recommend(
        &baseline.traffic(),
        baseline.profile.capacity_mbps,
        fc.steps,
        end,
    );
    println!("\n== Recommendations ==");
    if recs.is_empty() {
        println!("No additional action needed based on the current forecast.");
    }
    for r in &recs {
        println!("[{}] {}\n    expected: {}", r.time_range, r.action, r.expected_impact);
    }

    if let Some(dir) = &cli.export_dir {
        let report = StationReport {
            baseline,
            scenario: &transformed,
            scenario_slug: slug,
            forecast: &points,
            recommendations: &recs,
        };
        let written = export_report(&report, dir)
            .with_context(|| format!("failed to export to \"{}\"", dir.display()))?;
        for path in &written {
            info!(path = %path.display(), "exported");
        }
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(cell_twin::api::AppState {
            config: cfg,
            fleet,
            forecast_start: end,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        rt.block_on(cell_twin::api::serve(state, addr))
            .context("API server failed")?;
    }

    Ok(())
}
