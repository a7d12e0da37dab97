//! solar-sizer entry point: CLI wiring and scenario-driven engine construction.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use solar_sizer::assessment::assess;
use solar_sizer::catalog::DEFAULT_GHI_KWH_M2_DAY;
use solar_sizer::config::ScenarioConfig;
use solar_sizer::engine::TableEngine;
use solar_sizer::io::export::{export_breakdown, export_cash_flows};
use solar_sizer::request::{BackupHours, BatteryType, SizingRequest, SystemTopology};
use solar_sizer::sizing::appliances::ApplianceUse;

/// Size and cost a household solar-plus-storage system.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    source: ScenarioSource,
    #[command(flatten)]
    request: RequestOverrides,
    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
    /// Size at 70%, 100% and 130% of the requested consumption
    #[arg(long, conflicts_with_all = ["breakdown_out", "cashflow_out"])]
    compare: bool,
    /// Compare lithium and lead-acid storage over the analysis horizon
    #[arg(long, conflicts_with_all = ["compare", "breakdown_out", "cashflow_out"])]
    compare_batteries: bool,
    /// Fail on unknown locations instead of using the default irradiance
    #[arg(long)]
    strict_location: bool,
    /// Write the cost breakdown to a CSV file
    #[arg(long, value_name = "PATH")]
    breakdown_out: Option<PathBuf>,
    /// Write the yearly cash flows to a CSV file
    #[arg(long, value_name = "PATH")]
    cashflow_out: Option<PathBuf>,
    /// Start the REST API after printing the report
    #[cfg(feature = "api")]
    #[arg(long)]
    serve: bool,
    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct ScenarioSource {
    /// Load the scenario from a TOML file
    #[arg(long, value_name = "PATH")]
    scenario: Option<PathBuf>,
    /// Use a built-in preset (baseline, off_grid_lithium, grid_tied)
    #[arg(long)]
    preset: Option<String>,
}

#[derive(Args, Debug)]
struct RequestOverrides {
    /// Monthly consumption (kWh)
    #[arg(long)]
    monthly_kwh: Option<f64>,
    /// Monthly electricity bill
    #[arg(long)]
    monthly_bill: Option<f64>,
    /// Appliance in use, repeatable (e.g. fridge, tv:2, kettle:1:2000:0.3)
    #[arg(long = "appliance", value_name = "NAME[:COUNT[:W:H]]")]
    appliances: Vec<ApplianceUse>,
    /// Electricity rate per kWh
    #[arg(long)]
    rate: Option<f64>,
    /// Tariff category used to price the bill
    #[arg(long)]
    tariff_category: Option<String>,
    /// Location key for irradiance lookup
    #[arg(long)]
    location: Option<String>,
    /// Irradiance (kWh/m²/day), bypasses the location lookup
    #[arg(long)]
    ghi: Option<f64>,
    /// grid_tied, hybrid or off_grid
    #[arg(long)]
    topology: Option<SystemTopology>,
    /// lead_acid, gel or lithium
    #[arg(long)]
    battery: Option<BatteryType>,
    /// 4, 8, 12 or 24
    #[arg(long)]
    backup_hours: Option<BackupHours>,
}

impl RequestOverrides {
    /// Applies every given flag on top of the scenario's request.
    ///
    /// A consumption flag replaces whichever consumption figure or appliance
    /// list the scenario carried; conflicting flags are left for the engine
    /// to reject.
    fn apply(self, request: &mut SizingRequest) {
        if self.monthly_kwh.is_some() || self.monthly_bill.is_some() || !self.appliances.is_empty() {
            request.monthly_kwh = self.monthly_kwh;
            request.monthly_bill = self.monthly_bill;
            request.appliances = self.appliances;
        }
        if self.rate.is_some() {
            request.rate = self.rate;
        }
        if self.tariff_category.is_some() {
            request.tariff_category = self.tariff_category;
        }
        if let Some(location) = self.location {
            request.location = Some(location);
            request.ghi_kwh_m2_day = None;
        }
        if self.ghi.is_some() {
            request.ghi_kwh_m2_day = self.ghi;
        }
        if let Some(topology) = self.topology {
            request.topology = topology;
        }
        if let Some(battery) = self.battery {
            request.battery = battery;
        }
        if let Some(backup_hours) = self.backup_hours {
            request.backup_hours = backup_hours;
        }
    }
}

fn load_scenario(source: &ScenarioSource) -> Result<ScenarioConfig, String> {
    match (&source.scenario, &source.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path).map_err(|e| e.to_string()),
        (None, Some(name)) => ScenarioConfig::from_preset(name).map_err(|e| e.to_string()),
        (None, None) => Ok(ScenarioConfig::baseline()),
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut scenario = load_scenario(&cli.source).unwrap_or_else(|e| fail(e));
    cli.request.apply(&mut scenario.request);
    debug!(request = ?scenario.request, "scenario loaded");

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let mut engine = TableEngine::from_scenario(&scenario);
    if !cli.strict_location {
        engine = engine.with_irradiance_fallback(DEFAULT_GHI_KWH_M2_DAY);
    }

    if cli.compare_batteries {
        let comparison = engine.compare_batteries(&scenario.request).unwrap_or_else(|e| fail(e));
        if cli.json {
            let json = serde_json::to_string_pretty(&comparison).unwrap_or_else(|e| fail(e));
            println!("{json}");
        } else {
            println!("{comparison}");
        }
    } else if cli.compare {
        let comparison = engine.compare(&scenario.request).unwrap_or_else(|e| fail(e));
        if cli.json {
            let json = serde_json::to_string_pretty(&comparison).unwrap_or_else(|e| fail(e));
            println!("{json}");
        } else {
            println!("{comparison}");
        }
    } else {
        let report = engine.run(&scenario.request).unwrap_or_else(|e| fail(e));
        let assessment = assess(&report, &engine.policy().assessment);
        if cli.json {
            let json = serde_json::to_string_pretty(&report).unwrap_or_else(|e| fail(e));
            println!("{json}");
        } else {
            println!("{report}");
            println!("\n{assessment}");
        }

        if let Some(ref path) = cli.breakdown_out {
            export_breakdown(&report, path)
                .unwrap_or_else(|e| fail(format!("failed to write CSV: {e}")));
            info!(path = %path.display(), "cost breakdown written");
        }
        if let Some(ref path) = cli.cashflow_out {
            export_cash_flows(&report, path)
                .unwrap_or_else(|e| fail(format!("failed to write CSV: {e}")));
            info!(path = %path.display(), "cash flows written");
        }
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(solar_sizer::api::AppState { engine });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new()
            .unwrap_or_else(|e| fail(format!("failed to create tokio runtime: {e}")));
        if let Err(e) = rt.block_on(solar_sizer::api::serve(state, addr)) {
            fail(format!("server error: {e}"));
        }
    }
}
