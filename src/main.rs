use clap::Parser;
use inventory_sim::io::reporting;
use inventory_sim::model::state::SimState;
use inventory_sim::simulation::config::{DemandPattern, SimulationConfig, UncertaintyLevel};
use inventory_sim::simulation::engine::run_simulation;
use inventory_sim::simulation::kpi::compute_kpis;
use inventory_sim::simulation::sweep::run_sweep;
use inventory_sim::strategy::implementations::CoveragePolicy;
use inventory_sim::SimResult;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Single-item warehouse simulation under uncertain demand
#[derive(Parser, Debug)]
#[command(name = "inventory-sim")]
#[command(version)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Demand pattern: stable, seasonal, trending or volatile
    #[arg(long)]
    pattern: Option<DemandPattern>,

    /// Uncertainty level: low, medium, high or very-high
    #[arg(long)]
    uncertainty: Option<UncertaintyLevel>,

    #[arg(long)]
    min_lead_time: Option<usize>,

    #[arg(long)]
    max_lead_time: Option<usize>,

    #[arg(long)]
    max_capacity: Option<u32>,

    #[arg(long)]
    max_demand: Option<u32>,

    #[arg(long)]
    holding_cost: Option<f64>,

    #[arg(long)]
    stockout_cost: Option<f64>,

    #[arg(long)]
    purchase_cost: Option<f64>,

    #[arg(long)]
    fixed_order_cost: Option<f64>,

    #[arg(long)]
    base_weekday_demand: Option<u32>,

    #[arg(long)]
    weekend_ratio: Option<f64>,

    /// Simulation horizon in days
    #[arg(long)]
    days: Option<usize>,

    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Run this many seeds in parallel and report cost statistics
    #[arg(long)]
    runs: Option<u64>,

    /// Write the daily history to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the 7-day moving averages to this CSV file
    #[arg(long)]
    smoothed_output: Option<PathBuf>,

    /// Days shown in the console table
    #[arg(long, default_value_t = reporting::TABLE_DAYS)]
    table_days: usize,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn build_config(&self) -> SimResult<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)?,
            None => SimulationConfig::default(),
        };

        if let Some(pattern) = self.pattern {
            config.demand_pattern = pattern;
        }
        if let Some(level) = self.uncertainty {
            config = config.with_uncertainty(level);
        }

        if let Some(value) = self.min_lead_time {
            config.min_lead_time = value;
        }
        if let Some(value) = self.max_lead_time {
            config.max_lead_time = value;
        }
        if let Some(value) = self.max_capacity {
            config.max_capacity = value;
        }
        if let Some(value) = self.max_demand {
            config.max_demand = value;
        }
        if let Some(value) = self.holding_cost {
            config.holding_cost = value;
        }
        if let Some(value) = self.stockout_cost {
            config.stockout_cost = value;
        }
        if let Some(value) = self.purchase_cost {
            config.purchase_cost = value;
        }
        if let Some(value) = self.fixed_order_cost {
            config.fixed_order_cost = value;
        }
        if let Some(value) = self.base_weekday_demand {
            config.base_weekday_demand = value;
        }
        if let Some(value) = self.weekend_ratio {
            config.weekend_ratio = value;
        }
        if let Some(value) = self.days {
            config.horizon_days = value;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "inventory_sim=debug,info"
    } else {
        "inventory_sim=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(args: &Args) -> SimResult<()> {
    let config = args.build_config()?;
    let policy = CoveragePolicy::default();
    let seed = args.seed.unwrap_or_else(rand::random);

    println!("=== Inventory Control Simulation ===");
    println!(
        "Pattern: {}, Horizon: {} days, Lead time: {}-{} days, Seed: {}",
        config.demand_pattern, config.horizon_days, config.min_lead_time, config.max_lead_time, seed
    );

    if let Some(runs) = args.runs {
        let summary = run_sweep(&config, &policy, seed..seed.saturating_add(runs));
        reporting::print_sweep_stats(&summary.stats);
        return Ok(());
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let initial = SimState::initial(&config);
    let history = run_simulation(&initial, &config, &policy, &mut rng);
    info!(days = history.len(), "simulation finished");

    reporting::print_daily_table(&history, args.table_days);
    reporting::print_kpis(&compute_kpis(&history));

    if let Some(path) = &args.output {
        reporting::write_simulation_log(path, &history)?;
        println!("History written to {}", path.display());
    }
    if let Some(path) = &args.smoothed_output {
        let series = reporting::smoothed_series(&history, reporting::SMOOTHING_WINDOW);
        reporting::write_smoothed_series(path, &series)?;
        println!("Smoothed series written to {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
