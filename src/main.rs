mod analysis;
mod error;
mod io;
mod model;
mod sampling;
mod simulation;

use crate::analysis::fuel_stats::FuelSummary;
use crate::analysis::hospital_stats::HospitalSummary;
use crate::error::SimError;
use crate::io::{charts, reporting};
use crate::sampling::implementations::DrawPlan;
use crate::simulation::config::{positive, FuelConfig, HospitalConfig};
use crate::simulation::{fuel, hospital};
use clap::{Args, Parser, Subcommand};
use env_logger::{Builder, Env};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

/// Fuel-station queuing and hospital inventory Monte Carlo simulations
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Cli {
    /// Log per-step details
    #[arg(long, short, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Three pumps, three car categories, overflow between queues
    Fuel(FuelArgs),
    /// First-floor stock fed from a basement with periodic orders
    Hospital(HospitalArgs),
}

/// Options every run shares.
#[derive(Args, Debug)]
struct RunArgs {
    /// Random seed (fresh entropy when omitted)
    #[arg(long, short)]
    seed: Option<u64>,

    /// Replay fixed [0, 99] draws (arrival, category, service), e.g. 5,10,3
    #[arg(long, value_delimiter = ',', conflicts_with = "seed")]
    script_percents: Option<Vec<u32>>,

    /// Replay fixed [0, 1) overflow draws
    #[arg(long, value_delimiter = ',', conflicts_with = "seed")]
    script_units: Option<Vec<f64>>,

    /// Replay fixed [1, 100] draws (rooms, lead times), e.g. 30,90
    #[arg(long, value_delimiter = ',', conflicts_with = "seed")]
    script_tickets: Option<Vec<u32>>,

    /// Configuration JSON file, overridden by explicit flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Export the simulation table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Skip the text charts
    #[arg(long)]
    no_charts: bool,
}

#[derive(Args, Debug)]
struct FuelArgs {
    /// Number of cars
    #[arg(long, short = 'n', allow_negative_numbers = true)]
    cars: Option<i64>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args, Debug)]
struct HospitalArgs {
    /// N: review period in days
    #[arg(long, allow_negative_numbers = true)]
    review_period: Option<i64>,

    /// M: basement capacity
    #[arg(long, allow_negative_numbers = true)]
    capacity: Option<i64>,

    /// Number of days to simulate
    #[arg(long, allow_negative_numbers = true)]
    max_days: Option<i64>,

    /// Days per cycle (row labels only)
    #[arg(long, allow_negative_numbers = true)]
    days_per_cycle: Option<i64>,

    /// Manual first-floor trace pinned to the first days, e.g. 4,1,7.
    /// Without it only day 1 is pinned, to the starting stock.
    #[arg(long, value_delimiter = ',')]
    first_floor: Option<Vec<i32>>,

    #[command(flatten)]
    run: RunArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let result = match cli.command {
        Command::Fuel(args) => run_fuel(args),
        Command::Hospital(args) => run_hospital(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ SimError::InvalidInput { .. }) => {
            eprintln!("Input Error: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

impl RunArgs {
    fn draw_plan(&self) -> DrawPlan {
        DrawPlan {
            seed: self.seed,
            percents: self.script_percents.clone(),
            units: self.script_units.clone(),
            tickets: self.script_tickets.clone(),
        }
    }
}

fn run_fuel(args: FuelArgs) -> Result<(), SimError> {
    let mut config = match &args.run.config {
        Some(path) => FuelConfig::from_json_file(path)?,
        None => FuelConfig::default(),
    };
    if let Some(cars) = args.cars {
        config.cars = positive("number of cars", cars)?;
    }

    let mut draws = args.run.draw_plan().build()?;
    let run = fuel::simulate(&config, draws.as_mut())?;
    let summary = FuelSummary::from_run(&run);

    println!("=== Simulation Table ===");
    println!("{}", reporting::fuel_table(&run.records));
    println!("\n{}", reporting::fuel_statistics(&summary));

    if !args.run.no_charts {
        println!("=== Histograms ===");
        for (pump, metrics) in run.state.metrics.iter() {
            if !metrics.waiting_times.is_empty() {
                let title = format!("{pump} Wait Times (minutes)");
                println!("{}", charts::render_histogram(&title, &metrics.waiting_times, 10));
            }
        }
    }

    if let Some(path) = &args.run.csv {
        reporting::write_fuel_csv(path, &run.records)?;
    }
    Ok(())
}

fn run_hospital(args: HospitalArgs) -> Result<(), SimError> {
    let mut config = match &args.run.config {
        Some(path) => HospitalConfig::from_json_file(path)?,
        None => HospitalConfig::default(),
    };
    if let Some(n) = args.review_period {
        config.review_period = positive("N (review period)", n)?;
    }
    if let Some(m) = args.capacity {
        config.capacity = positive("M (basement capacity)", m)?;
    }
    if let Some(days) = args.max_days {
        config.max_days = positive("max days", days)?;
    }
    if let Some(days) = args.days_per_cycle {
        config.days_per_cycle = positive("days per cycle", days)?;
    }
    if args.first_floor.is_some() {
        config.first_floor_overrides = args.first_floor;
    }

    let mut draws = args.run.draw_plan().build()?;
    let rows = hospital::simulate(&config, draws.as_mut())?;
    let seeds = config.first_floor_seeds();
    info!("Pinning the first {} day(s) of first-floor stock", seeds.len());
    let rows = hospital::reconcile_first_floor(&rows, &seeds, config.floor_restock);
    let summary = HospitalSummary::from_rows(&rows);

    println!("=== Simulation Table ===");
    println!("{}", reporting::hospital_table(&rows));
    println!("\n=== Calculated Parameters ===");
    println!("{}", reporting::hospital_statistics(&summary));

    if !args.run.no_charts {
        println!("{}", charts::render_inventory_chart(&rows));
    }

    if let Some(path) = &args.run.csv {
        reporting::write_csv(path, &rows)?;
    }
    Ok(())
}
