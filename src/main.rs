use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use avenue_sim::simulation::{
    SimulationConfig, SimulationRegistry, StepResult, DEFAULT_FLIP_INTERVAL, DEFAULT_LANE_LENGTH,
    DEFAULT_RAMP_LENGTH,
};

#[derive(Parser)]
#[command(name = "avenue_sim")]
#[command(about = "Headless avenue and ramp traffic simulation")]
struct Cli {
    /// Number of cars to generate
    #[arg(long, default_value = "20")]
    cars: usize,

    /// Keep lane 0 closed to traffic
    #[arg(long)]
    reserve_lane: bool,

    /// Avenue length in cells
    #[arg(long, default_value_t = DEFAULT_LANE_LENGTH)]
    lane_length: usize,

    /// Ramp length in cells
    #[arg(long, default_value_t = DEFAULT_RAMP_LENGTH)]
    ramp_length: usize,

    /// Ticks between traffic light flips
    #[arg(long, default_value_t = DEFAULT_FLIP_INTERVAL)]
    flip_interval: u32,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many ticks
    #[arg(long, default_value = "10000")]
    max_ticks: u64,

    /// Print a summary and map every N ticks (0 disables)
    #[arg(long, default_value = "0")]
    report_every: u64,

    /// Print every snapshot as a JSON line
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> SimulationConfig {
        SimulationConfig {
            all_lanes: !self.reserve_lane,
            car_count: self.cars,
            lane_length: self.lane_length,
            ramp_length: self.ramp_length,
            flip_interval: self.flip_interval,
            seed: self.seed,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Run the simulation until every car has left the avenue
fn run_headless(cli: &Cli) -> Result<()> {
    let mut registry = SimulationRegistry::new();
    let (handle, initial) = registry
        .create(cli.config())
        .context("Failed to create simulation")?;

    if cli.json {
        println!("{}", serde_json::to_string(&initial)?);
    }

    let avenue = registry.avenue(handle)?;
    info!(
        "Running simulation {} with {} cars",
        handle,
        avenue.total_cars()
    );
    if cli.report_every > 0 {
        avenue.print_summary();
        avenue.draw_map();
    }

    let mut ticks = 0;
    let summary = loop {
        let result = registry
            .step(handle)
            .with_context(|| format!("Failed to step simulation {handle}"))?;

        match result {
            StepResult::Snapshot(snapshot) => {
                ticks += 1;
                if cli.json {
                    println!("{}", serde_json::to_string(&snapshot)?);
                }
                if cli.report_every > 0 && ticks % cli.report_every == 0 {
                    let avenue = registry.avenue(handle)?;
                    println!("--- After tick {} ---", ticks);
                    avenue.print_summary();
                    avenue.draw_map();
                }
                if ticks >= cli.max_ticks {
                    let active = registry.active_car_count(handle)?;
                    bail!(
                        "Simulation did not finish within {} ticks ({} cars still active)",
                        cli.max_ticks,
                        active
                    );
                }
            }
            StepResult::Finished(summary) => break summary,
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string(&summary)?);
    }

    info!("=== SIMULATION COMPLETE ===");
    info!("Total steps: {}", summary.total_steps);
    info!("Total cars: {}", summary.car_count);
    info!("Cars per step: {:.3}", summary.cars_per_step);
    Ok(())
}
