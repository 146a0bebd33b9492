use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::AtomicBool;

use checkout_sim::simulation::{
    random, CustomerProfile, Trial, TrialParams, DEFAULT_ARRIVAL_RATE,
    DEFAULT_EXPRESS_LANE_COUNT, DEFAULT_LANE_COUNT, DEFAULT_MEAN_ITEM_COUNT,
    DEFAULT_MEAN_TIME_PER_ITEM, DEFAULT_STDEV_ITEM_COUNT, DEFAULT_STDEV_TIME_PER_ITEM,
    DEFAULT_TIME_HORIZON,
};
use checkout_sim::sweep::{run_sweep_with, SweepConfig};

#[derive(Parser)]
#[command(name = "checkout_sim")]
#[command(about = "Checkout lane wait-time simulation")]
struct Cli {
    /// Total number of checkout lanes
    #[arg(long, default_value_t = DEFAULT_LANE_COUNT)]
    lanes: usize,

    /// Smallest express lane count to sweep
    #[arg(long, default_value_t = DEFAULT_EXPRESS_LANE_COUNT)]
    min_express_lanes: usize,

    /// Largest express lane count to sweep
    #[arg(long, default_value_t = DEFAULT_EXPRESS_LANE_COUNT)]
    max_express_lanes: usize,

    /// Smallest express item limit to sweep
    #[arg(long, default_value_t = 0)]
    min_limit: u32,

    /// Largest express item limit to sweep
    #[arg(long, default_value_t = 49)]
    max_limit: u32,

    /// Trials per sweep point
    #[arg(long, default_value_t = 5000)]
    trials: usize,

    /// Simulated minutes per trial
    #[arg(long, default_value_t = DEFAULT_TIME_HORIZON)]
    horizon: f64,

    /// Mean customer arrivals per minute
    #[arg(long, default_value_t = DEFAULT_ARRIVAL_RATE)]
    arrival_rate: f64,

    /// Worker threads (defaults to available parallelism)
    #[arg(long)]
    threads: Option<usize>,

    /// Random seed (defaults to the wall clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Mean items per customer
    #[arg(long, default_value_t = DEFAULT_MEAN_ITEM_COUNT)]
    mean_items: f64,

    /// Standard deviation of items per customer
    #[arg(long, default_value_t = DEFAULT_STDEV_ITEM_COUNT)]
    stdev_items: f64,

    /// Mean minutes per item
    #[arg(long, default_value_t = DEFAULT_MEAN_TIME_PER_ITEM)]
    mean_item_time: f64,

    /// Standard deviation of minutes per item
    #[arg(long, default_value_t = DEFAULT_STDEV_TIME_PER_ITEM)]
    stdev_item_time: f64,

    /// Run a single trial with --max-express-lanes and --max-limit
    #[arg(long)]
    single: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn,checkout_sim=info"))
        .init();

    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(random::clock_seed);
    info!("Using seed {}", seed);

    let profile = CustomerProfile {
        mean_item_count: cli.mean_items,
        stdev_item_count: cli.stdev_items,
        mean_time_per_item: cli.mean_item_time,
        stdev_time_per_item: cli.stdev_item_time,
    };

    if cli.single {
        run_single(&cli, &profile, seed)
    } else {
        run_table(&cli, &profile, seed)
    }
}

/// Run one trial and print what happened
fn run_single(cli: &Cli, profile: &CustomerProfile, seed: u64) -> Result<()> {
    let params = TrialParams::new(
        cli.lanes,
        cli.max_express_lanes,
        cli.max_limit,
        cli.horizon,
        cli.arrival_rate,
    );
    let mut rng = StdRng::seed_from_u64(seed);
    let outcome = Trial::new(params, *profile)
        .and_then(|trial| trial.run(&mut rng))
        .context("Trial failed")?;

    println!("Average wait time:    {:.4}", outcome.average_wait_time);
    println!("Customers arrived:    {}", outcome.customers_arrived);
    println!("Customers processed:  {}", outcome.customers_processed);
    println!("Customers unfinished: {}", outcome.customers_unfinished);
    println!("Simulated time:       {:.2}", outcome.elapsed);
    Ok(())
}

/// Run the sweep and print one tab-separated row per point
fn run_table(cli: &Cli, profile: &CustomerProfile, seed: u64) -> Result<()> {
    let defaults = SweepConfig::default();
    let config = SweepConfig {
        lane_count: cli.lanes,
        express_lane_counts: cli.min_express_lanes..=cli.max_express_lanes,
        express_limits: cli.min_limit..=cli.max_limit,
        trials_per_point: cli.trials,
        time_horizon: cli.horizon,
        arrival_rate: cli.arrival_rate,
        threads: cli.threads.unwrap_or(defaults.threads),
        seed,
    };

    let cancel = AtomicBool::new(false);
    // Rows are printed as points finish
    let points = run_sweep_with(&config, profile, &cancel, |point| {
        let (mean, std_dev) = point
            .summary
            .map_or((f64::NAN, f64::NAN), |summary| (summary.mean, summary.std_dev));
        println!(
            "{}\t{}\t{:.6}\t{:.6}",
            point.express_lanes, point.express_limit, mean, std_dev
        );
    })?;

    info!("=== SWEEP COMPLETE ===");
    info!("Points: {}", points.len());
    info!(
        "Empty trials: {}",
        points.iter().map(|point| point.empty_trials).sum::<usize>()
    );
    Ok(())
}
