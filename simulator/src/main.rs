use anyhow::Context;
use clap::Parser;
use greencore::profile::{group_thousands, ArraySize, PROFILES};
use greencore::simulation::classify;
use gui_bridge::bridge::GuiBridge;
use log::info;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::{Runner, WorkflowResult};

mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Green computing energy monitor driver")]
struct Args {
    /// Run the configured simulations and print the results table (default mode)
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Algorithm to simulate: bubble, quick or optimized
    #[arg(long)]
    algorithm: Option<String>,
    /// Number of elements: 500, 1000, 5000 or 10000
    #[arg(long)]
    array_size: Option<u32>,
    /// Milliseconds between two animation ticks
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Print the algorithm profile table and exit
    #[arg(long, default_value_t = false)]
    profiles: bool,
    /// Keep the GUI bridge alive for the visualizer
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.profiles {
        print_profiles();
        return Ok(());
    }

    let base_config = if let Some(path) = args.workflow.as_ref() {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::default()
    };
    let workflow_config =
        base_config.with_overrides(args.algorithm.as_deref(), args.array_size, args.tick_ms)?;

    let (offline, serve) = effective_modes(&args);
    let runner = Runner::new(&workflow_config);
    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating simulation runtime")?;

    if offline {
        let plan = workflow_config.plan();
        let result = runtime
            .block_on(runner.execute_plan(&plan))
            .context("running offline workflow")?;
        print_results(&result);
    }

    if serve {
        let bridge = GuiBridge::serve(&runner, workflow_config.bind_address)?;
        bridge.publish_status(&format!(
            "HTTP bridge running on http://{} (Ctrl+C to stop)...",
            bridge.address()
        ));
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
        bridge.publish_status("Shutting down bridge.");
    }

    Ok(())
}

/// Offline is the default when no mode is requested.
fn effective_modes(args: &Args) -> (bool, bool) {
    if !args.offline && !args.serve {
        info!("no mode selected, running the offline workflow");
        return (true, false);
    }
    (args.offline, args.serve)
}

fn print_profiles() {
    for profile in PROFILES.iter() {
        println!(
            "{:<10} {:<15} {:<11} x{:<4} energy: {} | CO2: {} | cost: {} | scalability: {}",
            profile.id.as_str(),
            profile.display_name,
            profile.complexity,
            profile.energy_multiplier,
            profile.impact.energy,
            profile.impact.co2,
            profile.impact.cost,
            profile.impact.scalability
        );
    }
    let sizes: Vec<String> = ArraySize::OPTIONS.iter().map(|s| s.to_string()).collect();
    println!("array sizes: {}", sizes.join(", "));
}

fn print_results(result: &WorkflowResult) {
    if let Some(last) = result.records.last() {
        let display = last.metrics.display();
        println!(
            "Execution Time {} | CPU Cycles {} | Energy Used {} | Carbon Footprint {}",
            display.card_time(),
            display.card_cycles(),
            display.card_energy(),
            display.card_carbon()
        );
    }

    println!(
        "{:<16} {:>10} {:>12} {:>12} {:>12}  {}",
        "Algorithm", "Array Size", "Time (s)", "Energy (mJ)", "CO2 (μg)", "Efficiency"
    );
    for record in &result.history {
        let display = record.metrics.display();
        println!(
            "{:<16} {:>10} {:>12} {:>12} {:>12}  {}",
            record.algorithm_name,
            group_thousands(record.array_size.get() as u64),
            display.seconds,
            display.millijoules,
            display.micrograms,
            classify(record).label()
        );
    }
    println!(
        "{} of {} recent runs efficient",
        result.efficient_count(),
        result.history.len()
    );
}
