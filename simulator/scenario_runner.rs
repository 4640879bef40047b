// Scenario Runner - Load and execute scenario YAML files
//
// Usage:
//   cargo run --bin scenario_runner scenarios/byzantine_storm.yaml
//   cargo run --bin scenario_runner scenarios/  (runs all .yaml files in directory)
//   cargo run --bin scenario_runner scenarios/tab_tour.yaml --seed 0x1234... --dump

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use log::info;
use simple_logger::SimpleLogger;

use sublyne::sl_event_sink::LoggingEventSink;
use sublyne::sl_scenario::{Scenario, ScenarioError, ScenarioOutcome};
use sublyne::parse_seed_hex;

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap_or_else(|e| eprintln!("logger init failed: {}", e));

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <scenario.yaml | directory/> [--seed SEED_HEX] [--dump]", args[0]);
        eprintln!("\nExamples:");
        eprintln!("  {} scenarios/byzantine_storm.yaml", args[0]);
        eprintln!("  {} scenarios/", args[0]);
        eprintln!("  {} scenarios/tab_tour.yaml --seed 0x123456... --dump", args[0]);
        process::exit(1);
    }

    let path = Path::new(&args[1]);

    let mut seed: Option<[u8; 32]> = None;
    let mut dump = false;
    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--seed" => {
                let hex = rest.next().unwrap_or_else(|| {
                    eprintln!("--seed needs a value");
                    process::exit(1);
                });
                seed = Some(parse_seed_hex(hex).unwrap_or_else(|e| {
                    eprintln!("{}", e);
                    process::exit(1);
                }));
            }
            "--dump" => dump = true,
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
    }

    let ok = if path.is_file() {
        run_scenario_file(path, seed, dump)
    } else if path.is_dir() {
        run_scenario_directory(path, seed, dump)
    } else {
        eprintln!("Error: Path does not exist: {}", path.display());
        false
    };

    if !ok {
        process::exit(1);
    }
}

fn run_scenario_directory(dir: &Path, seed: Option<[u8; 32]>, dump: bool) -> bool {
    let mut scenarios: Vec<PathBuf> = Vec::new();

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let ext = path.extension().and_then(|s| s.to_str());
            if ext == Some("yaml") || ext == Some("yml") {
                scenarios.push(path);
            }
        }
    }

    scenarios.sort();

    if scenarios.is_empty() {
        eprintln!("No .yaml files found in {}", dir.display());
        return false;
    }

    println!("Found {} scenario(s) to run\n", scenarios.len());

    let mut failed = 0;
    for (i, scenario_path) in scenarios.iter().enumerate() {
        println!("\n{}/{} Running: {}", i + 1, scenarios.len(), scenario_path.display());
        if !run_scenario_file(scenario_path, seed, dump) {
            failed += 1;
        }
    }

    println!(
        "\n{} passed, {} failed",
        scenarios.len() - failed,
        failed
    );
    failed == 0
}

fn run_scenario_file(path: &Path, seed: Option<[u8; 32]>, dump: bool) -> bool {
    match run_scenario(path, seed) {
        Ok(outcome) => {
            print_outcome(&outcome);
            if dump {
                match serde_yaml::to_string(&outcome) {
                    Ok(yaml) => println!("{}", yaml),
                    Err(e) => eprintln!("Failed to dump outcome: {}", e),
                }
            }
            println!("✓ Scenario complete!");
            true
        }
        Err(e) => {
            eprintln!("✗ {}: {}", path.display(), e);
            false
        }
    }
}

fn run_scenario(path: &Path, seed: Option<[u8; 32]>) -> Result<ScenarioOutcome, ScenarioError> {
    let scenario = Scenario::load(path)?;

    println!("\n=== {} ===", scenario.display_name());
    if let Some(ref desc) = scenario.meta.description {
        println!("{}\n", desc);
    }
    info!("{} step(s)", scenario.steps.len());

    scenario.run(seed, Box::new(LoggingEventSink::new(false)))
}

fn print_outcome(outcome: &ScenarioOutcome) {
    if let Some(ref seed) = outcome.seed {
        println!("Seed: {}", seed);
    }
    println!(
        "Ticks: {}  Mode: {}  Running: {}",
        outcome.ticks, outcome.mode, outcome.running
    );
    println!(
        "Metrics: {} VPS, {:.0}ms, batch {}, health {}%",
        outcome.metrics.throughput_vps,
        outcome.metrics.latency_ms,
        outcome.metrics.batch_size,
        outcome.metrics.health_percent
    );
    println!("Log ({} line(s)):", outcome.logs.len());
    for entry in &outcome.logs {
        println!("  [{}] {:<7} {}", entry.timestamp, entry.level, entry.message);
    }
}
