// Headless dashboard: drives the engine and prints the narrative log
//
// Usage:
//   cargo run -- --mode byzantine --ticks 40
//   cargo run -- --mode ml --realtime
//   cargo run -- --config demo.yaml --seed 0x2a

use std::env;
use std::process;
use std::thread;
use std::time::Instant;

use log::{error, info, warn, LevelFilter};
use simple_logger::SimpleLogger;

use sublyne::sl_config::seed_to_hex;
use sublyne::sl_event_sink::LoggingEventSink;
use sublyne::{parse_seed_hex, EngineConfig, LogEntry, LogLevel, Mode, SimulationEngine};

struct Options {
    mode: Option<String>,
    ticks: u64,
    seed: Option<String>,
    config_path: Option<String>,
    realtime: bool,
    verbose: bool,
}

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} [--mode geo|byzantine|ml] [--ticks N] [--seed HEX] [--config FILE] [--realtime] [--verbose]",
        program
    );
    process::exit(1);
}

fn parse_args() -> Options {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("sublyne-demo");

    let mut options = Options {
        mode: None,
        ticks: 20,
        seed: None,
        config_path: None,
        realtime: false,
        verbose: false,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--mode" => options.mode = Some(iter.next().cloned().unwrap_or_else(|| usage(program))),
            "--ticks" => {
                options.ticks = iter
                    .next()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(|| usage(program))
            }
            "--seed" => options.seed = Some(iter.next().cloned().unwrap_or_else(|| usage(program))),
            "--config" => {
                options.config_path = Some(iter.next().cloned().unwrap_or_else(|| usage(program)))
            }
            "--realtime" => options.realtime = true,
            "--verbose" => options.verbose = true,
            _ => usage(program),
        }
    }

    options
}

fn build_config(options: &Options) -> Result<EngineConfig, String> {
    let mut config = match options.config_path {
        Some(ref path) => {
            let yaml = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {}", path, e))?;
            EngineConfig::from_yaml(&yaml).map_err(|e| format!("failed to parse {}: {}", path, e))?
        }
        None => EngineConfig::default(),
    };

    if let Some(ref tag) = options.mode {
        config.initial_mode = tag.parse::<Mode>().map_err(|e| e.to_string())?;
    }
    if let Some(ref hex) = options.seed {
        config.seed = Some(parse_seed_hex(hex).map_err(|e| e.to_string())?);
    }

    Ok(config)
}

fn print_entry(entry: &LogEntry) {
    match entry.level {
        LogLevel::Error => warn!("[{}] {}", entry.timestamp, entry.message),
        _ => info!("[{}] {:<7} {}", entry.timestamp, entry.level, entry.message),
    }
}

fn main() {
    let options = parse_args();

    let level = if options.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("logger init failed: {}", e);
    }

    let config = match build_config(&options) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let mut engine = match SimulationEngine::new(config) {
        Ok(engine) => engine.with_sink(Box::new(LoggingEventSink::new(options.verbose))),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    if let Some(seed) = engine.seed_used() {
        info!("seed: {}", seed_to_hex(&seed));
    }

    engine.start();
    let interval = engine.config().tick_interval;
    let mut last = Instant::now();

    while engine.tick_count() < options.ticks {
        let appended_before = engine.stats().lines_appended;

        if options.realtime {
            if let Some(wait) = engine.time_until_next_tick() {
                thread::sleep(wait);
            }
            let now = Instant::now();
            engine.advance(now - last);
            last = now;
        } else {
            engine.advance(interval);
        }

        // print only the lines produced by the ticks that just ran
        let appended = (engine.stats().lines_appended - appended_before) as usize;
        let logs = engine.observe_logs();
        let fresh = logs.len().min(appended);
        for entry in &logs[logs.len() - fresh..] {
            print_entry(entry);
        }
    }

    engine.stop();
    engine.stats().print_summary(&engine.observe_metrics());
}
