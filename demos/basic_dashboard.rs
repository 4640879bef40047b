//! Basic dashboard run: every tab for a while, then a summary
//!
//! Run with: cargo run --example basic_dashboard

use std::time::Duration;

use log::info;
use simple_logger::SimpleLogger;

use sublyne::sl_event_sink::LoggingEventSink;
use sublyne::{EngineConfig, Mode, SimulationEngine};

fn main() {
    SimpleLogger::new().init().unwrap();

    info!("Setting up engine...");

    let config = EngineConfig {
        seed: None, // Will be auto-generated
        ..Default::default()
    };
    let mut engine = SimulationEngine::new(config)
        .unwrap()
        .with_sink(Box::new(LoggingEventSink::new(true)));

    engine.start();
    for mode in Mode::ALL {
        engine.set_mode(mode);
        // ten ticks per tab on the virtual clock
        engine.advance(Duration::from_millis(1500 * 10));

        info!("--- {} tab ---", mode);
        let logs = engine.observe_logs();
        for entry in logs.iter().skip(logs.len().saturating_sub(5)) {
            info!("[{}] {:<7} {}", entry.timestamp, entry.level, entry.message);
        }
    }
    engine.stop();

    info!("Seed used: {:?}", engine.seed_used());
    engine.stats().print_summary(&engine.observe_metrics());
}
