//! Reference latency for the dashboard validator set vs. the synthetic Geo model
//!
//! Run with: cargo run --example geo_matrix_report

use std::time::Duration;

use log::info;
use simple_logger::SimpleLogger;

use sublyne::sl_geo_matrix::{GeoLatencyMatrix, Region};
use sublyne::sl_geo_model::GEO_MODEL_REGIONS;
use sublyne::{EngineConfig, Mode, SimulationEngine};

fn main() {
    SimpleLogger::new().init().unwrap();

    let matrix = GeoLatencyMatrix::new();

    info!("Validator set:");
    for (id, region) in GEO_MODEL_REGIONS.iter().enumerate() {
        info!("  validator {}: {}", id, region);
    }
    info!(
        "Reference average latency: {:.1}ms, critical path: {}ms",
        matrix.average_latency(&GEO_MODEL_REGIONS),
        matrix.max_latency(&GEO_MODEL_REGIONS)
    );
    info!(
        "All {} regions: average {:.1}ms, critical path {}ms",
        Region::ALL.len(),
        matrix.average_latency(&Region::ALL),
        matrix.max_latency(&Region::ALL)
    );

    let config = EngineConfig {
        initial_mode: Mode::Geo,
        seed: Some([7u8; 32]),
        ..Default::default()
    };
    let mut engine = SimulationEngine::new(config).unwrap();
    engine.start();
    engine.advance(Duration::from_secs(300));
    engine.stop();

    let stats = engine.stats();
    info!(
        "Synthetic links: {} ({} loopback), mean deviation from reference: {:?}ms",
        stats.links_established,
        stats.loopback_links,
        stats.mean_link_deviation_ms()
    );
}
