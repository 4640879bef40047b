// Mode models
//
// Each model maps the current metrics plus fresh random draws to the next
// metrics, the narrative lines to show and the typed events for sinks. Models
// keep no memory between ticks: whatever must carry over lives in
// `MetricsState`.

use crate::sl_byzantine_model::ByzantineModel;
use crate::sl_geo_model::GeoModel;
use crate::sl_interface::{Entropy, Event, LogLevel, Mode};
use crate::sl_metrics::MetricsState;
use crate::sl_ml_model::MlBatchingModel;

/// What a single model step produced
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutcome {
    pub metrics: MetricsState,
    pub lines: Vec<(String, LogLevel)>,
    pub events: Vec<Event>,
}

impl ModelOutcome {
    pub fn unchanged(metrics: MetricsState) -> Self {
        Self {
            metrics,
            lines: Vec::new(),
            events: Vec::new(),
        }
    }

    pub(crate) fn with_line(mut self, message: String, level: LogLevel) -> Self {
        self.lines.push((message, level));
        self
    }

    pub(crate) fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }
}

pub trait ModeModel {
    fn mode(&self) -> Mode;

    fn step(&self, current: &MetricsState, entropy: &mut dyn Entropy) -> ModelOutcome;
}

/// One instance of every model, selected by `Mode`
pub struct ModelSet {
    geo: GeoModel,
    byzantine: ByzantineModel,
    ml: MlBatchingModel,
}

impl ModelSet {
    pub fn new(fault_probability: f64) -> Self {
        Self {
            geo: GeoModel::new(),
            byzantine: ByzantineModel::new(fault_probability),
            ml: MlBatchingModel::new(),
        }
    }

    pub fn get(&self, mode: Mode) -> &dyn ModeModel {
        match mode {
            Mode::Geo => &self.geo,
            Mode::Byzantine => &self.byzantine,
            Mode::MlBatching => &self.ml,
        }
    }
}
