//! Run configuration (C10): every tunable named across the component
//! design and the concurrency model, collected into one struct whose
//! defaults match the literal constants used throughout.

use crate::error::{EngineError, EngineResult};
use crate::types::TransportFilter;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityPreference {
    Cheap,
    Fast,
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationPreference {
    SameDay,
    Normal,
    Long,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub priority_preference: PriorityPreference,
    pub transport_filter: TransportFilter,
    pub duration_preference: DurationPreference,
    pub use_intl_hubs: bool,
    pub accommodation_enabled: bool,
    pub accommodation_threshold_hours: u32,
    pub max_hubs: usize,
    pub min_transfer_policies: Vec<u32>,

    pub max_workers: usize,
    pub flight_timeout: Duration,
    pub train_timeout: Duration,
    pub station_timeout: Duration,
    pub top_n: usize,
    pub warmup_enabled: bool,
    pub warmup_timeout: Duration,
    pub warmup_origin: String,
    pub warmup_destination: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            priority_preference: PriorityPreference::Balanced,
            transport_filter: TransportFilter::All,
            duration_preference: DurationPreference::Normal,
            use_intl_hubs: true,
            accommodation_enabled: true,
            accommodation_threshold_hours: 6,
            max_hubs: 15,
            min_transfer_policies: vec![2, 3],

            max_workers: 15,
            flight_timeout: Duration::from_secs(120),
            train_timeout: Duration::from_secs(60),
            station_timeout: Duration::from_secs(30),
            top_n: 30,
            warmup_enabled: false,
            warmup_timeout: Duration::from_secs(150),
            warmup_origin: "北京".to_string(),
            warmup_destination: "上海".to_string(),
        }
    }
}

impl RunOptions {
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_hubs == 0 {
            return Err(EngineError::InvalidOptions("max_hubs must be > 0".into()));
        }
        if self.max_workers == 0 {
            return Err(EngineError::InvalidOptions("max_workers must be > 0".into()));
        }
        if self.accommodation_threshold_hours == 0 {
            return Err(EngineError::InvalidOptions(
                "accommodation_threshold_hours must be > 0".into(),
            ));
        }
        if self.min_transfer_policies.is_empty() {
            return Err(EngineError::InvalidOptions(
                "min_transfer_policies must not be empty".into(),
            ));
        }
        Ok(())
    }
}
