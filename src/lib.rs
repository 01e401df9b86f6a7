//! # go-home-router
//!
//! A multi-modal intercity route planning engine: given an origin, a
//! destination, and a date, it queries a flight provider and a train
//! provider (through a pluggable `ProviderGateway`), enumerates direct,
//! one-transfer, and two-transfer itineraries, checks whether each
//! transfer is actually catchable, prices in an overnight accommodation
//! surcharge when one is implied, and returns the feasible set sorted by
//! price then duration.

pub mod calculator;
pub mod classifier;
pub mod config;
pub mod error;
pub mod fixture;
pub mod gateway;
pub mod hubs;
pub mod observer;
pub mod parser;
pub mod planner;
pub mod report;
pub mod scheduler;
pub mod session;
pub mod station_cache;
pub mod types;

pub use config::{DurationPreference, PriorityPreference, RunOptions};
pub use error::{EngineError, EngineResult};
pub use fixture::FixtureGateway;
pub use gateway::{GatewayError, Provider, ProviderGateway};
pub use observer::{RunEvent, RunEventLevel, RunObserver, TracingObserver};
pub use session::{plan, PlanOutcome, PlanRequest};
pub use types::{RoutePlan, RouteType, SegmentQuery, SegmentResult, TransportFilter, TransportMode, TransportSegment};
