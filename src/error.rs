//! Unified error taxonomy for the routing engine.
//!
//! Failures that occur *inside* a query run (timeouts, rejected payloads,
//! infeasible transfers) never reach here — they degrade to fewer results,
//! per the propagation policy described alongside the scheduler and
//! calculator. `EngineError` is for defects a caller of the library should
//! actually see: bad configuration, a malformed fixture table, a gateway
//! that refuses to construct.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid run options: {0}")]
    InvalidOptions(String),

    #[error("fixture data failed to parse: {0}")]
    FixtureError(#[from] serde_json::Error),

    #[error("unknown city: {0}")]
    UnknownCity(String),

    #[error("date parse error: {0}")]
    DateParseError(String),

    #[error("gateway construction failed: {0}")]
    GatewayError(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
