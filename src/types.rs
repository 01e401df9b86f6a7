//! Core data model shared by every stage of the engine: the planner emits
//! `SegmentQuery`s, the scheduler turns them into `SegmentResult`s, the
//! parser turns those into `TransportSegment`s, and the calculator
//! assembles `RoutePlan`s out of segments.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Flight,
    Train,
}

impl TransportMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Flight => "flight",
            TransportMode::Train => "train",
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Restricts which modes the planner is allowed to consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFilter {
    All,
    FlightOnly,
    TrainOnly,
}

impl TransportFilter {
    pub fn allows(self, mode: TransportMode) -> bool {
        match (self, mode) {
            (TransportFilter::All, _) => true,
            (TransportFilter::FlightOnly, TransportMode::Flight) => true,
            (TransportFilter::TrainOnly, TransportMode::Train) => true,
            _ => false,
        }
    }
}

/// One of the eight geography classes used to pick a candidate hub pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteType {
    Domestic,
    DomesticToSoutheastAsia,
    DomesticToEastAsia,
    DomesticToLongHaul,
    SoutheastAsiaToDomestic,
    EastAsiaToDomestic,
    InternationalToDomestic,
    InternationalToInternational,
}

impl RouteType {
    pub fn label(self) -> &'static str {
        match self {
            RouteType::Domestic => "domestic",
            RouteType::DomesticToSoutheastAsia => "domestic→southeast_asia",
            RouteType::DomesticToEastAsia => "domestic→east_asia",
            RouteType::DomesticToLongHaul => "domestic→long_haul",
            RouteType::SoutheastAsiaToDomestic => "southeast_asia→domestic",
            RouteType::EastAsiaToDomestic => "east_asia→domestic",
            RouteType::InternationalToDomestic => "international→domestic",
            RouteType::InternationalToInternational => "international↔international",
        }
    }
}

/// One request the scheduler must issue to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentQuery {
    pub segment_id: String,
    pub from_city: String,
    pub to_city: String,
    pub date: String,
    pub mode: TransportMode,
}

/// Raw outcome of issuing a `SegmentQuery`.
#[derive(Debug, Clone)]
pub struct SegmentResult {
    pub segment_id: String,
    pub from_city: String,
    pub to_city: String,
    pub mode: TransportMode,
    pub success: bool,
    pub raw_payload: String,
    pub error_msg: Option<String>,
    pub elapsed_seconds: f64,
}

/// A single parsed travel unit (one flight or one train ride).
#[derive(Debug, Clone, Default)]
pub struct TransportSegment {
    pub mode: Option<TransportMode>,
    pub carrier: String,
    pub number: String,
    pub number_list: Vec<String>,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration_minutes: i64,
    pub cross_days: i64,
    pub departure_city: String,
    pub departure_station: String,
    pub arrival_city: String,
    pub arrival_station: String,
    pub price: i64,
    pub flight_kind: String,
    pub inner_transfer_city: Option<String>,
    pub inner_transfer_wait: Option<String>,
    pub train_class: Option<char>,
    pub seat_classes: HashMap<String, i64>,
    pub raw: String,
}

/// A fully assembled 1-, 2-, or 3-leg itinerary.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub segments: Vec<TransportSegment>,
    pub transfer_cities: Vec<String>,
    pub min_transfer_hours: u32,
    pub total_price: i64,
    pub total_duration_minutes: i64,
    pub accommodation_fee: i64,
    pub transfer_wait_minutes: Vec<i64>,
    pub route_type: String,
    pub feasible: bool,
    pub infeasible_reason: Option<String>,
}

impl RoutePlan {
    pub fn leg_count(&self) -> usize {
        self.segments.len()
    }
}
