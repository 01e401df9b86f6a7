//! Engine entry point. A `Session` owns everything scoped to one query
//! run — the station-code cache and the parsed-segment map — and both die
//! with it, while the hub catalog and region map underneath stay
//! process-global and immutable.

use crate::calculator::{self, CalculatorOptions};
use crate::classifier;
use crate::config::RunOptions;
use crate::error::EngineResult;
use crate::gateway::ProviderGateway;
use crate::observer::{RunObserver, TracingObserver};
use crate::parser;
use crate::planner;
use crate::report;
use crate::scheduler::{self, CancelToken};
use crate::station_cache::StationCodeCache;
use crate::types::{RoutePlan, TransportMode};
use std::collections::HashMap;
use std::sync::Arc;

pub struct PlanRequest {
    pub origin: String,
    pub destination: String,
    pub date: String,
}

pub struct PlanOutcome {
    pub plans: Vec<RoutePlan>,
    pub report: String,
    pub hub_cities: Vec<String>,
}

/// Runs one complete plan: classify, build queries, schedule them, parse
/// the results, enumerate feasible combinations, and render a report.
pub async fn plan(
    request: PlanRequest,
    gateway: Arc<dyn ProviderGateway>,
    options: &RunOptions,
    observer: Option<&dyn RunObserver>,
) -> EngineResult<PlanOutcome> {
    options.validate()?;
    let default_observer = TracingObserver;
    let observer = observer.unwrap_or(&default_observer);

    let selection = classifier::select_hubs(
        &request.origin,
        &request.destination,
        options.max_hubs,
        options.transport_filter,
        options.use_intl_hubs,
    );
    observer.log(crate::observer::RunEvent {
        level: crate::observer::RunEventLevel::Info,
        segment_id: None,
        message: selection.tip_message.clone(),
    });

    let adjusted_date = adjusted_train_date(&request.date);

    let queries = planner::build_segment_queries(
        &request.origin,
        &request.destination,
        &adjusted_date,
        &selection.hub_cities,
        true,
        options.transport_filter,
    );

    let station_cache = Arc::new(StationCodeCache::new(options.station_timeout));
    let cancel = CancelToken::new();
    let results = scheduler::execute(
        gateway,
        station_cache.clone(),
        queries,
        options,
        observer,
        &cancel,
    )
    .await;

    let mut parsed: HashMap<String, Vec<crate::types::TransportSegment>> = HashMap::new();
    for (segment_id, result) in &results {
        if !result.success {
            continue;
        }
        let mut segments = match result.mode {
            TransportMode::Flight => parser::parse_flights(&result.raw_payload),
            TransportMode::Train => parser::parse_trains(&result.raw_payload),
        };
        for segment in &mut segments {
            segment.departure_city = result.from_city.clone();
            segment.arrival_city = result.to_city.clone();
        }
        parsed.insert(segment_id.clone(), segments);
    }

    let calc_options = CalculatorOptions {
        accommodation_enabled: options.accommodation_enabled,
        accommodation_threshold_hours: options.accommodation_threshold_hours,
    };
    let plans = calculator::calculate_routes(
        &parsed,
        &selection.hub_cities,
        &request.date,
        &options.min_transfer_policies,
        &calc_options,
    );

    let rendered = report::format_routes_for_ai(&plans, options.top_n);

    Ok(PlanOutcome {
        plans,
        report: rendered,
        hub_cities: selection.hub_cities,
    })
}

/// The train backend only indexes roughly two weeks ahead; requests past
/// that horizon are clamped so the train query still has a chance of
/// returning data, mirroring the clamp the original planner applies.
fn adjusted_train_date(requested: &str) -> String {
    use chrono::{Duration, Local, NaiveDate};
    let Ok(requested_date) = NaiveDate::parse_from_str(requested, "%Y-%m-%d") else {
        return requested.to_string();
    };
    let horizon = Local::now().date_naive() + Duration::days(14);
    if requested_date > horizon {
        horizon.format("%Y-%m-%d").to_string()
    } else {
        requested.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::FixtureGateway;

    #[tokio::test]
    async fn plan_runs_end_to_end_against_the_fixture_gateway() {
        let gateway: Arc<dyn ProviderGateway> = Arc::new(FixtureGateway::new());
        let options = RunOptions {
            use_intl_hubs: false,
            ..RunOptions::default()
        };
        let outcome = plan(
            PlanRequest {
                origin: "北京".to_string(),
                destination: "上海".to_string(),
                date: "2025-01-15".to_string(),
            },
            gateway,
            &options,
            None,
        )
        .await
        .unwrap();

        assert!(!outcome.plans.is_empty());
        assert!(outcome.report.contains("可行路线"));
    }
}
