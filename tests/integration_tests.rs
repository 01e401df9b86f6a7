//! Integration tests for go-home-router.
//!
//! These exercise the full pipeline (classify → plan → schedule → parse →
//! enumerate → report) against the bundled `FixtureGateway`, since the real
//! flight scraper and train service are out of scope for this crate.

use go_home_router::{plan, FixtureGateway, PlanRequest, ProviderGateway, RunOptions, TransportFilter};
use std::sync::Arc;

fn fixture_gateway() -> Arc<dyn ProviderGateway> {
    Arc::new(FixtureGateway::new())
}

#[tokio::test]
async fn domestic_train_only_trip_returns_a_direct_plan() {
    let options = RunOptions {
        transport_filter: TransportFilter::TrainOnly,
        use_intl_hubs: false,
        ..RunOptions::default()
    };

    let outcome = plan(
        PlanRequest {
            origin: "北京".to_string(),
            destination: "上海".to_string(),
            date: "2025-01-15".to_string(),
        },
        fixture_gateway(),
        &options,
        None,
    )
    .await
    .unwrap();

    assert!(!outcome.plans.is_empty(), "expected at least one feasible plan");
    assert!(outcome.plans.iter().all(|p| p.feasible));
    // Train-only filter must never emit a flight leg.
    for plan in &outcome.plans {
        for segment in &plan.segments {
            assert_ne!(segment.mode, Some(go_home_router::TransportMode::Flight));
        }
    }
}

#[tokio::test]
async fn mixed_transport_trip_includes_hub_candidates() {
    let options = RunOptions::default();
    let outcome = plan(
        PlanRequest {
            origin: "北京".to_string(),
            destination: "长治".to_string(),
            date: "2025-01-20".to_string(),
        },
        fixture_gateway(),
        &options,
        None,
    )
    .await
    .unwrap();

    // Hub selection should never include the origin or destination.
    assert!(!outcome.hub_cities.iter().any(|c| c == "北京" || c == "长治"));
}

#[tokio::test]
async fn every_emitted_plan_respects_totals_equations() {
    let options = RunOptions::default();
    let outcome = plan(
        PlanRequest {
            origin: "北京".to_string(),
            destination: "上海".to_string(),
            date: "2025-01-15".to_string(),
        },
        fixture_gateway(),
        &options,
        None,
    )
    .await
    .unwrap();

    for p in &outcome.plans {
        let segment_total: i64 = p.segments.iter().map(|s| s.price).sum();
        assert_eq!(p.total_price, segment_total + p.accommodation_fee);
        assert_eq!(p.transfer_cities.len(), p.segments.len() - 1);
        assert_eq!(p.transfer_wait_minutes.len(), p.segments.len() - 1);
    }
}

#[tokio::test]
async fn plans_are_sorted_by_price_then_duration_end_to_end() {
    let options = RunOptions::default();
    let outcome = plan(
        PlanRequest {
            origin: "北京".to_string(),
            destination: "上海".to_string(),
            date: "2025-01-15".to_string(),
        },
        fixture_gateway(),
        &options,
        None,
    )
    .await
    .unwrap();

    for window in outcome.plans.windows(2) {
        let (a, b) = (&window[0], &window[1]);
        assert!(
            (a.total_price, a.total_duration_minutes) <= (b.total_price, b.total_duration_minutes),
            "plans out of order: {:?} came before {:?}",
            (a.total_price, a.total_duration_minutes),
            (b.total_price, b.total_duration_minutes)
        );
    }
}

#[tokio::test]
async fn run_is_deterministic_for_identical_inputs() {
    let options = RunOptions::default();
    let request = || PlanRequest {
        origin: "北京".to_string(),
        destination: "上海".to_string(),
        date: "2025-01-15".to_string(),
    };

    let first = plan(request(), fixture_gateway(), &options, None).await.unwrap();
    let second = plan(request(), fixture_gateway(), &options, None).await.unwrap();

    let prices_a: Vec<i64> = first.plans.iter().map(|p| p.total_price).collect();
    let prices_b: Vec<i64> = second.plans.iter().map(|p| p.total_price).collect();
    assert_eq!(prices_a, prices_b);
}

#[tokio::test]
async fn invalid_options_are_rejected_before_any_provider_call() {
    let options = RunOptions {
        max_hubs: 0,
        ..RunOptions::default()
    };

    let result = plan(
        PlanRequest {
            origin: "北京".to_string(),
            destination: "上海".to_string(),
            date: "2025-01-15".to_string(),
        },
        fixture_gateway(),
        &options,
        None,
    )
    .await;

    assert!(result.is_err());
    match result.err().unwrap() {
        go_home_router::EngineError::InvalidOptions(_) => {}
        other => panic!("expected InvalidOptions, got {other}"),
    }
}
