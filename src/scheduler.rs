//! Query scheduler (C6): the two-phase mixed-concurrency executor.
//!
//! Trains are queried by a bounded pool of parallel workers because the
//! train backend tolerates concurrent sessions. Flights are queried one at
//! a time, in strict sequence, because the flight backend is a
//! browser-driven scraper whose session is broken by concurrent requests
//! and CAPTCHA interleaving — this is a correctness requirement, not a
//! throughput choice, so the two phases are never merged into one pool.

use crate::config::RunOptions;
use crate::gateway::{call_with_timeout, Provider, ProviderGateway};
use crate::observer::{self, RunObserver};
use crate::station_cache::StationCodeCache;
use crate::types::{SegmentQuery, SegmentResult, TransportMode};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::Semaphore;

const ERROR_TOKENS: &[&str] = &[
    "timeout", "error", "failed", "exception", "not found", "no data",
    "超时", "错误", "失败", "异常", "未找到", "没有数据",
];

const POSITIVE_MARKERS: &[&str] = &[
    "flight", "train", "price", "departure", "arrival",
    "航班", "车次", "价格", "出发", "到达",
];

const ZERO_FLIGHT_MARKERS: &[&str] = &["找到 0 条航班", "0条航班", "0 flights", "found 0 flights"];

fn is_valid_response(payload: &str) -> bool {
    let lower = payload.to_lowercase();
    if ERROR_TOKENS.iter().any(|t| lower.contains(&t.to_lowercase())) {
        return false;
    }
    POSITIVE_MARKERS.iter().any(|m| lower.contains(&m.to_lowercase()))
}

fn is_zero_flights(payload: &str) -> bool {
    ZERO_FLIGHT_MARKERS.iter().any(|m| payload.contains(m))
}

/// Cooperative cancellation: checked before dispatching each query. Queries
/// already in flight are not aborted.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn cancelled_result(query: &SegmentQuery) -> SegmentResult {
    SegmentResult {
        segment_id: query.segment_id.clone(),
        from_city: query.from_city.clone(),
        to_city: query.to_city.clone(),
        mode: query.mode,
        success: false,
        raw_payload: String::new(),
        error_msg: Some("cancelled".to_string()),
        elapsed_seconds: 0.0,
    }
}

async fn run_train_query(
    gateway: Arc<dyn ProviderGateway>,
    cache: Arc<StationCodeCache>,
    query: SegmentQuery,
    timeout: std::time::Duration,
) -> SegmentResult {
    let started = Instant::now();

    if !gateway.is_running(Provider::Train) {
        return SegmentResult {
            segment_id: query.segment_id,
            from_city: query.from_city,
            to_city: query.to_city,
            mode: query.mode,
            success: false,
            raw_payload: String::new(),
            error_msg: Some("train provider not running".to_string()),
            elapsed_seconds: started.elapsed().as_secs_f64(),
        };
    }

    let from_code = cache.get_station_code(gateway.as_ref(), &query.from_city).await;
    let to_code = cache.get_station_code(gateway.as_ref(), &query.to_city).await;

    let (from_code, to_code) = match (from_code, to_code) {
        (Ok(f), Ok(t)) if !f.is_empty() && !t.is_empty() => (f, t),
        _ => {
            return SegmentResult {
                segment_id: query.segment_id,
                from_city: query.from_city,
                to_city: query.to_city,
                mode: query.mode,
                success: false,
                raw_payload: String::new(),
                error_msg: Some("station code unavailable".to_string()),
                elapsed_seconds: started.elapsed().as_secs_f64(),
            };
        }
    };

    let args = serde_json::json!({
        "date": query.date,
        "fromStation": from_code,
        "toStation": to_code,
    });

    let outcome = call_with_timeout(gateway.as_ref(), "get-tickets", args, timeout).await;
    build_result(query, outcome, started)
}

fn build_result(
    query: SegmentQuery,
    outcome: Result<String, crate::gateway::GatewayError>,
    started: Instant,
) -> SegmentResult {
    match outcome {
        Ok(payload) if is_valid_response(&payload) => SegmentResult {
            segment_id: query.segment_id,
            from_city: query.from_city,
            to_city: query.to_city,
            mode: query.mode,
            success: true,
            raw_payload: payload,
            error_msg: None,
            elapsed_seconds: started.elapsed().as_secs_f64(),
        },
        Ok(payload) => SegmentResult {
            segment_id: query.segment_id,
            from_city: query.from_city,
            to_city: query.to_city,
            mode: query.mode,
            success: false,
            raw_payload: payload,
            error_msg: Some("validation rejected payload".to_string()),
            elapsed_seconds: started.elapsed().as_secs_f64(),
        },
        Err(e) => SegmentResult {
            segment_id: query.segment_id,
            from_city: query.from_city,
            to_city: query.to_city,
            mode: query.mode,
            success: false,
            raw_payload: String::new(),
            error_msg: Some(e.to_string()),
            elapsed_seconds: started.elapsed().as_secs_f64(),
        },
    }
}

async fn run_flight_query(
    gateway: &dyn ProviderGateway,
    query: &SegmentQuery,
    timeout: std::time::Duration,
) -> SegmentResult {
    let started = Instant::now();

    if !gateway.is_running(Provider::Flight) {
        return SegmentResult {
            segment_id: query.segment_id.clone(),
            from_city: query.from_city.clone(),
            to_city: query.to_city.clone(),
            mode: query.mode,
            success: false,
            raw_payload: String::new(),
            error_msg: Some("flight provider not running".to_string()),
            elapsed_seconds: started.elapsed().as_secs_f64(),
        };
    }

    const MAX_ATTEMPTS: u32 = 3;
    let mut last = None;

    for attempt in 0..MAX_ATTEMPTS {
        let args = serde_json::json!({
            "departure_city": query.from_city,
            "destination_city": query.to_city,
            "departure_date": query.date,
        });
        let outcome = call_with_timeout(gateway, "searchFlightRoutes", args, timeout).await;

        let retry_needed = match &outcome {
            Ok(payload) => !is_valid_response(payload) || is_zero_flights(payload),
            Err(_) => true,
        };

        let result = build_result(query.clone(), outcome, started);
        if !retry_needed || attempt + 1 == MAX_ATTEMPTS {
            return result;
        }
        last = Some(result);
    }

    last.expect("loop always assigns before exiting on MAX_ATTEMPTS")
}

/// Executes every planned query under the two-phase policy and returns a
/// map keyed by `segment_id`, complete upon return.
pub async fn execute(
    gateway: Arc<dyn ProviderGateway>,
    station_cache: Arc<StationCodeCache>,
    queries: Vec<SegmentQuery>,
    options: &RunOptions,
    observer: &dyn RunObserver,
    cancel: &CancelToken,
) -> HashMap<String, SegmentResult> {
    let results: Arc<Mutex<HashMap<String, SegmentResult>>> = Arc::new(Mutex::new(HashMap::new()));

    let (train_queries, flight_queries): (Vec<_>, Vec<_>) =
        queries.into_iter().partition(|q| q.mode == TransportMode::Train);

    let total = train_queries.len() + flight_queries.len();
    let mut completed = 0usize;

    // Phase 1: train queries, bounded parallelism.
    observer::info(observer, None, format!("phase 1: {} train queries", train_queries.len()));
    let semaphore = Arc::new(Semaphore::new(options.max_workers));
    let mut handles = Vec::new();
    for query in train_queries {
        if cancel.is_cancelled() {
            results.lock().unwrap().insert(query.segment_id.clone(), cancelled_result(&query));
            continue;
        }
        let permit_sem = semaphore.clone();
        let gateway = gateway.clone();
        let cache = station_cache.clone();
        let timeout = options.train_timeout;
        let results = results.clone();
        handles.push(tokio::spawn(async move {
            let _permit = permit_sem.acquire_owned().await.expect("semaphore not closed");
            let result = run_train_query(gateway, cache, query, timeout).await;
            results.lock().unwrap().insert(result.segment_id.clone(), result);
        }));
    }
    for handle in handles {
        let _ = handle.await;
        completed += 1;
        observer.progress(completed, total, "train phase");
    }

    // Optional warm-up before the serial flight phase.
    if options.warmup_enabled && !flight_queries.is_empty() && !cancel.is_cancelled() {
        observer::info(observer, None, "warming up flight provider session");
        let args = serde_json::json!({
            "departure_city": options.warmup_origin,
            "destination_city": options.warmup_destination,
            "departure_date": "warmup",
        });
        let _ = call_with_timeout(gateway.as_ref(), "searchFlightRoutes", args, options.warmup_timeout).await;
    }

    // Phase 2: flight queries, strictly serial.
    observer::info(observer, None, format!("phase 2: {} flight queries", flight_queries.len()));
    for query in flight_queries {
        if cancel.is_cancelled() {
            results.lock().unwrap().insert(query.segment_id.clone(), cancelled_result(&query));
            continue;
        }
        let result = run_flight_query(gateway.as_ref(), &query, options.flight_timeout).await;
        if !result.success {
            observer::warn(observer, Some(&result.segment_id), result.error_msg.clone().unwrap_or_default());
        }
        results.lock().unwrap().insert(result.segment_id.clone(), result);
        completed += 1;
        observer.progress(completed, total, "flight phase");
    }

    Arc::try_unwrap(results).unwrap().into_inner().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::TracingObserver;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct ScriptedGateway {
        flight_replies: Mutex<Vec<String>>,
        flight_calls: AtomicUsize,
        train_reply: String,
        station_reply: String,
    }

    #[async_trait]
    impl ProviderGateway for ScriptedGateway {
        async fn call_tool(
            &self,
            tool: &str,
            _args: serde_json::Value,
            _timeout: Duration,
        ) -> Result<String, crate::gateway::GatewayError> {
            match tool {
                "searchFlightRoutes" => {
                    self.flight_calls.fetch_add(1, Ordering::SeqCst);
                    let mut replies = self.flight_replies.lock().unwrap();
                    Ok(if replies.is_empty() {
                        "error: no data".to_string()
                    } else {
                        replies.remove(0)
                    })
                }
                "get-tickets" => Ok(self.train_reply.clone()),
                "get-station-code-of-citys" => Ok(self.station_reply.clone()),
                other => panic!("unexpected tool {other}"),
            }
        }

        fn is_running(&self, _provider: Provider) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn flight_query_retries_until_nonzero_result() {
        let gateway: Arc<dyn ProviderGateway> = Arc::new(ScriptedGateway {
            flight_replies: Mutex::new(vec![
                "找到 0 条航班".to_string(),
                "找到 0 条航班".to_string(),
                "航班 CA123 price 500".to_string(),
            ]),
            flight_calls: AtomicUsize::new(0),
            train_reply: String::new(),
            station_reply: String::new(),
        });
        let cache = Arc::new(StationCodeCache::new(Duration::from_secs(5)));
        let options = RunOptions::default();
        let queries = vec![SegmentQuery {
            segment_id: "direct_flight".to_string(),
            from_city: "北京".to_string(),
            to_city: "上海".to_string(),
            date: "2025-01-20".to_string(),
            mode: TransportMode::Flight,
        }];

        let results = execute(
            gateway.clone(),
            cache,
            queries,
            &options,
            &TracingObserver,
            &CancelToken::new(),
        )
        .await;

        let result = results.get("direct_flight").unwrap();
        assert!(result.success);
        assert_eq!(
            results.len(),
            1,
            "exactly one segment result should be recorded"
        );
    }

    #[test]
    fn validator_rejects_error_tokens() {
        assert!(!is_valid_response("error: timeout"));
        assert!(is_valid_response("航班 CA123 price 500"));
    }
}
