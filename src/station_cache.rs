//! Station-code memoisation (C4), scoped to a single query run.
//!
//! Grounded on the city-cache pattern in the Wikidata client: a write-through
//! cache that is consulted first, falls back to a provider call on miss, and
//! never overwrites an entry once populated. The one addition over that
//! pattern is negative caching — an international city resolves to an empty
//! code, which is cached so repeat lookups do not re-query the provider.

use crate::gateway::{call_with_timeout, GatewayError, ProviderGateway};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub struct StationCodeCache {
    cache: Mutex<HashMap<String, String>>,
    timeout: Duration,
}

impl StationCodeCache {
    pub fn new(timeout: Duration) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            timeout,
        }
    }

    /// Returns the cached station code, a freshly queried one, or an empty
    /// string when the provider cannot resolve the city (treated downstream
    /// as "train impossible").
    pub async fn get_station_code(
        &self,
        gateway: &dyn ProviderGateway,
        city: &str,
    ) -> Result<String, GatewayError> {
        if let Some(code) = self.cache.lock().unwrap().get(city).cloned() {
            tracing::debug!(city, "station code cache hit");
            return Ok(code);
        }

        tracing::debug!(city, "station code cache miss, querying provider");
        let args = serde_json::json!({ "citys": city });
        let payload = call_with_timeout(gateway, "get-station-code-of-citys", args, self.timeout).await?;
        let code = parse_station_code(&payload, city).unwrap_or_default();

        let mut guard = self.cache.lock().unwrap();
        // Monotonic: never overwrite a value written by a racing task.
        guard.entry(city.to_string()).or_insert_with(|| code.clone());
        Ok(code)
    }

    pub fn len(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_station_code(payload: &str, city: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(payload).ok()?;
    value
        .get(city)
        .and_then(|v| v.get("station_code"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Provider;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use async_trait::async_trait;

    struct CountingGateway {
        calls: AtomicUsize,
        reply: String,
    }

    #[async_trait]
    impl ProviderGateway for CountingGateway {
        async fn call_tool(
            &self,
            _tool: &str,
            _args: serde_json::Value,
            _timeout: Duration,
        ) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }

        fn is_running(&self, _provider: Provider) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn repeated_lookup_performs_at_most_one_provider_call() {
        let gateway = CountingGateway {
            calls: AtomicUsize::new(0),
            reply: r#"{"北京":{"station_code":"VAP"}}"#.to_string(),
        };
        let cache = StationCodeCache::new(Duration::from_secs(5));

        let first = cache.get_station_code(&gateway, "北京").await.unwrap();
        let second = cache.get_station_code(&gateway, "北京").await.unwrap();

        assert_eq!(first, "VAP");
        assert_eq!(second, "VAP");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unresolvable_city_caches_empty_string() {
        let gateway = CountingGateway {
            calls: AtomicUsize::new(0),
            reply: "{}".to_string(),
        };
        let cache = StationCodeCache::new(Duration::from_secs(5));

        let code = cache.get_station_code(&gateway, "曼谷").await.unwrap();
        assert_eq!(code, "");
        assert_eq!(cache.len(), 1);
    }
}
