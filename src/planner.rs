//! Segment planner (C5): turns origin, destination, a hub list, and mode
//! policy into the concrete list of queries the scheduler must run.

use crate::hubs::is_international_city;
use crate::types::{SegmentQuery, TransportFilter, TransportMode};

fn mode_allowed(from: &str, to: &str, mode: TransportMode, filter: TransportFilter) -> bool {
    if !filter.allows(mode) {
        return false;
    }
    match mode {
        TransportMode::Flight => true,
        TransportMode::Train => !is_international_city(from) && !is_international_city(to),
    }
}

fn push_leg(
    queries: &mut Vec<SegmentQuery>,
    from: &str,
    to: &str,
    date: &str,
    filter: TransportFilter,
    id_for_mode: impl Fn(TransportMode) -> String,
) {
    for mode in [TransportMode::Flight, TransportMode::Train] {
        if mode_allowed(from, to, mode, filter) {
            queries.push(SegmentQuery {
                segment_id: id_for_mode(mode),
                from_city: from.to_string(),
                to_city: to.to_string(),
                date: date.to_string(),
                mode,
            });
        }
    }
}

/// Builds every `SegmentQuery` implied by the origin/destination/hub list.
pub fn build_segment_queries(
    origin: &str,
    destination: &str,
    date: &str,
    hubs: &[String],
    include_direct: bool,
    transport_filter: TransportFilter,
) -> Vec<SegmentQuery> {
    let mut queries = Vec::new();

    if include_direct {
        push_leg(&mut queries, origin, destination, date, transport_filter, |m| {
            format!("direct_{}", m)
        });
    }

    for hub in hubs {
        if hub == origin || hub == destination {
            continue;
        }
        push_leg(&mut queries, origin, hub, date, transport_filter, |m| {
            format!("leg1_{}_{}", hub, m)
        });
        push_leg(&mut queries, hub, destination, date, transport_filter, |m| {
            format!("leg2_{}_{}", hub, m)
        });
    }

    // Hub-to-hub legs, needed only to support three-leg enumeration. Built
    // for every ordered pair of distinct hubs; segment id uses a generic
    // "hub_A_B_mode" form rather than the leg1/leg2 convention since neither
    // city is the origin or destination.
    if hubs.len() >= 2 {
        for h1 in hubs {
            for h2 in hubs {
                if h1 == h2 || h1 == origin || h1 == destination || h2 == origin || h2 == destination {
                    continue;
                }
                push_leg(&mut queries, h1, h2, date, transport_filter, |m| {
                    format!("hub_{}_{}_{}", h1, h2, m)
                });
            }
        }
    }

    queries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn train_never_requested_for_international_pair() {
        let queries = build_segment_queries(
            "曼谷",
            "北京",
            "2025-01-20",
            &[],
            true,
            TransportFilter::All,
        );
        assert!(!queries.iter().any(|q| q.mode == TransportMode::Train));
        assert!(queries.iter().any(|q| q.mode == TransportMode::Flight));
    }

    #[test]
    fn hub_legs_are_built_for_each_intermediate_city() {
        let queries = build_segment_queries(
            "北京",
            "长治",
            "2025-01-20",
            &["上海".to_string()],
            false,
            TransportFilter::All,
        );
        assert!(queries.iter().any(|q| q.segment_id == "leg1_上海_flight"));
        assert!(queries.iter().any(|q| q.segment_id == "leg1_上海_train"));
        assert!(queries.iter().any(|q| q.segment_id == "leg2_上海_flight"));
        assert!(queries.iter().any(|q| q.segment_id == "leg2_上海_train"));
        assert!(!queries.iter().any(|q| q.segment_id.starts_with("direct_")));
    }

    #[test]
    fn origin_and_destination_excluded_from_hub_legs() {
        let queries = build_segment_queries(
            "北京",
            "上海",
            "2025-01-20",
            &["北京".to_string(), "上海".to_string()],
            true,
            TransportFilter::All,
        );
        assert!(!queries.iter().any(|q| q.segment_id.contains("leg1_北京")));
        assert!(!queries.iter().any(|q| q.segment_id.contains("leg2_上海")));
    }
}
