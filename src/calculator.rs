//! Route enumerator & feasibility checker (C8): the heart of the engine.
//! Builds direct, two-leg, and three-leg candidate plans out of parsed
//! segments, checks whether each transfer is actually catchable, and
//! prices in an accommodation surcharge when a layover forces an overnight
//! stay.

use crate::types::{RoutePlan, TransportMode, TransportSegment};
use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::collections::HashMap;

pub const DEFAULT_ACCOMMODATION_FEE: i64 = 200;
pub const NIGHT_START_HOUR: u32 = 22;
pub const NIGHT_END_HOUR: u32 = 6;
pub const LONG_WAIT_THRESHOLD_HOURS: i64 = 12;

#[derive(Debug, Clone, Copy)]
pub struct CalculatorOptions {
    pub accommodation_enabled: bool,
    pub accommodation_threshold_hours: u32,
}

impl Default for CalculatorOptions {
    fn default() -> Self {
        Self {
            accommodation_enabled: true,
            accommodation_threshold_hours: 6,
        }
    }
}

fn parse_date(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
}

fn parse_time(time: &str) -> NaiveTime {
    NaiveTime::parse_from_str(time, "%H:%M").unwrap_or_else(|_| NaiveTime::from_hms_opt(0, 0, 0).unwrap())
}

fn arrival_datetime(base_date: NaiveDate, segment: &TransportSegment) -> NaiveDateTime {
    let time = parse_time(&segment.arrival_time);
    base_date.and_time(time) + ChronoDuration::days(segment.cross_days)
}

/// Result of checking whether `seg2` can realistically be caught after
/// `seg1` lands.
pub struct Feasibility {
    pub ok: bool,
    pub wait_minutes: i64,
    pub reason: Option<String>,
}

/// Checks whether a transfer between two segments is catchable, trying
/// next-day and next-next-day departures before giving up.
pub fn check_transfer_feasibility(
    seg1_arrival: NaiveDateTime,
    seg2: &TransportSegment,
    min_transfer_hours: u32,
) -> Feasibility {
    let earliest = seg1_arrival + ChronoDuration::minutes(i64::from(min_transfer_hours) * 60);
    let departure_time = parse_time(&seg2.departure_time);

    for day_offset in 0..=2i64 {
        let candidate_dep = seg1_arrival.date().and_time(departure_time) + ChronoDuration::days(day_offset);
        if candidate_dep >= earliest {
            let wait = (candidate_dep - seg1_arrival).num_minutes();
            if wait <= 24 * 60 {
                return Feasibility {
                    ok: true,
                    wait_minutes: wait,
                    reason: None,
                };
            }
            return Feasibility {
                ok: false,
                wait_minutes: wait,
                reason: Some("wait too long".to_string()),
            };
        }
    }

    Feasibility {
        ok: false,
        wait_minutes: 0,
        reason: Some("no viable next service".to_string()),
    }
}

/// Computes the accommodation surcharge for a given transfer wait.
pub fn accommodation_fee(arr_dt: NaiveDateTime, wait_minutes: i64, options: &CalculatorOptions) -> i64 {
    if !options.accommodation_enabled {
        return 0;
    }
    if wait_minutes >= LONG_WAIT_THRESHOLD_HOURS * 60 {
        return DEFAULT_ACCOMMODATION_FEE;
    }
    if wait_minutes >= i64::from(options.accommodation_threshold_hours) * 60 {
        let mut cursor = arr_dt;
        let end = arr_dt + ChronoDuration::minutes(wait_minutes);
        while cursor < end {
            let hour = cursor.hour();
            if hour >= NIGHT_START_HOUR || hour < NIGHT_END_HOUR {
                return DEFAULT_ACCOMMODATION_FEE;
            }
            cursor += ChronoDuration::hours(1);
        }
        return 0;
    }
    0
}

fn get(parsed: &HashMap<String, Vec<TransportSegment>>, key: &str) -> &[TransportSegment] {
    parsed.get(key).map(|v| v.as_slice()).unwrap_or(&[])
}

fn direct_plans(
    parsed: &HashMap<String, Vec<TransportSegment>>,
    base_date: &str,
) -> Vec<RoutePlan> {
    let mut plans = Vec::new();
    for mode in [TransportMode::Flight, TransportMode::Train] {
        let key = format!("direct_{}", mode);
        for seg in get(parsed, &key) {
            if seg.price <= 0 {
                continue;
            }
            plans.push(RoutePlan {
                segments: vec![seg.clone()],
                transfer_cities: vec![],
                min_transfer_hours: 0,
                total_price: seg.price,
                total_duration_minutes: seg.duration_minutes,
                accommodation_fee: 0,
                transfer_wait_minutes: vec![],
                route_type: mode.to_string(),
                feasible: true,
                infeasible_reason: None,
            });
        }
    }
    let _ = base_date;
    plans
}

fn two_leg_plans(
    parsed: &HashMap<String, Vec<TransportSegment>>,
    hubs: &[String],
    base_date: &str,
    min_transfer_hours: u32,
    options: &CalculatorOptions,
) -> Vec<RoutePlan> {
    let mut plans = Vec::new();
    let date = parse_date(base_date);

    for hub in hubs {
        for m1 in [TransportMode::Flight, TransportMode::Train] {
            for m2 in [TransportMode::Flight, TransportMode::Train] {
                let segs1 = get(parsed, &format!("leg1_{}_{}", hub, m1));
                let segs2 = get(parsed, &format!("leg2_{}_{}", hub, m2));
                for seg1 in segs1 {
                    if seg1.price <= 0 {
                        continue;
                    }
                    let arr1 = arrival_datetime(date, seg1);
                    for seg2 in segs2 {
                        if seg2.price <= 0 {
                            continue;
                        }
                        let feas = check_transfer_feasibility(arr1, seg2, min_transfer_hours);
                        if !feas.ok {
                            continue;
                        }
                        let fee = accommodation_fee(arr1, feas.wait_minutes, options);
                        plans.push(RoutePlan {
                            segments: vec![seg1.clone(), seg2.clone()],
                            transfer_cities: vec![hub.clone()],
                            min_transfer_hours,
                            total_price: seg1.price + seg2.price + fee,
                            total_duration_minutes: seg1.duration_minutes
                                + seg2.duration_minutes
                                + feas.wait_minutes,
                            accommodation_fee: fee,
                            transfer_wait_minutes: vec![feas.wait_minutes],
                            route_type: format!("{}_{}", m1, m2),
                            feasible: true,
                            infeasible_reason: None,
                        });
                    }
                }
            }
        }
    }
    plans
}

const THREE_LEG_POOL_CAP: usize = 3;

fn three_leg_plans(
    parsed: &HashMap<String, Vec<TransportSegment>>,
    hubs: &[String],
    base_date: &str,
    min_transfer_hours: u32,
    options: &CalculatorOptions,
) -> Vec<RoutePlan> {
    let mut plans = Vec::new();
    if hubs.len() < 2 {
        return plans;
    }
    let date = parse_date(base_date);

    for h1 in hubs {
        for h2 in hubs {
            if h1 == h2 {
                continue;
            }
            for m1 in [TransportMode::Flight, TransportMode::Train] {
                for m2 in [TransportMode::Flight, TransportMode::Train] {
                    for m3 in [TransportMode::Flight, TransportMode::Train] {
                        let pool1 = get(parsed, &format!("leg1_{}_{}", h1, m1));
                        let pool2 = get(parsed, &format!("hub_{}_{}_{}", h1, h2, m2));
                        let pool3 = get(parsed, &format!("leg2_{}_{}", h2, m3));
                        let segs1: Vec<&TransportSegment> = pool1.iter().take(THREE_LEG_POOL_CAP).collect();
                        let segs2: Vec<&TransportSegment> = pool2.iter().take(THREE_LEG_POOL_CAP).collect();
                        let segs3: Vec<&TransportSegment> = pool3.iter().take(THREE_LEG_POOL_CAP).collect();

                        for seg1 in segs1.iter() {
                            if seg1.price <= 0 {
                                continue;
                            }
                            let arr1 = arrival_datetime(date, seg1);
                            for seg2 in segs2.iter() {
                                if seg2.price <= 0 {
                                    continue;
                                }
                                let feas1 = check_transfer_feasibility(arr1, seg2, min_transfer_hours);
                                if !feas1.ok {
                                    // First transfer infeasible: short-circuit the
                                    // remaining seg2/seg3 combinations for this pair.
                                    continue;
                                }
                                let fee1 = accommodation_fee(arr1, feas1.wait_minutes, options);
                                let dep2 = arr1 + ChronoDuration::minutes(feas1.wait_minutes);
                                let arr2 = arrival_datetime(dep2.date(), seg2);

                                for seg3 in segs3.iter() {
                                    if seg3.price <= 0 {
                                        continue;
                                    }
                                    let feas2 = check_transfer_feasibility(arr2, seg3, min_transfer_hours);
                                    if !feas2.ok {
                                        continue;
                                    }
                                    let fee2 = accommodation_fee(arr2, feas2.wait_minutes, options);

                                    plans.push(RoutePlan {
                                        segments: vec![(*seg1).clone(), (*seg2).clone(), (*seg3).clone()],
                                        transfer_cities: vec![h1.clone(), h2.clone()],
                                        min_transfer_hours,
                                        total_price: seg1.price + seg2.price + seg3.price + fee1 + fee2,
                                        total_duration_minutes: seg1.duration_minutes
                                            + seg2.duration_minutes
                                            + seg3.duration_minutes
                                            + feas1.wait_minutes
                                            + feas2.wait_minutes,
                                        accommodation_fee: fee1 + fee2,
                                        transfer_wait_minutes: vec![feas1.wait_minutes, feas2.wait_minutes],
                                        route_type: format!("{}_{}_{}", m1, m2, m3),
                                        feasible: true,
                                        infeasible_reason: None,
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    plans
}

/// Enumerates every feasible plan across all three leg-counts and both
/// minimum-transfer policies, sorted by `(total_price, total_duration)`.
pub fn calculate_routes(
    parsed: &HashMap<String, Vec<TransportSegment>>,
    hubs: &[String],
    base_date: &str,
    min_transfer_policies: &[u32],
    options: &CalculatorOptions,
) -> Vec<RoutePlan> {
    let mut plans = direct_plans(parsed, base_date);

    for &policy in min_transfer_policies {
        plans.extend(two_leg_plans(parsed, hubs, base_date, policy, options));
        plans.extend(three_leg_plans(parsed, hubs, base_date, policy, options));
    }

    plans.sort_by(|a, b| {
        a.total_price
            .cmp(&b.total_price)
            .then_with(|| a.total_duration_minutes.cmp(&b.total_duration_minutes))
    });
    plans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(number: &str, dep: &str, arr: &str, price: i64, duration: i64) -> TransportSegment {
        TransportSegment {
            mode: Some(TransportMode::Train),
            number: number.to_string(),
            departure_time: dep.to_string(),
            arrival_time: arr.to_string(),
            duration_minutes: duration,
            price,
            ..Default::default()
        }
    }

    #[test]
    fn domestic_direct_train_plan_matches_scenario_s1() {
        let mut parsed = HashMap::new();
        parsed.insert(
            "direct_train".to_string(),
            vec![seg("G1", "08:00", "13:28", 553, 328)],
        );
        let plans = calculate_routes(&parsed, &[], "2025-01-15", &[2], &CalculatorOptions::default());
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].total_price, 553);
        assert_eq!(plans[0].total_duration_minutes, 328);
        assert!(plans[0].transfer_cities.is_empty());
    }

    #[test]
    fn two_leg_with_long_night_wait_gets_accommodation_fee() {
        let mut parsed = HashMap::new();
        parsed.insert(
            "leg1_北京_flight".to_string(),
            vec![seg("CA980", "18:00", "23:30", 2100, 330)],
        );
        parsed.insert(
            "leg2_北京_train".to_string(),
            vec![seg("K603", "07:05", "15:30", 180, 505)],
        );
        let plans = calculate_routes(
            &parsed,
            &["北京".to_string()],
            "2025-01-20",
            &[2],
            &CalculatorOptions::default(),
        );
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].accommodation_fee, 200);
        assert_eq!(plans[0].total_price, 2100 + 180 + 200);
    }

    #[test]
    fn two_leg_with_too_short_window_is_infeasible_and_absent() {
        let mut parsed = HashMap::new();
        parsed.insert(
            "leg1_北京_flight".to_string(),
            vec![seg("CA980", "18:00", "23:30", 2100, 330)],
        );
        parsed.insert(
            "leg2_北京_train".to_string(),
            vec![seg("K999", "00:30", "08:00", 180, 450)],
        );
        let plans = calculate_routes(
            &parsed,
            &["北京".to_string()],
            "2025-01-20",
            &[2],
            &CalculatorOptions::default(),
        );
        assert!(plans.is_empty(), "too-short transfer should be filtered out entirely");
    }

    #[test]
    fn three_leg_enumeration_respects_pool_cap() {
        let mut parsed = HashMap::new();
        let ten_segs = |prefix: &str| -> Vec<TransportSegment> {
            (0..10)
                .map(|i| seg(&format!("{prefix}{i}"), "08:00", "09:00", 100 + i, 60))
                .collect()
        };
        parsed.insert("leg1_A_flight".to_string(), ten_segs("F"));
        parsed.insert("hub_A_B_flight".to_string(), ten_segs("H"));
        parsed.insert("leg2_B_flight".to_string(), ten_segs("L"));

        let plans = calculate_routes(
            &parsed,
            &["A".to_string(), "B".to_string()],
            "2025-01-20",
            &[2],
            &CalculatorOptions::default(),
        );
        // at most 3*3*3 = 27 combinations for this single (h1,h2,mode) tuple
        assert!(plans.len() <= 27);
    }

    #[test]
    fn plans_are_sorted_by_price_then_duration() {
        let mut parsed = HashMap::new();
        parsed.insert(
            "direct_train".to_string(),
            vec![seg("G1", "08:00", "09:00", 500, 60), seg("G2", "08:00", "10:00", 300, 120)],
        );
        let plans = calculate_routes(&parsed, &[], "2025-01-15", &[2], &CalculatorOptions::default());
        assert_eq!(plans[0].total_price, 300);
        assert_eq!(plans[1].total_price, 500);
    }
}
