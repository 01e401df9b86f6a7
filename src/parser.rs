//! Payload parser (C7): turns a raw provider reply into zero or more
//! `TransportSegment`s. Each parser tries JSON first and falls back to a
//! regex sweep over raw text, the same two-tier strategy the HTML scraper
//! uses (structured extraction first, falling back to permissive parsing
//! when a field is missing), generalized from markup to the flight/train
//! text payloads these providers actually return.

use crate::types::{TransportMode, TransportSegment};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

const SEAT_CLASSES: &[(&str, &str)] = &[
    ("二等座", "secondSeat"),
    ("一等座", "firstSeat"),
    ("硬座", "hardSeat"),
    ("软座", "softSeat"),
    ("硬卧", "hardSleeper"),
    ("软卧", "softSleeper"),
    ("商务座", "businessSeat"),
    ("无座", "noSeat"),
    ("economy", "secondSeat"),
    ("business", "businessSeat"),
    ("first", "firstSeat"),
];

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2}):(\d{2})").unwrap())
}

fn hour_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*[小时hH]").unwrap())
}

fn minute_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*[分钟mM]").unwrap())
}

fn flight_text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([A-Z]{2}\d{3,4})\s+(\d{1,2}:\d{2})[^\d]*(\d{1,2}:\d{2})[^\d¥￥]*[¥￥]?(\d+)").unwrap()
    })
}

fn train_text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([GDCKTZ]\d{1,4})\s+(\d{1,2}:\d{2})[^\d]*(\d{1,2}:\d{2})[^\d¥￥]*[¥￥]?(\d+)").unwrap()
    })
}

fn plus_day_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\+(\d+)").unwrap())
}

fn clean_time(raw: &str) -> String {
    match time_re().captures(raw) {
        Some(caps) => format!("{:0>2}:{}", &caps[1], &caps[2]),
        None => raw.trim().to_string(),
    }
}

fn parse_duration_minutes(text: &str) -> i64 {
    let hours: i64 = hour_re()
        .captures(text)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0);
    let minutes: i64 = minute_re()
        .captures(text)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0);
    hours * 60 + minutes
}

fn detect_cross_days(text: &str, arrival_time_field: &str) -> i64 {
    if let Some(caps) = plus_day_re().captures(arrival_time_field) {
        return caps[1].parse().unwrap_or(0);
    }
    let lower = text.to_lowercase();
    if lower.contains("次日") || lower.contains("+1") {
        1
    } else {
        0
    }
}

fn parse_price(text: &str) -> i64 {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

fn train_type_from_number(number: &str) -> Option<char> {
    number.chars().next().filter(|c| "GDCKTZ".contains(*c))
}

/// Parses a flight provider payload. Accepts a JSON object with a
/// `flights`/`data` array, a bare JSON list, or free text; falls back to a
/// regex sweep when JSON parsing fails outright.
pub fn parse_flights(payload: &str) -> Vec<TransportSegment> {
    if let Ok(value) = serde_json::from_str::<Value>(payload) {
        if let Some(records) = extract_records(&value) {
            return records.iter().filter_map(parse_flight_record).collect();
        }
    }
    parse_flight_text(payload)
}

fn extract_records(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        Value::Object(map) => map
            .get("flights")
            .or_else(|| map.get("data"))
            .and_then(|v| v.as_array())
            .cloned(),
        _ => None,
    }
}

fn parse_flight_record(record: &Value) -> Option<TransportSegment> {
    let number = record
        .get("航班号")
        .or_else(|| record.get("flight_no"))
        .and_then(|v| v.as_str())?
        .to_string();

    let departure_time = record
        .get("departure_time")
        .or_else(|| record.get("出发时间"))
        .and_then(|v| v.as_str())
        .map(clean_time)
        .unwrap_or_default();
    let arrival_time_raw = record
        .get("arrival_time")
        .or_else(|| record.get("到达时间"))
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    let arrival_time = clean_time(arrival_time_raw);

    let duration_minutes = record
        .get("duration")
        .or_else(|| record.get("飞行时间"))
        .and_then(|v| v.as_str())
        .map(parse_duration_minutes)
        .unwrap_or(0);

    let price = record
        .get("price")
        .and_then(|v| v.as_i64())
        .or_else(|| record.get("价格").and_then(|v| v.as_str()).map(parse_price))
        .unwrap_or(0);

    let kind = record
        .get("kind")
        .or_else(|| record.get("类型"))
        .and_then(|v| v.as_str())
        .unwrap_or("直达");
    let flight_kind = if kind.contains("中转") || kind.to_lowercase().contains("transfer") {
        "transfer"
    } else {
        "direct"
    };

    let inner_transfer_city = record
        .get("中转城市")
        .or_else(|| record.get("transfer_city"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());
    let inner_transfer_wait = record
        .get("中转等待")
        .or_else(|| record.get("transfer_wait"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let carrier = record
        .get("airline")
        .or_else(|| record.get("航空公司"))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    Some(TransportSegment {
        mode: Some(TransportMode::Flight),
        carrier,
        number: number.clone(),
        number_list: vec![number],
        departure_time,
        arrival_time,
        duration_minutes,
        cross_days: detect_cross_days(arrival_time_raw, arrival_time_raw),
        departure_city: String::new(),
        departure_station: String::new(),
        arrival_city: String::new(),
        arrival_station: String::new(),
        price,
        flight_kind: flight_kind.to_string(),
        inner_transfer_city,
        inner_transfer_wait,
        train_class: None,
        seat_classes: Default::default(),
        raw: record.to_string(),
    })
}

fn parse_flight_text(payload: &str) -> Vec<TransportSegment> {
    flight_text_re()
        .captures_iter(payload)
        .map(|caps| {
            let number = caps[1].to_string();
            let departure_time = clean_time(&caps[2]);
            let arrival_raw = caps[3].to_string();
            let arrival_time = clean_time(&arrival_raw);
            let price: i64 = caps[4].parse().unwrap_or(0);
            TransportSegment {
                mode: Some(TransportMode::Flight),
                carrier: String::new(),
                number: number.clone(),
                number_list: vec![number],
                departure_time,
                arrival_time,
                duration_minutes: 0,
                cross_days: detect_cross_days(payload, &arrival_raw),
                departure_city: String::new(),
                departure_station: String::new(),
                arrival_city: String::new(),
                arrival_station: String::new(),
                price,
                flight_kind: "direct".to_string(),
                inner_transfer_city: None,
                inner_transfer_wait: None,
                train_class: None,
                seat_classes: Default::default(),
                raw: payload.to_string(),
            }
        })
        .collect()
}

/// Parses a train provider payload analogously to `parse_flights`, but also
/// collects per-seat-class prices and picks the minimum as `price`.
pub fn parse_trains(payload: &str) -> Vec<TransportSegment> {
    if let Ok(value) = serde_json::from_str::<Value>(payload) {
        if let Some(records) = extract_records(&value) {
            return records.iter().filter_map(parse_train_record).collect();
        }
    }
    parse_train_text(payload)
}

fn parse_train_record(record: &Value) -> Option<TransportSegment> {
    let number = record
        .get("车次")
        .or_else(|| record.get("train_no"))
        .and_then(|v| v.as_str())?
        .to_string();

    let departure_time = record
        .get("出发时间")
        .or_else(|| record.get("departure_time"))
        .and_then(|v| v.as_str())
        .map(clean_time)
        .unwrap_or_default();
    let arrival_time_raw = record
        .get("到达时间")
        .or_else(|| record.get("arrival_time"))
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    let arrival_time = clean_time(arrival_time_raw);

    let duration_minutes = record
        .get("历时")
        .or_else(|| record.get("duration"))
        .and_then(|v| v.as_str())
        .map(parse_duration_minutes)
        .unwrap_or(0);

    let mut seat_classes = std::collections::HashMap::new();
    for (label, key) in SEAT_CLASSES {
        if let Some(v) = record.get(*label).or_else(|| record.get(*key)) {
            let price = v.as_i64().or_else(|| v.as_str().map(parse_price));
            if let Some(p) = price {
                if p > 0 {
                    seat_classes.insert((*key).to_string(), p);
                }
            }
        }
    }
    let price = seat_classes.values().copied().min().unwrap_or(0);

    Some(TransportSegment {
        mode: Some(TransportMode::Train),
        carrier: String::new(),
        number: number.clone(),
        number_list: vec![number.clone()],
        departure_time,
        arrival_time,
        duration_minutes,
        cross_days: detect_cross_days(arrival_time_raw, arrival_time_raw),
        departure_city: String::new(),
        departure_station: String::new(),
        arrival_city: String::new(),
        arrival_station: String::new(),
        price,
        flight_kind: "direct".to_string(),
        inner_transfer_city: None,
        inner_transfer_wait: None,
        train_class: train_type_from_number(&number),
        seat_classes,
        raw: record.to_string(),
    })
}

fn parse_train_text(payload: &str) -> Vec<TransportSegment> {
    train_text_re()
        .captures_iter(payload)
        .map(|caps| {
            let number = caps[1].to_string();
            let departure_time = clean_time(&caps[2]);
            let arrival_raw = caps[3].to_string();
            let arrival_time = clean_time(&arrival_raw);
            let price: i64 = caps[4].parse().unwrap_or(0);
            let mut seat_classes = std::collections::HashMap::new();
            seat_classes.insert("secondSeat".to_string(), price);
            TransportSegment {
                mode: Some(TransportMode::Train),
                carrier: String::new(),
                number: number.clone(),
                number_list: vec![number.clone()],
                departure_time,
                arrival_time,
                duration_minutes: 0,
                cross_days: detect_cross_days(payload, &arrival_raw),
                departure_city: String::new(),
                departure_station: String::new(),
                arrival_city: String::new(),
                arrival_station: String::new(),
                price,
                flight_kind: "direct".to_string(),
                inner_transfer_city: None,
                inner_transfer_wait: None,
                train_class: train_type_from_number(&number),
                seat_classes,
                raw: payload.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flight_json_object_with_array() {
        let payload = r#"{"flights":[{"航班号":"CA980","departure_time":"18:00","arrival_time":"23:30","价格":"2100"}]}"#;
        let segments = parse_flights(payload);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].number, "CA980");
        assert_eq!(segments[0].price, 2100);
        assert_eq!(segments[0].departure_time, "18:00");
    }

    #[test]
    fn parses_flight_bare_list() {
        let payload = r#"[{"航班号":"MU123","departure_time":"08:00","arrival_time":"10:00","price":500}]"#;
        let segments = parse_flights(payload);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].price, 500);
    }

    #[test]
    fn falls_back_to_regex_on_unparseable_json() {
        let payload = "今日航班 CA980 18:00到23:30 票价¥2100元";
        let segments = parse_flights(payload);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].number, "CA980");
        assert_eq!(segments[0].price, 2100);
    }

    #[test]
    fn train_price_is_minimum_across_seat_classes() {
        let payload = r#"{"data":[{"车次":"G1","出发时间":"08:00","到达时间":"13:28","二等座":"553","一等座":"933"}]}"#;
        let segments = parse_trains(payload);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].price, 553);
        assert_eq!(segments[0].train_class, Some('G'));
    }

    #[test]
    fn malformed_record_is_skipped_not_fatal() {
        let payload = r#"{"data":[{"no_number_field": true},{"车次":"K1","出发时间":"07:00","到达时间":"09:00","硬座":"80"}]}"#;
        let segments = parse_trains(payload);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].number, "K1");
    }

    #[test]
    fn duration_parses_hour_and_minute_tokens_independently() {
        assert_eq!(parse_duration_minutes("5小时30分钟"), 330);
        assert_eq!(parse_duration_minutes("5h30m"), 330);
        assert_eq!(parse_duration_minutes("45分钟"), 45);
    }
}
