//! Ranker & formatter (C9): groups feasible plans by leg count and
//! transfer policy and renders a human-readable report, the same grouping
//! the original report builder uses (direct first, then 2h/3h subsections
//! for multi-leg plans).

use crate::types::RoutePlan;

const TOP_N_DEFAULT: usize = 30;
const SUBSECTION_DISPLAY_LIMIT: usize = 5;

fn format_segment(segment: &crate::types::TransportSegment) -> String {
    let icon = match segment.mode {
        Some(crate::types::TransportMode::Flight) => "✈️",
        Some(crate::types::TransportMode::Train) => "🚄",
        None => "•",
    };
    let cross_day_suffix = if segment.cross_days > 0 {
        format!(" (+{}d)", segment.cross_days)
    } else {
        String::new()
    };
    let transfer_note = match (&segment.inner_transfer_city, &segment.inner_transfer_wait) {
        (Some(city), Some(wait)) => format!(" [via {city}, {wait} layover]"),
        _ => String::new(),
    };
    format!(
        "{icon} {} {}->{}{cross_day_suffix} ¥{}{transfer_note}",
        segment.number, segment.departure_time, segment.arrival_time, segment.price
    )
}

fn format_plan(plan: &RoutePlan, index: usize) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{}. {} legs, ¥{} total, {} min, transfers: {}",
        index + 1,
        plan.leg_count(),
        plan.total_price,
        plan.total_duration_minutes,
        if plan.transfer_cities.is_empty() {
            "none".to_string()
        } else {
            plan.transfer_cities.join(" → ")
        }
    ));
    for segment in &plan.segments {
        lines.push(format!("   {}", format_segment(segment)));
    }
    if plan.accommodation_fee > 0 {
        lines.push(format!("   住宿费 accommodation: ¥{}", plan.accommodation_fee));
    }
    lines.join("\n")
}

/// Renders the full report: direct plans, then two-leg and three-leg plans
/// grouped by their `min_transfer_hours` policy, each truncated to a
/// handful of entries, with an overall cap of `top_n`.
pub fn format_routes_for_ai(plans: &[RoutePlan], top_n: usize) -> String {
    let top_n = if top_n == 0 { TOP_N_DEFAULT } else { top_n };
    let feasible: Vec<&RoutePlan> = plans.iter().filter(|p| p.feasible).take(top_n).collect();

    let mut out = String::new();
    out.push_str(&format!("共找到 {} 条可行路线\n\n", feasible.len()));

    let direct: Vec<&RoutePlan> = feasible.iter().copied().filter(|p| p.leg_count() == 1).collect();
    if !direct.is_empty() {
        out.push_str("## 直达方案\n");
        for (i, plan) in direct.iter().copied().take(SUBSECTION_DISPLAY_LIMIT).enumerate() {
            out.push_str(&format_plan(plan, i));
            out.push('\n');
        }
        out.push('\n');
    }

    for legs in [2usize, 3usize] {
        for policy in [2u32, 3u32] {
            let group: Vec<&RoutePlan> = feasible
                .iter()
                .copied()
                .filter(|p| p.leg_count() == legs && p.min_transfer_hours == policy)
                .collect();
            if group.is_empty() {
                continue;
            }
            out.push_str(&format!("## {}程中转方案 (最小中转时间 {}小时)\n", legs, policy));
            for (i, plan) in group.iter().copied().take(SUBSECTION_DISPLAY_LIMIT).enumerate() {
                out.push_str(&format_plan(plan, i));
                out.push('\n');
            }
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransportSegment;

    fn feasible_plan(price: i64, legs: usize) -> RoutePlan {
        RoutePlan {
            segments: (0..legs).map(|_| TransportSegment::default()).collect(),
            transfer_cities: (0..legs.saturating_sub(1)).map(|i| format!("hub{i}")).collect(),
            min_transfer_hours: 2,
            total_price: price,
            total_duration_minutes: 100,
            accommodation_fee: 0,
            transfer_wait_minutes: vec![],
            route_type: "flight".to_string(),
            feasible: true,
            infeasible_reason: None,
        }
    }

    #[test]
    fn infeasible_plans_never_appear_in_the_report() {
        let mut plan = feasible_plan(100, 1);
        plan.feasible = false;
        let report = format_routes_for_ai(&[plan], 30);
        assert!(report.contains("共找到 0 条可行路线"));
    }

    #[test]
    fn report_groups_direct_and_multi_leg_sections() {
        let plans = vec![feasible_plan(100, 1), feasible_plan(200, 2)];
        let report = format_routes_for_ai(&plans, 30);
        assert!(report.contains("直达方案"));
        assert!(report.contains("2程中转方案"));
    }
}
