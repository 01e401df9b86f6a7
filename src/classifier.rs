//! Route-type classification and hub candidate selection (C2).

use crate::hubs::{self, Region, TransferHub};
use crate::types::{RouteType, TransportFilter, TransportMode};

pub struct HubSelection {
    pub hub_cities: Vec<String>,
    pub route_type: RouteType,
    pub tip_message: String,
}

/// Classifies `(origin, destination)` into one of the eight route types by
/// looking up each city's region.
pub fn classify(origin: &str, destination: &str) -> RouteType {
    let origin_domestic = hubs::region_of(origin).is_domestic();
    let dest_domestic = hubs::region_of(destination).is_domestic();

    match (origin_domestic, dest_domestic) {
        (true, true) => RouteType::Domestic,
        (true, false) => match hubs::region_of(destination) {
            Region::SoutheastAsia => RouteType::DomesticToSoutheastAsia,
            Region::EastAsia | Region::HongKongMacaoTaiwan => RouteType::DomesticToEastAsia,
            _ => RouteType::DomesticToLongHaul,
        },
        (false, true) => match hubs::region_of(origin) {
            Region::SoutheastAsia => RouteType::SoutheastAsiaToDomestic,
            Region::EastAsia | Region::HongKongMacaoTaiwan => RouteType::EastAsiaToDomestic,
            _ => RouteType::InternationalToDomestic,
        },
        (false, false) => RouteType::InternationalToInternational,
    }
}

fn mode_allowed_from_catalog(hub: &TransferHub, filter: TransportFilter) -> bool {
    let flight_ok = filter.allows(TransportMode::Flight) && hub.hub_types.contains(&crate::hubs::HubType::Aviation);
    let train_ok = filter.allows(TransportMode::Train) && hub.hub_types.contains(&crate::hubs::HubType::Railway);
    flight_ok || train_ok
}

/// Picks a candidate transfer-hub pool for `(origin, destination)`.
pub fn select_hubs(
    origin: &str,
    destination: &str,
    max_count: usize,
    transport_filter: TransportFilter,
    use_intl_hubs: bool,
) -> HubSelection {
    let route_type = classify(origin, destination);

    let mut pool: Vec<&'static TransferHub> = match route_type {
        RouteType::Domestic => hubs::domestic_hubs(),
        RouteType::InternationalToInternational => {
            let mut all = Vec::new();
            for region in [
                Region::SoutheastAsia,
                Region::EastAsia,
                Region::SouthAsia,
                Region::MiddleEast,
                Region::Europe,
                Region::NorthAmerica,
                Region::LatinAmerica,
                Region::Oceania,
                Region::Africa,
            ] {
                all.extend(hubs::hubs_in_region(region));
            }
            all
        }
        RouteType::DomesticToSoutheastAsia
        | RouteType::DomesticToEastAsia
        | RouteType::DomesticToLongHaul
        | RouteType::SoutheastAsiaToDomestic
        | RouteType::EastAsiaToDomestic
        | RouteType::InternationalToDomestic => {
            let mut pool = hubs::domestic_hubs();
            if use_intl_hubs {
                let intl_region = match route_type {
                    RouteType::DomesticToSoutheastAsia | RouteType::SoutheastAsiaToDomestic => Some(Region::SoutheastAsia),
                    RouteType::DomesticToEastAsia | RouteType::EastAsiaToDomestic => Some(Region::EastAsia),
                    _ => None,
                };
                if let Some(region) = intl_region {
                    pool.extend(hubs::hubs_in_region(region));
                } else {
                    for region in [
                        Region::MiddleEast,
                        Region::Europe,
                        Region::NorthAmerica,
                        Region::LatinAmerica,
                        Region::Oceania,
                        Region::SouthAsia,
                        Region::Africa,
                    ] {
                        pool.extend(hubs::hubs_in_region(region));
                    }
                }
            }
            pool
        }
    };

    pool.retain(|h| mode_allowed_from_catalog(h, transport_filter));
    hubs::order_hubs(&mut pool);

    let mut seen = std::collections::HashSet::new();
    let mut hub_cities = Vec::new();
    for hub in pool {
        if hub.city == origin || hub.city == destination {
            continue;
        }
        if seen.insert(hub.city) {
            hub_cities.push(hub.city.to_string());
        }
        if hub_cities.len() >= max_count {
            break;
        }
    }

    let tip_message = format!(
        "route type {:?} ({}): {} candidate hub(s) considered",
        route_type,
        route_type.label(),
        hub_cities.len()
    );

    HubSelection {
        hub_cities,
        route_type,
        tip_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domestic_pair_classifies_as_domestic() {
        assert!(matches!(classify("北京", "上海"), RouteType::Domestic));
    }

    #[test]
    fn long_haul_pair_classifies_correctly() {
        assert!(matches!(classify("北京", "旧金山"), RouteType::DomesticToLongHaul));
    }

    #[test]
    fn classifier_is_direction_aware_for_mixed_routes() {
        let fwd = classify("北京", "曼谷");
        let bwd = classify("曼谷", "北京");
        assert!(matches!(fwd, RouteType::DomesticToSoutheastAsia));
        assert!(matches!(bwd, RouteType::SoutheastAsiaToDomestic));
    }

    #[test]
    fn both_domestic_classification_is_symmetric_in_kind() {
        assert_eq!(
            std::mem::discriminant(&classify("北京", "上海")),
            std::mem::discriminant(&classify("上海", "北京"))
        );
    }

    #[test]
    fn selected_hubs_exclude_origin_and_destination() {
        let sel = classify_and_select("北京", "上海");
        assert!(!sel.hub_cities.iter().any(|c| c == "北京" || c == "上海"));
    }

    fn classify_and_select(origin: &str, destination: &str) -> HubSelection {
        select_hubs(origin, destination, 15, TransportFilter::All, true)
    }
}
