//! Static transfer-hub catalog, city/region map, and the international-city
//! set used to decide which cities a train can legally serve.
//!
//! All data here is immutable and process-global: it is built once behind a
//! `OnceLock` and shared by every query run, mirroring how the teacher's
//! city cache is loaded once and consulted by every client instance.

use std::collections::HashSet;
use std::sync::OnceLock;

/// One of the catalog's transport capabilities at a hub city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HubType {
    Aviation,
    Railway,
    /// Hub supports a same-city air-rail transfer (implies both of the above).
    AirRail,
}

/// Coarse geography used to pick a candidate hub pool for a given trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    NorthChina,
    EastChina,
    SouthChina,
    CentralChina,
    Southwest,
    Northwest,
    Northeast,
    HongKongMacaoTaiwan,
    SoutheastAsia,
    EastAsia,
    SouthAsia,
    MiddleEast,
    Europe,
    NorthAmerica,
    LatinAmerica,
    Oceania,
    Africa,
}

impl Region {
    pub fn is_domestic(self) -> bool {
        !matches!(
            self,
            Region::SoutheastAsia
                | Region::EastAsia
                | Region::SouthAsia
                | Region::MiddleEast
                | Region::Europe
                | Region::NorthAmerica
                | Region::LatinAmerica
                | Region::Oceania
                | Region::Africa
        )
    }
}

/// Extra detail for a hub city served by two distinct airports.
#[derive(Debug, Clone)]
pub struct DualAirportInfo {
    pub airports: Vec<String>,
    pub cross_airport_minutes: u32,
    /// Additional surcharge applied when a transfer crosses airports, in
    /// the same currency units as segment prices.
    pub penalty: u32,
}

#[derive(Debug, Clone)]
pub struct TransferHub {
    pub city: &'static str,
    pub airport_codes: Vec<&'static str>,
    pub railway_stations: Vec<&'static str>,
    pub hub_types: HashSet<HubType>,
    pub level: u8,
    pub air_rail_tier: Option<u8>,
    pub region: Region,
    pub dual_airport_info: Option<DualAirportInfo>,
}

impl TransferHub {
    fn new(
        city: &'static str,
        airport_codes: Vec<&'static str>,
        railway_stations: Vec<&'static str>,
        hub_types: &[HubType],
        level: u8,
        air_rail_tier: Option<u8>,
        region: Region,
    ) -> Self {
        Self {
            city,
            airport_codes,
            railway_stations,
            hub_types: hub_types.iter().copied().collect(),
            level,
            air_rail_tier,
            region,
            dual_airport_info: None,
        }
    }
}

/// Minimum connect time, in minutes, for a given air-rail tier. Tier 1 is
/// fastest (a dedicated airport rail link); tier 3 is slowest (separate
/// terminals requiring ground transport).
pub fn mct_minutes_for_tier(tier: u8) -> u32 {
    match tier {
        1 => 90,
        2 => 120,
        3 => 150,
        _ => 150,
    }
}

pub const MCT_CROSS_AIRPORT_MINUTES: u32 = 240;
pub const MCT_SAME_STATION_TRAIN_MINUTES: u32 = 60;

fn domestic_catalog() -> Vec<TransferHub> {
    use HubType::*;
    use Region::*;
    vec![
        TransferHub::new("北京", vec!["PEK", "PKX"], vec!["北京南", "北京西"], &[Aviation, Railway, AirRail], 1, Some(1), NorthChina),
        TransferHub::new("上海", vec!["PVG", "SHA"], vec!["上海虹桥"], &[Aviation, Railway, AirRail], 1, Some(1), EastChina),
        TransferHub::new("广州", vec!["CAN"], vec!["广州南"], &[Aviation, Railway, AirRail], 1, Some(1), SouthChina),
        TransferHub::new("深圳", vec!["SZX"], vec!["深圳北"], &[Aviation, Railway, AirRail], 2, Some(2), SouthChina),
        TransferHub::new("成都", vec!["CTU", "TFU"], vec!["成都东"], &[Aviation, Railway], 2, Some(2), Southwest),
        TransferHub::new("重庆", vec!["CKG"], vec!["重庆北", "重庆西"], &[Aviation, Railway], 2, Some(2), Southwest),
        TransferHub::new("西安", vec!["XIY"], vec!["西安北"], &[Aviation, Railway, AirRail], 2, Some(2), Northwest),
        TransferHub::new("武汉", vec!["WUH"], vec!["武汉"], &[Aviation, Railway], 2, Some(2), CentralChina),
        TransferHub::new("郑州", vec!["CGO"], vec!["郑州东"], &[Aviation, Railway], 2, Some(2), CentralChina),
        TransferHub::new("南京", vec!["NKG"], vec!["南京南"], &[Aviation, Railway], 3, Some(3), EastChina),
        TransferHub::new("杭州", vec!["HGH"], vec!["杭州东"], &[Aviation, Railway], 3, Some(3), EastChina),
        TransferHub::new("长沙", vec!["CSX"], vec!["长沙南"], &[Aviation, Railway], 3, Some(3), CentralChina),
        TransferHub::new("昆明", vec!["KMG"], vec!["昆明南"], &[Aviation, Railway], 3, None, Southwest),
        TransferHub::new("沈阳", vec!["SHE"], vec!["沈阳北"], &[Aviation, Railway], 3, None, Northeast),
        TransferHub::new("哈尔滨", vec!["HRB"], vec!["哈尔滨西"], &[Aviation, Railway], 3, None, Northeast),
        TransferHub::new("合肥", vec!["HFE"], vec!["合肥南"], &[Aviation, Railway], 4, None, EastChina),
        TransferHub::new("南昌", vec!["KHN"], vec!["南昌西"], &[Aviation, Railway], 4, None, EastChina),
        TransferHub::new("福州", vec!["FOC"], vec!["福州"], &[Aviation, Railway], 4, None, EastChina),
        TransferHub::new("济南", vec!["TNA"], vec!["济南西"], &[Aviation, Railway], 4, None, NorthChina),
        TransferHub::new("太原", vec!["TYN"], vec!["太原南"], &[Aviation, Railway], 4, None, NorthChina),
        TransferHub::new("石家庄", vec!["SJW"], vec!["石家庄"], &[Aviation, Railway], 4, None, NorthChina),
        TransferHub::new("南宁", vec!["NNG"], vec!["南宁东"], &[Aviation, Railway], 4, None, SouthChina),
        TransferHub::new("贵阳", vec!["KWE"], vec!["贵阳北"], &[Aviation, Railway], 4, None, Southwest),
        TransferHub::new("兰州", vec!["LHW"], vec!["兰州西"], &[Aviation, Railway], 4, None, Northwest),
        TransferHub::new("西宁", vec!["XNN"], vec!["西宁"], &[Aviation, Railway], 4, None, Northwest),
        TransferHub::new("银川", vec!["INC"], vec!["银川"], &[Aviation, Railway], 4, None, Northwest),
        TransferHub::new("乌鲁木齐", vec!["URC"], vec!["乌鲁木齐"], &[Aviation, Railway], 4, None, Northwest),
        TransferHub::new("呼和浩特", vec!["HET"], vec!["呼和浩特东"], &[Aviation, Railway], 4, None, NorthChina),
        TransferHub::new("长春", vec!["CGQ"], vec!["长春西"], &[Aviation, Railway], 4, None, Northeast),
        TransferHub::new("海口", vec!["HAK"], vec!["海口东"], &[Aviation, Railway], 4, None, SouthChina),
        TransferHub::new("香港", vec!["HKG"], vec!["香港西九龙"], &[Aviation, Railway], 2, None, HongKongMacaoTaiwan),
        TransferHub::new("澳门", vec!["MFM"], vec![], &[Aviation], 4, None, HongKongMacaoTaiwan),
        TransferHub::new("台北", vec!["TPE", "TSA"], vec![], &[Aviation], 3, None, HongKongMacaoTaiwan),
    ]
}

fn international_catalog() -> Vec<TransferHub> {
    use HubType::*;
    use Region::*;
    vec![
        TransferHub::new("曼谷", vec!["BKK", "DMK"], vec![], &[Aviation], 2, None, SoutheastAsia),
        TransferHub::new("新加坡", vec!["SIN"], vec![], &[Aviation], 1, None, SoutheastAsia),
        TransferHub::new("吉隆坡", vec!["KUL"], vec![], &[Aviation], 2, None, SoutheastAsia),
        TransferHub::new("雅加达", vec!["CGK"], vec![], &[Aviation], 3, None, SoutheastAsia),
        TransferHub::new("马尼拉", vec!["MNL"], vec![], &[Aviation], 3, None, SoutheastAsia),
        TransferHub::new("河内", vec!["HAN"], vec![], &[Aviation], 3, None, SoutheastAsia),
        TransferHub::new("胡志明市", vec!["SGN"], vec![], &[Aviation], 3, None, SoutheastAsia),
        TransferHub::new("东京", vec!["NRT", "HND"], vec![], &[Aviation], 1, None, EastAsia),
        TransferHub::new("大阪", vec!["KIX"], vec![], &[Aviation], 2, None, EastAsia),
        TransferHub::new("首尔", vec!["ICN", "GMP"], vec![], &[Aviation], 1, None, EastAsia),
        TransferHub::new("釜山", vec!["PUS"], vec![], &[Aviation], 3, None, EastAsia),
        TransferHub::new("乌兰巴托", vec!["ULN"], vec![], &[Aviation], 4, None, EastAsia),
        TransferHub::new("新德里", vec!["DEL"], vec![], &[Aviation], 2, None, SouthAsia),
        TransferHub::new("孟买", vec!["BOM"], vec![], &[Aviation], 2, None, SouthAsia),
        TransferHub::new("科伦坡", vec!["CMB"], vec![], &[Aviation], 3, None, SouthAsia),
        TransferHub::new("加德满都", vec!["KTM"], vec![], &[Aviation], 4, None, SouthAsia),
        TransferHub::new("达卡", vec!["DAC"], vec![], &[Aviation], 4, None, SouthAsia),
        TransferHub::new("迪拜", vec!["DXB"], vec![], &[Aviation], 1, None, MiddleEast),
        TransferHub::new("多哈", vec!["DOH"], vec![], &[Aviation], 1, None, MiddleEast),
        TransferHub::new("伊斯坦布尔", vec!["IST"], vec![], &[Aviation], 2, None, MiddleEast),
        TransferHub::new("德黑兰", vec!["IKA"], vec![], &[Aviation], 4, None, MiddleEast),
        TransferHub::new("利雅得", vec!["RUH"], vec![], &[Aviation], 3, None, MiddleEast),
        TransferHub::new("伦敦", vec!["LHR", "LGW"], vec![], &[Aviation], 1, None, Europe),
        TransferHub::new("巴黎", vec!["CDG", "ORY"], vec![], &[Aviation], 1, None, Europe),
        TransferHub::new("莫斯科", vec!["SVO", "DME"], vec![], &[Aviation], 2, None, Europe),
        TransferHub::new("法兰克福", vec!["FRA"], vec![], &[Aviation], 1, None, Europe),
        TransferHub::new("罗马", vec!["FCO"], vec![], &[Aviation], 3, None, Europe),
        TransferHub::new("阿姆斯特丹", vec!["AMS"], vec![], &[Aviation], 2, None, Europe),
        TransferHub::new("纽约", vec!["JFK", "EWR"], vec![], &[Aviation], 1, None, NorthAmerica),
        TransferHub::new("洛杉矶", vec!["LAX"], vec![], &[Aviation], 1, None, NorthAmerica),
        TransferHub::new("温哥华", vec!["YVR"], vec![], &[Aviation], 3, None, NorthAmerica),
        TransferHub::new("多伦多", vec!["YYZ"], vec![], &[Aviation], 2, None, NorthAmerica),
        TransferHub::new("旧金山", vec!["SFO"], vec![], &[Aviation], 2, None, NorthAmerica),
        TransferHub::new("墨西哥城", vec!["MEX"], vec![], &[Aviation], 3, None, LatinAmerica),
        TransferHub::new("圣保罗", vec!["GRU"], vec![], &[Aviation], 4, None, LatinAmerica),
        TransferHub::new("布宜诺斯艾利斯", vec!["EZE"], vec![], &[Aviation], 4, None, LatinAmerica),
        TransferHub::new("悉尼", vec!["SYD"], vec![], &[Aviation], 2, None, Oceania),
        TransferHub::new("奥克兰", vec!["AKL"], vec![], &[Aviation], 3, None, Oceania),
        TransferHub::new("开罗", vec!["CAI"], vec![], &[Aviation], 3, None, Africa),
        TransferHub::new("约翰内斯堡", vec!["JNB"], vec![], &[Aviation], 3, None, Africa),
        TransferHub::new("内罗毕", vec!["NBO"], vec![], &[Aviation], 4, None, Africa),
    ]
}

static CATALOG: OnceLock<Vec<TransferHub>> = OnceLock::new();

fn catalog() -> &'static [TransferHub] {
    CATALOG
        .get_or_init(|| {
            let mut hubs = domestic_catalog();
            hubs.extend(international_catalog());
            hubs
        })
        .as_slice()
}

pub fn hub_by_city(name: &str) -> Option<&'static TransferHub> {
    catalog().iter().find(|h| h.city == name)
}

pub fn domestic_hubs() -> Vec<&'static TransferHub> {
    catalog().iter().filter(|h| h.region.is_domestic()).collect()
}

pub fn hubs_in_region(region: Region) -> Vec<&'static TransferHub> {
    catalog().iter().filter(|h| h.region == region).collect()
}

pub fn air_rail_hubs(tier: Option<u8>) -> Vec<&'static TransferHub> {
    catalog()
        .iter()
        .filter(|h| match tier {
            Some(t) => h.air_rail_tier == Some(t),
            None => h.air_rail_tier.is_some(),
        })
        .collect()
}

/// Sorts a hub list by level ascending, then by number of supported hub
/// types descending, then by air-rail tier ascending (hubs with no tier
/// sort last).
pub fn order_hubs(hubs: &mut [&'static TransferHub]) {
    hubs.sort_by(|a, b| {
        a.level
            .cmp(&b.level)
            .then_with(|| b.hub_types.len().cmp(&a.hub_types.len()))
            .then_with(|| {
                let ta = a.air_rail_tier.unwrap_or(u8::MAX);
                let tb = b.air_rail_tier.unwrap_or(u8::MAX);
                ta.cmp(&tb)
            })
    });
}

/// City→region map, grounded on the same regional grouping used for the
/// international-city set below. Unknown cities are treated as domestic
/// by `region_of`.
pub fn region_of(city: &str) -> Region {
    if let Some(hub) = hub_by_city(city) {
        return hub.region;
    }
    if is_international_city(city) {
        // A city not in the hub catalog but present in the international
        // set still needs a region bucket; fold it into its closest group
        // by checking membership in the grouped lists below.
        for (region, cities) in international_city_groups() {
            if cities.iter().any(|c| *c == city || city.contains(c) || c.contains(city)) {
                return region;
            }
        }
    }
    Region::NorthChina // domestic default bucket; callers only care about is_domestic()
}

fn international_city_groups() -> &'static [(Region, &'static [&'static str])] {
    use Region::*;
    static GROUPS: &[(Region, &[&str])] = &[
        (
            SoutheastAsia,
            &[
                "曼谷", "素万那普", "新加坡", "吉隆坡", "雅加达", "马尼拉", "河内", "胡志明市",
                "金边", "万象", "仰光", "宿务", "巴厘岛", "普吉岛", "清迈",
            ],
        ),
        (
            EastAsia,
            &["东京", "大阪", "京都", "首尔", "釜山", "乌兰巴托", "台北", "香港", "澳门", "冲绳"],
        ),
        (
            SouthAsia,
            &["新德里", "孟买", "科伦坡", "马尔代夫", "加德满都", "达卡", "班加罗尔"],
        ),
        (
            MiddleEast,
            &["迪拜", "多哈", "伊斯坦布尔", "德黑兰", "利雅得", "特拉维夫", "阿布扎比"],
        ),
        (
            Europe,
            &["伦敦", "巴黎", "莫斯科", "雅典", "法兰克福", "罗马", "马德里", "阿姆斯特丹", "柏林", "苏黎世"],
        ),
        (
            NorthAmerica,
            &["纽约", "洛杉矶", "温哥华", "多伦多", "芝加哥", "旧金山", "西雅图", "波士顿"],
        ),
        (
            LatinAmerica,
            &["墨西哥城", "圣保罗", "布宜诺斯艾利斯", "利马", "波哥大"],
        ),
        (Oceania, &["悉尼", "奥克兰", "斐济", "墨尔本", "布里斯班"]),
        (
            Africa,
            &["开罗", "约翰内斯堡", "内罗毕", "开普敦", "拉各斯"],
        ),
    ];
    GROUPS
}

static INTERNATIONAL_CITIES: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn international_cities() -> &'static HashSet<&'static str> {
    INTERNATIONAL_CITIES.get_or_init(|| {
        international_city_groups()
            .iter()
            .flat_map(|(_, cities)| cities.iter().copied())
            .collect()
    })
}

/// Whether `city` should be treated as international — and therefore
/// ineligible for a train leg. Matching is both exact and substring
/// (either direction), which is intentionally permissive: a compound name
/// like "曼谷素万那普" matches "曼谷". This can false-positive on
/// coincidental substrings; the behavior is pinned by a regression test
/// rather than tightened, since callers rely on the permissive side.
pub fn is_international_city(city: &str) -> bool {
    let cities = international_cities();
    if cities.contains(city) {
        return true;
    }
    cities.iter().any(|c| city.contains(c) || c.contains(city))
}
