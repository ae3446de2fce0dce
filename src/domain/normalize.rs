// src/domain/normalize.rs
//
// One total parser per scraped field. None of these fail: text that does not
// match falls back to the field's default, and `normalize_listing` settles
// any remaining `None` to 0.

use crate::domain::listing::NormalizedListing;
use crate::scraper::models::RawListing;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static RE_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());
static RE_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.[0-9]+|[0-9]+").unwrap());
static RE_ABOVE_GROUND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"地上([0-9]+)階建").unwrap());
static RE_STORIES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)階建").unwrap());
static RE_PREFECTURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:東京都|北海道|(?:京都|大阪)府|.{2,3}県)").unwrap());
static RE_MUNICIPALITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^.*?[市区町村]").unwrap());
static RE_ACCESS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+)駅 歩([0-9]+)分").unwrap());

/// Marks a floor plan with a service room, e.g. "2SLDK" or "1LDK+S".
const SERVICE_ROOM_MARKER: char = 'S';
const TOWER_MIN_FLOORS: i64 = 20;
const MAN_YEN: i64 = 10_000;

/// Full-width digits (０-９), common in listing text, as ASCII.
fn ascii_digits(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| ('０'..='９').contains(&c)) {
        return Cow::Borrowed(text);
    }
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            other => other,
        })
        .collect()
}

fn first_integer(text: &str) -> Option<i64> {
    RE_INTEGER.find(&ascii_digits(text))?.as_str().parse().ok()
}

fn is_none_marker(text: &str) -> bool {
    matches!(text, "-" | "なし")
}

/// "8.5" (in 万円) -> 85000, truncating below one yen. Zero reads as absent.
fn man_yen_to_yen(number: &str) -> Option<i64> {
    let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
    let whole: i64 = whole.parse().ok()?;
    let frac: String = frac.chars().chain(std::iter::repeat('0')).take(4).collect();
    let frac: i64 = frac.parse().ok()?;
    let yen = whole.checked_mul(MAN_YEN)?.checked_add(frac)?;
    (yen != 0).then_some(yen)
}

fn first_man_yen(text: &str) -> Option<i64> {
    man_yen_to_yen(RE_DECIMAL.find(&ascii_digits(text))?.as_str())
}

/// "築15年" -> 15, "新築" -> 0.
pub fn parse_age(text: &str) -> i64 {
    if text == "新築" {
        return 0;
    }
    first_integer(text).unwrap_or(0)
}

/// Above-ground stories from e.g. "鉄筋コン/地下1地上25階建".
pub fn parse_floors(text: &str) -> i64 {
    let text = ascii_digits(text);
    RE_ABOVE_GROUND
        .captures(&text)
        .or_else(|| RE_STORIES.captures(&text))
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0)
}

pub fn is_tower(floors: i64) -> bool {
    floors >= TOWER_MIN_FLOORS
}

pub fn parse_unit_floor(text: &str) -> Option<i64> {
    first_integer(text)
}

/// "8.5万円" -> 85000.
pub fn parse_rent(text: &str) -> Option<i64> {
    first_man_yen(text)
}

/// "5000円" or "5,000円" -> 5000; "-" and "なし" -> 0.
pub fn parse_management_fee(text: &str) -> Option<i64> {
    if is_none_marker(text) {
        return Some(0);
    }
    first_integer(&text.replace(',', ""))
}

pub fn parse_deposit(text: &str) -> Option<i64> {
    if is_none_marker(text) {
        return Some(0);
    }
    first_man_yen(text)
}

pub fn parse_key_money(text: &str) -> Option<i64> {
    parse_deposit(text)
}

/// "25.5m2" -> 25.5.
pub fn parse_area(text: &str) -> Option<f64> {
    RE_DECIMAL.find(&ascii_digits(text))?.as_str().parse().ok()
}

pub fn has_service_room(floor_plan: &str) -> bool {
    floor_plan.contains(SERVICE_ROOM_MARKER)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParts {
    pub prefecture: String,
    pub municipality: String,
}

/// "東京都渋谷区神宮前1-1" -> ("東京都", "渋谷区").
pub fn split_address(address: &str) -> AddressParts {
    let prefecture = RE_PREFECTURE
        .find(address)
        .map(|m| m.as_str())
        .unwrap_or("");
    let rest = &address[prefecture.len()..];
    let municipality = RE_MUNICIPALITY
        .find(rest)
        .map(|m| m.as_str())
        .unwrap_or(rest);

    AddressParts {
        prefecture: prefecture.to_string(),
        municipality: municipality.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessParts {
    pub line: Option<String>,
    pub station: Option<String>,
    /// 0 when the text did not parse; not a measured value.
    pub walk_minutes: i64,
}

/// "JR山手線/渋谷駅 歩5分" -> ("JR山手線", "渋谷駅", 5).
pub fn split_access(text: &str) -> AccessParts {
    let text = ascii_digits(text);
    let Some(caps) = RE_ACCESS.captures(&text) else {
        return AccessParts::default();
    };
    let Ok(walk_minutes) = caps[2].parse::<i64>() else {
        return AccessParts::default();
    };

    let mut parts = caps[1].split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(line), Some(station), None) => AccessParts {
            line: Some(line.to_string()),
            station: Some(format!("{station}駅")),
            walk_minutes,
        },
        _ => AccessParts::default(),
    }
}

pub fn normalize_listing(raw: &RawListing) -> NormalizedListing {
    let unit = &raw.unit;

    let floors = parse_floors(&raw.structure);
    let rent_yen = parse_rent(&unit.rent).unwrap_or(0);
    let fee_yen = parse_management_fee(&unit.management_fee).unwrap_or(0);
    let address = split_address(&raw.address);
    let access = split_access(&raw.access);

    NormalizedListing {
        name: raw.name.clone(),
        category: raw.category.clone(),
        address: raw.address.clone(),

        access_text: raw.access.clone(),
        age_text: raw.age.clone(),
        structure_text: raw.structure.clone(),
        image_url: raw.image_url.clone(),
        floor_text: unit.floor.clone(),
        rent_text: unit.rent.clone(),
        fee_text: unit.management_fee.clone(),
        deposit_text: unit.deposit.clone(),
        key_money_text: unit.key_money.clone(),
        floor_plan: unit.floor_plan.clone(),
        area_text: unit.area.clone(),
        url: unit.detail_url.clone(),

        age_years: parse_age(&raw.age),
        floors,
        is_tower: is_tower(floors),
        unit_floor: parse_unit_floor(&unit.floor).unwrap_or(0),

        rent_yen,
        fee_yen,
        combined_rent_yen: rent_yen + fee_yen,
        deposit_yen: parse_deposit(&unit.deposit).unwrap_or(0),
        key_money_yen: parse_key_money(&unit.key_money).unwrap_or(0),

        area_m2: parse_area(&unit.area).unwrap_or(0.0),
        has_service_room: has_service_room(&unit.floor_plan),

        prefecture: address.prefecture,
        municipality: address.municipality,
        line: access.line,
        station: access.station,
        walk_minutes: access.walk_minutes,
    }
}
