// src/domain/browse.rs
//
// Read-side view of the stored worksheet: coercion, filtering and the
// advisory numbers shown next to the filters. Nothing here writes back.

use crate::domain::table::{cell, SheetTable};
use thiserror::Error;

pub const COL_AGE: &str = "築年数_数値";
pub const COL_COMBINED_RENT: &str = "家賃（管理費込み）_円";
pub const COL_AREA: &str = "面積_数字";
pub const COL_WALK: &str = "徒歩_分";
pub const COL_DISTRICT: &str = "市区町村";
pub const COL_NAME: &str = "名称";
pub const COL_URL: &str = "URL";

pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_AGE,
    COL_COMBINED_RENT,
    COL_AREA,
    COL_WALK,
    COL_DISTRICT,
    COL_NAME,
    COL_URL,
];

/// Rent per square meter, yen.
pub const DISTRICT_RENT_RATES: [(&str, u32); 5] = [
    ("渋谷区", 5337),
    ("目黒区", 3685),
    ("新宿区", 3661),
    ("品川区", 3652),
    ("世田谷区", 2993),
];

#[derive(Debug, Error, PartialEq)]
pub enum BrowseError {
    #[error("以下の必要な列がデータに存在しません: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("物件データがまだ保存されていません")]
    NoData,
    #[error("少なくとも2つの変数を選択してください。")]
    TooFewChartVariables(usize),
    #[error("比較できる項目は4つまでです。")]
    TooManyChartVariables(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowsableListing {
    /// 1-based position in the stored table.
    pub no: usize,
    pub name: String,
    pub district: String,
    pub url: String,
    pub age_years: Option<f64>,
    pub combined_rent: Option<f64>,
    pub area_m2: Option<f64>,
    pub walk_minutes: Option<f64>,
}

/// Lenient numeric read: blanks and junk become `None`.
fn coerce(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Default)]
pub struct ListingTable {
    pub rows: Vec<BrowsableListing>,
}

impl ListingTable {
    pub fn from_sheet(sheet: &SheetTable) -> Result<Self, BrowseError> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| sheet.column_index(c).is_none())
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(BrowseError::MissingColumns(missing));
        }

        let idx = |name: &str| sheet.column_index(name).unwrap_or_default();
        let (age, rent, area, walk) = (idx(COL_AGE), idx(COL_COMBINED_RENT), idx(COL_AREA), idx(COL_WALK));
        let (district, name, url) = (idx(COL_DISTRICT), idx(COL_NAME), idx(COL_URL));

        let rows = sheet
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| BrowsableListing {
                no: i + 1,
                name: cell(row, name).to_string(),
                district: cell(row, district).to_string(),
                url: cell(row, url).to_string(),
                age_years: coerce(cell(row, age)),
                combined_rent: coerce(&cell(row, rent).replace(',', "")),
                area_m2: coerce(cell(row, area)),
                walk_minutes: coerce(cell(row, walk)),
            })
            .collect();

        Ok(Self { rows })
    }

    /// Distinct districts in first-seen order.
    pub fn districts(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !out.contains(&row.district.as_str()) {
                out.push(&row.district);
            }
        }
        out
    }

    /// First row with this detail URL.
    pub fn find_by_url(&self, url: &str) -> Option<&BrowsableListing> {
        self.rows.iter().find(|r| r.url == url)
    }
}

/// Inclusive range; a missing value never matches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: Option<f64>) -> bool {
        value.is_some_and(|v| v >= self.min && v <= self.max)
    }
}

/// A slider: its bounds, step and preset selection.
#[derive(Debug, Clone, Copy)]
pub struct SliderSpec {
    pub bounds: Range,
    pub step: f64,
    pub default: Range,
}

pub const RENT_SLIDER: SliderSpec = SliderSpec {
    bounds: Range::new(0.0, 300_000.0),
    step: 1_000.0,
    default: Range::new(50_000.0, 150_000.0),
};
pub const AGE_SLIDER: SliderSpec = SliderSpec {
    bounds: Range::new(0.0, 100.0),
    step: 1.0,
    default: Range::new(0.0, 30.0),
};
pub const WALK_SLIDER: SliderSpec = SliderSpec {
    bounds: Range::new(0.0, 30.0),
    step: 1.0,
    default: Range::new(0.0, 10.0),
};
pub const AREA_SLIDER: SliderSpec = SliderSpec {
    bounds: Range::new(0.0, 200.0),
    step: 1.0,
    default: Range::new(20.0, 100.0),
};

#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilter {
    /// Exact match; `None` matches no row.
    pub district: Option<String>,
    pub rent: Range,
    pub walk: Range,
    pub age: Range,
    pub area: Range,
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            district: None,
            rent: RENT_SLIDER.default,
            walk: WALK_SLIDER.default,
            age: AGE_SLIDER.default,
            area: AREA_SLIDER.default,
        }
    }
}

impl ListingFilter {
    pub fn matches(&self, row: &BrowsableListing) -> bool {
        self.district.as_deref() == Some(row.district.as_str())
            && self.rent.contains(row.combined_rent)
            && self.walk.contains(row.walk_minutes)
            && self.age.contains(row.age_years)
            && self.area.contains(row.area_m2)
    }

    pub fn apply<'a>(&self, table: &'a ListingTable) -> Vec<&'a BrowsableListing> {
        table.rows.iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Household {
    pub adults: u32,
    pub children: u32,
}

impl Default for Household {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
        }
    }
}

/// Upper bound on residents accepted from the dashboard form.
pub const MAX_HOUSEHOLD_SIZE: u32 = 99;

impl Household {
    pub fn size(&self) -> u32 {
        self.adults.saturating_add(self.children)
    }

    /// Square meters: 10 per resident plus 10. Saturates instead of wrapping.
    pub fn minimum_living_space(&self) -> u32 {
        self.size().saturating_mul(10).saturating_add(10)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RentPreference {
    Frugal,
    #[default]
    Average,
    Premium,
}

impl RentPreference {
    pub const ALL: [RentPreference; 3] = [Self::Frugal, Self::Average, Self::Premium];

    /// Share of annual income spent on rent.
    pub fn income_share(self) -> f64 {
        match self {
            Self::Frugal => 0.20,
            Self::Average => 0.25,
            Self::Premium => 0.30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Frugal => "なるべく抑えたい（年収20％）",
            Self::Average => "平均的な水準（年収25％）",
            Self::Premium => "いい所に住みたい（年収30％）",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Frugal => "frugal",
            Self::Average => "average",
            Self::Premium => "premium",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// Annual income in 万円 to a monthly rent budget in yen.
pub fn monthly_rent_budget(annual_income_man: u32, preference: RentPreference) -> f64 {
    f64::from(annual_income_man) * 10_000.0 * preference.income_share() / 12.0
}

pub fn district_rent_rate(district: &str) -> Option<u32> {
    DISTRICT_RENT_RATES
        .iter()
        .find(|(name, _)| *name == district)
        .map(|(_, rate)| *rate)
}

/// Rent for the minimum living space at the district's rate, if known.
pub fn district_rent_estimate(district: &str, minimum_living_space: u32) -> Option<u64> {
    district_rent_rate(district).map(|rate| u64::from(rate).saturating_mul(u64::from(minimum_living_space)))
}
