use crate::domain::table::SheetTable;

/// Stored column names, in write order. The browser looks columns up by
/// name, so only the names are a contract.
pub const COLUMNS: [&str; 31] = [
    "名称",
    "カテゴリー",
    "アドレス",
    "アクセス",
    "築年数",
    "構造",
    "画像URL",
    "階数",
    "家賃",
    "管理費",
    "敷金",
    "礼金",
    "間取り",
    "面積",
    "URL",
    "築年数_数値",
    "構造_数値",
    "タワーマンション",
    "階数_数値",
    "家賃_円",
    "管理費_円",
    "家賃（管理費込み）_円",
    "敷金_円",
    "礼金_円",
    "面積_数字",
    "Service_room",
    "都道府県",
    "市区町村",
    "路線",
    "駅",
    "徒歩_分",
];

/// Written in place of line/station when the access text did not parse.
pub const ACCESS_SENTINEL: &str = "0";

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedListing {
    // Identity
    pub name: String,
    pub category: String,
    pub address: String,

    // Display texts as scraped
    pub access_text: String,
    pub age_text: String,
    pub structure_text: String,
    pub image_url: String,
    pub floor_text: String,
    pub rent_text: String,
    pub fee_text: String,
    pub deposit_text: String,
    pub key_money_text: String,
    pub floor_plan: String,
    pub area_text: String,
    pub url: String,

    // Structure
    pub age_years: i64,
    pub floors: i64,
    pub is_tower: bool,
    pub unit_floor: i64,

    // Money, all yen
    pub rent_yen: i64,
    pub fee_yen: i64,
    pub combined_rent_yen: i64,
    pub deposit_yen: i64,
    pub key_money_yen: i64,

    // Space
    pub area_m2: f64,
    pub has_service_room: bool,

    // Geography / transit
    pub prefecture: String,
    pub municipality: String,
    pub line: Option<String>,
    pub station: Option<String>,
    pub walk_minutes: i64,
}

fn flag(value: bool) -> String {
    if value { "1" } else { "" }.to_string()
}

impl NormalizedListing {
    /// Cells in `COLUMNS` order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.category.clone(),
            self.address.clone(),
            self.access_text.clone(),
            self.age_text.clone(),
            self.structure_text.clone(),
            self.image_url.clone(),
            self.floor_text.clone(),
            self.rent_text.clone(),
            self.fee_text.clone(),
            self.deposit_text.clone(),
            self.key_money_text.clone(),
            self.floor_plan.clone(),
            self.area_text.clone(),
            self.url.clone(),
            self.age_years.to_string(),
            self.floors.to_string(),
            flag(self.is_tower),
            self.unit_floor.to_string(),
            self.rent_yen.to_string(),
            self.fee_yen.to_string(),
            self.combined_rent_yen.to_string(),
            self.deposit_yen.to_string(),
            self.key_money_yen.to_string(),
            self.area_m2.to_string(),
            flag(self.has_service_room),
            self.prefecture.clone(),
            self.municipality.clone(),
            self.line.clone().unwrap_or_else(|| ACCESS_SENTINEL.to_string()),
            self.station.clone().unwrap_or_else(|| ACCESS_SENTINEL.to_string()),
            self.walk_minutes.to_string(),
        ]
    }
}

pub fn listings_to_sheet(listings: &[NormalizedListing]) -> SheetTable {
    SheetTable {
        header: COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: listings.iter().map(NormalizedListing::to_row).collect(),
    }
}
