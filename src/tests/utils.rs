use crate::db::connection::{init_db, Database};
use crate::scraper::models::{RawListing, RawUnitRow};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_DB: AtomicUsize = AtomicUsize::new(0);

/// Fresh database file per test, with the production schema applied.
pub fn init_test_db() -> Database {
    let path = std::env::temp_dir().join(format!(
        "opti_home_test_{}_{}.sqlite",
        std::process::id(),
        NEXT_DB.fetch_add(1, Ordering::SeqCst)
    ));
    let _ = std::fs::remove_file(&path);

    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db
}

pub struct UnitFixture<'a> {
    pub floor: &'a str,
    pub rent: &'a str,
    pub fee: &'a str,
    pub deposit: &'a str,
    pub key_money: &'a str,
    pub plan: &'a str,
    pub area: &'a str,
    pub href: &'a str,
}

pub const UNIT_3F: UnitFixture<'static> = UnitFixture {
    floor: "3階",
    rent: "8.5万円",
    fee: "5000円",
    deposit: "8.5万円",
    key_money: "-",
    plan: "1LDK",
    area: "25.5m<sup>2</sup>",
    href: "/chintai/jnc_000000000001/",
};

pub const UNIT_12F: UnitFixture<'static> = UnitFixture {
    floor: "12階",
    rent: "9.8万円",
    fee: "5,000円",
    deposit: "なし",
    key_money: "9.8万円",
    plan: "2SLDK",
    area: "40.12m<sup>2</sup>",
    href: "/chintai/jnc_000000000002/",
};

/// One `tbody` of a results table, cells in site order.
pub fn unit_html(u: &UnitFixture) -> String {
    format!(
        r#"<tbody><tr class="js-cassette_link">
            <td class="cassetteitem_other-checkbox"><input type="checkbox" value="1"></td>
            <td><div class="casssetteitem_other-thumbnail"></div></td>
            <td>{floor}</td>
            <td><ul><li><span class="cassetteitem_price--rent">{rent}</span></li><li><span>{fee}</span></li></ul></td>
            <td><ul><li>{deposit}</li><li>{key_money}</li></ul></td>
            <td><ul><li>{plan}</li><li>{area}</li></ul></td>
            <td></td>
            <td></td>
            <td><a class="js-cassette_link_href" href="{href}">詳細を見る</a></td>
        </tr></tbody>"#,
        floor = u.floor,
        rent = u.rent,
        fee = u.fee,
        deposit = u.deposit,
        key_money = u.key_money,
        plan = u.plan,
        area = u.area,
        href = u.href,
    )
}

pub struct BlockFixture<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub access: &'a [&'a str],
    pub age: &'a str,
    pub structure: &'a str,
    /// Attributes of the building photo `img`.
    pub img_attrs: &'a str,
    pub units: Vec<String>,
}

pub fn block_html(b: &BlockFixture) -> String {
    let access: String = b
        .access
        .iter()
        .map(|a| format!(r#"<div class="cassetteitem_detail-text">{a}</div>"#))
        .collect();
    format!(
        r#"<div class="cassetteitem">
          <div class="cassetteitem-detail">
            <div class="cassetteitem-detail-object">
              <div class="cassetteitem_object"><div class="cassetteitem_object-item"><img {img}></div></div>
            </div>
            <div class="cassetteitem-detail-body">
              <div class="cassetteitem_content">
                <div class="cassetteitem_content-label"><span>賃貸マンション</span></div>
                <div class="cassetteitem_content-title">{name}</div>
                <div class="cassetteitem_content-body">
                  <ul class="cassetteitem_detail">
                    <li class="cassetteitem_detail-col1">{address}</li>
                    <li class="cassetteitem_detail-col2">{access}</li>
                    <li class="cassetteitem_detail-col3"><div>{age}</div><div>{structure}</div></li>
                  </ul>
                </div>
              </div>
            </div>
          </div>
          <div class="cassetteitem-item">
            <table class="cassetteitem_other">
              <thead><tr><th></th><th></th><th>階</th><th>賃料/管理費</th><th>敷金/礼金</th><th>間取り/専有面積</th><th></th><th></th><th></th></tr></thead>
              {units}
            </table>
          </div>
        </div>"#,
        img = b.img_attrs,
        name = b.name,
        address = b.address,
        access = access,
        age = b.age,
        structure = b.structure,
        units = b.units.concat(),
    )
}

pub fn page_html(blocks: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>賃貸</title></head><body><div id="js-bukkenList">{}</div></body></html>"#,
        blocks.concat()
    )
}

/// Two units near two stations.
pub fn tower_block() -> String {
    block_html(&BlockFixture {
        name: "パークタワー渋谷",
        address: "東京都渋谷区神宮前1-1",
        access: &["JR山手線/渋谷駅 歩5分", "東京メトロ銀座線/表参道駅 歩8分"],
        age: "築15年",
        structure: "地上25階建",
        img_attrs: r#"rel="https://img01.suumo.com/front/gazo/tower.jpg" src="/edit/assets/blank.gif""#,
        units: vec![unit_html(&UNIT_3F), unit_html(&UNIT_12F)],
    })
}

pub fn raw_listing(name: &str, address: &str, access: &str, rent: &str, area: &str) -> RawListing {
    RawListing {
        name: name.to_string(),
        category: "賃貸マンション".to_string(),
        address: address.to_string(),
        access: access.to_string(),
        age: "築15年".to_string(),
        structure: "地上10階建".to_string(),
        image_url: String::new(),
        unit: RawUnitRow {
            floor: "3階".to_string(),
            rent: rent.to_string(),
            management_fee: "5000円".to_string(),
            deposit: "-".to_string(),
            key_money: "-".to_string(),
            floor_plan: "1K".to_string(),
            area: area.to_string(),
            detail_url: format!("https://suumo.jp/chintai/{name}/"),
        },
    }
}
