mod dashboard_tests;
mod export_tests;
mod favorites_tests;

use crate::db::sheets::{replace_sheet, SheetRef};
use crate::domain::listing::listings_to_sheet;
use crate::domain::normalize::normalize_listing;
use crate::router::AppContext;
use crate::tests::utils::{init_test_db, raw_listing};
use astra::{Body, Response};
use std::io::Read;

pub fn context() -> AppContext {
    AppContext {
        db: init_test_db(),
        sheet: SheetRef::new("test book", "Sheet1"),
    }
}

/// Three buildings; only the first passes the default filters.
pub fn seeded_context() -> AppContext {
    let ctx = context();
    let listings: Vec<_> = [
        raw_listing("パークタワー渋谷", "東京都渋谷区神宮前1-1", "JR山手線/渋谷駅 歩5分", "8.5万円", "25.5m2"),
        raw_listing("渋谷プレミア", "東京都渋谷区松濤1", "京王井の頭線/神泉駅 歩3分", "20万円", "60m2"),
        raw_listing("メゾン目黒", "東京都目黒区目黒1-2", "JR山手線/目黒駅 歩7分", "7万円", "22m2"),
    ]
    .iter()
    .map(normalize_listing)
    .collect();

    ctx.db
        .with_conn(|conn| replace_sheet(conn, &ctx.sheet, &listings_to_sheet(&listings), 1))
        .expect("seeding failed");
    ctx
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn get(uri: &str, cookie: Option<&str>) -> http::Request<Body> {
    let mut builder = http::Request::builder().method(http::Method::GET).uri(uri);
    if let Some(c) = cookie {
        builder = builder.header("Cookie", c);
    }
    builder.body(Body::empty()).unwrap()
}

/// `name=value` of the session cookie set by a response.
pub fn session_cookie_of(resp: &Response) -> String {
    let set_cookie = resp
        .headers()
        .get("Set-Cookie")
        .expect("no session cookie set")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}
