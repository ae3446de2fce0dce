use super::{body_string, context, get, seeded_context, session_cookie_of};
use crate::db::sheets::replace_sheet;
use crate::domain::table::SheetTable;
use crate::errors::ServerError;
use crate::router::handle;

#[test]
fn empty_store_shows_banner() {
    let ctx = context();
    let resp = handle(get("/", None), &ctx).expect("Handler failed");

    assert_eq!(resp.status(), 200);
    assert!(!resp.headers().contains_key("Set-Cookie"));
    let body = body_string(resp);
    assert!(body.contains("error-banner"));
    assert!(body.contains("物件データがまだ保存されていません"));
}

#[test]
fn missing_columns_halt_rendering() {
    let ctx = context();
    let partial = SheetTable {
        header: vec!["名称".to_string(), "URL".to_string()],
        rows: vec![vec!["A".to_string(), "https://suumo.jp/a/".to_string()]],
    };
    ctx.db
        .with_conn(|conn| replace_sheet(conn, &ctx.sheet, &partial, 1))
        .unwrap();

    let body = body_string(handle(get("/", None), &ctx).expect("Handler failed"));
    assert!(body.contains("以下の必要な列がデータに存在しません"));
    assert!(body.contains("徒歩_分"));
    assert!(!body.contains("コンシェルジュサービス"));
}

#[test]
fn default_view_counts_matches_and_advises() {
    let ctx = seeded_context();
    let resp = handle(get("/", None), &ctx).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("コンシェルジュサービス"));
    assert!(body.contains("<strong>1</strong>"));
    // First district is preselected; 20 m2 for one adult.
    assert!(body.contains(r#"<option value="渋谷区" selected>"#));
    assert!(body.contains("106740 円"));
    assert!(body.contains("104167 円"));
    assert!(!body.contains("対象物件リスト:"));
}

#[test]
fn district_without_rate_shows_no_estimate() {
    let ctx = seeded_context();
    let body = body_string(
        handle(get("/?district=%E7%9B%AE%E9%BB%92%E5%8C%BA&adults=3", None), &ctx)
            .expect("Handler failed"),
    );
    // 目黒区 has a rate; 40 m2 for three adults.
    assert!(body.contains("147400 円"));
}

#[test]
fn compare_renders_chart_and_table() {
    let ctx = seeded_context();
    let uri = "/?form=1&var=rent&var=area&var=walk&compare=1";
    let body = body_string(handle(get(uri, None), &ctx).expect("Handler failed"));

    assert!(body.contains(r#"<figure class="chart">"#));
    assert!(body.contains("対象物件リスト:"));
    assert!(body.contains("パークタワー渋谷"));
    assert!(!body.contains("渋谷プレミア"));
    assert!(body.contains("https://suumo.jp/chintai/パークタワー渋谷/"));
}

#[test]
fn compare_with_one_variable_is_a_user_error() {
    let ctx = seeded_context();
    let resp = handle(get("/?form=1&var=rent&compare=1", None), &ctx).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("少なくとも2つの変数を選択してください。"));
    assert!(!body.contains(r#"<figure class="chart">"#));
}

fn post_favorite(return_to: &str) -> http::Request<astra::Body> {
    let form = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("url", "https://suumo.jp/chintai/パークタワー渋谷/")
        .append_pair("return_to", return_to)
        .finish();
    http::Request::builder()
        .method(http::Method::POST)
        .uri("/favorites")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(astra::Body::from(form.into_bytes()))
        .unwrap()
}

#[test]
fn known_session_is_not_reissued() {
    let ctx = seeded_context();
    let first = handle(post_favorite("/?form=1"), &ctx).expect("Handler failed");
    let cookie = session_cookie_of(&first);

    let second = handle(get("/", Some(&cookie)), &ctx).expect("Handler failed");
    assert!(!second.headers().contains_key("Set-Cookie"));
}

#[test]
fn bad_filter_is_rejected() {
    let ctx = seeded_context();
    let result = handle(get("/?rent_min=300000&rent_max=1000", None), &ctx);
    assert!(matches!(result, Err(ServerError::BadRequest(_))));
}

#[test]
fn oversized_household_is_rejected() {
    let ctx = seeded_context();
    for uri in ["/?adults=500000000", "/?adults=4294967295&children=1", "/?children=100"] {
        let result = handle(get(uri, None), &ctx);
        assert!(matches!(result, Err(ServerError::BadRequest(_))), "{uri}");
    }
    let largest = handle(get("/?adults=90&children=9", None), &ctx).expect("Handler failed");
    assert!(body_string(largest).contains("<strong>1000</strong> 平米"));
}

#[test]
fn runs_page_lists_history() {
    let ctx = context();
    let body = body_string(handle(get("/runs", None), &ctx).expect("Handler failed"));
    assert!(body.contains("取得履歴"));
    assert!(body.contains("まだ取得が実行されていません"));
}

#[test]
fn unknown_route_is_not_found() {
    let ctx = context();
    assert!(matches!(
        handle(get("/nope", None), &ctx),
        Err(ServerError::NotFound)
    ));
}

#[test]
fn stylesheet_is_served() {
    let ctx = context();
    let resp = handle(get("/static/main.css", None), &ctx).expect("Handler failed");
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "text/css; charset=utf-8"
    );
}
