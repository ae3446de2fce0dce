use super::{body_string, get, seeded_context, session_cookie_of};
use crate::db::favorites::load_favorites;
use crate::db::sessions::find_session;
use crate::db::sheets::replace_sheet;
use crate::domain::favorites::Favorites;
use crate::domain::listing::listings_to_sheet;
use crate::domain::normalize::normalize_listing;
use crate::errors::ServerError;
use crate::router::{handle, AppContext};
use crate::tests::utils::raw_listing;
use astra::Body;
use http::{Method, Request};

fn listing_url(name: &str) -> String {
    format!("https://suumo.jp/chintai/{name}/")
}

fn favorite_form(name: &str, return_to: Option<&str>) -> String {
    let mut form = url::form_urlencoded::Serializer::new(String::new());
    form.append_pair("url", &listing_url(name));
    if let Some(path) = return_to {
        form.append_pair("return_to", path);
    }
    form.finish()
}

fn post_favorite(form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/favorites")
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        builder = builder.header("Cookie", c);
    }
    builder.body(Body::from(form.as_bytes().to_vec())).unwrap()
}

fn stored_favorites(ctx: &AppContext, cookie: &str) -> Favorites {
    let token = cookie.split_once('=').unwrap().1.to_string();
    ctx.db
        .with_conn(|conn| {
            let id = find_session(conn, &token)?.ok_or(ServerError::NotFound)?;
            load_favorites(conn, id)
        })
        .unwrap()
}

fn session_count(ctx: &AppContext) -> i64 {
    ctx.db
        .with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM browse_sessions", [], |row| row.get(0))
                .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .unwrap()
}

#[test]
fn adding_a_favorite_redirects_back() {
    let ctx = seeded_context();
    let form = favorite_form("パークタワー渋谷", Some("/?form=1"));
    let resp = handle(post_favorite(&form, None), &ctx).expect("Handler failed");

    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("Location").unwrap(), "/?form=1");
    // First favorite creates the session.
    let cookie = session_cookie_of(&resp);
    assert!(cookie.starts_with("opti_session="));
    assert_eq!(session_count(&ctx), 1);
}

#[test]
fn browsing_alone_creates_no_session() {
    let ctx = seeded_context();
    for _ in 0..3 {
        let resp = handle(get("/", None), &ctx).expect("Handler failed");
        assert!(!resp.headers().contains_key("Set-Cookie"));
    }
    assert_eq!(session_count(&ctx), 0);
}

#[test]
fn favorites_show_on_the_dashboard() {
    let ctx = seeded_context();
    let landing = body_string(handle(get("/", None), &ctx).expect("Handler failed"));
    assert!(!landing.contains("お気に入りリスト:"));

    let first = handle(post_favorite(&favorite_form("パークタワー渋谷", None), None), &ctx)
        .expect("Handler failed");
    let cookie = session_cookie_of(&first);

    let again = handle(post_favorite(&favorite_form("メゾン目黒", None), Some(&cookie)), &ctx)
        .expect("Handler failed");
    assert!(!again.headers().contains_key("Set-Cookie"));
    assert_eq!(session_count(&ctx), 1);

    let body = body_string(handle(get("/", Some(&cookie)), &ctx).expect("Handler failed"));
    assert!(body.contains("お気に入りリスト:"));
    assert!(body.contains("パークタワー渋谷"));
    assert!(body.contains("メゾン目黒"));
    assert!(body.contains("fav-mark"));
}

#[test]
fn favorites_survive_a_rescrape() {
    let ctx = seeded_context();
    let first = handle(post_favorite(&favorite_form("パークタワー渋谷", None), None), &ctx)
        .expect("Handler failed");
    let cookie = session_cookie_of(&first);

    // The next scrape lists a new building first and moves the favorite down.
    let rescraped: Vec<_> = [
        raw_listing("代官山テラス", "東京都渋谷区代官山町1", "東急東横線/代官山駅 歩4分", "9万円", "24m2"),
        raw_listing("メゾン目黒", "東京都目黒区目黒1-2", "JR山手線/目黒駅 歩7分", "7万円", "22m2"),
        raw_listing("パークタワー渋谷", "東京都渋谷区神宮前1-1", "JR山手線/渋谷駅 歩5分", "8.5万円", "25.5m2"),
    ]
    .iter()
    .map(normalize_listing)
    .collect();
    ctx.db
        .with_conn(|conn| replace_sheet(conn, &ctx.sheet, &listings_to_sheet(&rescraped), 2))
        .unwrap();

    let body = body_string(handle(get("/", Some(&cookie)), &ctx).expect("Handler failed"));
    let favorites_section = body
        .split(r#"id="favorites""#)
        .nth(1)
        .expect("favorites section missing");
    let favorites_section = favorites_section.split("</section>").next().unwrap();
    assert!(favorites_section.contains("パークタワー渋谷"));
    assert!(!favorites_section.contains("代官山テラス"));
}

#[test]
fn delisted_favorite_is_dropped_from_view() {
    let ctx = seeded_context();
    let first = handle(post_favorite(&favorite_form("渋谷プレミア", None), None), &ctx)
        .expect("Handler failed");
    let cookie = session_cookie_of(&first);

    let rescraped: Vec<_> = [raw_listing(
        "代官山テラス",
        "東京都渋谷区代官山町1",
        "東急東横線/代官山駅 歩4分",
        "9万円",
        "24m2",
    )]
    .iter()
    .map(normalize_listing)
    .collect();
    ctx.db
        .with_conn(|conn| replace_sheet(conn, &ctx.sheet, &listings_to_sheet(&rescraped), 2))
        .unwrap();

    let body = body_string(handle(get("/", Some(&cookie)), &ctx).expect("Handler failed"));
    assert!(!body.contains("お気に入りリスト:"));
    assert!(!body.contains("渋谷プレミア"));
}

#[test]
fn repeated_favorite_is_stored_once() {
    let ctx = seeded_context();
    let first = handle(post_favorite(&favorite_form("メゾン目黒", None), None), &ctx)
        .expect("Handler failed");
    let cookie = session_cookie_of(&first);
    handle(post_favorite(&favorite_form("メゾン目黒", None), Some(&cookie)), &ctx)
        .expect("Handler failed");
    handle(post_favorite(&favorite_form("渋谷プレミア", None), Some(&cookie)), &ctx)
        .expect("Handler failed");

    let mut expected = Favorites::default();
    expected.add(listing_url("メゾン目黒"));
    expected.add(listing_url("渋谷プレミア"));
    assert_eq!(stored_favorites(&ctx, &cookie), expected);
}

#[test]
fn favorites_are_per_session() {
    let ctx = seeded_context();
    let first = handle(post_favorite(&favorite_form("パークタワー渋谷", None), None), &ctx)
        .expect("Handler failed");
    assert!(first.headers().contains_key("Set-Cookie"));

    // A different browser sees no favorites.
    let body = body_string(handle(get("/", None), &ctx).expect("Handler failed"));
    assert!(!body.contains("お気に入りリスト:"));
}

#[test]
fn offsite_return_path_is_ignored() {
    let ctx = seeded_context();
    let form = favorite_form("パークタワー渋谷", Some("//evil.example"));
    let resp = handle(post_favorite(&form, None), &ctx).expect("Handler failed");
    assert_eq!(resp.headers().get("Location").unwrap(), "/");
}

#[test]
fn unknown_listing_is_bad_request() {
    let ctx = seeded_context();
    let unknown = favorite_form("存在しない物件", None);
    for form in ["", "url=", "url=%20", unknown.as_str()] {
        let result = handle(post_favorite(form, None), &ctx);
        assert!(matches!(result, Err(ServerError::BadRequest(_))), "{form:?}");
    }
    assert_eq!(session_count(&ctx), 0);
}
