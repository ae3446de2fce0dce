use crate::db::connection::Database;
use crate::db::favorites::{load_favorites, save_favorite};
use crate::db::scrapes::get_recent_scrapes;
use crate::db::sessions::{create_session, find_session};
use crate::db::sheets::{read_sheet, SheetRef};
use crate::domain::browse::{BrowseError, ListingFilter, ListingTable};
use crate::domain::chart::ChartSpec;
use crate::domain::favorites::Favorites;
use crate::errors::ServerError;
use crate::query::{parse_pairs, safe_return_path, DashboardQuery};
use crate::responses::{css_response, html_response, redirect, xlsx_response, ResultResp};
use crate::session::token::generate_session_token;
use crate::session::token_from_cookie_header;
use crate::spreadsheets::sheet_to_xlsx;
use crate::templates::pages::{dashboard_error_page, dashboard_page, runs_page, DashboardVm};
use astra::Request;
use chrono::Utc;
use std::io::Read;
use tracing::{debug, info, warn};

const MAIN_CSS: &str = include_str!("../static/main.css");

/// Everything a request handler needs; cloned into the server closure.
#[derive(Clone, Debug)]
pub struct AppContext {
    pub db: Database,
    pub sheet: SheetRef,
}

pub fn handle(req: Request, ctx: &AppContext) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    debug!(%method, %path, "request");

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => dashboard(&req, ctx),
        ("POST", "/favorites") => add_favorite(req, ctx),
        ("GET", "/export") => export(ctx),
        ("GET", "/runs") => runs(ctx),
        ("GET", "/static/main.css") => css_response(MAIN_CSS),
        _ => Err(ServerError::NotFound),
    }
}

fn presented_token(req: &Request) -> Option<String> {
    req.headers()
        .get("Cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_cookie_header)
        .map(str::to_string)
}

/// Existing session for a presented token, if any. Never creates one.
fn find_browse_session(token: Option<&str>, db: &Database) -> Result<Option<i64>, ServerError> {
    match token {
        Some(token) => db.with_conn(|conn| find_session(conn, token)),
        None => Ok(None),
    }
}

struct BrowseSession {
    id: i64,
    /// Set when the session was created by this request.
    new_token: Option<String>,
}

/// Existing session, or a fresh one when the cookie is absent or unknown.
fn ensure_browse_session(token: Option<&str>, db: &Database) -> Result<BrowseSession, ServerError> {
    if let Some(id) = find_browse_session(token, db)? {
        return Ok(BrowseSession { id, new_token: None });
    }

    let token = generate_session_token();
    let id = db.with_conn(|conn| create_session(conn, &token, Utc::now().timestamp()))?;
    debug!(session_id = id, "browse session created");
    Ok(BrowseSession {
        id,
        new_token: Some(token),
    })
}

fn load_table(ctx: &AppContext) -> Result<Result<ListingTable, BrowseError>, ServerError> {
    let stored = ctx.db.with_conn(|conn| read_sheet(conn, &ctx.sheet))?;
    Ok(stored
        .ok_or(BrowseError::NoData)
        .and_then(|sheet| ListingTable::from_sheet(&sheet)))
}

fn dashboard(req: &Request, ctx: &AppContext) -> ResultResp {
    let raw_query = req.uri().query().unwrap_or("");
    let query = DashboardQuery::from_pairs(&parse_pairs(raw_query))?;

    let table = match load_table(ctx)? {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, sheet = %ctx.sheet, "dashboard halted");
            return html_response(dashboard_error_page(&e));
        }
    };
    let favorites = match find_browse_session(presented_token(req).as_deref(), &ctx.db)? {
        Some(id) => ctx.db.with_conn(|conn| load_favorites(conn, id))?,
        None => Favorites::default(),
    };

    let districts = table.districts();
    let selected_district = query
        .district
        .as_deref()
        .filter(|d| districts.contains(d))
        .or(districts.first().copied());

    let filter = ListingFilter {
        district: selected_district.map(str::to_string),
        rent: query.rent,
        walk: query.walk,
        age: query.age,
        area: query.area,
    };
    let matches = filter.apply(&table);
    let chart = query
        .compare
        .then(|| ChartSpec::from_selection(&query.variables));

    let return_to = if raw_query.is_empty() {
        "/".to_string()
    } else {
        format!("/?{raw_query}")
    };

    let vm = DashboardVm {
        query: &query,
        districts,
        selected_district,
        matches,
        chart,
        favorites: &favorites,
        favorite_rows: favorites.resolve(&table),
        return_to: &return_to,
    };
    html_response(dashboard_page(&vm))
}

fn add_favorite(req: Request, ctx: &AppContext) -> ResultResp {
    let token = presented_token(&req);

    let mut body = String::new();
    req.into_body()
        .reader()
        .read_to_string(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("unreadable form body: {e}")))?;
    let pairs = parse_pairs(&body);

    let field = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    let url = field("url")
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest("missing listing url".into()))?
        .to_string();
    let return_to = safe_return_path(field("return_to")).to_string();

    let table = load_table(ctx)?.map_err(|e| ServerError::BadRequest(e.to_string()))?;
    if table.find_by_url(&url).is_none() {
        return Err(ServerError::BadRequest(format!("listing {url:?} is not in the table")));
    }

    let session = ensure_browse_session(token.as_deref(), &ctx.db)?;
    ctx.db.with_conn(|conn| {
        let mut favorites = load_favorites(conn, session.id)?;
        if favorites.add(url.as_str()) {
            save_favorite(conn, session.id, &url, Utc::now().timestamp())?;
            info!(session_id = session.id, %url, "favorite added");
        }
        Ok(())
    })?;

    redirect(&return_to, session.new_token.as_deref())
}

fn export(ctx: &AppContext) -> ResultResp {
    let table = ctx
        .db
        .with_conn(|conn| read_sheet(conn, &ctx.sheet))?
        .ok_or(ServerError::NotFound)?;

    let buffer = sheet_to_xlsx(&table, &ctx.sheet.worksheet)?;
    info!(rows = table.rows.len(), sheet = %ctx.sheet, "xlsx exported");
    xlsx_response(buffer, &format!("{}.xlsx", ctx.sheet.spreadsheet))
}

fn runs(ctx: &AppContext) -> ResultResp {
    let runs = ctx.db.with_conn(|conn| get_recent_scrapes(conn))?;
    html_response(runs_page(&runs))
}
