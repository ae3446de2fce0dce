use crate::config::Config;
use crate::db::connection::{init_db, Database};
use crate::responses::error_to_response;
use crate::router::{handle, AppContext};
use crate::scraper::{run_scrape, HttpPageSource, ScrapeSettings, SuumoScraper};
use anyhow::{bail, Context, Result};
use astra::Server;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod domain;
mod errors;
mod query;
mod responses;
mod router;
mod scraper;
mod session;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,opti_home=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    // Fatal before any data access.
    let config = Config::from_env().context("configuration")?;

    let db = Database::new(config.db_path.clone());
    init_db(&db).context("database initialization failed")?;

    match std::env::args().nth(1).as_deref() {
        Some("scrape") => scrape(&config, &db),
        Some("serve") | None => serve(&config, db),
        Some(other) => bail!("unknown command {other:?}; expected `scrape` or `serve`"),
    }
}

fn scrape(config: &Config, db: &Database) -> Result<()> {
    let source = HttpPageSource::new()?;
    let scraper = SuumoScraper::new(
        source,
        ScrapeSettings {
            search_url_template: config.search_url_template.clone(),
            max_pages: config.max_pages,
            politeness_delay: config.politeness_delay,
        },
    );

    let report = run_scrape(db, &config.sheet, &scraper)?;
    info!(
        pages = report.pages_fetched,
        scraped = report.raw_listings,
        stored = report.listings.len(),
        sheet = %config.sheet,
        "listings saved to spreadsheet"
    );
    Ok(())
}

fn serve(config: &Config, db: Database) -> Result<()> {
    let ctx = AppContext {
        db,
        sheet: config.sheet.clone(),
    };

    info!(addr = %config.bind_addr, "starting server");
    let server = Server::bind(&config.bind_addr).max_workers(8);

    server
        .serve(move |req, _info| match handle(req, &ctx) {
            Ok(resp) => resp,
            Err(err) => {
                warn!(error = %err, "request failed");
                error_to_response(err)
            }
        })
        .context("server ended with error")?;

    info!("server shut down cleanly");
    Ok(())
}
