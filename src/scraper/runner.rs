// scraper/runner.rs
use crate::db::connection::Database;
use crate::db::scrapes::{end_scrape_run, start_scrape_run};
use crate::db::sheets::{replace_sheet, SheetRef};
use crate::domain::dedup::dedup_listings;
use crate::domain::listing::{listings_to_sheet, NormalizedListing};
use crate::domain::normalize::normalize_listing;
use crate::scraper::extract::extract_listings;
use crate::scraper::models::RawListing;
use crate::scraper::ScraperError;
use chrono::Utc;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{error, info, warn};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

/// Where results pages come from. The HTTP client in production, fixtures
/// in tests.
pub trait PageSource {
    fn fetch_page(&self, url: &str) -> Result<String, ScraperError>;
}

pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new() -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ScraperError::Network(format!("HTTP {status} for {url}")));
        }
        Ok(text)
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    /// Search URL with a `{}` placeholder for the page number.
    pub search_url_template: String,
    pub max_pages: u32,
    /// Flat sleep after each fetched page.
    pub politeness_delay: Duration,
}

#[derive(Debug)]
pub struct ScrapeReport {
    pub pages_fetched: usize,
    pub raw_listings: usize,
    pub listings: Vec<NormalizedListing>,
}

pub struct SuumoScraper<S: PageSource> {
    source: S,
    settings: ScrapeSettings,
}

impl<S: PageSource> SuumoScraper<S> {
    pub fn new(source: S, settings: ScrapeSettings) -> Self {
        Self { source, settings }
    }

    pub fn page_url(&self, page: u32) -> String {
        self.settings
            .search_url_template
            .replace("{}", &page.to_string())
    }

    /// Fetch pages 1..=max_pages and extract raw listings in page order.
    /// The first structural mismatch aborts the whole collection.
    pub fn collect_raw(&self) -> Result<(Vec<RawListing>, usize), ScraperError> {
        let mut all = Vec::new();
        let mut pages = 0;

        for page in 1..=self.settings.max_pages {
            let url = self.page_url(page);
            let html = self.source.fetch_page(&url)?;
            let listings = extract_listings(&html).map_err(|e| ScraperError::Page {
                page,
                source: Box::new(e),
            })?;
            info!(page, listings = listings.len(), "page parsed");

            all.extend(listings);
            pages += 1;

            if !self.settings.politeness_delay.is_zero() {
                std::thread::sleep(self.settings.politeness_delay);
            }
        }

        Ok((all, pages))
    }

    /// Extract, normalize and dedup. Nothing is written here.
    pub fn scrape(&self) -> Result<ScrapeReport, ScraperError> {
        let (raw, pages_fetched) = self.collect_raw()?;
        let raw_listings = raw.len();

        let listings = dedup_listings(raw.iter().map(normalize_listing).collect());
        if listings.len() < raw_listings {
            info!(
                dropped = raw_listings - listings.len(),
                "removed duplicate (name, floor, rent) rows"
            );
        }

        Ok(ScrapeReport {
            pages_fetched,
            raw_listings,
            listings,
        })
    }
}

/// One full run: scrape, then replace the worksheet. A failed scrape leaves
/// the stored table untouched. Every run is recorded in `scrape_runs`.
pub fn run_scrape<S: PageSource>(
    db: &Database,
    sheet: &SheetRef,
    scraper: &SuumoScraper<S>,
) -> Result<ScrapeReport, ScraperError> {
    let target = sheet.to_string();
    let run_id = db.with_conn(|conn| start_scrape_run(conn, &target, Utc::now().timestamp()))?;
    info!(run_id, sheet = %target, "scrape started");

    let result = scraper.scrape().and_then(|report| {
        let table = listings_to_sheet(&report.listings);
        if table.is_empty() {
            warn!(sheet = %target, "no listings scraped, worksheet will hold only the header");
        }
        let written = db.with_conn(|conn| replace_sheet(conn, sheet, &table, Utc::now().timestamp()))?;
        info!(rows = written, "worksheet replaced");
        Ok(report)
    });

    let now = Utc::now().timestamp();
    let logged = match &result {
        Ok(report) => db.with_conn(|conn| {
            end_scrape_run(
                conn,
                run_id,
                now,
                report.pages_fetched,
                report.listings.len(),
                true,
                None,
            )
        }),
        Err(e) => {
            error!(run_id, error = %e, "scrape failed");
            db.with_conn(|conn| end_scrape_run(conn, run_id, now, 0, 0, false, Some(e.to_string())))
        }
    };
    if let Err(e) = logged {
        warn!(run_id, error = %e, "could not record scrape run");
    }

    result
}
