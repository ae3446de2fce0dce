pub mod extract;
pub mod models;
mod runner;
mod scraper_error;

pub use runner::{run_scrape, HttpPageSource, PageSource, ScrapeReport, ScrapeSettings, SuumoScraper};
pub use scraper_error::ScraperError;
