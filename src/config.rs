use crate::db::sheets::SheetRef;
use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SPREADSHEET: &str = "summo スクレイピング";
pub const DEFAULT_WORKSHEET: &str = "Sheet1";

/// Search results for five Tokyo wards; `{}` is replaced by the page number.
pub const DEFAULT_SEARCH_URL: &str = "https://suumo.jp/jj/chintai/ichiran/FR301FC001/?ar=030&bs=040&ta=13&sc=13104&sc=13113&sc=13109&sc=13110&sc=13112&cb=0.0&ct=9999999&et=9999999&cn=9999999&mb=0&mt=9999999&shkr1=03&shkr2=03&shkr3=03&shkr4=03&fw2=&page={}";

pub const DEFAULT_MAX_PAGES: u32 = 5;
pub const DEFAULT_POLITENESS_DELAY_SECS: u64 = 3;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file backing the spreadsheet store.
    pub db_path: String,
    pub sheet: SheetRef,
    pub search_url_template: String,
    pub max_pages: u32,
    /// Flat sleep after every fetched results page.
    pub politeness_delay: Duration,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("OPTIHOME_DB_PATH")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("OPTIHOME_DB_PATH"))?;

        let search_url_template =
            lookup("OPTIHOME_SEARCH_URL").unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string());
        if !search_url_template.contains("{}") {
            return Err(ConfigError::Invalid {
                key: "OPTIHOME_SEARCH_URL",
                value: search_url_template,
                reason: "template needs a {} page placeholder".into(),
            });
        }

        Ok(Self {
            db_path,
            sheet: SheetRef::new(
                lookup("OPTIHOME_SPREADSHEET").unwrap_or_else(|| DEFAULT_SPREADSHEET.to_string()),
                lookup("OPTIHOME_WORKSHEET").unwrap_or_else(|| DEFAULT_WORKSHEET.to_string()),
            ),
            search_url_template,
            max_pages: parse_or(&lookup, "OPTIHOME_MAX_PAGES", DEFAULT_MAX_PAGES)?,
            politeness_delay: Duration::from_secs(parse_or(
                &lookup,
                "OPTIHOME_POLITENESS_DELAY_SECS",
                DEFAULT_POLITENESS_DELAY_SECS,
            )?),
            bind_addr: parse_or(
                &lookup,
                "OPTIHOME_BIND",
                SocketAddr::from(([127, 0, 0, 1], 3000)),
            )?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
