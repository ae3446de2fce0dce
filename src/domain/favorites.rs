use crate::domain::browse::{BrowsableListing, ListingTable};

/// Favorite listings of one browsing session, by detail URL, in the order
/// added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    urls: Vec<String>,
}

impl Favorites {
    /// Returns false if the listing was already a favorite.
    pub fn add(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.contains(&url) {
            return false;
        }
        self.urls.push(url);
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    /// Favorites still listed in `table`; listings gone since the last
    /// scrape are skipped.
    pub fn resolve<'a>(&self, table: &'a ListingTable) -> Vec<&'a BrowsableListing> {
        self.urls
            .iter()
            .filter_map(|url| table.find_by_url(url))
            .collect()
    }
}
