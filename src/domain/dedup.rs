use crate::domain::listing::NormalizedListing;
use std::collections::HashSet;

/// Drop rows repeating an earlier (name, floor text, rent text); first wins.
pub fn dedup_listings(listings: Vec<NormalizedListing>) -> Vec<NormalizedListing> {
    let mut seen = HashSet::new();
    listings
        .into_iter()
        .filter(|l| seen.insert((l.name.clone(), l.floor_text.clone(), l.rent_text.clone())))
        .collect()
}
