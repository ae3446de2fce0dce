pub mod connection;
pub mod favorites;
pub mod scrapes;
pub mod sessions;
pub mod sheets;
