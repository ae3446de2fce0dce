pub mod browse;
pub mod chart;
pub mod dedup;
pub mod favorites;
pub mod listing;
pub mod normalize;
pub mod table;
