pub mod aggregator;
pub mod deriver;
pub mod error;
