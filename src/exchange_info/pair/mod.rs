//! Exchange pair module

pub mod models;
pub mod repository;

pub use models::{CacheWrite, ExchangePair, LinkOutcome, Pair, PairLinkage};
pub use repository::ExchangePairRepository;
