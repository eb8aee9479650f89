//! Exchange symbol module

pub mod models;
pub mod repository;

pub use models::ExchangeSymbol;
pub use repository::ExchangeSymbolRepository;
