//! Asset module

pub mod memo;
pub mod models;
pub mod repository;

pub use memo::AssetMemo;
pub use models::{Asset, AssetClass, AssetFilter, AssetKey, AssetPage, FIAT_BLOCKCHAIN};
pub use repository::AssetRepository;
