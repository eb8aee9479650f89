//! Table names and cache key namespaces

pub const ASSET_TABLE: &str = "asset";
pub const EXCHANGE_SYMBOL_TABLE: &str = "exchangesymbol";
pub const EXCHANGE_PAIR_TABLE: &str = "exchangepair";
pub const BLOCKCHAIN_TABLE: &str = "blockchain";
pub const ASSET_VOLUME_TABLE: &str = "assetvolume";

/// Redis key prefix for assets, followed by the asset_id
pub const KEY_ASSET_CACHE: &str = "asset:";
/// Redis key prefix for exchange pairs, followed by `<exchange>_<foreignname>`
pub const KEY_EXCHANGE_PAIR_CACHE: &str = "exchangepair:";

/// Prefix of the printable `get_asset` memo keys
pub const MEMO_GET_ASSET_PREFIX: &str = "GetAsset_";

/// Time-series super table holding filter values per asset
pub const FILTERS_TABLE: &str = "filters";
/// Filter series used to discover assets with recent volume
pub const VOLUME_FILTER: &str = "VOL120";
