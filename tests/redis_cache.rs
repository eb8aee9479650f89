mod common;

use asset_catalog::exchange_info::pair::CacheWrite;
use asset_catalog::{Asset, ExchangePair, Pair};
use common::{cached_catalog, test_asset, unique};

#[tokio::test]
#[ignore] // Requires PostgreSQL and Redis running
async fn test_ping() {
    let catalog = cached_catalog().await;
    catalog.cache().unwrap().ping().await.unwrap();
    catalog.health_check().await.unwrap();
}

#[tokio::test]
#[ignore] // Requires PostgreSQL and Redis running
async fn test_asset_cache_round_trip() {
    let catalog = cached_catalog().await;
    let cache = catalog.cache().unwrap();
    let asset = test_asset("CACHED", 0);
    let asset_id = catalog.assets().create_asset(&asset).await.unwrap();

    let before = cache.count_cache().await.unwrap();
    cache.set_asset_cache(&asset).await.unwrap();

    assert_eq!(cache.get_asset_cache(asset_id).await.unwrap(), asset);
    assert!(cache.count_cache().await.unwrap() > before);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL and Redis running
async fn test_cache_miss_is_distinguished() {
    let catalog = cached_catalog().await;
    let cache = catalog.cache().unwrap();

    let err = cache.get_asset_cache(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(err.is_cache_miss());

    let err = cache
        .get_exchange_pair_cache(&unique("exchange"), "NONE")
        .await
        .unwrap_err();
    assert!(err.is_cache_miss());
}

#[tokio::test]
#[ignore] // Requires PostgreSQL and Redis running
async fn test_caching_unknown_asset_is_not_found() {
    let catalog = cached_catalog().await;
    let err = catalog
        .cache()
        .unwrap()
        .set_asset_cache(&test_asset("GHOST", 18))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore] // Requires PostgreSQL and Redis running
async fn test_set_exchange_pair_writes_through() {
    let catalog = cached_catalog().await;
    let exchange = unique("exchange");
    let base = test_asset("ETH", 18);
    let quote = test_asset("USDT", 6);
    catalog.assets().create_asset(&base).await.unwrap();
    catalog.assets().create_asset(&quote).await.unwrap();

    let pair = ExchangePair {
        symbol: "ETH".to_string(),
        foreign_name: "ETH-USDT".to_string(),
        exchange: exchange.clone(),
        verified: false,
        underlying_pair: Pair {
            quote_token: quote.clone(),
            base_token: base.clone(),
        },
    };

    let linkage = catalog
        .exchange_pairs()
        .set_exchange_pair(&exchange, &pair, true)
        .await
        .unwrap();
    assert!(linkage.is_complete());
    assert_eq!(linkage.cache, CacheWrite::Written);

    let cached = catalog
        .cache()
        .unwrap()
        .get_exchange_pair_cache(&exchange, "ETH-USDT")
        .await
        .unwrap();
    assert_eq!(cached, pair);

    let stored = catalog
        .exchange_pairs()
        .get_exchange_pair(&exchange, "ETH-USDT")
        .await
        .unwrap();
    assert_eq!(stored.underlying_pair.base_token, base);
    assert_eq!(stored.underlying_pair.quote_token, quote);
}

#[tokio::test]
#[ignore] // Requires PostgreSQL and Redis running
async fn test_unlinked_pair_sides_are_zero_assets() {
    let catalog = cached_catalog().await;
    let exchange = unique("exchange");
    let pair = ExchangePair {
        symbol: "ABC".to_string(),
        foreign_name: "ABC-XYZ".to_string(),
        exchange: exchange.clone(),
        ..Default::default()
    };

    let linkage = catalog
        .exchange_pairs()
        .set_exchange_pair(&exchange, &pair, true)
        .await
        .unwrap();
    assert!(!linkage.is_fully_linked());
    assert_eq!(linkage.cache, CacheWrite::Written);

    let stored = catalog
        .exchange_pairs()
        .get_exchange_pair(&exchange, "ABC-XYZ")
        .await
        .unwrap();
    assert_eq!(stored.underlying_pair.base_token, Asset::default());
    assert_eq!(stored.underlying_pair.quote_token, Asset::default());
}
