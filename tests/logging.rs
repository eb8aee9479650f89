use asset_catalog::config::LogConfig;
use asset_catalog::logging::init_logging;

// One subscriber per process, so both checks live in one test
#[test]
fn test_init_logging_writes_file_once() {
    let dir = std::env::temp_dir().join(format!("asset_catalog_logs_{}", uuid::Uuid::new_v4().simple()));
    let config = LogConfig {
        log_level: "debug".to_string(),
        log_dir: dir.to_string_lossy().into_owned(),
        log_file: "catalog.log".to_string(),
        use_json: true,
        rotation: "never".to_string(),
    };

    let guard = init_logging(&config).expect("first init should succeed");
    tracing::info!(asset = "WBTC", "logging initialised");
    drop(guard);

    let content = std::fs::read_to_string(dir.join("catalog.log")).unwrap();
    assert!(content.contains("logging initialised"));
    assert!(content.contains("\"asset\":\"WBTC\""));

    let second = init_logging(&config);
    assert!(second.is_err(), "a second global subscriber must be refused");

    let _ = std::fs::remove_dir_all(&dir);
}
