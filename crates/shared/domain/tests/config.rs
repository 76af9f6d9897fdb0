use dhub_domain::config::{CacheConfig, HubConfig, ResolverConfig, StorageConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let storage = StorageConfig::default();
    assert_eq!(storage.data_dir, std::path::PathBuf::from("data"));
    assert!(!storage.compression);

    let cache = CacheConfig::default();
    assert_eq!(cache.ttl_seconds, 60);
    assert_eq!(cache.capacity, 1_000);

    let resolver = ResolverConfig::default();
    assert_eq!(resolver.max_models, 10_000);
}

#[test]
fn hub_config_deserializes() {
    let raw = json!({
        "storage": { "data_dir": "/tmp/models", "compression": true },
        "repositories": [
            { "name": "public", "namespaces": ["com.acme", "org.iot"] }
        ],
        "cache": { "ttl_seconds": 5, "capacity": 64 }
    });

    let cfg: HubConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.storage.data_dir, std::path::PathBuf::from("/tmp/models"));
    assert!(cfg.storage.compression);
    assert_eq!(cfg.repositories.len(), 1);
    assert_eq!(cfg.repositories[0].namespaces, ["com.acme", "org.iot"]);
    assert_eq!(cfg.cache.ttl_seconds, 5);
}
