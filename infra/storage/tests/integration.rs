use dhub_storage::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_path_traversal_blocked() {
    let temp = TempDir::new().unwrap();

    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    assert!(storage.resolve("../etc/passwd").is_err());
    assert!(storage.resolve("foo/../../bar").is_err());
}

#[tokio::test]
async fn test_write_read_roundtrip_uncompressed() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    let payload = b"{ \"kind\": \"Entity\" }";
    storage.write("index.meta", payload).await.unwrap();
    assert!(storage.exists("index.meta").unwrap());

    let data = storage.read("index.meta").await.unwrap();
    assert_eq!(data, payload);
}

#[tokio::test]
async fn test_write_read_roundtrip_compressed() {
    let temp = TempDir::new().unwrap();
    let storage =
        Storage::builder().root(temp.path()).compression(Compression::Lz4).connect().await.unwrap();

    let payload = vec![b'x'; 4096];
    storage.write("bulk/data.entity", &payload).await.unwrap();

    let data = storage.read("bulk/data.entity").await.unwrap();
    assert_eq!(data, payload);
}

#[tokio::test]
async fn test_namespace_isolation() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    let ns_a = storage.namespace("com.acme.lighting").unwrap();
    let ns_b = storage.namespace("org.iot.sensors").unwrap();

    ns_a.write("Lamp_1.0.0.fbmodel", b"a").await.unwrap();
    ns_b.write("Lamp_1.0.0.fbmodel", b"b").await.unwrap();

    let a_path = ns_a.resolve("Lamp_1.0.0.fbmodel").unwrap();
    let b_path = ns_b.resolve("Lamp_1.0.0.fbmodel").unwrap();
    assert_ne!(a_path, b_path, "paths must differ across namespaces");

    assert_eq!(ns_a.read("Lamp_1.0.0.fbmodel").await.unwrap(), b"a");
    assert_eq!(ns_b.read("Lamp_1.0.0.fbmodel").await.unwrap(), b"b");
}

#[tokio::test]
async fn test_invalid_namespace_names_rejected() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    assert!(storage.namespace("").is_err());
    assert!(storage.namespace("com..acme").is_err());
    assert!(storage.namespace("com/acme").is_err());
}

#[tokio::test]
async fn test_namespace_listing_is_sorted_and_flat() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    let ns = storage.namespace("com.acme").unwrap();
    ns.write("Sensor_2.0.0.fbmodel", b"s").await.unwrap();
    ns.write("Lamp_1.0.0.fbmodel", b"l").await.unwrap();

    let listing = ns.list().await.unwrap();
    let names: Vec<&str> = listing.iter().map(|e| e.file_name.as_str()).collect();
    assert_eq!(names, ["Lamp_1.0.0.fbmodel", "Sensor_2.0.0.fbmodel"]);
    assert!(listing.iter().all(|e| e.modified.is_some()));
}

#[tokio::test]
async fn test_listing_unknown_namespace_is_empty() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    let ns = storage.namespace("com.nothing.here").unwrap();
    assert!(ns.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_and_exists() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    let ns = storage.namespace("com.acme").unwrap();
    ns.write("Lamp_1.0.0.fbmodel", b"x").await.unwrap();
    assert!(ns.exists("Lamp_1.0.0.fbmodel").unwrap());

    ns.delete("Lamp_1.0.0.fbmodel").await.unwrap();
    assert!(!ns.exists("Lamp_1.0.0.fbmodel").unwrap());
}

#[tokio::test]
async fn test_read_missing_returns_file_not_found() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    let err = storage.read("missing.entity").await.expect_err("expected error");
    match err {
        StorageError::FileNotFound { .. } => {},
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_overwrite_replaces_content() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    let ns = storage.namespace("com.acme").unwrap();
    ns.write("Lamp_1.0.0.fbmodel", b"v1").await.unwrap();
    ns.write("Lamp_1.0.0.fbmodel", b"v2").await.unwrap();

    assert_eq!(ns.read("Lamp_1.0.0.fbmodel").await.unwrap(), b"v2");
    assert_eq!(ns.list().await.unwrap().len(), 1);
}
