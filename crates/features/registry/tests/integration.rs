use dhub_domain::config::CacheConfig;
use dhub_domain::document::{EnumDoc, FunctionBlockDoc, MappingDoc, ModelDocument};
use dhub_domain::{MappingKind, ModelId, ModelKind};
use dhub_registry::{FileModelRepository, ModelRepository, RegistryError, RepositoryRegistry};
use dhub_storage::Storage;
use std::sync::Arc;
use tempfile::TempDir;

fn id(s: &str) -> ModelId {
    s.parse().unwrap()
}

fn function_block(model_id: &str, extends: Option<&str>) -> ModelDocument {
    let extends = extends.map(id);
    ModelDocument::FunctionBlock(FunctionBlockDoc {
        id: id(model_id),
        display_name: None,
        description: None,
        references: extends.iter().cloned().collect(),
        extends,
        configuration: Vec::new(),
        status: Vec::new(),
        faults: Vec::new(),
        operations: Vec::new(),
    })
}

fn mapping(model_id: &str, platform: &str, target: &str) -> ModelDocument {
    ModelDocument::Mapping(MappingDoc {
        id: id(model_id),
        display_name: None,
        description: None,
        references: vec![id(target)],
        mapping_kind: MappingKind::FunctionBlock,
        target_platform: platform.into(),
        rules: Vec::new(),
    })
}

async fn repository(temp: &TempDir, namespaces: &[&str]) -> FileModelRepository {
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();
    FileModelRepository::new(
        "test",
        &storage,
        namespaces.iter().map(ToString::to_string).collect(),
        &CacheConfig::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn save_and_index_roundtrip() {
    let temp = TempDir::new().unwrap();
    let repo = repository(&temp, &["com.acme"]).await;

    repo.save_model(&function_block("com.acme.Lamp:1.0.0", None)).await.unwrap();

    let info = repo.model_info(&id("com.acme.Lamp:1.0.0")).await.unwrap();
    assert_eq!(info.kind, ModelKind::FunctionBlock);
    assert_eq!(info.file_name, "Lamp_1.0.0.fbmodel");
    assert!(repo.exists(&id("com.acme.Lamp:1.0.0")).await.unwrap());
    assert!(!repo.exists(&id("com.acme.Lamp:9.9.9")).await.unwrap());

    let raw = repo.raw_content(&id("com.acme.Lamp:1.0.0"), None).await.unwrap();
    assert_eq!(raw.kind, ModelKind::FunctionBlock);
    let document: ModelDocument = serde_json::from_slice(&raw.bytes).unwrap();
    assert_eq!(document.id(), &id("com.acme.Lamp:1.0.0"));
}

#[tokio::test]
async fn latest_tag_resolves_to_highest_version() {
    let temp = TempDir::new().unwrap();
    let repo = repository(&temp, &["com.acme"]).await;

    repo.save_model(&function_block("com.acme.Lamp:1.0.0", None)).await.unwrap();
    repo.save_model(&function_block("com.acme.Lamp:1.10.0", None)).await.unwrap();
    repo.save_model(&function_block("com.acme.Lamp:1.9.0", None)).await.unwrap();

    let resolved = repo.resolve_latest(&id("com.acme.Lamp:latest")).await.unwrap();
    assert_eq!(resolved, id("com.acme.Lamp:1.10.0"));

    // Concrete versions pass through untouched.
    let concrete = repo.resolve_latest(&id("com.acme.Lamp:1.0.0")).await.unwrap();
    assert_eq!(concrete, id("com.acme.Lamp:1.0.0"));

    let missing = repo.resolve_latest(&id("com.acme.Unknown:latest")).await;
    assert!(matches!(missing, Err(RegistryError::ModelNotFound { .. })));
}

#[tokio::test]
async fn platform_mappings_filter_by_platform_and_reference() {
    let temp = TempDir::new().unwrap();
    let repo = repository(&temp, &["com.acme"]).await;

    repo.save_model(&function_block("com.acme.Engine:1.0.0", None)).await.unwrap();
    repo.save_model(&mapping("com.acme.EngineLwm2m:1.0.0", "Lwm2m", "com.acme.Engine:1.0.0"))
        .await
        .unwrap();
    repo.save_model(&mapping("com.acme.EngineOther:1.0.0", "Aws", "com.acme.Engine:1.0.0"))
        .await
        .unwrap();
    repo.save_model(&mapping("com.acme.LampLwm2m:1.0.0", "Lwm2m", "com.acme.Lamp:1.0.0"))
        .await
        .unwrap();

    let mappings =
        repo.platform_mappings_for(&id("com.acme.Engine:1.0.0"), "Lwm2m").await.unwrap();
    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].id, id("com.acme.EngineLwm2m:1.0.0"));
    assert_eq!(mappings[0].target_platform.as_deref(), Some("Lwm2m"));
}

#[tokio::test]
async fn delete_invalidates_the_index() {
    let temp = TempDir::new().unwrap();
    let repo = repository(&temp, &["com.acme"]).await;

    repo.save_model(&function_block("com.acme.Lamp:1.0.0", None)).await.unwrap();
    assert_eq!(repo.list_models().await.unwrap().len(), 1);

    repo.delete_model(&id("com.acme.Lamp:1.0.0")).await.unwrap();
    assert!(repo.list_models().await.unwrap().is_empty());

    let err = repo.delete_model(&id("com.acme.Lamp:1.0.0")).await.unwrap_err();
    assert!(matches!(err, RegistryError::ModelNotFound { .. }));
}

#[tokio::test]
async fn corrupt_documents_fail_the_namespace_index() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();
    let ns = storage.namespace("com.acme").unwrap();
    ns.write("Broken_1.0.0.fbmodel", b"not json at all").await.unwrap();

    let repo = FileModelRepository::new(
        "test",
        &storage,
        vec!["com.acme".into()],
        &CacheConfig::default(),
    )
    .unwrap();

    let err = repo.list_models().await.unwrap_err();
    assert!(matches!(err, RegistryError::Parse { .. }));
}

#[tokio::test]
async fn non_model_files_are_ignored() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();
    let ns = storage.namespace("com.acme").unwrap();
    ns.write("README.txt", b"hello").await.unwrap();

    let repo = FileModelRepository::new(
        "test",
        &storage,
        vec!["com.acme".into()],
        &CacheConfig::default(),
    )
    .unwrap();

    assert!(repo.list_models().await.unwrap().is_empty());
}

#[tokio::test]
async fn registry_routes_namespaces_and_rejects_conflicts() {
    let temp_a = TempDir::new().unwrap();
    let temp_b = TempDir::new().unwrap();
    let repo_a = Arc::new(repository(&temp_a, &["com.acme"]).await);
    let repo_b = Arc::new(repository(&temp_b, &["org.iot"]).await);

    let mut registry = RepositoryRegistry::new();
    registry.register(repo_a.clone()).unwrap();
    registry.register(repo_b).unwrap();

    assert_eq!(registry.locate("com.acme").unwrap().name(), "test");
    assert_eq!(registry.namespaces(), ["com.acme", "org.iot"]);

    let err = registry.locate("net.unknown").unwrap_err();
    assert!(matches!(err, RegistryError::NamespaceNotFound { .. }));

    let err = registry.register(repo_a).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateNamespace { .. }));
}
