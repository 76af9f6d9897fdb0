use dhub::DeviceHub;
use dhub::domain::config::RepositoryConfig;
use dhub::domain::document::{FunctionBlockDoc, ModelDocument};
use dhub::domain::{HubConfig, ModelId};
use dhub::kernel::context::RequestContext;
use dhub::registry::ModelRepository;
use dhub::runtime::get_global_runtime;
use tempfile::TempDir;

fn lamp() -> ModelDocument {
    ModelDocument::FunctionBlock(FunctionBlockDoc {
        id: "com.acme.Lamp:1.0.0".parse().unwrap(),
        display_name: Some("Lamp".into()),
        description: None,
        references: Vec::new(),
        extends: None,
        configuration: Vec::new(),
        status: Vec::new(),
        faults: Vec::new(),
        operations: Vec::new(),
    })
}

#[test]
fn connect_save_and_assemble_through_the_facade() {
    let temp = TempDir::new().unwrap();

    let mut config = HubConfig::default();
    config.storage.data_dir = temp.path().to_path_buf();
    config
        .repositories
        .push(RepositoryConfig { name: "public".into(), namespaces: vec!["com.acme".into()] });

    let runtime = get_global_runtime();
    let hub = runtime.block_on(DeviceHub::connect(config)).expect("hub should connect");

    let repository = hub.registry().locate("com.acme").unwrap();
    runtime
        .block_on(repository.save_model(&lamp()))
        .expect("model should save");

    let ctx = RequestContext::new("acme");
    let root: ModelId = "com.acme.Lamp:1.0.0".parse().unwrap();
    let bundle = hub
        .assemble_model_content_blocking(&ctx, &root, None)
        .expect("assembly should succeed");

    assert_eq!(bundle.root(), &root);
    assert_eq!(bundle.len(), 1);
}
