//! Loading dungeon.toml

use std::fs;

use dsl_runtime::{ConfigError, EngineConfig};
use tempfile::TempDir;

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dungeon.toml");
    fs::write(
        &path,
        r#"
callback_depth_limit = 16
deferred_components = ["ai_component", "camera_component"]
"#,
    )
    .unwrap();

    let config = EngineConfig::load(&path).unwrap();
    assert_eq!(config.callback_depth_limit, 16);
    assert!(config.is_deferred("camera_component"));
    assert_eq!(config.entity_context_name, "entity");
}

#[test]
fn test_empty_file_is_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dungeon.toml");
    fs::write(&path, "").unwrap();

    assert_eq!(EngineConfig::load(&path).unwrap(), EngineConfig::default());
}

#[test]
fn test_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = EngineConfig::load(&temp_dir.path().join("dungeon.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::IoError(_)));
}

#[test]
fn test_invalid_context_name() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dungeon.toml");
    fs::write(&path, "entity_context_name = \"\"\n").unwrap();

    let err = EngineConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)));
    assert!(err.to_string().contains("entity_context_name"));
}
