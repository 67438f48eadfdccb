use goto_anything::GotoConfig;
use goto_anything::GotoError;
use pretty_assertions::assert_eq;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn loads_partial_config_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("goto.toml");
    std::fs::write(
        &path,
        "batch_size = 25\n\n[project]\nextensions = [\"ink\", \"txt\"]\n",
    )
    .unwrap();

    let config = GotoConfig::load(&path).unwrap();
    assert_eq!(config.batch_size, 25);
    assert_eq!(config.max_results, 1000);
    assert_eq!(config.tick_period(), Duration::from_millis(35));
    assert_eq!(config.project.extensions, vec!["ink", "txt"]);
}

#[test]
fn zero_batch_size_is_rejected() {
    let err = GotoConfig::from_toml_str("batch_size = 0").unwrap_err();
    assert!(matches!(err, GotoError::InvalidConfig(_)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = GotoConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, GotoError::Io(_)));
}
