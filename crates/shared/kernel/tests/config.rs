use cdmi_kernel::config::{ConfigError, environment, load_config, load_config_with};
use cdmi_kernel::domain::config::CdmiConfig;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

#[test]
#[serial]
fn loads_storage_section_from_toml() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("cdmi.toml");
    fs::write(
        &file,
        "[storage]\nbase_directory = \"/srv/cdmi\"\nstrict_paths = true\n\n[logging]\nlevel = \"debug\"\n",
    )?;

    let cfg: CdmiConfig = load_config(Some(&file))?;
    assert_eq!(cfg.storage.base_directory, std::path::PathBuf::from("/srv/cdmi"));
    assert!(cfg.storage.strict_paths);
    assert!(cfg.storage.create);
    assert_eq!(cfg.logging.level, "debug");
    Ok(())
}

#[test]
#[serial]
fn explicit_missing_file_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("absent.toml");

    let result = load_config::<CdmiConfig>(Some(&missing));
    assert!(matches!(result, Err(ConfigError::Config { context: Some(_), .. })));
}

#[test]
#[serial]
fn malformed_values_fail_to_deserialize() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("broken.toml");
    fs::write(&file, "[storage]\nstrict_paths = \"sometimes\"\n")?;

    let err = load_config::<CdmiConfig>(Some(&file)).expect_err("should not deserialize");
    assert!(err.to_string().contains("Failed to deserialize config"));
    Ok(())
}

fn env_vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

#[test]
#[serial]
fn environment_overrides_typed_fields() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("cdmi.toml");
    fs::write(&file, "[storage]\nbase_directory = \"/srv/cdmi\"\n")?;

    let vars = env_vars(&[
        ("CDMI__STORAGE__STRICT_PATHS", "true"),
        ("CDMI__STORAGE__CREATE", "false"),
        ("CDMI__LOGGING__JSON", "true"),
        ("CDMI__LOGGING__LEVEL", "warn"),
    ]);
    let cfg: CdmiConfig = load_config_with(Some(&file), environment().source(Some(vars)))?;

    assert!(cfg.storage.strict_paths);
    assert!(!cfg.storage.create);
    assert!(cfg.logging.json);
    assert!(cfg.logging.console, "untouched fields keep their defaults");
    assert_eq!(cfg.logging.level, "warn");
    assert_eq!(cfg.storage.base_directory, std::path::PathBuf::from("/srv/cdmi"));
    Ok(())
}

#[test]
#[serial]
fn environment_overrides_win_over_the_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = dir.path().join("cdmi.toml");
    fs::write(&file, "[storage]\nbase_directory = \"/srv/cdmi\"\nstrict_paths = false\n")?;

    let vars = env_vars(&[
        ("CDMI__STORAGE__BASE_DIRECTORY", "/var/lib/cdmi"),
        ("CDMI__STORAGE__STRICT_PATHS", "true"),
    ]);
    let cfg: CdmiConfig = load_config_with(Some(&file), environment().source(Some(vars)))?;

    assert_eq!(cfg.storage.base_directory, std::path::PathBuf::from("/var/lib/cdmi"));
    assert!(cfg.storage.strict_paths);
    Ok(())
}
