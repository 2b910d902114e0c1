use anyhow::Result;
use learning_tracker::config::toml_config::TomlConfig;
use learning_tracker::utils::validation::Validate;
use learning_tracker::{Settings, TrackerError};
use tempfile::TempDir;

#[test]
fn test_load_settings_from_toml_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("tracker.toml");
    std::fs::write(
        &config_path,
        r#"
[generator]
model = "gemini-2.5-pro"
base_url = "http://127.0.0.1:9000"
timeout_seconds = 30

[validation]
check_timeout_seconds = 3
concurrent_checks = 10
max_redirects = 5

[prompt]
target_count = 3
language = "English"

[storage]
path = "/var/lib/learning-tracker"
"#,
    )?;

    let settings = Settings::load(Some(config_path.as_path()))?;

    assert_eq!(settings.generator_model, "gemini-2.5-pro");
    assert_eq!(settings.generator_base_url, "http://127.0.0.1:9000");
    assert_eq!(settings.generator_timeout_seconds, 30);
    assert_eq!(settings.check_timeout_seconds, 3);
    assert_eq!(settings.concurrent_checks, 10);
    assert_eq!(settings.max_redirects, 5);
    assert_eq!(settings.target_count, 3);
    assert_eq!(settings.target_language, "English");
    assert!(settings.validate().is_ok());
    Ok(())
}

#[test]
fn test_missing_config_file_is_io_error() {
    let result = Settings::load(Some(std::path::Path::new("/nonexistent/tracker.toml")));

    assert!(matches!(result, Err(TrackerError::IoError(_))));
}

#[test]
fn test_out_of_range_values_fail_validation() -> Result<()> {
    let config = TomlConfig::from_toml_str(
        r#"
[validation]
check_timeout_seconds = 120
"#,
    )?;
    let mut settings = Settings::default();
    config.apply_to(&mut settings);

    match settings.validate() {
        Err(TrackerError::InvalidConfigValueError { field, .. }) => {
            assert_eq!(field, "validation.check_timeout_seconds");
        }
        other => panic!("unexpected validation result: {:?}", other),
    }
    Ok(())
}
