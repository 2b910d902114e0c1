#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::generator::{API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::pipeline::DEFAULT_CONCURRENT_CHECKS;
use crate::core::prompt::{DEFAULT_TARGET_COUNT, DEFAULT_TARGET_LANGUAGE};
use crate::core::reachability::DEFAULT_MAX_REDIRECTS;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::*;
use serde::Serialize;
use std::path::Path;
use toml_config::TomlConfig;

pub const DATA_DIR_ENV: &str = "LEARNING_TRACKER_DATA_DIR";

/// 合併預設值、TOML、環境變數與命令列後的設定
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub generator_model: String,
    pub generator_base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub generator_timeout_seconds: u64,
    pub check_timeout_seconds: u64,
    pub concurrent_checks: usize,
    pub max_redirects: usize,
    pub target_count: usize,
    pub target_language: String,
    pub ticket_store_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            generator_model: DEFAULT_MODEL.to_string(),
            generator_base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            generator_timeout_seconds: 60,
            check_timeout_seconds: 5,
            concurrent_checks: DEFAULT_CONCURRENT_CHECKS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            target_count: DEFAULT_TARGET_COUNT,
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            ticket_store_path: "./data".to_string(),
        }
    }
}

impl Settings {
    /// 預設值 -> TOML 檔 (可選) -> 環境變數
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut settings = Settings::default();

        if let Some(path) = config_path {
            tracing::debug!("Loading configuration from {}", path.display());
            TomlConfig::from_file(path)?.apply_to(&mut settings);
        }

        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// API key 只在啟動時讀取一次
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup(API_KEY_ENV).filter(|key| !key.trim().is_empty()) {
            self.api_key = Some(api_key);
        }
        if let Some(data_dir) = lookup(DATA_DIR_ENV).filter(|dir| !dir.trim().is_empty()) {
            self.ticket_store_path = data_dir;
        }
    }
}

impl ConfigProvider for Settings {
    fn generator_model(&self) -> &str {
        &self.generator_model
    }

    fn generator_base_url(&self) -> &str {
        &self.generator_base_url
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn generator_timeout_seconds(&self) -> u64 {
        self.generator_timeout_seconds
    }

    fn check_timeout_seconds(&self) -> u64 {
        self.check_timeout_seconds
    }

    fn concurrent_checks(&self) -> usize {
        self.concurrent_checks
    }

    fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    fn target_count(&self) -> usize {
        self.target_count
    }

    fn target_language(&self) -> &str {
        &self.target_language
    }

    fn ticket_store_path(&self) -> &str {
        &self.ticket_store_path
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("generator.model", &self.generator_model)?;
        validate_url("generator.base_url", &self.generator_base_url)?;
        validate_range("generator.timeout_seconds", self.generator_timeout_seconds, 1, 600)?;
        validate_range("validation.check_timeout_seconds", self.check_timeout_seconds, 1, 60)?;
        validate_positive_number("validation.concurrent_checks", self.concurrent_checks, 1)?;
        validate_range("validation.max_redirects", self.max_redirects, 0, 30)?;
        validate_range("prompt.target_count", self.target_count, 1, 20)?;
        validate_non_empty_string("prompt.language", &self.target_language)?;
        validate_path("storage.path", &self.ticket_store_path)?;
        Ok(())
    }
}
