use crate::config::Settings;
use crate::utils::error::{Result, TrackerError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub generator: Option<GeneratorSection>,
    pub validation: Option<ValidationSection>,
    pub prompt: Option<PromptSection>,
    pub storage: Option<StorageSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorSection {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSection {
    pub check_timeout_seconds: Option<u64>,
    pub concurrent_checks: Option<usize>,
    pub max_redirects: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptSection {
    pub target_count: Option<usize>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSection {
    pub path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrackerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content, |name| std::env::var(name).ok())?;

        toml::from_str(&processed_content).map_err(|e| TrackerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})；找不到的變數保留原字串
    pub fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrackerError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 只覆寫檔案中有設定的欄位
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(generator) = &self.generator {
            if let Some(model) = &generator.model {
                settings.generator_model = model.clone();
            }
            if let Some(base_url) = &generator.base_url {
                settings.generator_base_url = base_url.clone();
            }
            if let Some(api_key) = &generator.api_key {
                if api_key.starts_with("${") || api_key.trim().is_empty() {
                    tracing::warn!("generator.api_key is not resolved; ignoring it");
                } else {
                    settings.api_key = Some(api_key.clone());
                }
            }
            if let Some(timeout) = generator.timeout_seconds {
                settings.generator_timeout_seconds = timeout;
            }
        }

        if let Some(validation) = &self.validation {
            if let Some(timeout) = validation.check_timeout_seconds {
                settings.check_timeout_seconds = timeout;
            }
            if let Some(concurrent) = validation.concurrent_checks {
                settings.concurrent_checks = concurrent;
            }
            if let Some(max_redirects) = validation.max_redirects {
                settings.max_redirects = max_redirects;
            }
        }

        if let Some(prompt) = &self.prompt {
            if let Some(count) = prompt.target_count {
                settings.target_count = count;
            }
            if let Some(language) = &prompt.language {
                settings.target_language = language.clone();
            }
        }

        if let Some(path) = self.storage.as_ref().and_then(|s| s.path.as_ref()) {
            settings.ticket_store_path = path.clone();
        }
    }
}
