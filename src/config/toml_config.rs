use crate::config::ClientConfig;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, UpbitError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 設定檔格式：
///
/// ```toml
/// [upbit]
/// base_url = "https://api.upbit.com"
/// access_key = "${UPBIT_ACCESS_KEY}"
/// secret_key = "${UPBIT_SECRET_KEY}"
/// timeout_seconds = 10
///
/// [logging]
/// level = "debug"
/// json = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub upbit: ClientConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(UpbitError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| UpbitError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${UPBIT_ACCESS_KEY})；未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| UpbitError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        self.upbit.base_url()
    }

    fn access_key(&self) -> Option<&str> {
        self.upbit.access_key()
    }

    fn secret_key(&self) -> Option<&str> {
        self.upbit.secret_key()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.upbit.timeout_seconds()
    }

    fn user_agent(&self) -> Option<&str> {
        self.upbit.user_agent()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.upbit.validate()
    }
}
