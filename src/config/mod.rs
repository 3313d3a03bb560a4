#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, UpbitError};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://api.upbit.com";

pub const ENV_BASE_URL: &str = "UPBIT_BASE_URL";
pub const ENV_ACCESS_KEY: &str = "UPBIT_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "UPBIT_SECRET_KEY";
pub const ENV_TIMEOUT_SECONDS: &str = "UPBIT_TIMEOUT_SECONDS";

#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_key: None,
            secret_key: None,
            timeout_seconds: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// 從環境變數載入；空字串視為未設定
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let timeout_seconds = match get(ENV_TIMEOUT_SECONDS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                UpbitError::InvalidConfigValueError {
                    field: ENV_TIMEOUT_SECONDS.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            base_url: get(ENV_BASE_URL).unwrap_or_else(default_base_url),
            access_key: get(ENV_ACCESS_KEY),
            secret_key: get(ENV_SECRET_KEY),
            timeout_seconds,
            user_agent: None,
        })
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;

        for (field, value) in [
            ("access_key", &self.access_key),
            ("secret_key", &self.secret_key),
        ] {
            if let Some(value) = value {
                validate_non_empty_string(field, value)?;
                // TOML 中未解析的 ${VAR}
                if value.starts_with("${") && value.ends_with('}') {
                    return Err(UpbitError::MissingConfigError {
                        field: format!("{} ({} is not set)", field, &value[2..value.len() - 1]),
                    });
                }
            }
        }

        if let Some(timeout) = self.timeout_seconds {
            validate_range("timeout_seconds", timeout, 1, 300)?;
        }

        Ok(())
    }
}

impl ConfigProvider for ClientConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref()
    }

    fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "***"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
