use crate::core::dashboard::DEFAULT_DASHBOARD_ENDPOINT;
use crate::core::ConfigProvider;
use crate::domain::model::Messages;
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub dashboard: DashboardConfig,
    pub download: DownloadConfig,
    pub messages: Messages,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// 所有請求改為回傳可 await 的結果
    pub use_deferred: bool,
    pub timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            use_deferred: false,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub endpoint: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DASHBOARD_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub output_dir: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: "./downloads".to_string(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| DashboardError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${DASHBOARD_HOST})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

impl ConfigProvider for AppConfig {
    fn dashboard_endpoint(&self) -> &str {
        &self.dashboard.endpoint
    }

    fn output_dir(&self) -> &str {
        &self.download.output_dir
    }

    fn timeout_seconds(&self) -> u64 {
        self.service.timeout_seconds
    }

    fn use_deferred(&self) -> bool {
        self.service.use_deferred
    }

    fn messages(&self) -> &Messages {
        &self.messages
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("dashboard.endpoint", &self.dashboard.endpoint)?;
        validate_path("download.output_dir", &self.download.output_dir)?;
        validate_range("service.timeout_seconds", self.service.timeout_seconds, 1, 600)?;

        validate_non_empty_string("messages.network", &self.messages.network)?;
        validate_non_empty_string("messages.session_expired", &self.messages.session_expired)?;
        validate_non_empty_string("messages.server", &self.messages.server)?;

        Ok(())
    }
}
