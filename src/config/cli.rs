use crate::config::toml_config::AppConfig;
use crate::domain::model::Params;
use crate::utils::error::{DashboardError, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Debug, Clone, Parser)]
#[command(name = "recru-dashboard")]
#[command(about = "Recruitment analysis dashboard client")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Await every request instead of dispatching it in the background")]
    pub deferred: bool,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Dashboard data endpoint")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Directory downloads are saved to")]
    pub output_dir: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Load the dashboard data once and log it
    Dashboard,
    /// GET a URL
    Get { url: String },
    /// POST form fields to a URL
    Post {
        url: String,
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    /// POST a JSON object to a URL
    PostJson {
        url: String,
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    /// Request an export and download the resulting file
    Download {
        url: String,
        download_url: String,
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
}

impl CliConfig {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Dashboard)
    }

    /// 預設值 → 配置檔 → 命令列參數
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if self.deferred {
            config.service.use_deferred = true;
        }
        if let Some(timeout) = self.timeout {
            config.service.timeout_seconds = timeout;
        }
        if let Some(endpoint) = &self.endpoint {
            config.dashboard.endpoint = endpoint.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.download.output_dir = output_dir.clone();
        }

        Ok(config)
    }
}

/// Parse `KEY=VALUE` arguments. JSON scalars keep their type, anything else is
/// a string; a bare `KEY` is `null`.
pub fn parse_params(raw: &[String]) -> Result<Params> {
    let mut params = Params::new();

    for item in raw {
        let (key, value) = match item.split_once('=') {
            Some((key, value)) => (
                key,
                serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string())),
            ),
            None => (item.as_str(), Value::Null),
        };

        if key.trim().is_empty() {
            return Err(DashboardError::InvalidConfigValueError {
                field: "param".to_string(),
                value: item.clone(),
                reason: "parameter name cannot be empty".to_string(),
            });
        }
        params.insert(key.to_string(), value);
    }

    Ok(params)
}
