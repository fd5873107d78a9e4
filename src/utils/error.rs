use crate::domain::model::FailureKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// 通用失敗指示，細節已由錯誤處理器記錄
    #[error("Something bad happened; please try again later.")]
    RequestFailed { kind: FailureKind },

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Download error: {message}")]
    DownloadError { message: String },

    #[error("Subscription task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}

impl DashboardError {
    /// The classified failure kind when this error came out of the request path.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            DashboardError::RequestFailed { kind } => Some(*kind),
            _ => None,
        }
    }

    /// 請求失敗時錯誤處理器已經提示過使用者
    pub fn already_notified(&self) -> bool {
        matches!(self, DashboardError::RequestFailed { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DashboardError::RequestFailed { kind } => match kind {
                FailureKind::Network => "請求無法送達伺服器，請檢查網路連線".to_string(),
                FailureKind::SessionExpired => "登入狀態已過期".to_string(),
                FailureKind::Server => "伺服器回應錯誤".to_string(),
            },
            DashboardError::ConfigError { .. } | DashboardError::InvalidConfigValueError { .. } => {
                format!("配置錯誤: {}", self)
            }
            DashboardError::TomlError(e) => format!("配置檔案格式錯誤: {}", e),
            DashboardError::DownloadError { message } => format!("下載失敗: {}", message),
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            DashboardError::ConfigError { .. }
            | DashboardError::InvalidConfigValueError { .. }
            | DashboardError::TomlError(_) => 2,
            DashboardError::RequestFailed { .. } | DashboardError::HttpClientError(_) => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
