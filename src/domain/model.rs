use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// 請求參數：key → 可轉成字串的值，`null` 表示缺值
pub type Params = serde_json::Map<String, Value>;

/// 把參數值轉成表單/查詢字串使用的文字；`null` 回傳 `None`
pub fn param_value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Network,
    SessionExpired,
    Server,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Network => "network",
            FailureKind::SessionExpired => "session_expired",
            FailureKind::Server => "server",
        };
        f.write_str(name)
    }
}

/// Raw failure of a single request, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpFailure {
    /// The request never produced an HTTP response (connect, timeout, TLS...).
    Network { message: String },
    /// The backend answered with an unsuccessful status, or a body that is not JSON.
    Status { status: u16, body: String },
}

impl HttpFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            HttpFailure::Network { .. } => FailureKind::Network,
            HttpFailure::Status { status: 401, .. } => FailureKind::SessionExpired,
            HttpFailure::Status { .. } => FailureKind::Server,
        }
    }
}

impl From<reqwest::Error> for HttpFailure {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => HttpFailure::Status {
                status: status.as_u16(),
                body: error.to_string(),
            },
            None => HttpFailure::Network {
                message: error.to_string(),
            },
        }
    }
}

/// 使用者提示訊息（可在配置中覆寫以支援其他語系）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub network: String,
    pub session_expired: String,
    pub server: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            network: "网络请求错误，请稍后重试".to_string(),
            session_expired: "页面已过期，请刷新页面后重试".to_string(),
            server: "请求出现错误，请重试或联系管理员".to_string(),
        }
    }
}

impl Messages {
    pub fn for_kind(&self, kind: FailureKind) -> &str {
        match kind {
            FailureKind::Network => &self.network,
            FailureKind::SessionExpired => &self.session_expired,
            FailureKind::Server => &self.server,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// File fetched and written locally.
    Saved(PathBuf),
    /// Could not save; the link is handed back for the user to open.
    Linked(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_value_to_string() {
        assert_eq!(param_value_to_string(&json!(null)), None);
        assert_eq!(param_value_to_string(&json!("beijing")).as_deref(), Some("beijing"));
        assert_eq!(param_value_to_string(&json!(42)).as_deref(), Some("42"));
        assert_eq!(param_value_to_string(&json!(false)).as_deref(), Some("false"));
        assert_eq!(param_value_to_string(&json!([1, 2])).as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_failure_kind_classification() {
        let network = HttpFailure::Network {
            message: "connection refused".to_string(),
        };
        assert_eq!(network.kind(), FailureKind::Network);

        let unauthorized = HttpFailure::Status {
            status: 401,
            body: String::new(),
        };
        assert_eq!(unauthorized.kind(), FailureKind::SessionExpired);

        for status in [400, 403, 404, 500, 502, 200] {
            let failure = HttpFailure::Status {
                status,
                body: String::new(),
            };
            assert_eq!(failure.kind(), FailureKind::Server, "status {}", status);
        }
    }

    #[test]
    fn test_partial_messages_keep_defaults() {
        let messages: Messages = toml::from_str(r#"network = "Network error""#).unwrap();
        assert_eq!(messages.network, "Network error");
        assert_eq!(messages.server, Messages::default().server);
    }
}
