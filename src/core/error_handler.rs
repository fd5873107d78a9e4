use crate::domain::model::{HttpFailure, Messages};
use crate::domain::ports::Notifier;
use crate::utils::error::DashboardError;
use std::sync::Arc;

/// Single funnel for every failed request: notify the user, log the details,
/// hand a generic failure back to the caller.
pub struct ErrorHandler {
    notifier: Arc<dyn Notifier>,
    messages: Messages,
}

impl ErrorHandler {
    pub fn new(notifier: Arc<dyn Notifier>, messages: Messages) -> Self {
        Self { notifier, messages }
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn handle(&self, failure: &HttpFailure) -> DashboardError {
        let kind = failure.kind();
        self.notifier.error(self.messages.for_kind(kind));

        match failure {
            HttpFailure::Network { message } => {
                tracing::error!("An error occurred: {}", message);
            }
            HttpFailure::Status { status, body } => {
                tracing::error!("Backend returned code {}, body was: {}", status, body);
            }
        }

        DashboardError::RequestFailed { kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notifier::MemoryNotifier;
    use crate::domain::model::FailureKind;

    fn handler() -> (ErrorHandler, Arc<MemoryNotifier>) {
        let notifier = Arc::new(MemoryNotifier::new());
        let handler = ErrorHandler::new(notifier.clone(), Messages::default());
        (handler, notifier)
    }

    #[test]
    fn test_network_failure_uses_network_message() {
        let (handler, notifier) = handler();
        let err = handler.handle(&HttpFailure::Network {
            message: "connection refused".to_string(),
        });

        assert_eq!(err.failure_kind(), Some(FailureKind::Network));
        assert_eq!(notifier.messages(), vec!["网络请求错误，请稍后重试".to_string()]);
    }

    #[test]
    fn test_unauthorized_uses_session_expired_message() {
        let (handler, notifier) = handler();
        let err = handler.handle(&HttpFailure::Status {
            status: 401,
            body: "token expired".to_string(),
        });

        assert_eq!(err.failure_kind(), Some(FailureKind::SessionExpired));
        assert_eq!(notifier.messages(), vec!["页面已过期，请刷新页面后重试".to_string()]);
    }

    #[test]
    fn test_other_status_uses_server_message() {
        let (handler, notifier) = handler();
        for status in [400, 403, 500, 503] {
            let err = handler.handle(&HttpFailure::Status {
                status,
                body: String::new(),
            });
            assert_eq!(err.failure_kind(), Some(FailureKind::Server));
        }

        let messages = notifier.messages();
        assert_eq!(messages.len(), 4);
        assert!(messages.iter().all(|m| m == "请求出现错误，请重试或联系管理员"));
    }

    #[test]
    fn test_custom_messages() {
        let notifier = Arc::new(MemoryNotifier::new());
        let messages = Messages {
            network: "Network error, try again later".to_string(),
            session_expired: "Session expired, reload the page".to_string(),
            server: "Request failed".to_string(),
        };
        let handler = ErrorHandler::new(notifier.clone(), messages);

        handler.handle(&HttpFailure::Status {
            status: 401,
            body: String::new(),
        });
        assert_eq!(notifier.messages(), vec!["Session expired, reload the page".to_string()]);
    }
}
