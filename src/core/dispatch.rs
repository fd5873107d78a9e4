use crate::core::error_handler::ErrorHandler;
use crate::domain::model::HttpFailure;
use crate::utils::error::Result;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

/// Success callback, invoked with the decoded response body.
pub type Callback = Box<dyn FnOnce(&Value) + Send + 'static>;

pub type RequestFuture =
    Pin<Box<dyn Future<Output = std::result::Result<Value, HttpFailure>> + Send + 'static>>;

/// Wrap a closure as the optional callback argument of the request methods.
pub fn callback<F>(f: F) -> Option<Callback>
where
    F: FnOnce(&Value) + Send + 'static,
{
    Some(Box::new(f))
}

/// 決定所有請求方法的回傳形式：可 await 的結果，或已送出的訂閱
pub trait DispatchMode: Send + Sync + 'static {
    type Output: Send + 'static;

    /// Whether plain requests hand their response to the success callback.
    /// Deferred callers read the awaited value instead.
    const DELIVERS_CALLBACK: bool;

    fn dispatch(handler: Arc<ErrorHandler>, request: RequestFuture) -> Self::Output;

    /// Wait for a dispatched request to finish, whatever the mode.
    fn settle(output: Self::Output) -> Pending;
}

/// Requests return a [`Pending`] the caller awaits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deferred;

/// Requests are spawned immediately and return a [`Subscription`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Subscribed;

impl DispatchMode for Deferred {
    type Output = Pending;

    const DELIVERS_CALLBACK: bool = false;

    fn dispatch(handler: Arc<ErrorHandler>, request: RequestFuture) -> Pending {
        Pending::new(async move { request.await.map_err(|failure| handler.handle(&failure)) })
    }

    fn settle(output: Pending) -> Pending {
        output
    }
}

impl DispatchMode for Subscribed {
    type Output = Subscription;

    const DELIVERS_CALLBACK: bool = true;

    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    fn dispatch(handler: Arc<ErrorHandler>, request: RequestFuture) -> Subscription {
        let handle = tokio::spawn(async move {
            request.await.map_err(|failure| handler.handle(&failure))
        });
        Subscription { handle }
    }

    fn settle(output: Subscription) -> Pending {
        Pending::new(output.wait())
    }
}

/// Awaitable result of a deferred request.
#[must_use = "a deferred request does nothing until awaited"]
pub struct Pending {
    inner: Pin<Box<dyn Future<Output = Result<Value>> + Send + 'static>>,
}

impl Pending {
    fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            inner: Box::pin(future),
        }
    }
}

impl Future for Pending {
    type Output = Result<Value>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

/// Handle to a request already in flight. Dropping it does not cancel the request.
#[derive(Debug)]
pub struct Subscription {
    handle: JoinHandle<Result<Value>>,
}

impl Subscription {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// 中止請求；回呼與錯誤處理都不會再執行
    pub fn unsubscribe(self) {
        self.handle.abort();
    }

    pub async fn wait(self) -> Result<Value> {
        self.handle.await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notifier::MemoryNotifier;
    use crate::domain::model::{FailureKind, Messages};
    use serde_json::json;

    fn handler(notifier: Arc<MemoryNotifier>) -> Arc<ErrorHandler> {
        Arc::new(ErrorHandler::new(notifier, Messages::default()))
    }

    #[tokio::test]
    async fn test_deferred_resolves_value() {
        let notifier = Arc::new(MemoryNotifier::new());
        let pending = Deferred::dispatch(
            handler(notifier.clone()),
            Box::pin(async { Ok::<_, HttpFailure>(json!({"ok": true})) }),
        );

        assert_eq!(pending.await.unwrap(), json!({"ok": true}));
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn test_deferred_needs_no_runtime_until_awaited() {
        let notifier = Arc::new(MemoryNotifier::new());
        let pending = Deferred::dispatch(
            handler(notifier),
            Box::pin(async { Ok::<_, HttpFailure>(json!([1, 2, 3])) }),
        );

        assert_eq!(tokio_test::block_on(pending).unwrap(), json!([1, 2, 3]));
    }

    #[tokio::test]
    async fn test_deferred_failure_goes_through_handler() {
        let notifier = Arc::new(MemoryNotifier::new());
        let pending = Deferred::dispatch(
            handler(notifier.clone()),
            Box::pin(async {
                Err::<Value, _>(HttpFailure::Status {
                    status: 401,
                    body: String::new(),
                })
            }),
        );

        let err = pending.await.unwrap_err();
        assert_eq!(err.failure_kind(), Some(FailureKind::SessionExpired));
        assert_eq!(notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_subscription_runs_without_being_awaited() {
        let notifier = Arc::new(MemoryNotifier::new());
        let (tx, rx) = tokio::sync::oneshot::channel();
        let subscription = Subscribed::dispatch(
            handler(notifier.clone()),
            Box::pin(async move {
                let _ = tx.send(());
                Ok::<_, HttpFailure>(Value::Null)
            }),
        );

        rx.await.unwrap();
        assert_eq!(subscription.wait().await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_subscription_failure_notifies_once() {
        let notifier = Arc::new(MemoryNotifier::new());
        let subscription = Subscribed::dispatch(
            handler(notifier.clone()),
            Box::pin(async {
                Err::<Value, _>(HttpFailure::Network {
                    message: "dns failure".to_string(),
                })
            }),
        );

        let err = Subscribed::settle(subscription).await.unwrap_err();
        assert_eq!(err.failure_kind(), Some(FailureKind::Network));
        assert_eq!(notifier.messages(), vec!["网络请求错误，请稍后重试".to_string()]);
    }
}
