use crate::domain::model::{DownloadOutcome, Messages};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 使用者可見的提示通道（相當於前端的 toast）
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Side effect that makes a finished export available to the user.
#[async_trait]
pub trait DownloadTrigger: Send + Sync {
    async fn trigger(&self, link: &str, filename: &str) -> Result<DownloadOutcome>;
}

pub trait ConfigProvider: Send + Sync {
    fn dashboard_endpoint(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn use_deferred(&self) -> bool;
    fn messages(&self) -> &Messages;
}
