pub mod dashboard;
pub mod dispatch;
pub mod encoding;
pub mod error_handler;
pub mod provider;

pub use crate::domain::model::{DownloadOutcome, FailureKind, HttpFailure, Messages, Params};
pub use crate::domain::ports::{ConfigProvider, DownloadTrigger, Notifier, Storage};
pub use crate::utils::error::Result;
