pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{ConsoleNotifier, LinkOnlyDownloader, LocalDownloader, LocalStorage, MemoryNotifier};
pub use config::AppConfig;
pub use core::{
    dashboard::Dashboard,
    dispatch::{callback, Callback, Deferred, DispatchMode, Pending, Subscribed, Subscription},
    provider::{DataProvider, DataProviderBuilder},
};
pub use domain::model::{DownloadOutcome, FailureKind, Messages, Params};
pub use utils::error::{DashboardError, Result};
