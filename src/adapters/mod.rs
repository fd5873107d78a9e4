// Adapters layer: concrete implementations for the domain ports (storage, notifications, downloads).

pub mod downloader;
pub mod notifier;
pub mod storage;

pub use downloader::{LinkOnlyDownloader, LocalDownloader};
pub use notifier::{ConsoleNotifier, MemoryNotifier};
pub use storage::LocalStorage;
