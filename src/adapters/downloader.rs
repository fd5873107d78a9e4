use crate::adapters::storage::LocalStorage;
use crate::domain::model::DownloadOutcome;
use crate::domain::ports::{DownloadTrigger, Storage};
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::sanitize_filename;
use async_trait::async_trait;
use reqwest::Client;

/// 下載匯出檔案到本地目錄；無法儲存時退回提供連結
pub struct LocalDownloader {
    client: Client,
    storage: LocalStorage,
}

impl LocalDownloader {
    pub fn new(client: Client, storage: LocalStorage) -> Self {
        Self { client, storage }
    }

    async fn save(&self, link: &str, filename: &str) -> Result<DownloadOutcome> {
        let name = sanitize_filename(filename).ok_or_else(|| DashboardError::DownloadError {
            message: format!("unusable filename: {:?}", filename),
        })?;

        let response = self.client.get(link).send().await?;
        if !response.status().is_success() {
            return Err(DashboardError::DownloadError {
                message: format!("{} returned HTTP {}", link, response.status().as_u16()),
            });
        }

        let bytes = response.bytes().await?;
        tracing::debug!("Writing {} bytes to {}", bytes.len(), name);
        self.storage.write_file(&name, &bytes).await?;

        Ok(DownloadOutcome::Saved(self.storage.full_path(&name)))
    }
}

#[async_trait]
impl DownloadTrigger for LocalDownloader {
    async fn trigger(&self, link: &str, filename: &str) -> Result<DownloadOutcome> {
        match self.save(link, filename).await {
            Ok(outcome) => {
                tracing::info!("📥 Downloaded {}", filename);
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!("⚠️ Could not save {}: {}; open the link instead", filename, e);
                Ok(DownloadOutcome::Linked(link.to_string()))
            }
        }
    }
}

/// Never touches the network; always hands the link back.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkOnlyDownloader;

#[async_trait]
impl DownloadTrigger for LinkOnlyDownloader {
    async fn trigger(&self, link: &str, _filename: &str) -> Result<DownloadOutcome> {
        Ok(DownloadOutcome::Linked(link.to_string()))
    }
}
