use crate::adapters::{ConsoleNotifier, LocalDownloader, LocalStorage};
use crate::core::dispatch::{Callback, DispatchMode, Subscribed};
use crate::core::encoding::{download_link, encode_form, extract_filename, timestamp_filename};
use crate::core::error_handler::ErrorHandler;
use crate::domain::model::{DownloadOutcome, HttpFailure, Messages, Params};
use crate::domain::ports::{ConfigProvider, DownloadTrigger, Notifier};
use crate::utils::error::Result;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// 通用數據請求服務
///
/// The dispatch mode `M` is fixed for the whole provider: with
/// [`Deferred`](crate::core::dispatch::Deferred) every method returns an
/// awaitable [`Pending`](crate::core::dispatch::Pending), with [`Subscribed`]
/// every method spawns the request and returns a
/// [`Subscription`](crate::core::dispatch::Subscription).
pub struct DataProvider<M: DispatchMode = Subscribed> {
    client: Client,
    handler: Arc<ErrorHandler>,
    downloader: Arc<dyn DownloadTrigger>,
    _mode: PhantomData<fn() -> M>,
}

impl<M: DispatchMode> Clone for DataProvider<M> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            handler: Arc::clone(&self.handler),
            downloader: Arc::clone(&self.downloader),
            _mode: PhantomData,
        }
    }
}

impl DataProvider {
    pub fn builder() -> DataProviderBuilder {
        DataProviderBuilder::default()
    }
}

impl<M: DispatchMode> DataProvider<M> {
    pub fn new(
        client: Client,
        handler: Arc<ErrorHandler>,
        downloader: Arc<dyn DownloadTrigger>,
    ) -> Self {
        Self {
            client,
            handler,
            downloader,
            _mode: PhantomData,
        }
    }

    /// Provider wired the way the CLI runs it: console notifications,
    /// downloads saved into the configured output directory.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        DataProviderBuilder::default()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .messages(config.messages().clone())
            .output_dir(config.output_dir())
            .build()
    }

    /// Same client and handlers, different dispatch mode.
    pub fn into_mode<N: DispatchMode>(self) -> DataProvider<N> {
        DataProvider {
            client: self.client,
            handler: self.handler,
            downloader: self.downloader,
            _mode: PhantomData,
        }
    }

    pub fn error_handler(&self) -> &ErrorHandler {
        &self.handler
    }

    /// 簡單的 GET 請求；`Deferred` 模式下不呼叫 callback
    ///
    /// # Panics
    ///
    /// With [`Subscribed`] the request is spawned with `tokio::spawn`, so this
    /// panics when called outside a tokio runtime.
    pub fn get_data(&self, url: &str, callback: Option<Callback>) -> M::Output {
        tracing::debug!("GET {}", url);
        self.request(self.client.get(url), callback)
    }

    /// POST 表單請求，略過值為 null 的參數
    ///
    /// # Panics
    ///
    /// With [`Subscribed`] the request is spawned with `tokio::spawn`, so this
    /// panics when called outside a tokio runtime.
    pub fn post_data(&self, url: &str, params: &Params, callback: Option<Callback>) -> M::Output {
        let body = encode_form(params);
        tracing::debug!("POST {} (form: {})", url, body);
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body);
        self.request(request, callback)
    }

    /// POST JSON 請求
    ///
    /// # Panics
    ///
    /// With [`Subscribed`] the request is spawned with `tokio::spawn`, so this
    /// panics when called outside a tokio runtime.
    pub fn post_json_data(
        &self,
        url: &str,
        params: &Params,
        callback: Option<Callback>,
    ) -> M::Output {
        tracing::debug!("POST {} (json, {} keys)", url, params.len());
        self.request(self.client.post(url).json(params), callback)
    }

    /// Export flow: POST `params` to `url`, then fetch
    /// `<download_url>/api/download?filename=<filename>` where the filename
    /// comes from `response.data.filename`, or the current timestamp when
    /// the response has none. The callback runs after the download trigger,
    /// in both dispatch modes.
    ///
    /// # Panics
    ///
    /// With [`Subscribed`] the request is spawned with `tokio::spawn`, so this
    /// panics when called outside a tokio runtime.
    pub fn download(
        &self,
        url: &str,
        params: &Params,
        download_url: &str,
        callback: Option<Callback>,
    ) -> M::Output {
        tracing::debug!("POST {} (export)", url);
        let request = self.client.post(url).json(params);
        let downloader = Arc::clone(&self.downloader);
        let download_url = download_url.to_string();

        let future = async move {
            let response = execute(request).await?;

            let filename = extract_filename(&response).unwrap_or_else(|| {
                tracing::debug!("No filename in export response, using timestamp");
                timestamp_filename()
            });
            trigger_download(downloader.as_ref(), &download_url, &filename).await;

            if let Some(callback) = callback {
                callback(&response);
            }
            Ok::<_, HttpFailure>(response)
        };

        M::dispatch(Arc::clone(&self.handler), Box::pin(future))
    }

    /// 直接觸發檔案下載；檔名為空時不做任何事並回傳 `None`
    pub async fn download_filename(
        &self,
        filename: &str,
        download_url: &str,
    ) -> Option<DownloadOutcome> {
        if filename.is_empty() {
            return None;
        }
        trigger_download(self.downloader.as_ref(), download_url, filename).await
    }

    fn request(&self, request: RequestBuilder, callback: Option<Callback>) -> M::Output {
        let callback = if M::DELIVERS_CALLBACK { callback } else { None };
        let future = async move {
            let response = execute(request).await?;
            if let Some(callback) = callback {
                callback(&response);
            }
            Ok::<_, HttpFailure>(response)
        };

        M::dispatch(Arc::clone(&self.handler), Box::pin(future))
    }
}

async fn trigger_download(
    downloader: &dyn DownloadTrigger,
    download_url: &str,
    filename: &str,
) -> Option<DownloadOutcome> {
    let link = download_link(download_url, filename);
    match downloader.trigger(&link, filename).await {
        Ok(outcome) => {
            if let DownloadOutcome::Linked(link) = &outcome {
                tracing::info!("🔗 Download available at {}", link);
            }
            Some(outcome)
        }
        Err(e) => {
            tracing::error!("❌ Download of {} failed: {}", filename, e);
            None
        }
    }
}

/// Send the request and decode the body as JSON. An empty body decodes to `null`.
async fn execute(request: RequestBuilder) -> std::result::Result<Value, HttpFailure> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    tracing::debug!("Response status: {}", status);

    if !status.is_success() {
        return Err(HttpFailure::Status {
            status: status.as_u16(),
            body,
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| HttpFailure::Status {
        status: status.as_u16(),
        body: format!("Http failure during parsing ({}): {}", e, body),
    })
}

pub struct DataProviderBuilder {
    timeout: Duration,
    messages: Messages,
    notifier: Arc<dyn Notifier>,
    downloader: Option<Arc<dyn DownloadTrigger>>,
    output_dir: String,
}

impl Default for DataProviderBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            messages: Messages::default(),
            notifier: Arc::new(ConsoleNotifier),
            downloader: None,
            output_dir: "./downloads".to_string(),
        }
    }
}

impl DataProviderBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn downloader(mut self, downloader: Arc<dyn DownloadTrigger>) -> Self {
        self.downloader = Some(downloader);
        self
    }

    /// Directory used by the default [`LocalDownloader`].
    pub fn output_dir(mut self, output_dir: &str) -> Self {
        self.output_dir = output_dir.to_string();
        self
    }

    pub fn build<M: DispatchMode>(self) -> Result<DataProvider<M>> {
        let client = Client::builder().timeout(self.timeout).build()?;

        let downloader = match self.downloader {
            Some(downloader) => downloader,
            None => Arc::new(LocalDownloader::new(
                client.clone(),
                LocalStorage::new(self.output_dir),
            )),
        };
        let handler = Arc::new(ErrorHandler::new(self.notifier, self.messages));

        Ok(DataProvider::new(client, handler, downloader))
    }
}
