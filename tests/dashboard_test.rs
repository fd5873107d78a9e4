use httpmock::prelude::*;
use recru_dashboard::{
    AppConfig, Dashboard, DataProvider, Deferred, MemoryNotifier, Params, Subscribed,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_dashboard_init_fetches_city_demand() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/recru_analy/data");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "status": 0,
                "data": [
                    {"city": "beijing", "demand": 1200},
                    {"city": "shanghai", "demand": 980}
                ]
            }));
    });

    let provider: DataProvider<Subscribed> = DataProvider::builder().build().unwrap();
    let dashboard = Dashboard::with_endpoint(provider, &server.url("/recru_analy/data"));

    let response = dashboard.init().wait().await.unwrap();

    api_mock.assert();
    assert_eq!(response["data"][1]["city"], "shanghai");
}

#[tokio::test]
async fn test_dashboard_default_endpoint() {
    let provider: DataProvider<Deferred> = DataProvider::builder().build().unwrap();
    let dashboard = Dashboard::new(provider);

    assert_eq!(dashboard.endpoint(), "http://localhost:8888/recru_analy/data");
}

#[tokio::test]
async fn test_dashboard_backend_down_notifies_user() {
    let notifier = Arc::new(MemoryNotifier::new());
    let provider: DataProvider<Deferred> = DataProvider::builder()
        .notifier(notifier.clone())
        .build()
        .unwrap();
    let dashboard = Dashboard::with_endpoint(provider, "http://127.0.0.1:1/recru_analy/data");

    assert!(dashboard.get_city_demand().await.is_err());
    assert_eq!(notifier.messages(), vec!["网络请求错误，请稍后重试".to_string()]);
}

#[tokio::test]
async fn test_export_saved_to_configured_directory() {
    let server = MockServer::start();
    let export_mock = server.mock(|when, then| {
        when.method(POST).path("/api/export");
        then.status(200)
            .json_body(json!({"status": 0, "data": {"filename": "city_demand.csv"}}));
    });
    let file_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/download")
            .query_param("filename", "city_demand.csv");
        then.status(200).body("city,demand\nbeijing,1200\n");
    });

    let temp_dir = TempDir::new().unwrap();
    let toml_content = format!(
        r#"
[service]
use_deferred = true

[dashboard]
endpoint = "{}"

[download]
output_dir = "{}"
"#,
        server.url("/recru_analy/data"),
        temp_dir.path().to_str().unwrap().replace('\\', "/")
    );
    let config = AppConfig::from_toml_str(&toml_content).unwrap();

    let provider = DataProvider::<Deferred>::from_config(&config).unwrap();
    provider
        .download(
            &server.url("/api/export"),
            &Params::new(),
            &server.base_url(),
            None,
        )
        .await
        .unwrap();

    export_mock.assert();
    file_mock.assert();
    let saved = std::fs::read_to_string(temp_dir.path().join("city_demand.csv")).unwrap();
    assert!(saved.contains("beijing,1200"));
}
