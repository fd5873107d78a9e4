use crate::domain::model::{param_value_to_string, Params};
use serde_json::Value;
use url::form_urlencoded;

/// Body of a form POST. Keys whose value is `null` are left out.
pub fn encode_form(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        if let Some(value) = param_value_to_string(value) {
            serializer.append_pair(key, &value);
        }
    }
    serializer.finish()
}

/// 在 url 後接參數；`null` 值輸出為 `key=`
pub fn add_url_params(url: &str, params: &Params) -> String {
    if params.is_empty() {
        return url.to_string();
    }

    let query = params
        .iter()
        .map(|(key, value)| {
            let value = param_value_to_string(value).unwrap_or_default();
            format!("{}={}", encode_component(key), encode_component(&value))
        })
        .collect::<Vec<_>>()
        .join("&");

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, query)
}

/// `response.data.filename`, when it is a non-empty string or a non-zero number.
pub fn extract_filename(response: &Value) -> Option<String> {
    match response.get("data")?.get("filename")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Fallback filename: current Unix time in milliseconds.
pub fn timestamp_filename() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

pub fn download_link(download_url: &str, filename: &str) -> String {
    format!(
        "{}/api/download?filename={}",
        download_url.trim_end_matches('/'),
        encode_component(filename)
    )
}

fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
