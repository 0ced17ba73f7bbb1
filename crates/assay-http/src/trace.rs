//! Human-readable request and response dumps at `info` level.

use assay_diff::flatten;
use chrono::Local;
use serde_json::Value;

use crate::request::{Body, PreparedRequest};
use crate::response::ApiResponse;

pub(crate) fn log_request(request: &PreparedRequest) {
    tracing::info!("==> request time:    {}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"));
    tracing::info!("==> request method:  {}", request.method);
    tracing::info!("==> request url:     {}", request.url);
    tracing::info!("==> request params:  {}", render_pairs(&request.params));
    tracing::info!("==> request headers: {}", render_pairs(&request.headers));

    if !request.files.is_empty() {
        let files: Vec<String> = request
            .files
            .iter()
            .map(|f| format!("{}={}", f.field, f.path.display()))
            .collect();
        tracing::info!("==> request files:   {}", files.join(", "));
    }

    match &request.body {
        Some(Body::Json(json)) => log_payload("==> request payload:", json),
        Some(Body::Raw(raw)) => {
            tracing::info!("==> request payload: {}", String::from_utf8_lossy(raw));
        }
        None => {}
    }
}

pub(crate) fn log_response(response: &ApiResponse) {
    tracing::info!("<== response time:   {:?}", response.elapsed());
    tracing::info!("<== response status: {}", response.status());

    let headers: Vec<(String, String)> = response
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
        .collect();
    tracing::info!("<== response headers: {}", render_pairs(&headers));

    match response.json() {
        Some(json) => log_payload("<== response payload:", json),
        None => tracing::info!("<== response payload: {}", response.text()),
    }
}

fn log_payload(prefix: &str, json: &Value) {
    for line in payload_lines(json) {
        tracing::info!("{prefix} {line}");
    }
}

// One line per leaf.
fn payload_lines(json: &Value) -> Vec<String> {
    flatten(json)
        .into_iter()
        .map(|(path, value)| format!("{path} = {value}"))
        .collect()
}

fn render_pairs(pairs: &[(String, String)]) -> String {
    let rendered: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}: {v}")).collect();
    format!("{{{}}}", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_pairs() {
        let pairs = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ];
        assert_eq!(render_pairs(&pairs), "{a: 1, b: 2}");
        assert_eq!(render_pairs(&[]), "{}");
    }

    #[test]
    fn test_payload_lines() {
        let lines = payload_lines(&serde_json::json!({
            "code": 200,
            "result": {"idToken": "jwt", "roles": ["admin"]}
        }));
        assert_eq!(
            lines,
            vec![
                "root['code'] = 200",
                "root['result']['idToken'] = \"jwt\"",
                "root['result']['roles'][0] = \"admin\"",
            ]
        );
        assert_eq!(payload_lines(&serde_json::json!({})), vec!["root = {}"]);
    }
}
