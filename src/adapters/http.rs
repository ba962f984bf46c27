use crate::domain::model::ProviderKind;
use crate::utils::error::{Result, SearchError};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub fn map_request_error(provider: ProviderKind, timeout: Duration, e: reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::ProviderTimeout {
            provider,
            timeout_secs: timeout.as_secs(),
        }
    } else if e.is_decode() {
        SearchError::ProviderMalformedResponse {
            provider,
            message: e.to_string(),
        }
    } else {
        SearchError::ProviderUnavailable {
            provider,
            message: e.to_string(),
        }
    }
}

async fn send(provider: ProviderKind, request: RequestBuilder, timeout: Duration) -> Result<reqwest::Response> {
    let response = request
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| map_request_error(provider, timeout, e))?;

    let status = response.status();
    tracing::debug!("📡 {}: response status {}", provider, status);
    if !status.is_success() {
        return Err(SearchError::ProviderUnavailable {
            provider,
            message: format!("HTTP {}", status),
        });
    }
    Ok(response)
}

/// 送出請求並解析 JSON；非 2xx 與格式錯誤都轉為型別化錯誤
pub async fn fetch_json<T: DeserializeOwned>(
    provider: ProviderKind,
    request: RequestBuilder,
    timeout: Duration,
) -> Result<T> {
    let response = send(provider, request, timeout).await?;
    let body = response
        .text()
        .await
        .map_err(|e| map_request_error(provider, timeout, e))?;

    serde_json::from_str(&body).map_err(|e| SearchError::ProviderMalformedResponse {
        provider,
        message: e.to_string(),
    })
}

/// 健康檢查只看狀態碼
pub async fn probe(provider: ProviderKind, request: RequestBuilder, timeout: Duration) -> Result<()> {
    send(provider, request, timeout).await.map(|_| ())
}

pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        items: Vec<String>,
    }

    #[test]
    fn joins_urls_without_double_slashes() {
        assert_eq!(join_url("http://a/", "/b/c"), "http://a/b/c");
        assert_eq!(join_url("http://a", "b"), "http://a/b");
    }

    #[tokio::test]
    async fn non_success_status_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(503);
        });

        let client = reqwest::Client::new();
        let result: Result<Payload> = fetch_json(
            ProviderKind::Kakao,
            client.get(server.url("/search")),
            Duration::from_secs(5),
        )
        .await;
        assert!(matches!(
            result,
            Err(SearchError::ProviderUnavailable {
                provider: ProviderKind::Kakao,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_typed_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200)
                .header("Content-Type", "application/json")
                .body("{\"unexpected\": true}");
        });

        let client = reqwest::Client::new();
        let result: Result<Payload> = fetch_json(
            ProviderKind::Naver,
            client.get(server.url("/search")),
            Duration::from_secs(5),
        )
        .await;
        assert!(matches!(
            result,
            Err(SearchError::ProviderMalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200).delay(Duration::from_millis(1500));
        });

        let client = reqwest::Client::new();
        let result = probe(
            ProviderKind::Kakao,
            client.get(server.url("/health")),
            Duration::from_millis(200),
        )
        .await;
        assert!(matches!(result, Err(SearchError::ProviderTimeout { .. })));
    }

    #[tokio::test]
    async fn parses_successful_payload() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"items": ["a", "b"]}));
        });

        let client = reqwest::Client::new();
        let payload: Payload = fetch_json(
            ProviderKind::Naver,
            client.get(server.url("/search")),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(payload.items, vec!["a", "b"]);
    }
}
