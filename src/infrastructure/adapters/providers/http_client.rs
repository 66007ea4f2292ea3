//! Source HTTP Client - 各来源站点共用的 HTTP 客户端
//!
//! 统一 User-Agent、超时、状态码到 ProviderError 的映射，以及瞬时故障重试

use reqwest::{header, Client, StatusCode};
use std::time::Duration;

use crate::application::ports::ProviderError;

/// 来源 HTTP 客户端配置
#[derive(Debug, Clone)]
pub struct SourceHttpClientConfig {
    pub user_agent: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 瞬时故障的重试次数
    pub max_retries: u32,
}

impl Default for SourceHttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
            timeout_secs: 20,
            max_retries: 1,
        }
    }
}

/// 来源 HTTP 客户端
#[derive(Clone)]
pub struct SourceHttpClient {
    client: Client,
    config: SourceHttpClientConfig,
}

impl SourceHttpClient {
    pub fn new(config: SourceHttpClientConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::SourceUnavailable(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// GET 页面文本
    pub async fn get_text(&self, url: &str) -> Result<String, ProviderError> {
        self.get_text_with_cookie(url, None).await
    }

    /// GET 页面文本，附带 Cookie（如年龄确认）
    pub async fn get_text_with_cookie(
        &self,
        url: &str,
        cookie: Option<&str>,
    ) -> Result<String, ProviderError> {
        let mut attempt = 0u32;
        loop {
            match self.get_once(url, cookie).await {
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(url = %url, attempt = attempt, error = %e, "Source request failed, retrying");
                    tokio::time::sleep(Duration::from_millis(500 * u64::from(attempt))).await;
                }
                result => return result,
            }
        }
    }

    async fn get_once(&self, url: &str, cookie: Option<&str>) -> Result<String, ProviderError> {
        tracing::debug!(url = %url, "Fetching source page");

        let mut request = self.client.get(url);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::SourceUnavailable(format!("{}: {}", url, e)))?;

        check_status(response.status(), url)?;

        response
            .text()
            .await
            .map_err(|e| ProviderError::SourceUnavailable(format!("{}: {}", url, e)))
    }
}

/// HTTP 状态码映射
pub(crate) fn check_status(status: StatusCode, url: &str) -> Result<(), ProviderError> {
    if status.is_success() {
        return Ok(());
    }

    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => Err(ProviderError::NotFound(url.to_string())),
        StatusCode::TOO_MANY_REQUESTS | StatusCode::FORBIDDEN => Err(
            ProviderError::SourceUnavailable(format!("HTTP {}: {}", status, url)),
        ),
        s if s.is_server_error() => Err(ProviderError::SourceUnavailable(format!(
            "HTTP {}: {}",
            status, url
        ))),
        _ => Err(ProviderError::ParseError(format!(
            "Unexpected HTTP {}: {}",
            status, url
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(check_status(StatusCode::OK, "u").is_ok());
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND, "u"),
            Err(ProviderError::NotFound(_))
        ));
        assert!(matches!(
            check_status(StatusCode::SERVICE_UNAVAILABLE, "u"),
            Err(ProviderError::SourceUnavailable(_))
        ));
        assert!(matches!(
            check_status(StatusCode::TOO_MANY_REQUESTS, "u"),
            Err(ProviderError::SourceUnavailable(_))
        ));
        assert!(matches!(
            check_status(StatusCode::IM_A_TEAPOT, "u"),
            Err(ProviderError::ParseError(_))
        ));
    }

    #[test]
    fn test_config_default() {
        let config = SourceHttpClientConfig::default();
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.max_retries, 1);
    }
}
