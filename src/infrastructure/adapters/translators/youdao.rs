//! 有道智云文本翻译 (openapi.youdao.com, 签名 v3)

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use uuid::Uuid;

use super::{align_batch, batches};
use crate::application::ports::{TranslatorError, TranslatorPort};
use crate::domain::translation::TranslatorEngine;

/// 单次请求的最大字符数
const MAX_BATCH_CHARS: usize = 4000;

/// 有道翻译配置
#[derive(Debug, Clone)]
pub struct YoudaoTranslatorConfig {
    pub base_url: String,
    pub app_key: String,
    pub app_secret: String,
    pub timeout_secs: u64,
}

impl YoudaoTranslatorConfig {
    pub fn new(app_key: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            base_url: "https://openapi.youdao.com/api".to_string(),
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YoudaoResponse {
    error_code: String,
    #[serde(default)]
    translation: Vec<String>,
}

/// 有道翻译客户端
pub struct YoudaoTranslator {
    client: Client,
    config: YoudaoTranslatorConfig,
}

impl YoudaoTranslator {
    pub fn new(config: YoudaoTranslatorConfig) -> Result<Self, TranslatorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TranslatorError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn translate_batch(&self, batch: &[String]) -> Result<Vec<String>, TranslatorError> {
        let query = batch.join("\n");
        let salt = Uuid::new_v4().to_string();
        let curtime = Utc::now().timestamp().to_string();
        let sign = sign(&self.config.app_key, &query, &salt, &curtime, &self.config.app_secret);

        let form = [
            ("q", query.as_str()),
            ("from", "ja"),
            ("to", "zh-CHS"),
            ("appKey", self.config.app_key.as_str()),
            ("salt", salt.as_str()),
            ("sign", sign.as_str()),
            ("signType", "v3"),
            ("curtime", curtime.as_str()),
        ];

        let response = self
            .client
            .post(&self.config.base_url)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranslatorError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: YoudaoResponse = response.json().await?;
        if body.error_code != "0" {
            return Err(TranslatorError::ServiceError(format!(
                "youdao errorCode {}",
                body.error_code
            )));
        }

        Ok(body
            .translation
            .join("\n")
            .split('\n')
            .map(str::to_string)
            .collect())
    }
}

/// v3 签名中的 input：超过 20 个字符时取前 10 + 长度 + 后 10
fn truncate_input(query: &str) -> String {
    let chars: Vec<char> = query.chars().collect();
    if chars.len() <= 20 {
        return query.to_string();
    }
    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 10..].iter().collect();
    format!("{}{}{}", head, chars.len(), tail)
}

/// sha256(appKey + input + salt + curtime + appSecret)
fn sign(app_key: &str, query: &str, salt: &str, curtime: &str, app_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(app_key.as_bytes());
    hasher.update(truncate_input(query).as_bytes());
    hasher.update(salt.as_bytes());
    hasher.update(curtime.as_bytes());
    hasher.update(app_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl TranslatorPort for YoudaoTranslator {
    fn engine(&self) -> TranslatorEngine {
        TranslatorEngine::Youdao
    }

    async fn translate(&self, lines: &[String]) -> Result<Vec<Option<String>>, TranslatorError> {
        let mut output = Vec::with_capacity(lines.len());
        for batch in batches(lines, MAX_BATCH_CHARS) {
            let translated = self.translate_batch(batch).await?;
            output.extend(align_batch(self.engine(), batch.len(), translated));
        }

        tracing::debug!(lines = lines.len(), "Youdao translation completed");
        Ok(output)
    }
}
