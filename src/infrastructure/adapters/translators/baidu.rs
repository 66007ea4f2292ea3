//! 百度翻译开放平台 (fanyi-api.baidu.com)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use super::{align_batch, batches};
use crate::application::ports::{TranslatorError, TranslatorPort};
use crate::domain::translation::TranslatorEngine;

/// 单次请求的最大字符数（接口限制 6000 字节）
const MAX_BATCH_CHARS: usize = 1800;

/// 百度翻译配置
#[derive(Debug, Clone)]
pub struct BaiduTranslatorConfig {
    pub base_url: String,
    pub app_id: String,
    pub app_key: String,
    pub timeout_secs: u64,
}

impl BaiduTranslatorConfig {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://fanyi-api.baidu.com/api/trans/vip/translate".to_string(),
            app_id: app_id.into(),
            app_key: app_key.into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BaiduResponse {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_msg: Option<String>,
    #[serde(default)]
    trans_result: Vec<TransResult>,
}

#[derive(Debug, Deserialize)]
struct TransResult {
    dst: String,
}

/// 百度翻译客户端
pub struct BaiduTranslator {
    client: Client,
    config: BaiduTranslatorConfig,
}

impl BaiduTranslator {
    pub fn new(config: BaiduTranslatorConfig) -> Result<Self, TranslatorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TranslatorError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn translate_batch(&self, batch: &[String]) -> Result<Vec<String>, TranslatorError> {
        let query = batch.join("\n");
        let salt = Uuid::new_v4().simple().to_string();
        let sign = sign(&self.config.app_id, &query, &salt, &self.config.app_key);

        let form = [
            ("q", query.as_str()),
            ("from", "jp"),
            ("to", "zh"),
            ("appid", self.config.app_id.as_str()),
            ("salt", salt.as_str()),
            ("sign", sign.as_str()),
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

        let body: BaiduResponse = response.json().await?;
        into_lines(body)
    }
}

fn into_lines(body: BaiduResponse) -> Result<Vec<String>, TranslatorError> {
    // 成功时也可能带 error_code "52000"
    match body.error_code.as_deref() {
        None | Some("52000") => {}
        Some(code) => {
            return Err(TranslatorError::ServiceError(format!(
                "baidu error {}: {}",
                code,
                body.error_msg.unwrap_or_default()
            )));
        }
    }

    Ok(body.trans_result.into_iter().map(|r| r.dst).collect())
}

/// md5(appid + q + salt + key)
fn sign(app_id: &str, query: &str, salt: &str, app_key: &str) -> String {
    let digest = md5::compute(format!("{}{}{}{}", app_id, query, salt, app_key));
    format!("{:x}", digest)
}

#[async_trait]
impl TranslatorPort for BaiduTranslator {
    fn engine(&self) -> TranslatorEngine {
        TranslatorEngine::Baidu
    }

    async fn translate(&self, lines: &[String]) -> Result<Vec<Option<String>>, TranslatorError> {
        let mut output = Vec::with_capacity(lines.len());
        for batch in batches(lines, MAX_BATCH_CHARS) {
            let translated = self.translate_batch(batch).await?;
            output.extend(align_batch(self.engine(), batch.len(), translated));
        }

        tracing::debug!(lines = lines.len(), "Baidu translation completed");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign() {
        assert_eq!(
            sign("2015063000000001", "apple", "1435660288", "12345678"),
            "f89f9594663708c1605f3d736d01d2d4"
        );
    }

    #[test]
    fn test_response_lines() {
        let body: BaiduResponse = serde_json::from_str(
            r#"{"from":"jp","to":"zh","trans_result":[{"src":"a","dst":"甲"},{"src":"b","dst":"乙"}]}"#,
        )
        .unwrap();
        assert_eq!(into_lines(body).unwrap(), vec!["甲", "乙"]);
    }

    #[test]
    fn test_error_response() {
        let body: BaiduResponse =
            serde_json::from_str(r#"{"error_code":"54001","error_msg":"Invalid Sign"}"#).unwrap();
        assert!(matches!(into_lines(body), Err(TranslatorError::ServiceError(_))));
    }
}
