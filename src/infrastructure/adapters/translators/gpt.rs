//! GPT 翻译（OpenAI 兼容 chat completions 接口）
//!
//! 原文逐行编号为 `#N:`，按编号取回译文，模型增删行不会导致错位

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use super::batches;
use crate::application::ports::{TranslatorError, TranslatorPort};
use crate::domain::translation::TranslatorEngine;

/// 单次请求的最大字符数
const MAX_BATCH_CHARS: usize = 1500;

const SYSTEM_PROMPT: &str = "你是一个日文小说翻译，把日文译成简体中文。\
输入的每一行以 `#编号:` 开头，输出必须逐行对应，保留相同的编号前缀，\
不要合并或拆分行，不要添加解释。";

/// GPT 翻译配置
#[derive(Debug, Clone)]
pub struct GptTranslatorConfig {
    /// 如 `https://api.openai.com/v1`
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl GptTranslatorConfig {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Debug, Deserialize)]
struct ChatContent {
    #[serde(default)]
    content: Option<String>,
}

/// GPT 翻译客户端
pub struct GptTranslator {
    client: Client,
    config: GptTranslatorConfig,
}

impl GptTranslator {
    pub fn new(config: GptTranslatorConfig) -> Result<Self, TranslatorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TranslatorError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    async fn translate_batch(&self, batch: &[String]) -> Result<Vec<Option<String>>, TranslatorError> {
        let prompt = number_lines(batch);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
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

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| TranslatorError::InvalidResponse("empty completion".to_string()))?;

        Ok(parse_numbered(&content, batch.len()))
    }
}

fn number_lines(lines: &[String]) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("#{}:{}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 按 `#N:` 编号取回译文，缺失或越界的编号为 None
fn parse_numbered(content: &str, expected: usize) -> Vec<Option<String>> {
    let mut by_number: HashMap<usize, String> = HashMap::new();
    for line in content.lines() {
        let Some(rest) = line.trim_start().strip_prefix('#') else {
            continue;
        };
        let Some((pos, sep)) = rest.char_indices().find(|(_, c)| *c == ':' || *c == '：') else {
            continue;
        };
        let (number, text) = (&rest[..pos], &rest[pos + sep.len_utf8()..]);
        if let Ok(number) = number.trim().parse::<usize>() {
            by_number.entry(number).or_insert_with(|| text.trim().to_string());
        }
    }

    (1..=expected).map(|n| by_number.remove(&n)).collect()
}

#[async_trait]
impl TranslatorPort for GptTranslator {
    fn engine(&self) -> TranslatorEngine {
        TranslatorEngine::Gpt
    }

    async fn translate(&self, lines: &[String]) -> Result<Vec<Option<String>>, TranslatorError> {
        let mut output = Vec::with_capacity(lines.len());
        for batch in batches(lines, MAX_BATCH_CHARS) {
            output.extend(self.translate_batch(batch).await?);
        }

        tracing::debug!(
            model = %self.config.model,
            lines = lines.len(),
            translated = output.iter().filter(|l| l.is_some()).count(),
            "GPT translation completed"
        );
        Ok(output)
    }
}
