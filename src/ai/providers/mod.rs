use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;

use crate::config::Config;
use crate::infrastructure::error::ReviewError;

pub mod deepseek;
pub mod mistral;
pub mod ollama;

pub use deepseek::DeepSeekProvider;
pub use mistral::MistralProvider;
pub use ollama::OllamaProvider;

/// AI 提供商 trait，定义所有 AI 服务的通用接口
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// 获取提供商名称
    fn name(&self) -> &str;

    /// 实际使用的模型名称
    fn model(&self) -> &str;

    /// 发送提示词并返回完整回复文本
    async fn send(&self, prompt: &str) -> Result<String, ReviewError>;

    /// 检查服务是否可用
    fn is_available(&self) -> bool;
}

// 限流错误的特征文本，部分服务在 429 之外也会以消息文本报告限流
static RATE_LIMIT_PATTERNS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(rate limit|too many requests|requests rate limit exceeded)").unwrap()
});

/// 根据状态码和响应体把 API 错误分为限流和普通服务错误
pub(crate) fn classify_api_error(provider: &str, status: StatusCode, body: &str) -> ReviewError {
    if status == StatusCode::TOO_MANY_REQUESTS || RATE_LIMIT_PATTERNS.is_match(body) {
        ReviewError::rate_limited(provider, format!("状态码 {}: {}", status, body))
    } else {
        ReviewError::service(provider, format!("状态码 {}: {}", status, body))
    }
}

/// 根据配置构建选定的 AI 提供商
pub fn create_provider(
    config: &Config,
    client: Arc<reqwest::Client>,
) -> Result<Box<dyn AIProvider>, ReviewError> {
    let model = (!config.model.is_empty()).then(|| config.model.clone());

    match config.provider.as_str() {
        "mistral" => {
            let api_key = config.mistral_api_key.clone().ok_or_else(|| {
                ReviewError::config("Mistral API key is required but not set")
            })?;
            Ok(Box::new(MistralProvider::new(
                client,
                api_key,
                Some(config.mistral_url.clone()),
                model,
            )))
        }
        "deepseek" => {
            let api_key = config.deepseek_api_key.clone().ok_or_else(|| {
                ReviewError::config("DeepSeek API key is required but not set")
            })?;
            Ok(Box::new(DeepSeekProvider::new(
                client,
                api_key,
                Some(config.deepseek_url.clone()),
                model,
            )))
        }
        "ollama" => Ok(Box::new(OllamaProvider::new(
            client,
            Some(config.ollama_url.clone()),
            model,
        ))),
        other => Err(ReviewError::config(format!("不支持的提供商: {}", other))),
    }
}
