use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ai::providers::{classify_api_error, AIProvider};
use crate::infrastructure::error::ReviewError;

/// DeepSeek AI 提供商
pub struct DeepSeekProvider {
    client: Arc<reqwest::Client>,
    config: DeepSeekProviderConfig,
}

#[derive(Debug, Clone)]
struct DeepSeekProviderConfig {
    api_key: String,
    url: String,
    model: String,
}

/// DeepSeek API 请求结构
#[derive(Debug, Serialize)]
struct DeepSeekApiRequest {
    model: String,
    messages: Vec<DeepSeekMessage>,
    stream: bool,
}

/// DeepSeek 消息结构
#[derive(Debug, Serialize)]
struct DeepSeekMessage {
    role: String,
    content: String,
}

/// DeepSeek API 响应结构
#[derive(Debug, Deserialize)]
struct DeepSeekApiResponse {
    choices: Vec<DeepSeekChoice>,
}

/// DeepSeek 选择结构
#[derive(Debug, Deserialize)]
struct DeepSeekChoice {
    message: DeepSeekResponseMessage,
}

/// DeepSeek 响应消息结构
#[derive(Debug, Deserialize)]
struct DeepSeekResponseMessage {
    content: String,
}

impl DeepSeekProvider {
    /// 创建新的 DeepSeek 提供商
    pub fn new(
        client: Arc<reqwest::Client>,
        api_key: String,
        url: Option<String>,
        model: Option<String>,
    ) -> Self {
        let config = DeepSeekProviderConfig {
            api_key,
            url: url
                .unwrap_or_else(|| "https://api.deepseek.com/v1/chat/completions".to_string()),
            model: model.unwrap_or_else(|| "deepseek-chat".to_string()),
        };

        Self { client, config }
    }

    fn build_request(&self, prompt: &str) -> DeepSeekApiRequest {
        DeepSeekApiRequest {
            model: self.config.model.clone(),
            messages: vec![DeepSeekMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        }
    }
}

#[async_trait]
impl AIProvider for DeepSeekProvider {
    fn name(&self) -> &str {
        "deepseek"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send(&self, prompt: &str) -> Result<String, ReviewError> {
        let request = self.build_request(prompt);

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(self.name(), status, &body));
        }

        let api_response: DeepSeekApiResponse = response.json().await.map_err(|e| {
            ReviewError::service(self.name(), format!("Failed to parse response: {}", e))
        })?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ReviewError::service(self.name(), "No choices in response"))?
            .message
            .content;

        Ok(content)
    }

    fn is_available(&self) -> bool {
        !self.config.api_key.is_empty()
    }
}
