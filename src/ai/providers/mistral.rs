use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ai::providers::{classify_api_error, AIProvider};
use crate::infrastructure::error::ReviewError;

/// Mistral AI 提供商
pub struct MistralProvider {
    client: Arc<reqwest::Client>,
    config: MistralProviderConfig,
}

#[derive(Debug, Clone)]
struct MistralProviderConfig {
    api_key: String,
    url: String,
    model: String,
}

/// Mistral API 请求结构
#[derive(Debug, Serialize)]
struct MistralApiRequest {
    model: String,
    messages: Vec<MistralMessage>,
    stream: bool,
}

/// Mistral 消息结构
#[derive(Debug, Serialize)]
struct MistralMessage {
    role: String,
    content: String,
}

/// Mistral API 响应结构
#[derive(Debug, Deserialize)]
struct MistralApiResponse {
    choices: Vec<MistralChoice>,
}

/// Mistral 选择结构
#[derive(Debug, Deserialize)]
struct MistralChoice {
    message: MistralResponseMessage,
}

/// Mistral 响应消息结构
#[derive(Debug, Deserialize)]
struct MistralResponseMessage {
    content: String,
}

impl MistralProvider {
    /// 创建新的 Mistral 提供商
    pub fn new(
        client: Arc<reqwest::Client>,
        api_key: String,
        url: Option<String>,
        model: Option<String>,
    ) -> Self {
        let config = MistralProviderConfig {
            api_key,
            url: url
                .unwrap_or_else(|| "https://api.mistral.ai/v1/chat/completions".to_string()),
            model: model.unwrap_or_else(|| "mistral-large-latest".to_string()),
        };

        Self { client, config }
    }

    fn build_request(&self, prompt: &str) -> MistralApiRequest {
        MistralApiRequest {
            model: self.config.model.clone(),
            messages: vec![MistralMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        }
    }
}

#[async_trait]
impl AIProvider for MistralProvider {
    fn name(&self) -> &str {
        "mistral"
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

        let api_response: MistralApiResponse = response.json().await.map_err(|e| {
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
