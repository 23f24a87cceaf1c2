use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ai::providers::{classify_api_error, AIProvider};
use crate::infrastructure::error::ReviewError;

/// Ollama AI 提供商，走本地服务，不需要 API key
pub struct OllamaProvider {
    client: Arc<reqwest::Client>,
    config: OllamaProviderConfig,
}

#[derive(Debug, Clone)]
struct OllamaProviderConfig {
    url: String,
    model: String,
}

/// Ollama API 请求结构
#[derive(Debug, Serialize)]
struct OllamaApiRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Ollama API 响应结构
#[derive(Debug, Deserialize)]
struct OllamaApiResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

/// Ollama 错误响应
#[derive(Debug, Deserialize)]
struct OllamaErrorResponse {
    error: String,
}

impl OllamaProvider {
    /// 创建新的 Ollama 提供商
    pub fn new(client: Arc<reqwest::Client>, url: Option<String>, model: Option<String>) -> Self {
        let config = OllamaProviderConfig {
            url: url.unwrap_or_else(|| "http://localhost:11434/api/generate".to_string()),
            model: model.unwrap_or_else(|| "mistral".to_string()),
        };

        Self { client, config }
    }
}

#[async_trait]
impl AIProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send(&self, prompt: &str) -> Result<String, ReviewError> {
        let request = OllamaApiRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let response = self
            .client
            .post(&self.config.url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            // Ollama 的错误信息包在 {"error": "..."} 里
            if let Ok(error_response) = serde_json::from_str::<OllamaErrorResponse>(&body) {
                return Err(classify_api_error(self.name(), status, &error_response.error));
            }
            return Err(classify_api_error(self.name(), status, &body));
        }

        let api_response: OllamaApiResponse = serde_json::from_str(&body).map_err(|e| {
            ReviewError::service(self.name(), format!("Failed to parse response: {}", e))
        })?;

        Ok(api_response.response)
    }

    fn is_available(&self) -> bool {
        true
    }
}
