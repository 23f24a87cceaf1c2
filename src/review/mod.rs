pub mod formatter;
pub mod result;

pub use result::{ReportFormat, ReviewRequest, ReviewResult};

use std::sync::Arc;
use std::time::Instant;

use crate::ai::retry::RetryingClient;
use crate::ai::{create_provider, prompt};
use crate::config::Config;
use crate::infrastructure::error::ReviewError;
use crate::infrastructure::network::{build_client, NetworkConfig};

/// 代码审查服务，串起提示词构造、带重试的 AI 调用和结果整理
pub struct ReviewService {
    client: RetryingClient,
}

impl ReviewService {
    /// 根据配置构建服务
    pub fn new(config: &Config) -> Result<Self, ReviewError> {
        let http_client = Arc::new(build_client(&NetworkConfig::default())?);
        let provider = create_provider(config, http_client)?;
        Ok(Self::with_client(RetryingClient::new(
            provider,
            config.retry_policy(),
        )))
    }

    /// 直接注入已组装好的客户端，测试时配合虚拟时钟使用
    pub fn with_client(client: RetryingClient) -> Self {
        Self { client }
    }

    /// 提交一次审查请求，返回整理好的结果
    pub async fn submit(&self, request: &ReviewRequest) -> Result<ReviewResult, ReviewError> {
        let prompt_text = prompt::build_prompt(&request.code, request.review_type);

        let started = Instant::now();
        let raw_text = self.client.send(&prompt_text).await?;
        let duration_ms = started.elapsed().as_millis() as u64;

        tracing::debug!(
            provider = self.client.provider_name(),
            duration_ms,
            "审查请求完成"
        );

        let formatted_text = formatter::format(&raw_text);
        Ok(ReviewResult {
            review_type: request.review_type,
            provider: self.client.provider_name().to_string(),
            model: self.client.model().to_string(),
            raw_text,
            formatted_text,
            duration_ms,
        })
    }
}
