use thiserror::Error;

/// 审查错误类型
#[derive(Error, Debug, Clone)]
pub enum ReviewError {
    #[error("配置错误: {message}")]
    Configuration { message: String },

    #[error("AI 服务限流: {provider} - {message}")]
    RateLimited { provider: String, message: String },

    #[error("重试次数已用尽，仍被限流（共尝试 {attempts} 次）")]
    RateLimitExceeded { attempts: u32 },

    #[error("AI 服务错误: {provider} - {message}")]
    Service { provider: String, message: String },

    #[error("网络错误: {message}")]
    Network { message: String, url: Option<String> },
}

impl ReviewError {
    /// 检查错误是否可重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReviewError::RateLimited { .. })
    }

    /// 创建配置错误
    pub fn config(message: impl Into<String>) -> Self {
        ReviewError::Configuration {
            message: message.into(),
        }
    }

    /// 创建限流错误
    pub fn rate_limited(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ReviewError::RateLimited {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// 创建 AI 服务错误
    pub fn service(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ReviewError::Service {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// 创建网络错误
    pub fn network(message: impl Into<String>, url: Option<String>) -> Self {
        ReviewError::Network {
            message: message.into(),
            url,
        }
    }
}

impl From<reqwest::Error> for ReviewError {
    fn from(error: reqwest::Error) -> Self {
        ReviewError::Network {
            message: error.to_string(),
            url: error.url().map(|u| u.to_string()),
        }
    }
}
