use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::infrastructure::error::ReviewError;

/// 网络客户端配置
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("ai-review/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// 构建共享的 HTTP 客户端，所有提供商复用同一个连接池
pub fn build_client(config: &NetworkConfig) -> Result<Client, ReviewError> {
    ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| ReviewError::network(format!("Failed to create HTTP client: {}", e), None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_config_default() {
        let config = NetworkConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.user_agent.contains("ai-review"));
    }

    #[test]
    fn test_build_client() {
        let config = NetworkConfig::default();
        assert!(build_client(&config).is_ok());
    }
}
