use std::time::Duration;

use async_trait::async_trait;

use crate::ai::providers::AIProvider;
use crate::infrastructure::error::ReviewError;

/// 指数退避重试策略
///
/// 初始延迟、倍率、最大尝试次数和延迟上限都是显式配置项。
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 第一次重试前的等待时间
    pub initial_delay: Duration,
    /// 每次重试后延迟的放大倍率
    pub backoff_multiplier: f64,
    /// 最大尝试次数（含第一次请求）
    pub max_attempts: u32,
    /// 单次等待的上限
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
            max_attempts: 5,
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// 第 n 次重试前的等待时间：initial_delay * multiplier^(n-1)，不超过 max_delay
    pub fn delay_before_retry(&self, retry_number: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(retry_number.saturating_sub(1) as i32);
        let delay = self.initial_delay.mul_f64(factor);
        delay.min(self.max_delay)
    }
}

/// 睡眠抽象，生产环境用 tokio 定时器，测试注入虚拟时钟
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// 基于 tokio::time::sleep 的默认实现
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// 带指数退避重试的 AI 客户端
///
/// 只对限流错误重试；其余错误立即上抛。重试次数用尽仍被限流时
/// 以 RateLimitExceeded 结束。单个 send 调用串行执行，重试状态
/// 不跨调用共享。
pub struct RetryingClient {
    provider: Box<dyn AIProvider>,
    policy: RetryPolicy,
    sleeper: Box<dyn Sleeper>,
}

impl RetryingClient {
    pub fn new(provider: Box<dyn AIProvider>, policy: RetryPolicy) -> Self {
        Self::with_sleeper(provider, policy, Box::new(TokioSleeper))
    }

    pub fn with_sleeper(
        provider: Box<dyn AIProvider>,
        policy: RetryPolicy,
        sleeper: Box<dyn Sleeper>,
    ) -> Self {
        Self {
            provider,
            policy,
            sleeper,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// 发送提示词，限流时按策略退避重试
    pub async fn send(&self, prompt: &str) -> Result<String, ReviewError> {
        for attempt in 1..=self.policy.max_attempts {
            match self.provider.send(prompt).await {
                Ok(text) => {
                    if attempt > 1 {
                        tracing::debug!(attempt, "请求在重试后成功");
                    }
                    return Ok(text);
                }
                Err(err) if err.is_retryable() => {
                    if attempt == self.policy.max_attempts {
                        tracing::warn!(
                            attempts = self.policy.max_attempts,
                            "重试次数用尽，仍被限流"
                        );
                        return Err(ReviewError::RateLimitExceeded {
                            attempts: self.policy.max_attempts,
                        });
                    }

                    let delay = self.policy.delay_before_retry(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "AI 服务限流，等待后重试"
                    );
                    self.sleeper.sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }

        // max_attempts 为 0 时不发起任何请求
        Err(ReviewError::RateLimitExceeded { attempts: 0 })
    }
}
