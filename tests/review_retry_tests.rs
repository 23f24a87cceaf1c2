use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use ai_review::ai::prompt::ReviewType;
use ai_review::ai::providers::AIProvider;
use ai_review::ai::retry::{RetryPolicy, RetryingClient, Sleeper};
use ai_review::infrastructure::error::ReviewError;
use ai_review::review::{ReviewRequest, ReviewService};

/// Mock provider for testing retry behaviour
struct MockRetryProvider {
    attempt_count: Arc<AtomicU32>,
    failures_before_success: u32,
    failure: ReviewError,
    last_prompt: Arc<Mutex<Option<String>>>,
}

impl MockRetryProvider {
    fn new(failures_before_success: u32, failure: ReviewError) -> Self {
        Self {
            attempt_count: Arc::new(AtomicU32::new(0)),
            failures_before_success,
            failure,
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    fn rate_limited(failures_before_success: u32) -> Self {
        Self::new(
            failures_before_success,
            ReviewError::rate_limited("mock", "requests rate limit exceeded"),
        )
    }

    fn attempt_counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.attempt_count)
    }

    fn prompt_recorder(&self) -> Arc<Mutex<Option<String>>> {
        Arc::clone(&self.last_prompt)
    }
}

#[async_trait]
impl AIProvider for MockRetryProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn send(&self, prompt: &str) -> Result<String, ReviewError> {
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        let current = self.attempt_count.fetch_add(1, Ordering::SeqCst);
        if current < self.failures_before_success {
            return Err(self.failure.clone());
        }
        Ok("The code looks reasonable.".to_string())
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// 记录每次等待时长的虚拟时钟，测试无需真实延迟
struct RecordingSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    fn new() -> (Self, Arc<Mutex<Vec<Duration>>>) {
        let sleeps = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                sleeps: Arc::clone(&sleeps),
            },
            sleeps,
        )
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        initial_delay: Duration::from_millis(10),
        backoff_multiplier: 2.0,
        max_attempts,
        max_delay: Duration::from_secs(1),
    }
}

#[tokio::test]
async fn test_succeeds_after_rate_limits_with_exponential_delays() {
    let provider = MockRetryProvider::rate_limited(2);
    let attempts = provider.attempt_counter();
    let (sleeper, sleeps) = RecordingSleeper::new();

    let client = RetryingClient::with_sleeper(Box::new(provider), fast_policy(5), Box::new(sleeper));
    let result = client.send("review this").await;

    assert_eq!(result.unwrap(), "The code looks reasonable.");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);

    // 第 n 次重试前的延迟应为 initial_delay * multiplier^(n-1)
    let recorded = sleeps.lock().unwrap().clone();
    assert_eq!(
        recorded,
        vec![Duration::from_millis(10), Duration::from_millis(20)]
    );
}

#[tokio::test]
async fn test_exhausted_retries_fail_with_rate_limit_exceeded() {
    let provider = MockRetryProvider::rate_limited(u32::MAX);
    let attempts = provider.attempt_counter();
    let (sleeper, sleeps) = RecordingSleeper::new();

    let client = RetryingClient::with_sleeper(Box::new(provider), fast_policy(3), Box::new(sleeper));
    let result = client.send("review this").await;

    match result {
        Err(ReviewError::RateLimitExceeded { attempts: reported }) => assert_eq!(reported, 3),
        other => panic!("expected RateLimitExceeded, got {:?}", other),
    }

    // 恰好尝试 max_attempts 次，不多不少；最后一次失败后不再等待
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(sleeps.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_service_error_fails_immediately_without_retry() {
    let provider =
        MockRetryProvider::new(u32::MAX, ReviewError::service("mock", "invalid model"));
    let attempts = provider.attempt_counter();
    let (sleeper, sleeps) = RecordingSleeper::new();

    let client = RetryingClient::with_sleeper(Box::new(provider), fast_policy(5), Box::new(sleeper));
    let result = client.send("review this").await;

    assert!(matches!(result, Err(ReviewError::Service { .. })));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert!(sleeps.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_network_error_fails_immediately_without_retry() {
    let provider = MockRetryProvider::new(
        u32::MAX,
        ReviewError::network("connection refused", None),
    );
    let attempts = provider.attempt_counter();
    let (sleeper, sleeps) = RecordingSleeper::new();

    let client = RetryingClient::with_sleeper(Box::new(provider), fast_policy(5), Box::new(sleeper));
    let result = client.send("review this").await;

    assert!(matches!(result, Err(ReviewError::Network { .. })));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert!(sleeps.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_delay_growth_capped_by_max_delay() {
    let provider = MockRetryProvider::rate_limited(u32::MAX);
    let (sleeper, sleeps) = RecordingSleeper::new();

    let policy = RetryPolicy {
        initial_delay: Duration::from_millis(10),
        backoff_multiplier: 10.0,
        max_attempts: 4,
        max_delay: Duration::from_millis(50),
    };
    let client = RetryingClient::with_sleeper(Box::new(provider), policy, Box::new(sleeper));
    let result = client.send("review this").await;

    assert!(matches!(result, Err(ReviewError::RateLimitExceeded { .. })));
    let recorded = sleeps.lock().unwrap().clone();
    assert_eq!(
        recorded,
        vec![
            Duration::from_millis(10),
            Duration::from_millis(50),
            Duration::from_millis(50),
        ]
    );
}

#[tokio::test]
async fn test_each_review_type_tags_its_request() {
    let expectations = [
        (ReviewType::General, "Code quality and best practices"),
        (ReviewType::Security, "Security vulnerabilities"),
        (ReviewType::Performance, "Performance bottlenecks"),
    ];

    for (review_type, marker) in expectations {
        let provider = MockRetryProvider::rate_limited(0);
        let prompt_recorder = provider.prompt_recorder();
        let (sleeper, _sleeps) = RecordingSleeper::new();

        let service = ReviewService::with_client(RetryingClient::with_sleeper(
            Box::new(provider),
            fast_policy(5),
            Box::new(sleeper),
        ));

        let request = ReviewRequest::new("def add(a, b): return a + b", review_type);
        let result = service.submit(&request).await.unwrap();
        assert_eq!(result.review_type, review_type);

        let prompt = prompt_recorder.lock().unwrap().clone().unwrap();
        assert!(
            prompt.contains(marker),
            "{} prompt missing marker {:?}",
            review_type,
            marker
        );
        assert!(prompt.contains("def add(a, b): return a + b"));

        // 其他类型的特征指令不应出现
        for (other_type, other_marker) in expectations {
            if other_type != review_type {
                assert!(
                    !prompt.contains(other_marker),
                    "{} prompt unexpectedly contains {:?}",
                    review_type,
                    other_marker
                );
            }
        }
    }
}

#[tokio::test]
async fn test_submitted_result_is_formatted() {
    struct MessyProvider;

    #[async_trait]
    impl AIProvider for MessyProvider {
        fn name(&self) -> &str {
            "messy"
        }

        fn model(&self) -> &str {
            "messy-model"
        }

        async fn send(&self, _prompt: &str) -> Result<String, ReviewError> {
            Ok("Line one.   \r\n\r\n\r\n\r\nLine two.\r\n".to_string())
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    let service = ReviewService::with_client(RetryingClient::new(
        Box::new(MessyProvider),
        RetryPolicy::default(),
    ));

    let request = ReviewRequest::new("code", ReviewType::General);
    let result = service.submit(&request).await.unwrap();

    assert_eq!(result.formatted_text, "Line one.\n\nLine two.");
    assert!(result.raw_text.contains('\r'));
}
