use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::ai::retry::RetryPolicy;

/// 应用配置，优先级：命令行参数 > 环境变量 > .env 文件 > 默认值
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: String,
    pub model: String,
    pub mistral_api_key: Option<String>,
    pub mistral_url: String,
    pub deepseek_api_key: Option<String>,
    pub deepseek_url: String,
    pub ollama_url: String,
    pub retry_max_attempts: u32,
    pub retry_initial_delay_ms: u64,
    pub debug: bool,
}

impl Config {
    pub fn new() -> Self {
        // 默认配置
        let mut config = Config {
            provider: "ollama".to_string(),
            model: String::new(),
            mistral_api_key: None,
            mistral_url: "https://api.mistral.ai/v1/chat/completions".to_string(),
            deepseek_api_key: None,
            deepseek_url: "https://api.deepseek.com/v1/chat/completions".to_string(),
            ollama_url: "http://localhost:11434/api/generate".to_string(),
            retry_max_attempts: 5,
            retry_initial_delay_ms: 1000,
            debug: false,
        };

        // 加载配置文件
        #[cfg(not(test))]
        config.load_from_env_file();
        // 加载环境变量（覆盖配置文件）
        config.load_from_env();

        config
    }

    pub fn load_from_env_file(&mut self) {
        // 尝试从用户主目录加载
        if let Ok(home) = env::var("HOME") {
            let user_env_path = PathBuf::from(format!("{}/.ai-review/.env", home));
            if user_env_path.exists() {
                dotenvy::from_path(user_env_path).ok();
            }
        }

        // 尝试从当前目录加载
        dotenvy::dotenv().ok();
    }

    pub fn load_from_env(&mut self) {
        if let Ok(provider) = env::var("AI_REVIEW_PROVIDER") {
            self.provider = provider;
        }
        if let Ok(model) = env::var("AI_REVIEW_MODEL") {
            self.model = model;
        }
        if let Ok(api_key) = env::var("AI_REVIEW_MISTRAL_API_KEY") {
            self.mistral_api_key = Some(api_key);
        }
        if let Ok(url) = env::var("AI_REVIEW_MISTRAL_URL") {
            self.mistral_url = url;
        }
        if let Ok(api_key) = env::var("AI_REVIEW_DEEPSEEK_API_KEY") {
            self.deepseek_api_key = Some(api_key);
        }
        if let Ok(url) = env::var("AI_REVIEW_DEEPSEEK_URL") {
            self.deepseek_url = url;
        }
        if let Ok(url) = env::var("AI_REVIEW_OLLAMA_URL") {
            self.ollama_url = url;
        }
        if let Ok(value) = env::var("AI_REVIEW_RETRY_MAX_ATTEMPTS") {
            match value.parse() {
                Ok(attempts) => self.retry_max_attempts = attempts,
                Err(_) => eprintln!("AI_REVIEW_RETRY_MAX_ATTEMPTS 不是有效数字: {}", value),
            }
        }
        if let Ok(value) = env::var("AI_REVIEW_RETRY_INITIAL_DELAY_MS") {
            match value.parse() {
                Ok(delay) => self.retry_initial_delay_ms = delay,
                Err(_) => eprintln!("AI_REVIEW_RETRY_INITIAL_DELAY_MS 不是有效数字: {}", value),
            }
        }
        if env::var("AI_REVIEW_DEBUG").is_ok() {
            self.debug = true;
        }
    }

    pub fn update_from_args(&mut self, args: &crate::cli::args::Args) {
        // 命令行参数优先级最高
        if !args.provider.is_empty() {
            self.provider = args.provider.clone();
        }
        if !args.model.is_empty() {
            self.model = args.model.clone();
        }
        if args.debug {
            self.debug = true;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        match self.provider.as_str() {
            "mistral" => {
                if self.mistral_api_key.is_none() {
                    anyhow::bail!("Mistral API key is required but not set. Please set AI_REVIEW_MISTRAL_API_KEY environment variable or in .env file");
                }
            }
            "deepseek" => {
                if self.deepseek_api_key.is_none() {
                    anyhow::bail!("DeepSeek API key is required but not set. Please set AI_REVIEW_DEEPSEEK_API_KEY environment variable or in .env file");
                }
            }
            "ollama" => {
                // Ollama 使用本地服务，不需要 API key
            }
            _ => {
                anyhow::bail!("Unsupported provider: {}", self.provider);
            }
        }

        if self.retry_max_attempts == 0 {
            anyhow::bail!("AI_REVIEW_RETRY_MAX_ATTEMPTS must be at least 1");
        }

        Ok(())
    }

    /// 由配置生成重试策略，倍率和延迟上限使用默认值
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
            max_attempts: self.retry_max_attempts,
            ..RetryPolicy::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
