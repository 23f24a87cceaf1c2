use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    name = "ai-review",
    version,
    about = "AI 代码审查助手 - 将代码片段发送给 AI 服务，按类别展示审查意见",
    long_about = "ai-review 是一个轻量的代码审查命令行工具，支持通用、安全、性能三类审查，支持多种 AI 提供商（ollama、mistral、deepseek）。触发服务限流时按指数退避自动重试。"
)]
pub struct Args {
    /// AI provider to use (ollama, mistral, or deepseek)
    #[arg(short = 'P', long, default_value = "")] // 空字符串表示未指定
    pub provider: String,

    /// Model to use (defaults to the provider's recommended model)
    #[arg(short, long, default_value = "")] // 空字符串表示未指定
    pub model: String,

    /// 审查类型（general、security、performance）
    #[arg(
        short = 'r',
        long = "review-type",
        value_name = "TYPE",
        default_value = "general"
    )]
    pub review_type: String,

    /// 从文件读取待审查代码，"-" 表示标准输入；不指定则进入交互模式
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<String>,

    /// 审查报告输出格式（text、markdown、json）
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub format: String,

    /// 审查报告写入文件（不指定则打印到控制台）
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<String>,

    /// 显示调试信息
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
