use serde::{Deserialize, Serialize};

use crate::ai::prompt::ReviewType;
use crate::infrastructure::error::ReviewError;

/// 审查请求，一次提交对应一个请求，提交后不再修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub code: String,
    pub review_type: ReviewType,
}

impl ReviewRequest {
    pub fn new(code: impl Into<String>, review_type: ReviewType) -> Self {
        Self {
            code: code.into(),
            review_type,
        }
    }
}

/// 审查结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResult {
    pub review_type: ReviewType,
    pub provider: String,
    pub model: String,
    pub raw_text: String,
    pub formatted_text: String,
    pub duration_ms: u64,
}

/// 报告格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Markdown,
    Json,
}

impl Default for ReportFormat {
    fn default() -> Self {
        ReportFormat::Text
    }
}

impl ReportFormat {
    pub fn parse(value: &str) -> Result<Self, ReviewError> {
        match value.trim().to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(ReviewError::config(format!(
                "不支持的报告格式: {}，可选值为 text、markdown、json",
                other
            ))),
        }
    }
}

impl ReviewResult {
    /// 按指定格式渲染审查报告
    pub fn render(&self, format: ReportFormat) -> Result<String, ReviewError> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Markdown => Ok(self.render_markdown()),
            ReportFormat::Json => serde_json::to_string_pretty(self).map_err(|e| {
                ReviewError::service(self.provider.clone(), format!("报告序列化失败: {}", e))
            }),
        }
    }

    fn render_text(&self) -> String {
        let mut output = String::new();
        output.push_str("=== 代码审查报告 ===\n\n");
        output.push_str(&format!("审查类型: {}\n", self.review_type.description()));
        output.push_str(&format!(
            "提供商: {} (模型: {})\n\n",
            self.provider, self.model
        ));
        output.push_str(&self.formatted_text);
        output.push('\n');
        output
    }

    fn render_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str("# 代码审查报告\n\n");
        output.push_str(&format!("- 审查类型: {}\n", self.review_type.as_str()));
        output.push_str(&format!("- 提供商: {}\n", self.provider));
        output.push_str(&format!("- 模型: {}\n\n", self.model));
        output.push_str("## 审查意见\n\n");
        output.push_str(&self.formatted_text);
        output.push('\n');
        output
    }
}
