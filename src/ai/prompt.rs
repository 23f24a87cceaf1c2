use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::sync::RwLock;

use crate::infrastructure::error::ReviewError;

/// 审查类型，决定发送给 AI 服务的指令模板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewType {
    /// 通用审查（代码质量、bug、最佳实践）
    General,
    /// 安全审查（漏洞、输入校验）
    Security,
    /// 性能审查（复杂度、优化空间）
    Performance,
}

impl ReviewType {
    pub const ALL: [ReviewType; 3] = [
        ReviewType::General,
        ReviewType::Security,
        ReviewType::Performance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewType::General => "general",
            ReviewType::Security => "security",
            ReviewType::Performance => "performance",
        }
    }

    /// 菜单和报告中显示的说明文字
    pub fn description(&self) -> &'static str {
        match self {
            ReviewType::General => "通用审查（代码质量、bug、最佳实践）",
            ReviewType::Security => "安全审查（漏洞、输入校验）",
            ReviewType::Performance => "性能审查（复杂度、优化空间）",
        }
    }

    /// 解析审查类型，只接受三个固定值
    pub fn parse(value: &str) -> Result<Self, ReviewError> {
        match value.trim().to_lowercase().as_str() {
            "general" => Ok(ReviewType::General),
            "security" => Ok(ReviewType::Security),
            "performance" => Ok(ReviewType::Performance),
            other => Err(ReviewError::config(format!(
                "不支持的审查类型: {}，可选值为 general、security、performance",
                other
            ))),
        }
    }

    fn template_file(&self) -> &'static str {
        match self {
            ReviewType::General => "general.txt",
            ReviewType::Security => "security.txt",
            ReviewType::Performance => "performance.txt",
        }
    }

    fn builtin_template(&self) -> &'static str {
        match self {
            ReviewType::General => include_str!("../../prompts/general.txt"),
            ReviewType::Security => include_str!("../../prompts/security.txt"),
            ReviewType::Performance => include_str!("../../prompts/performance.txt"),
        }
    }
}

impl std::fmt::Display for ReviewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// 提示模板缓存，按审查类型各加载一次
static PROMPT_CACHE: Lazy<RwLock<HashMap<ReviewType, String>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

// 加载指定类型的模板：优先用 AI_REVIEW_PROMPT_DIR 下的同名文件，失败则用内置模板
fn load_template(review_type: ReviewType) -> String {
    if let Ok(dir) = env::var("AI_REVIEW_PROMPT_DIR") {
        let path = std::path::Path::new(&dir).join(review_type.template_file());
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => return content,
                Err(e) => {
                    eprintln!("无法读取提示词文件 {}: {}，使用内置模板", path.display(), e);
                }
            }
        }
    }
    review_type.builtin_template().to_owned()
}

/// 根据审查类型渲染提示词，{{code_snippet}} 占位符替换为待审查代码
pub fn build_prompt(code: &str, review_type: ReviewType) -> String {
    // 检查缓存
    {
        let cache = PROMPT_CACHE.read().unwrap();
        if let Some(template) = cache.get(&review_type) {
            return template.replace("{{code_snippet}}", code);
        }
    }

    // 加载并缓存模板
    let template = load_template(review_type);
    PROMPT_CACHE
        .write()
        .unwrap()
        .insert(review_type, template.clone());

    template.replace("{{code_snippet}}", code)
}
