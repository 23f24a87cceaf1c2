use std::io::{self, Read, Write};

use crate::ai::prompt::ReviewType;
use crate::review::ReviewResult;

/// 用户交互界面模块
/// 处理命令行菜单、代码输入和审查结果展示

/// 菜单选择结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// 以指定类型发起一次审查
    Review(ReviewType),
    /// 退出程序
    Exit,
}

/// 显示欢迎信息
pub fn print_welcome() {
    println!("==============================================");
    println!(" AI 代码审查助手");
    println!(" 将代码片段发送给 AI 服务，按类别展示审查意见");
    println!();
    println!(" 注意：部分服务有请求频率限制，触发限流时会");
    println!(" 自动按指数退避重试。");
    println!("==============================================");
}

fn parse_menu_choice(input: &str) -> Option<MenuChoice> {
    match input.trim() {
        "1" => Some(MenuChoice::Review(ReviewType::General)),
        "2" => Some(MenuChoice::Review(ReviewType::Security)),
        "3" => Some(MenuChoice::Review(ReviewType::Performance)),
        "4" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// 显示菜单并读取用户选择，无效输入会要求重新输入
pub fn prompt_menu_choice() -> anyhow::Result<MenuChoice> {
    println!();
    println!("可用的审查类型:");
    for (index, review_type) in ReviewType::ALL.iter().enumerate() {
        println!("{}. {}", index + 1, review_type.description());
    }
    println!("4. 退出");

    loop {
        print!("\n请选择审查类型 (1-4): ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // 输入流结束视为退出
            return Ok(MenuChoice::Exit);
        }

        match parse_menu_choice(&input) {
            Some(choice) => return Ok(choice),
            None => println!("无效选择，请输入 1-4"),
        }
    }
}

/// 读取多行代码，直到输入流结束（Ctrl+D）
pub fn read_code_snippet() -> anyhow::Result<String> {
    println!("\n请输入要审查的代码（输入完成后按 Ctrl+D 结束）:");

    let mut code = String::new();
    io::stdin().read_to_string(&mut code)?;
    Ok(code)
}

/// 回显待审查的代码
pub fn display_snippet(code: &str) {
    println!("\n---------- 待审查代码 ----------");
    println!("{}", code.trim_end());
    println!("--------------------------------");
}

/// 展示审查结果
pub fn display_result(result: &ReviewResult) {
    println!("\n🤖 审查意见（{}）:", result.review_type.description());
    println!();
    println!("{}", result.formatted_text);
}
