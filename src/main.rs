use ai_review::ai::prompt::ReviewType;
use ai_review::cli::args::Args;
use ai_review::config::Config;
use ai_review::infrastructure::error::ReviewError;
use ai_review::infrastructure::setup_logging;
use ai_review::review::{ReportFormat, ReviewRequest, ReviewResult, ReviewService};
use ai_review::ui;
use clap::Parser;
use std::io::Read;

fn read_code_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut code = String::new();
        std::io::stdin().read_to_string(&mut code)?;
        Ok(code)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn write_report(result: &ReviewResult, format: ReportFormat, output: Option<&str>) -> anyhow::Result<()> {
    let report = result.render(format)?;
    match output {
        Some(path) => {
            std::fs::write(path, &report)?;
            println!("✅ 审查报告已保存到: {}", path);
        }
        None => println!("{}", report),
    }
    Ok(())
}

async fn handle_single_review(args: &Args, config: &Config) -> anyhow::Result<()> {
    let code = read_code_input(args.file.as_deref().unwrap_or("-"))?;
    if code.trim().is_empty() {
        anyhow::bail!("没有提供代码，无法进行审查");
    }

    let review_type = ReviewType::parse(&args.review_type)?;
    let format = ReportFormat::parse(&args.format)?;

    let service = ReviewService::new(config)?;
    let request = ReviewRequest::new(code, review_type);
    let result = service.submit(&request).await?;

    if config.debug {
        println!("AI 审查耗时: {} ms", result.duration_ms);
    }

    write_report(&result, format, args.output.as_deref())
}

async fn run_interactive(args: &Args, config: &Config) -> anyhow::Result<()> {
    let format = ReportFormat::parse(&args.format)?;
    let service = ReviewService::new(config)?;

    ui::print_welcome();

    loop {
        let review_type = match ui::prompt_menu_choice()? {
            ui::MenuChoice::Exit => break,
            ui::MenuChoice::Review(review_type) => review_type,
        };

        let code = ui::read_code_snippet()?;
        if code.trim().is_empty() {
            println!("❌ 没有提供代码，请重试");
            continue;
        }

        ui::display_snippet(&code);
        println!("\n正在执行审查...");

        let request = ReviewRequest::new(code, review_type);
        match service.submit(&request).await {
            Ok(result) => {
                if config.debug {
                    println!("AI 审查耗时: {} ms", result.duration_ms);
                }
                ui::display_result(&result);
                if args.output.is_some() {
                    write_report(&result, format, args.output.as_deref())?;
                }
            }
            Err(err @ ReviewError::RateLimitExceeded { .. }) => {
                eprintln!("\n❌ {}", err);
                eprintln!("提示：请等待几分钟后再发起新的审查，避免持续触发限流。");
                return Err(err.into());
            }
            Err(err) => {
                eprintln!("\n❌ 审查失败: {}", err);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = Config::new();
    config.update_from_args(&args);

    setup_logging(config.debug)?;
    config.validate()?;

    if args.file.is_some() {
        handle_single_review(&args, &config).await
    } else {
        run_interactive(&args, &config).await
    }
}
