// ==========================================
// 留置质量报表系统 - 命令行入口
// ==========================================

use anyhow::Result;
use clap::Parser;
use retention_report::app::{run_inspect, run_report, Cli, Commands};
use retention_report::{i18n, logging};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    if let Some(locale) = &cli.locale {
        if !i18n::SUPPORTED_LOCALES.contains(&locale.as_str()) {
            anyhow::bail!(
                "不支持的语言: {}（可选: {}）",
                locale,
                i18n::SUPPORTED_LOCALES.join(", ")
            );
        }
        i18n::set_locale(locale);
    }

    tracing::debug!(
        app = retention_report::APP_NAME,
        version = retention_report::VERSION,
        "启动"
    );

    match cli.command {
        Commands::Inspect(args) => run_inspect(args),
        Commands::Report(args) => run_report(args),
    }
}
