// ==========================================
// 留置质量报表系统 - 应用层
// ==========================================
// 职责: 命令行集成，连接用户输入与报表会话
// ==========================================

pub mod cli;
pub mod commands;
pub mod render;

// 重导出
pub use cli::{Cli, Commands};
pub use commands::{apply_overrides, load_config, run_inspect, run_report};
pub use render::{render_report, render_summary, TextTable};
