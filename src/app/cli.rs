// ==========================================
// 留置质量报表系统 - 命令行参数
// ==========================================
// 职责: clap 派生的命令行定义与 "NAME=..." 形式参数的解析
// ==========================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "retention-report", version, about = "产量与留置质量报表")]
pub struct Cli {
    /// 界面语言（pt-BR / en / zh-CN）
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// 以 JSON 格式输出日志
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 查看解析到的列、代码、产线、原因与班组
    Inspect(InspectArgs),
    /// 生成报表（可导出 .xlsx）
    Report(ReportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// 产量文件（.xlsx/.xls/.csv/.txt）
    #[arg(long, short = 'p')]
    pub production: PathBuf,

    /// 留置文件（.xlsx/.xls/.csv/.txt）
    #[arg(long, short = 'r')]
    pub retention: PathBuf,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub datasets: DatasetArgs,

    /// 会话配置文件（默认: 平台配置目录）
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 输出 JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub datasets: DatasetArgs,

    /// 会话配置文件（默认: 平台配置目录）
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 目标百分比（0–5）
    #[arg(long)]
    pub target: Option<f64>,

    /// 代码 → 产线名，例: --map F1="Linha 1"
    #[arg(long = "map", value_name = "CODE=LINE", value_parser = parse_assignment)]
    pub mappings: Vec<(String, String)>,

    /// 产线分组，例: --line-group "Fábrica 1=Linha 1,Linha 2"
    #[arg(long = "line-group", value_name = "NAME=L1,L2", value_parser = parse_group)]
    pub line_groups: Vec<(String, Vec<String>)>,

    /// 缺陷分组，例: --defect-group "Superfície=Risco,Mancha"
    #[arg(long = "defect-group", value_name = "NAME=R1,R2", value_parser = parse_group)]
    pub defect_groups: Vec<(String, Vec<String>)>,

    /// 从 KPI 中排除的原因（可重复）
    #[arg(long = "exclude", value_name = "REASON")]
    pub excluded: Vec<String>,

    /// 原因下钻
    #[arg(long)]
    pub reason: Option<String>,

    /// 下钻面积阈值
    #[arg(long)]
    pub quantity_limit: Option<f64>,

    /// 关闭面积阈值
    #[arg(long)]
    pub no_quantity_limit: bool,

    /// 下钻次数阈值
    #[arg(long)]
    pub count_limit: Option<usize>,

    /// 启用次数阈值
    #[arg(long)]
    pub enable_count_limit: bool,

    /// 导出合并汇总表到 .xlsx
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// 输出 JSON
    #[arg(long)]
    pub json: bool,

    /// 保存本次会话配置
    #[arg(long)]
    pub save_config: Option<PathBuf>,
}

/// 解析 "KEY=VALUE"
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("格式应为 KEY=VALUE: {}", raw))?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return Err(format!("KEY 与 VALUE 均不能为空: {}", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

/// 解析 "NAME=A,B,C"
pub fn parse_group(raw: &str) -> Result<(String, Vec<String>), String> {
    let (name, members) = parse_assignment(raw)?;
    let members: Vec<String> = members
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    if members.is_empty() {
        return Err(format!("分组 {} 至少需要一个成员", name));
    }
    Ok((name, members))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("F1 = Linha 1").unwrap(),
            ("F1".to_string(), "Linha 1".to_string())
        );
        assert!(parse_assignment("F1").is_err());
        assert!(parse_assignment("=Linha").is_err());
    }

    #[test]
    fn test_parse_group() {
        let (name, members) = parse_group("Fábrica 1=Linha 1, Linha 2,").unwrap();
        assert_eq!(name, "Fábrica 1");
        assert_eq!(members, vec!["Linha 1", "Linha 2"]);
        assert!(parse_group("G= , ").is_err());
    }

    #[test]
    fn test_cli_parses_report_flags() {
        let cli = Cli::try_parse_from([
            "retention-report",
            "report",
            "-p",
            "prod.csv",
            "-r",
            "ret.csv",
            "--target",
            "1.5",
            "--map",
            "F1=Linha 1",
            "--line-group",
            "Fábrica=Linha 1,F2",
            "--exclude",
            "Setup",
            "--exclude",
            "Limpeza",
            "--reason",
            "Trinca",
            "--no-quantity-limit",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.target, Some(1.5));
                assert_eq!(args.mappings.len(), 1);
                assert_eq!(args.line_groups[0].1, vec!["Linha 1", "F2"]);
                assert_eq!(args.excluded, vec!["Setup", "Limpeza"]);
                assert!(args.no_quantity_limit);
                assert!(!args.enable_count_limit);
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
