// ==========================================
// 留置质量报表系统 - 命令实现
// ==========================================
// 职责: 命令行参数 → 会话重配置 → 报表/导出/配置保存
// 错误: 会话层返回 ApiError，此处统一转为 anyhow 交给 main 输出
// ==========================================

use crate::api::{LoadSummary, ReportSession};
use crate::app::cli::{DatasetArgs, InspectArgs, ReportArgs};
use crate::app::render::render_report;
use crate::config::{default_config_path, ConfigManager, ReportConfig};
use crate::i18n::t_with_args;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// inspect 输出
#[derive(Debug, Serialize)]
pub struct InspectOutput {
    #[serde(flatten)]
    pub load: LoadSummary,
    pub codes: Vec<String>,
    pub lines: Vec<String>,
    pub reasons: Vec<String>,
    pub teams: Vec<String>,
}

/// 读取会话配置（显式路径优先，其次平台默认路径；文件不存在时使用默认配置）
pub fn load_config(path: Option<&PathBuf>) -> Result<ReportConfig> {
    let path = match path {
        Some(path) => path.clone(),
        None => match default_config_path() {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "无默认配置目录，使用默认配置");
                return Ok(ReportConfig::default());
            }
        },
    };
    let config = ConfigManager::new(&path)
        .load_or_default()
        .with_context(|| format!("读取会话配置失败: {}", path.display()))?;
    Ok(config)
}

/// 加载两个数据集；失败时给出当前语言的中止提示
fn load_datasets(session: &mut ReportSession, datasets: &DatasetArgs) -> Result<LoadSummary> {
    session
        .load(&datasets.production, &datasets.retention)
        .map_err(|e| anyhow!(e.user_message()))
}

// ==========================================
// inspect
// ==========================================
pub fn run_inspect(args: InspectArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    let mut session = ReportSession::new(config);
    let load = load_datasets(&mut session, &args.datasets)?;

    let output = InspectOutput {
        load,
        codes: session.discovered_codes()?,
        lines: session.line_names(),
        reasons: session.reasons()?,
        teams: session.teams()?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_inspect(&output));
    }
    Ok(())
}

fn render_inspect(output: &InspectOutput) -> String {
    let p = &output.load.production_schema;
    let r = &output.load.retention_schema;
    let optional = |col: &Option<String>| col.clone().unwrap_or_else(|| "-".to_string());

    let mut lines = vec![
        format!("produção: {} registros", output.load.production_rows),
        format!(
            "  equipe={} linha={} produzido={} data={}",
            p.team,
            p.line,
            p.produced,
            optional(&p.date)
        ),
        format!("retidos: {} registros", output.load.retention_rows),
        format!(
            "  motivo={} retido={} equipe={} linha={} data={}",
            r.reason,
            r.retained,
            r.team,
            r.line,
            optional(&r.date)
        ),
    ];
    lines.push(format!("códigos: {}", output.codes.join(", ")));
    lines.push(format!("linhas: {}", output.lines.join(", ")));
    lines.push(format!("motivos: {}", output.reasons.join(", ")));
    lines.push(format!("equipes: {}", output.teams.join(", ")));

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

// ==========================================
// report
// ==========================================
pub fn run_report(args: ReportArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    let mut session = ReportSession::new(config);
    load_datasets(&mut session, &args.datasets)?;

    apply_overrides(&mut session, &args)?;

    let report = match &args.export {
        Some(path) => {
            let report = session.export_xlsx(path)?;
            eprintln!(
                "{}",
                t_with_args("report.exported", &[("path", &path.display().to_string())])
            );
            report
        }
        None => session.build_report()?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    if let Some(path) = &args.save_config {
        ConfigManager::new(path)
            .save(session.config())
            .with_context(|| format!("保存会话配置失败: {}", path.display()))?;
        info!(path = %path.display(), "会话配置已保存");
    }
    Ok(())
}

/// 按命令行参数修改会话配置（任一项校验失败即中止）
pub fn apply_overrides(session: &mut ReportSession, args: &ReportArgs) -> Result<()> {
    if let Some(target) = args.target {
        session.set_target_pct(target)?;
    }
    for (code, line) in &args.mappings {
        session.rename_line(code, line)?;
    }
    for (name, lines) in &args.line_groups {
        session.create_line_group(name, lines.clone())?;
    }
    for (name, reasons) in &args.defect_groups {
        session.create_defect_group(name, reasons.clone())?;
    }
    if !args.excluded.is_empty() {
        session.set_excluded_reasons(args.excluded.clone());
    }
    if args.reason.is_some() {
        session.select_reason(args.reason.clone());
    }

    let mut targets = session.config().reason_targets.clone();
    if let Some(limit) = args.quantity_limit {
        targets.quantity_limit = limit;
        targets.quantity_limit_enabled = true;
    }
    if args.no_quantity_limit {
        targets.quantity_limit_enabled = false;
    }
    if let Some(limit) = args.count_limit {
        targets.count_limit = limit;
    }
    if args.enable_count_limit {
        targets.count_limit_enabled = true;
    }
    session.set_reason_targets(&targets)?;
    Ok(())
}
