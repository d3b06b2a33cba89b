// ==========================================
// 留置质量报表系统 - 文本输出
// ==========================================
// 职责: 报表的纯文本表格渲染（标签随当前语言切换）
// ==========================================

use crate::domain::{AggregateRow, MonthlyRow, Report};
use crate::i18n::{t, t_with_args};
use std::fmt::Write;

/// 左对齐文本表格
#[derive(Debug, Default)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                if idx < widths.len() {
                    widths[idx] = widths[idx].max(cell.chars().count());
                }
            }
        }

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&line(self.headers.as_slice()));
        out.push('\n');
        let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row.as_slice()));
            out.push('\n');
        }
        out
    }
}

fn number(value: f64) -> String {
    format!("{:.2}", value)
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}

fn marker(within: bool) -> &'static str {
    if within {
        "●"
    } else {
        "▲"
    }
}

fn aggregate_table(rows: &[&AggregateRow]) -> TextTable {
    let mut table = TextTable::new([
        t("header.team"),
        t("header.produced"),
        t("header.target"),
        t("header.retained"),
        t("header.balance"),
        t("header.realized"),
        t("header.status"),
    ]);
    for row in rows {
        table.push(vec![
            row.team.clone(),
            number(row.produced),
            number(row.target),
            number(row.retained),
            number(row.balance),
            percent(row.realized_pct),
            row.status.label(),
        ]);
    }
    table
}

fn monthly_table(rows: &[&MonthlyRow]) -> TextTable {
    let mut table = TextTable::new([
        t("header.month"),
        t("header.team"),
        t("header.produced"),
        t("header.target"),
        t("header.retained"),
        t("header.realized"),
        String::new(),
    ]);
    for row in rows {
        table.push(vec![
            row.month.to_string(),
            row.team.clone(),
            number(row.produced),
            number(row.target),
            number(row.retained),
            percent(row.realized_pct),
            marker(row.within_target).to_string(),
        ]);
    }
    table
}

/// 完整报表文本
pub fn render_report(report: &Report) -> String {
    let mut out = String::new();
    let target = report.summary.target_pct.to_string();

    let _ = writeln!(out, "{}", t("report.title"));
    let _ = writeln!(out, "{}\n", "=".repeat(t("report.title").chars().count()));

    for group in &report.groups {
        let _ = writeln!(out, "## {}", group);
        let _ = writeln!(out, "{}", t_with_args("report.kpi", &[("target", &target)]));
        let rows: Vec<&AggregateRow> = report.rows_for_group(group).collect();
        out.push_str(&aggregate_table(&rows).render());

        let monthly: Vec<&MonthlyRow> = report.monthly_for_group(group).collect();
        if !monthly.is_empty() {
            let _ = writeln!(out, "\n{}", t("report.trend"));
            out.push_str(&monthly_table(&monthly).render());
        }

        if let Some(causes) = report.top_causes.iter().find(|c| &c.group == group) {
            let _ = writeln!(out, "\n{}", t("report.top_causes"));
            let mut table = TextTable::new([t("header.cause"), t("header.retained")]);
            for cause in &causes.causes {
                table.push(vec![cause.label.clone(), number(cause.retained)]);
            }
            out.push_str(&table.render());
        }
        out.push('\n');
    }

    if let Some(drill) = &report.drill_down {
        let _ = writeln!(
            out,
            "{}",
            t_with_args("report.drill_down", &[("reason", &drill.reason)])
        );
        if let Some(limit) = drill.quantity_limit {
            let _ = writeln!(
                out,
                "{}",
                t_with_args("report.quantity_limit", &[("limit", &number(limit))])
            );
        }
        if let Some(limit) = drill.count_limit {
            let _ = writeln!(
                out,
                "{}",
                t_with_args("report.count_limit", &[("limit", &limit.to_string())])
            );
        }

        let mut table = TextTable::new([
            t("header.team"),
            t("header.retained"),
            t("header.occurrences"),
            String::new(),
        ]);
        for row in &drill.teams {
            let exceeded = row.quantity_exceeded || row.count_exceeded;
            table.push(vec![
                row.team.clone(),
                number(row.retained),
                row.occurrences.to_string(),
                marker(!exceeded).to_string(),
            ]);
        }
        out.push_str(&table.render());

        let _ = writeln!(out, "\n{}", t("report.by_group"));
        let mut table = TextTable::new([t("header.group"), t("header.occurrences")]);
        for row in &drill.by_group {
            table.push(vec![row.group.clone(), row.occurrences.to_string()]);
        }
        out.push_str(&table.render());
        out.push('\n');
    }

    out.push_str(&render_summary(report));
    out
}

/// 已应用配置摘要
pub fn render_summary(report: &Report) -> String {
    let summary = &report.summary;
    let mut out = String::new();
    let _ = writeln!(out, "{}", t("summary.title"));

    let _ = writeln!(out, "- {}:", t("summary.excluded"));
    if summary.excluded_reasons.is_empty() {
        let _ = writeln!(out, "    {}", t("summary.no_excluded"));
    }
    for reason in &summary.excluded_reasons {
        let _ = writeln!(out, "    {}", reason);
    }

    let _ = writeln!(out, "- {}:", t("summary.defect_groups"));
    if summary.defect_groups.is_empty() {
        let _ = writeln!(out, "    {}", t("summary.no_defect_groups"));
    }
    for (name, members) in &summary.defect_groups {
        let _ = writeln!(out, "    {}: {}", name, members.join(", "));
    }

    let _ = writeln!(out, "- {}:", t("summary.line_groups"));
    if summary.line_groups.is_empty() {
        let _ = writeln!(out, "    {}", t("summary.no_line_groups"));
    }
    for (name, members) in &summary.line_groups {
        let _ = writeln!(out, "    {}: {}", name, members.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_table_aligns_columns() {
        let mut table = TextTable::new(["Equipe", "M2"]);
        table.push(vec!["A".to_string(), "1000.00".to_string()]);
        table.push(vec!["Média Geral".to_string(), "5.00".to_string()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Equipe       M2");
        assert_eq!(lines[2], "A            1000.00");
        assert_eq!(lines[3], "Média Geral  5.00");
    }

    #[test]
    fn test_number_formats() {
        assert_eq!(number(1234.5), "1234.50");
        assert_eq!(percent(0.5), "0.50%");
    }
}
