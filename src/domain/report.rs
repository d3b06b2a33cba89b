// ==========================================
// 留置质量报表系统 - 报表实体
// ==========================================
// 职责: 汇总行、月度趋势行、原因排行、原因下钻、配置摘要
// ==========================================

use crate::domain::types::{MonthBucket, TargetStatus, OVERALL_TEAM};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// 汇总行 (Aggregate Row)
// ==========================================
// 粒度: (报表分组, 班组)，每个分组末尾附加一行 "Média Geral"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub group: String,
    pub team: String,
    pub produced: f64,
    pub retained: f64,
    /// 目标留置量 = 产量 × 目标% / 100
    pub target: f64,
    /// 余量 = 目标 - 留置
    pub balance: f64,
    /// 截断到两位小数的实际留置率
    pub realized_pct: f64,
    pub status: TargetStatus,
}

impl AggregateRow {
    pub fn is_overall(&self) -> bool {
        self.team == OVERALL_TEAM
    }
}

// ==========================================
// 月度趋势行 (Monthly Row)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRow {
    pub group: String,
    pub month: MonthBucket,
    pub team: String,
    pub produced: f64,
    pub retained: f64,
    pub target: f64,
    pub realized_pct: f64,
    /// 柱状图着色: 留置量 <= 目标量
    pub within_target: bool,
}

// ==========================================
// 原因排行 (Top Causes)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauseRow {
    /// 经缺陷分组重命名后的原因标签
    pub label: String,
    pub retained: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCauses {
    pub group: String,
    pub causes: Vec<CauseRow>,
}

// ==========================================
// 原因下钻 (Reason Drill-down)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReasonRow {
    pub team: String,
    pub retained: f64,
    pub occurrences: usize,
    /// 面积阈值启用且超出
    pub quantity_exceeded: bool,
    /// 次数阈值启用且超出
    pub count_exceeded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOccurrence {
    pub group: String,
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonDrillDown {
    pub reason: String,
    pub quantity_limit: Option<f64>,
    pub count_limit: Option<usize>,
    pub teams: Vec<TeamReasonRow>,
    pub by_group: Vec<GroupOccurrence>,
}

// ==========================================
// 配置摘要 (Applied Configuration)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub target_pct: f64,
    pub excluded_reasons: Vec<String>,
    /// (分组名, 成员原因)
    pub defect_groups: Vec<(String, Vec<String>)>,
    /// (分组名, 成员产线)
    pub line_groups: Vec<(String, Vec<String>)>,
}

// ==========================================
// 完整报表 (Report)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub report_id: String,
    pub generated_at: NaiveDateTime,
    /// 排序后的报表分组
    pub groups: Vec<String>,
    /// 合并汇总表（所有分组，含总体行）
    pub rows: Vec<AggregateRow>,
    pub monthly: Vec<MonthlyRow>,
    pub top_causes: Vec<GroupCauses>,
    pub drill_down: Option<ReasonDrillDown>,
    pub summary: ConfigSummary,
}

impl Report {
    /// 指定分组的汇总行（含总体行）
    pub fn rows_for_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a AggregateRow> {
        self.rows.iter().filter(move |r| r.group == group)
    }

    /// 指定分组的总体行
    pub fn overall_for_group(&self, group: &str) -> Option<&AggregateRow> {
        self.rows
            .iter()
            .find(|r| r.group == group && r.is_overall())
    }

    pub fn monthly_for_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a MonthlyRow> {
        self.monthly.iter().filter(move |r| r.group == group)
    }
}
