// ==========================================
// 留置质量报表系统 - 分组解析
// ==========================================
// 职责: 代码 → 产线名 → 报表分组；原始原因 → 缺陷标签；排除过滤
// 红线: 汇总之前先完成映射，任何产线/原因都能解析到某个分组（可能是它自己）
// ==========================================

use crate::config::ReportConfig;
use crate::domain::{MonthBucket, ProductionRecord, RetentionRecord, OTHER_LINE};

/// 映射后的产量记录
#[derive(Debug, Clone, PartialEq)]
pub struct MappedProduction {
    pub group: String,
    pub line: String,
    pub team: Option<String>,
    pub month: MonthBucket,
    pub produced: f64,
}

/// 映射后的留置记录
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRetention {
    pub group: String,
    pub line: String,
    pub team: Option<String>,
    pub month: MonthBucket,
    /// 原始原因
    pub reason: String,
    /// 缺陷分组后的原因标签
    pub cause_label: String,
    pub retained: f64,
}

// ==========================================
// GroupResolver - 分组解析器
// ==========================================
pub struct GroupResolver<'a> {
    config: &'a ReportConfig,
}

impl<'a> GroupResolver<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    /// 代码 → 产线名（未映射或缺失 → "Outros"）
    pub fn line_name(&self, code: Option<&str>) -> String {
        code.and_then(|c| self.config.line_mapping.get(c))
            .cloned()
            .unwrap_or_else(|| OTHER_LINE.to_string())
    }

    /// 产线名 → 报表分组（按分组创建顺序取第一个命中，未分组 → 产线名本身）
    pub fn report_group(&self, line_name: &str) -> String {
        self.config
            .line_groups
            .iter()
            .find(|g| g.contains(line_name))
            .map(|g| g.name.clone())
            .unwrap_or_else(|| line_name.to_string())
    }

    /// 原始原因 → 缺陷标签（未分组 → 原因本身）
    pub fn cause_label(&self, reason: &str) -> String {
        self.config
            .defect_groups
            .iter()
            .find(|g| g.contains(reason))
            .map(|g| g.name.clone())
            .unwrap_or_else(|| reason.to_string())
    }

    pub fn is_excluded(&self, reason: &str) -> bool {
        self.config.excluded_reasons.iter().any(|r| r == reason)
    }

    pub fn map_production(&self, records: &[ProductionRecord]) -> Vec<MappedProduction> {
        records
            .iter()
            .map(|r| {
                let line = self.line_name(r.line_code.as_deref());
                MappedProduction {
                    group: self.report_group(&line),
                    line,
                    team: r.team.clone(),
                    month: r.month.clone(),
                    produced: r.produced,
                }
            })
            .collect()
    }

    pub fn map_retention(&self, records: &[RetentionRecord]) -> Vec<MappedRetention> {
        records
            .iter()
            .map(|r| {
                let line = self.line_name(r.line_code.as_deref());
                MappedRetention {
                    group: self.report_group(&line),
                    line,
                    team: r.team.clone(),
                    month: r.month.clone(),
                    reason: r.reason.clone(),
                    cause_label: self.cause_label(&r.reason),
                    retained: r.retained,
                }
            })
            .collect()
    }

    /// 排除过滤（仅作用于留置数据）
    pub fn without_excluded(&self, records: &[MappedRetention]) -> Vec<MappedRetention> {
        records
            .iter()
            .filter(|r| !self.is_excluded(&r.reason))
            .cloned()
            .collect()
    }
}
