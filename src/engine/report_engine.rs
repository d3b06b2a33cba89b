// ==========================================
// 留置质量报表系统 - 报表编排器
// ==========================================
// 用途: 按固定顺序协调各引擎，生成一份完整报表
// 流程: 映射 → 排除过滤 → 分组汇总 → 月度汇总 → 原因排行 → 原因下钻 → 配置摘要
// 口径: 纯计算，同样的配置与数据集必然得到同样的报表内容
// ==========================================

use crate::config::{NamedGroup, ReportConfig};
use crate::domain::{ConfigSummary, ProductionRecord, Report, RetentionRecord};
use crate::engine::aggregation::AggregationEngine;
use crate::engine::cause_analysis::{drill_down, top_causes};
use crate::engine::grouping::GroupResolver;
use chrono::Local;
use std::collections::BTreeSet;
use tracing::{debug, info};
use uuid::Uuid;

// ==========================================
// ReportEngine - 报表编排器
// ==========================================
pub struct ReportEngine<'a> {
    config: &'a ReportConfig,
}

impl<'a> ReportEngine<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    /// 执行完整报表流程
    ///
    /// # 参数
    /// - production: 产量记录
    /// - retention: 留置记录（未过滤）
    ///
    /// # 返回
    /// 报表（含汇总、月度趋势、原因排行、可选的原因下钻、配置摘要）
    pub fn build(&self, production: &[ProductionRecord], retention: &[RetentionRecord]) -> Report {
        info!(
            production_rows = production.len(),
            retention_rows = retention.len(),
            target_pct = self.config.target_pct,
            "开始生成报表"
        );

        // ==========================================
        // 步骤1: 代码 → 产线 → 报表分组，原因 → 缺陷标签
        // ==========================================
        let resolver = GroupResolver::new(self.config);
        let mapped_production = resolver.map_production(production);
        let mapped_retention = resolver.map_retention(retention);

        // ==========================================
        // 步骤2: 排除过滤（仅影响 KPI、趋势、排行）
        // ==========================================
        let filtered_retention = resolver.without_excluded(&mapped_retention);
        debug!(
            excluded = mapped_retention.len() - filtered_retention.len(),
            "排除过滤完成"
        );

        // ==========================================
        // 步骤3-4: 分组汇总与月度趋势
        // ==========================================
        let aggregation = AggregationEngine::new(self.config.target_pct);
        let rows = aggregation.aggregate(&mapped_production, &filtered_retention);
        let monthly = aggregation.aggregate_monthly(&mapped_production, &filtered_retention);

        let groups: Vec<String> = rows
            .iter()
            .map(|r| r.group.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // ==========================================
        // 步骤5: 原因排行
        // ==========================================
        let top_causes = top_causes(&filtered_retention);

        // ==========================================
        // 步骤6: 原因下钻（使用未过滤数据）
        // ==========================================
        let drill_down = self
            .config
            .reason_targets
            .selected_reason
            .as_deref()
            .map(|reason| {
                let teams = production.iter().filter_map(|r| r.team.as_deref());
                drill_down(
                    reason,
                    teams,
                    &mapped_retention,
                    &self.config.reason_targets,
                )
            });

        let report = Report {
            report_id: Uuid::new_v4().to_string(),
            generated_at: Local::now().naive_local(),
            groups,
            rows,
            monthly,
            top_causes,
            drill_down,
            summary: self.summary(),
        };

        info!(
            report_id = %report.report_id,
            groups = report.groups.len(),
            rows = report.rows.len(),
            "报表生成完成"
        );
        report
    }

    /// 已应用配置摘要
    pub fn summary(&self) -> ConfigSummary {
        fn pairs(groups: &[NamedGroup]) -> Vec<(String, Vec<String>)> {
            groups
                .iter()
                .map(|g| (g.name.clone(), g.members.clone()))
                .collect()
        }

        ConfigSummary {
            target_pct: self.config.target_pct,
            excluded_reasons: self.config.excluded_reasons.clone(),
            defect_groups: pairs(&self.config.defect_groups),
            line_groups: pairs(&self.config.line_groups),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MonthBucket, TargetStatus, OVERALL_TEAM};

    fn production(team: &str, line: &str, produced: f64) -> ProductionRecord {
        ProductionRecord {
            team: Some(team.to_string()),
            line_code: Some(line.to_string()),
            produced,
            month: MonthBucket::Month { year: 2024, month: 3 },
            row_number: 1,
        }
    }

    fn retention(team: &str, line: &str, reason: &str, retained: f64) -> RetentionRecord {
        RetentionRecord {
            team: Some(team.to_string()),
            line_code: Some(line.to_string()),
            reason: reason.to_string(),
            retained,
            month: MonthBucket::Month { year: 2024, month: 3 },
            row_number: 1,
        }
    }

    #[test]
    fn test_build_boundary_scenario() {
        let mut config = ReportConfig::default();
        config.seed_line_codes(vec!["L1"]);

        let prod = vec![production("TeamA", "L1", 1000.0), production("TeamB", "L1", 2000.0)];
        let ret = vec![
            retention("TeamA", "L1", "Trinca", 10.0),
            retention("TeamB", "L1", "Trinca", 5.0),
        ];

        let report = ReportEngine::new(&config).build(&prod, &ret);

        assert_eq!(report.groups, vec!["L1".to_string()]);
        let rows: Vec<_> = report.rows_for_group("L1").collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].realized_pct, 1.0);
        assert_eq!(rows[0].status, TargetStatus::Outside);
        assert_eq!(rows[1].realized_pct, 0.25);
        assert_eq!(rows[1].status, TargetStatus::Within);
        assert_eq!(rows[2].team, OVERALL_TEAM);
        assert_eq!(rows[2].realized_pct, 0.5);
        assert_eq!(rows[2].status, TargetStatus::Within);
        assert!(report.drill_down.is_none());
    }

    #[test]
    fn test_exclusion_skips_kpi_but_not_drill_down() {
        let mut config = ReportConfig::default();
        config.seed_line_codes(vec!["L1"]);
        config.set_excluded_reasons(vec!["Setup".to_string()]);
        config.select_reason(Some("Setup".to_string()));

        let prod = vec![production("A", "L1", 1000.0)];
        let ret = vec![
            retention("A", "L1", "Setup", 50.0),
            retention("A", "L1", "Trinca", 2.0),
        ];

        let report = ReportEngine::new(&config).build(&prod, &ret);

        let overall = report.overall_for_group("L1").unwrap();
        assert_eq!(overall.retained, 2.0);
        assert!(report.top_causes[0].causes.iter().all(|c| c.label != "Setup"));
        assert!(report.monthly.iter().all(|m| m.retained <= 2.0));

        let drill = report.drill_down.unwrap();
        assert_eq!(drill.reason, "Setup");
        assert_eq!(drill.teams[0].retained, 50.0);
        assert_eq!(report.summary.excluded_reasons, vec!["Setup".to_string()]);
    }

    #[test]
    fn test_line_groups_merge_lines() {
        let mut config = ReportConfig::default();
        config.seed_line_codes(vec!["F1", "F2"]);
        config
            .create_line_group("Fábrica", vec!["F1".to_string(), "F2".to_string()])
            .unwrap();

        let prod = vec![production("A", "F1", 600.0), production("A", "F2", 400.0)];
        let report = ReportEngine::new(&config).build(&prod, &[]);

        assert_eq!(report.groups, vec!["Fábrica".to_string()]);
        assert_eq!(report.overall_for_group("Fábrica").unwrap().produced, 1000.0);
        assert_eq!(
            report.summary.line_groups,
            vec![(
                "Fábrica".to_string(),
                vec!["F1".to_string(), "F2".to_string()]
            )]
        );
    }
}
