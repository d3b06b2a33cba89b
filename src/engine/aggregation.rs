// ==========================================
// 留置质量报表系统 - 汇总引擎
// ==========================================
// 职责: 按 (报表分组, 班组) 与 (月份, 班组) 汇总产量与留置量
// 规则:
//   1. 外连接: 只出现在一侧数据集的班组也保留，缺失侧补 0
//   2. 每个分组追加 "Média Geral" 总体行，独立计算截断百分比
//   3. 排序: 分组升序 → 班组升序 → 总体行最后
// 输入: 已完成映射的记录（汇总永远在映射之后）
// ==========================================

use crate::domain::types::team_sort_key;
use crate::domain::{AggregateRow, MonthBucket, MonthlyRow, TargetStatus, OVERALL_TEAM};
use crate::engine::grouping::{MappedProduction, MappedRetention};
use crate::engine::truncation::{realized_pct, target_quantity};
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// (报表分组, 班组)
pub type GroupTeamKey = (String, String);

/// (报表分组, 月份, 班组)
pub type MonthlyKey = (String, MonthBucket, String);

/// 产量与留置量合计
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub produced: f64,
    pub retained: f64,
}

impl AddAssign for Totals {
    fn add_assign(&mut self, other: Self) {
        self.produced += other.produced;
        self.retained += other.retained;
    }
}

/// 按 (分组, 班组) 求和（外连接语义；无班组的记录不参与）
pub fn sum_by_group_team(
    production: &[MappedProduction],
    retention: &[MappedRetention],
) -> BTreeMap<GroupTeamKey, Totals> {
    let mut sums: BTreeMap<GroupTeamKey, Totals> = BTreeMap::new();

    for record in production {
        if let Some(team) = &record.team {
            sums.entry((record.group.clone(), team.clone()))
                .or_default()
                .produced += record.produced;
        }
    }
    for record in retention {
        if let Some(team) = &record.team {
            sums.entry((record.group.clone(), team.clone()))
                .or_default()
                .retained += record.retained;
        }
    }

    sums
}

/// 按 (分组, 月份, 班组) 求和
pub fn sum_by_month_team(
    production: &[MappedProduction],
    retention: &[MappedRetention],
) -> BTreeMap<MonthlyKey, Totals> {
    let mut sums: BTreeMap<MonthlyKey, Totals> = BTreeMap::new();

    for record in production {
        if let Some(team) = &record.team {
            sums.entry((record.group.clone(), record.month.clone(), team.clone()))
                .or_default()
                .produced += record.produced;
        }
    }
    for record in retention {
        if let Some(team) = &record.team {
            sums.entry((record.group.clone(), record.month.clone(), team.clone()))
                .or_default()
                .retained += record.retained;
        }
    }

    sums
}

/// 合并两份按键求和的结果（分批汇总后再合并）
pub fn merge_totals<K: Ord + Clone>(
    mut left: BTreeMap<K, Totals>,
    right: &BTreeMap<K, Totals>,
) -> BTreeMap<K, Totals> {
    for (key, totals) in right {
        *left.entry(key.clone()).or_default() += *totals;
    }
    left
}

// ==========================================
// AggregationEngine - 汇总引擎
// ==========================================
pub struct AggregationEngine {
    target_pct: f64,
}

impl AggregationEngine {
    pub fn new(target_pct: f64) -> Self {
        Self { target_pct }
    }

    /// 生成合并汇总表（全部分组，含总体行）
    pub fn aggregate(
        &self,
        production: &[MappedProduction],
        retention: &[MappedRetention],
    ) -> Vec<AggregateRow> {
        let sums = sum_by_group_team(production, retention);

        // 按分组收集（BTreeMap 保证分组与班组均为升序）
        let mut by_group: BTreeMap<String, Vec<(String, Totals)>> = BTreeMap::new();
        for ((group, team), totals) in sums {
            by_group.entry(group).or_default().push((team, totals));
        }

        let mut rows = Vec::new();
        for (group, mut teams) in by_group {
            teams.sort_by(|a, b| team_sort_key(&a.0).cmp(&team_sort_key(&b.0)));

            let mut overall = Totals::default();
            for (team, totals) in &teams {
                overall += *totals;
                rows.push(self.build_row(&group, team, *totals));
            }
            rows.push(self.build_row(&group, OVERALL_TEAM, overall));
        }

        tracing::debug!(rows = rows.len(), "分组汇总完成");
        rows
    }

    /// 生成月度趋势（每个分组每月: 各班组 + 总体）
    pub fn aggregate_monthly(
        &self,
        production: &[MappedProduction],
        retention: &[MappedRetention],
    ) -> Vec<MonthlyRow> {
        let sums = sum_by_month_team(production, retention);

        let mut overall: BTreeMap<(String, MonthBucket), Totals> = BTreeMap::new();
        for ((group, month, _), totals) in &sums {
            *overall.entry((group.clone(), month.clone())).or_default() += *totals;
        }

        let mut rows: Vec<MonthlyRow> = sums
            .into_iter()
            .map(|((group, month, team), totals)| self.build_monthly_row(group, month, team, totals))
            .chain(overall.into_iter().map(|((group, month), totals)| {
                self.build_monthly_row(group, month, OVERALL_TEAM.to_string(), totals)
            }))
            .collect();

        rows.sort_by(|a, b| {
            a.group
                .cmp(&b.group)
                .then_with(|| a.month.cmp(&b.month))
                .then_with(|| team_sort_key(&a.team).cmp(&team_sort_key(&b.team)))
        });

        tracing::debug!(rows = rows.len(), "月度汇总完成");
        rows
    }

    /// 单行指标计算
    pub fn build_row(&self, group: &str, team: &str, totals: Totals) -> AggregateRow {
        let target = target_quantity(totals.produced, self.target_pct);
        let pct = realized_pct(totals.retained, totals.produced);
        AggregateRow {
            group: group.to_string(),
            team: team.to_string(),
            produced: totals.produced,
            retained: totals.retained,
            target,
            balance: target - totals.retained,
            realized_pct: pct,
            status: TargetStatus::evaluate(pct, self.target_pct),
        }
    }

    fn build_monthly_row(
        &self,
        group: String,
        month: MonthBucket,
        team: String,
        totals: Totals,
    ) -> MonthlyRow {
        let target = target_quantity(totals.produced, self.target_pct);
        MonthlyRow {
            group,
            month,
            team,
            produced: totals.produced,
            retained: totals.retained,
            target,
            realized_pct: realized_pct(totals.retained, totals.produced),
            within_target: totals.retained <= target,
        }
    }
}
