// ==========================================
// 留置质量报表系统 - 原因分析
// ==========================================
// 职责:
//   1. 原因排行: 每个报表分组按缺陷标签汇总留置量，取前 10
//   2. 原因下钻: 单一原始原因在各班组的留置量与出现次数，并标记阈值超标
// 数据来源: 排行使用排除过滤后的留置数据；下钻始终使用未过滤的留置数据
// ==========================================

use crate::config::ReasonTargets;
use crate::domain::{CauseRow, GroupCauses, GroupOccurrence, ReasonDrillDown, TeamReasonRow};
use crate::engine::grouping::MappedRetention;
use std::collections::{BTreeMap, BTreeSet};

/// 每个分组保留的原因数量
pub const TOP_CAUSES_LIMIT: usize = 10;

/// 原因排行
///
/// # 参数
/// - retention: 已排除过滤的映射后留置记录
///
/// # 返回
/// 按分组名升序，每组内按留置量降序（相同量按标签升序）
pub fn top_causes(retention: &[MappedRetention]) -> Vec<GroupCauses> {
    let mut sums: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
    for record in retention {
        *sums
            .entry(record.group.as_str())
            .or_default()
            .entry(record.cause_label.as_str())
            .or_default() += record.retained;
    }

    sums.into_iter()
        .map(|(group, labels)| {
            let mut causes: Vec<CauseRow> = labels
                .into_iter()
                .map(|(label, retained)| CauseRow {
                    label: label.to_string(),
                    retained,
                })
                .collect();
            causes.sort_by(|a, b| {
                b.retained
                    .total_cmp(&a.retained)
                    .then_with(|| a.label.cmp(&b.label))
            });
            causes.truncate(TOP_CAUSES_LIMIT);

            GroupCauses {
                group: group.to_string(),
                causes,
            }
        })
        .collect()
}

/// 原因下钻
///
/// # 参数
/// - reason: 选中的原始原因
/// - production_teams: 产量数据中出现过的班组
/// - retention: 未过滤的映射后留置记录
/// - targets: 面积/次数阈值
pub fn drill_down<'t, I>(
    reason: &str,
    production_teams: I,
    retention: &[MappedRetention],
    targets: &ReasonTargets,
) -> ReasonDrillDown
where
    I: IntoIterator<Item = &'t str>,
{
    let quantity_limit = targets.active_quantity_limit();
    let count_limit = targets.active_count_limit();

    let matching: Vec<&MappedRetention> =
        retention.iter().filter(|r| r.reason == reason).collect();

    let mut per_team: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    let mut per_group: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &matching {
        if let Some(team) = record.team.as_deref() {
            let entry = per_team.entry(team).or_default();
            entry.0 += record.retained;
            entry.1 += 1;
        }
        *per_group.entry(record.group.as_str()).or_default() += 1;
    }

    let teams = production_teams
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|team| {
            let (retained, occurrences) = per_team.get(team).copied().unwrap_or((0.0, 0));
            TeamReasonRow {
                team: team.to_string(),
                retained,
                occurrences,
                quantity_exceeded: quantity_limit.is_some_and(|limit| retained > limit),
                count_exceeded: count_limit.is_some_and(|limit| occurrences > limit),
            }
        })
        .collect();

    let by_group = per_group
        .into_iter()
        .map(|(group, occurrences)| GroupOccurrence {
            group: group.to_string(),
            occurrences,
        })
        .collect();

    tracing::debug!(reason, occurrences = matching.len(), "原因下钻完成");

    ReasonDrillDown {
        reason: reason.to_string(),
        quantity_limit,
        count_limit,
        teams,
        by_group,
    }
}
