// ==========================================
// 留置质量报表系统 - 引擎层
// ==========================================
// 职责: 映射、汇总、原因分析，纯计算
// 红线: 引擎不读文件、不写文件，百分比一律经截断函数
// ==========================================

pub mod aggregation;
pub mod cause_analysis;
pub mod grouping;
pub mod report_engine;
pub mod truncation;

// 重导出核心引擎
pub use aggregation::{merge_totals, sum_by_group_team, sum_by_month_team, AggregationEngine, Totals};
pub use cause_analysis::{drill_down, top_causes, TOP_CAUSES_LIMIT};
pub use grouping::{GroupResolver, MappedProduction, MappedRetention};
pub use report_engine::ReportEngine;
pub use truncation::{realized_pct, target_quantity, truncate_two_decimals};
