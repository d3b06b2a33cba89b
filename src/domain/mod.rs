// ==========================================
// 留置质量报表系统 - 领域模型层
// ==========================================
// 职责: 定义原始表格、记录实体、报表实体与通用类型
// 红线: 不含文件解析逻辑,不含汇总计算逻辑
// ==========================================

pub mod record;
pub mod report;
pub mod types;

// 重导出核心类型
pub use record::{CellValue, DatasetKind, ProductionRecord, RawTable, RetentionRecord};
pub use report::{
    AggregateRow, CauseRow, ConfigSummary, GroupCauses, GroupOccurrence, MonthlyRow,
    ReasonDrillDown, Report, TeamReasonRow,
};
pub use types::{MonthBucket, TargetStatus, NO_DATE_BUCKET, OTHER_LINE, OVERALL_TEAM};
