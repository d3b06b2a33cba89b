// ==========================================
// 留置质量报表系统 - API 层
// ==========================================
// 职责: 报表会话（配置 + 已加载数据集），供命令行调用
// ==========================================

pub mod error;
pub mod report_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use report_api::{LoadSummary, ReportSession};
