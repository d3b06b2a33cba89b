// ==========================================
// 留置质量报表系统 - 核心库
// ==========================================
// 技术栈: Rust + calamine/csv + rust_xlsxwriter
// 系统定位: 产量/留置数据的分组汇总与质量目标判定
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 会话配置
pub mod config;

// 引擎层 - 映射与汇总
pub mod engine;

// 导出层 - Excel 写出
pub mod exporter;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 报表会话
pub mod api;

// 应用层 - 命令行
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{MonthBucket, TargetStatus, NO_DATE_BUCKET, OTHER_LINE, OVERALL_TEAM};

// 领域实体
pub use domain::{
    AggregateRow, CauseRow, ConfigSummary, GroupCauses, MonthlyRow, ProductionRecord,
    ReasonDrillDown, Report, RetentionRecord,
};

// 配置
pub use config::{ConfigManager, ReasonTargets, ReportConfig};

// 引擎
pub use engine::{AggregationEngine, GroupResolver, ReportEngine};

// API
pub use api::{ApiError, ApiResult, ReportSession};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Dashboard de Controle de Retidos";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
