// ==========================================
// 留置质量报表系统 - 配置层
// ==========================================
// 职责: 会话配置对象、校验、JSON 文件读写
// 存储: 平台配置目录下的 session.json（可由命令行覆盖）
// ==========================================

pub mod config_manager;
pub mod error;
pub mod report_config;

// 重导出核心配置类型
pub use config_manager::{default_config_path, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use report_config::{
    NamedGroup, ReasonTargets, ReportConfig, DEFAULT_COUNT_LIMIT, DEFAULT_QUANTITY_LIMIT,
    DEFAULT_TARGET_PCT, TARGET_PCT_MAX, TARGET_PCT_MIN,
};
