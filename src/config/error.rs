// ==========================================
// 留置质量报表系统 - 配置模块错误类型
// ==========================================

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置值无效 (字段: {field}): {message}")]
    InvalidValue { field: String, message: String },

    #[error("配置项不存在 (字段: {field}, key: {key})")]
    NotFound { field: String, key: String },

    #[error("配置文件读写失败 ({path}): {message}")]
    FileError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("无法确定默认配置目录")]
    NoConfigDir,
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
