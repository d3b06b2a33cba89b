// ==========================================
// 留置质量报表系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 单元格级别的解析失败不产生错误（静默取默认值）
// ==========================================

use crate::domain::DatasetKind;
use thiserror::Error;

/// 导入模块错误类型（文件级别，整次运行中止）
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv/.txt）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("文件无表头: {0}")]
    MissingHeader(String),

    // ===== 列解析错误 =====
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// 列解析失败：列出该数据集缺失的全部必需字段
#[derive(Error, Debug, Clone, PartialEq)]
#[error("数据集 {dataset} 缺少必需列: {}", .missing.join(", "))]
pub struct SchemaError {
    pub dataset: DatasetKind,
    pub missing: Vec<String>,
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
