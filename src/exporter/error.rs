// ==========================================
// 留置质量报表系统 - 导出模块错误类型
// ==========================================

use thiserror::Error;

/// 导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("工作簿生成失败: {0}")]
    Workbook(String),

    #[error("导出文件写入失败 ({path}): {message}")]
    FileWrite { path: String, message: String },
}

// 实现 From<rust_xlsxwriter::XlsxError>
impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Workbook(err.to_string())
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
