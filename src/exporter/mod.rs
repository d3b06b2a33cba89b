// ==========================================
// 留置质量报表系统 - 导出层
// ==========================================
// 职责: 合并汇总表写出为单工作表 .xlsx（文件或内存字节）
// ==========================================

pub mod error;
pub mod xlsx_exporter;

pub use error::{ExportError, ExportResult};
pub use xlsx_exporter::{XlsxExporter, EXPORT_COLUMNS, EXPORT_SHEET_NAME};
