// ==========================================
// 留置质量报表系统 - 导入层
// ==========================================
// 职责: 外部文件导入,生成类型化的产量/留置记录
// 支持: Excel, CSV（逗号/分号）
// ==========================================

// 模块声明
pub mod column_resolver;
pub mod data_cleaner;
pub mod dataset_loader;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;

// 重导出核心类型
pub use column_resolver::{resolve_column, ProductionSchema, RetentionSchema, SchemaResolver};
pub use data_cleaner::{normalize_cell, normalize_text, parse_day_first, DataCleaner};
pub use dataset_loader::{DatasetLoader, ProductionDataset, RetentionDataset};
pub use error::{ImportError, ImportResult, SchemaError};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};

// 重导出 Trait 接口
pub use importer_trait::{FileParser, RecordMapper};
