// ==========================================
// 留置质量报表系统 - 导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段的接口（不包含实现）
// 管道: 文件解析 → 列解析 → 字段映射
// ==========================================

use crate::domain::{ProductionRecord, RawTable, RetentionRecord};
use crate::importer::column_resolver::{ProductionSchema, RetentionSchema};
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser {
    /// 解析文件为保留列顺序的原始表格
    ///
    /// # 返回
    /// - Ok(RawTable): 表头 + 数据行（已跳过空白行）
    /// - Err: 文件不存在、格式不支持、文件损坏
    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// RecordMapper Trait
// ==========================================
// 用途: 字段映射接口（阶段 2）
// 实现者: FieldMapper
pub trait RecordMapper {
    /// 按已解析的产量表结构映射所有行
    fn map_production(&self, table: &RawTable, schema: &ProductionSchema) -> Vec<ProductionRecord>;

    /// 按已解析的留置表结构映射所有行
    fn map_retention(&self, table: &RawTable, schema: &RetentionSchema) -> Vec<RetentionRecord>;
}
