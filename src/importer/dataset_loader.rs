// ==========================================
// 留置质量报表系统 - 数据集加载器
// ==========================================
// 职责: 整合导入流程，从文件到类型化记录
// 流程: 解析 → 列解析 → 映射（数值/日期标准化）
// 口径: 文件读取失败或必需列缺失即整体失败，不返回部分结果
// ==========================================

use crate::domain::{ProductionRecord, RawTable, RetentionRecord};
use crate::importer::column_resolver::{ProductionSchema, RetentionSchema, SchemaResolver};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{FileParser, RecordMapper};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// 已加载的产量数据集
#[derive(Debug, Clone)]
pub struct ProductionDataset {
    pub schema: ProductionSchema,
    pub records: Vec<ProductionRecord>,
}

/// 已加载的留置数据集
#[derive(Debug, Clone)]
pub struct RetentionDataset {
    pub schema: RetentionSchema,
    pub records: Vec<RetentionRecord>,
}

// ==========================================
// DatasetLoader - 数据集加载器
// ==========================================
pub struct DatasetLoader {
    file_parser: Box<dyn FileParser>,
    record_mapper: Box<dyn RecordMapper>,
    resolver: SchemaResolver,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(Box::new(UniversalFileParser), Box::new(FieldMapper))
    }
}

impl DatasetLoader {
    /// 创建新的 DatasetLoader 实例
    ///
    /// # 参数
    /// - file_parser: 文件解析器
    /// - record_mapper: 字段映射器
    pub fn new(file_parser: Box<dyn FileParser>, record_mapper: Box<dyn RecordMapper>) -> Self {
        Self {
            file_parser,
            record_mapper,
            resolver: SchemaResolver,
        }
    }

    /// 从文件加载产量数据
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub fn load_production<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ProductionDataset> {
        let start_time = Instant::now();
        let table = self.parse(file_path.as_ref())?;
        let dataset = self.production_from_table(&table)?;
        info!(
            rows = dataset.records.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "产量数据加载完成"
        );
        Ok(dataset)
    }

    /// 从文件加载留置数据
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub fn load_retention<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RetentionDataset> {
        let start_time = Instant::now();
        let table = self.parse(file_path.as_ref())?;
        let dataset = self.retention_from_table(&table)?;
        info!(
            rows = dataset.records.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "留置数据加载完成"
        );
        Ok(dataset)
    }

    /// 已解析表格 → 产量数据集
    pub fn production_from_table(&self, table: &RawTable) -> ImportResult<ProductionDataset> {
        debug!("步骤 2: 列解析（产量）");
        let schema = self.resolver.resolve_production(&table.headers).map_err(|e| {
            error!(error = %e, headers = ?table.headers, "产量表列解析失败");
            e
        })?;

        debug!("步骤 3: 字段映射（产量）");
        let records = self.record_mapper.map_production(table, &schema);
        let missing_team = records.iter().filter(|r| r.team.is_none()).count();
        if missing_team > 0 {
            warn!(missing_team, "部分产量记录缺少班组，将不参与汇总");
        }

        Ok(ProductionDataset { schema, records })
    }

    /// 已解析表格 → 留置数据集
    pub fn retention_from_table(&self, table: &RawTable) -> ImportResult<RetentionDataset> {
        debug!("步骤 2: 列解析（留置）");
        let schema = self.resolver.resolve_retention(&table.headers).map_err(|e| {
            error!(error = %e, headers = ?table.headers, "留置表列解析失败");
            e
        })?;

        debug!("步骤 3: 字段映射（留置）");
        let records = self.record_mapper.map_retention(table, &schema);
        let missing_team = records.iter().filter(|r| r.team.is_none()).count();
        if missing_team > 0 {
            warn!(missing_team, "部分留置记录缺少班组，将不参与汇总");
        }

        Ok(RetentionDataset { schema, records })
    }

    fn parse(&self, path: &Path) -> ImportResult<RawTable> {
        debug!("步骤 1: 解析文件");
        let table = self.file_parser.parse_table(path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        debug!(columns = table.headers.len(), rows = table.row_count(), "文件解析完成");
        Ok(table)
    }
}
