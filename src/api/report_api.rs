// ==========================================
// 留置质量报表系统 - 报表会话 API
// ==========================================
// 职责: 持有会话配置与已加载的数据集，提供重配置点与报表/导出入口
// 红线:
//   1. 两个数据集同时加载成功才替换会话数据（全有或全无）
//   2. 配置只能通过本结构的重配置方法修改，校验失败时状态不变
//   3. 每次生成报表都基于当前配置完整重算
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ReasonTargets, ReportConfig};
use crate::domain::Report;
use crate::engine::ReportEngine;
use crate::exporter::XlsxExporter;
use crate::importer::{
    DatasetLoader, ProductionDataset, ProductionSchema, RetentionDataset, RetentionSchema,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// 数据加载结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadSummary {
    pub production_rows: usize,
    pub retention_rows: usize,
    /// 本次新发现并补充了恒等映射的代码数量
    pub new_codes: usize,
    pub production_schema: ProductionSchema,
    pub retention_schema: RetentionSchema,
}

struct LoadedData {
    production: ProductionDataset,
    retention: RetentionDataset,
}

// ==========================================
// ReportSession - 报表会话
// ==========================================
pub struct ReportSession {
    config: ReportConfig,
    loader: DatasetLoader,
    data: Option<LoadedData>,
}

impl ReportSession {
    /// 创建新的会话
    ///
    /// # 参数
    /// - config: 初始配置（可来自配置文件）
    pub fn new(config: ReportConfig) -> Self {
        Self::with_loader(config, DatasetLoader::default())
    }

    pub fn with_loader(config: ReportConfig, loader: DatasetLoader) -> Self {
        Self {
            config,
            loader,
            data: None,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn into_config(self) -> ReportConfig {
        self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    // ==========================================
    // 数据加载
    // ==========================================

    /// 从文件加载产量与留置数据集
    ///
    /// # 返回
    /// - Ok(LoadSummary): 行数、新代码数量、解析到的列
    /// - Err: 任一文件读取失败或缺少必需列，会话数据保持不变
    pub fn load<P: AsRef<Path>, R: AsRef<Path>>(
        &mut self,
        production_path: P,
        retention_path: R,
    ) -> ApiResult<LoadSummary> {
        let production = self.loader.load_production(production_path)?;
        let retention = self.loader.load_retention(retention_path)?;
        Ok(self.load_datasets(production, retention))
    }

    /// 直接装入已解析的数据集
    pub fn load_datasets(
        &mut self,
        production: ProductionDataset,
        retention: RetentionDataset,
    ) -> LoadSummary {
        let codes = discovered_codes(&production, &retention);
        let new_codes = self.config.seed_line_codes(codes);

        let summary = LoadSummary {
            production_rows: production.records.len(),
            retention_rows: retention.records.len(),
            new_codes,
            production_schema: production.schema.clone(),
            retention_schema: retention.schema.clone(),
        };
        info!(
            production_rows = summary.production_rows,
            retention_rows = summary.retention_rows,
            new_codes,
            "数据集已装入会话"
        );

        self.data = Some(LoadedData {
            production,
            retention,
        });
        summary
    }

    fn loaded(&self) -> ApiResult<&LoadedData> {
        self.data.as_ref().ok_or(ApiError::NoData)
    }

    // ==========================================
    // 数据探查
    // ==========================================

    /// 两个数据集中出现过的全部产线代码（排序去重）
    pub fn discovered_codes(&self) -> ApiResult<Vec<String>> {
        let data = self.loaded()?;
        Ok(discovered_codes(&data.production, &data.retention))
    }

    /// 当前映射下的全部产线名
    pub fn line_names(&self) -> Vec<String> {
        self.config.line_names()
    }

    /// 留置数据中的全部原始原因（排序去重）
    pub fn reasons(&self) -> ApiResult<Vec<String>> {
        let data = self.loaded()?;
        Ok(data
            .retention
            .records
            .iter()
            .map(|r| r.reason.clone())
            .filter(|r| !r.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect())
    }

    /// 产量数据中的全部班组（排序去重）
    pub fn teams(&self) -> ApiResult<Vec<String>> {
        let data = self.loaded()?;
        Ok(data
            .production
            .records
            .iter()
            .filter_map(|r| r.team.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect())
    }

    // ==========================================
    // 重配置点
    // ==========================================

    pub fn set_target_pct(&mut self, target_pct: f64) -> ApiResult<()> {
        Ok(self.config.set_target_pct(target_pct)?)
    }

    pub fn rename_line(&mut self, code: &str, line_name: &str) -> ApiResult<()> {
        Ok(self.config.rename_line(code, line_name)?)
    }

    pub fn create_line_group(&mut self, name: &str, lines: Vec<String>) -> ApiResult<()> {
        Ok(self.config.create_line_group(name, lines)?)
    }

    pub fn remove_line_group(&mut self, name: &str) -> ApiResult<()> {
        Ok(self.config.remove_line_group(name)?)
    }

    pub fn create_defect_group(&mut self, name: &str, reasons: Vec<String>) -> ApiResult<()> {
        Ok(self.config.create_defect_group(name, reasons)?)
    }

    pub fn remove_defect_group(&mut self, name: &str) -> ApiResult<()> {
        Ok(self.config.remove_defect_group(name)?)
    }

    pub fn set_excluded_reasons(&mut self, reasons: Vec<String>) {
        self.config.set_excluded_reasons(reasons);
    }

    pub fn select_reason(&mut self, reason: Option<String>) {
        self.config.select_reason(reason);
    }

    pub fn set_reason_targets(&mut self, targets: &ReasonTargets) -> ApiResult<()> {
        Ok(self.config.set_reason_targets(
            targets.quantity_limit,
            targets.quantity_limit_enabled,
            targets.count_limit,
            targets.count_limit_enabled,
        )?)
    }

    // ==========================================
    // 报表与导出
    // ==========================================

    /// 基于当前配置重算报表
    pub fn build_report(&self) -> ApiResult<Report> {
        let data = self.loaded()?;
        Ok(ReportEngine::new(&self.config)
            .build(&data.production.records, &data.retention.records))
    }

    /// 重算并导出到 .xlsx 文件
    pub fn export_xlsx<P: AsRef<Path>>(&self, path: P) -> ApiResult<Report> {
        let report = self.build_report()?;
        XlsxExporter::new().export_report(&report, path)?;
        Ok(report)
    }

    /// 重算并返回 .xlsx 字节
    pub fn export_bytes(&self) -> ApiResult<Vec<u8>> {
        let report = self.build_report()?;
        Ok(XlsxExporter::new().to_bytes(&report.rows)?)
    }
}

fn discovered_codes(production: &ProductionDataset, retention: &RetentionDataset) -> Vec<String> {
    production
        .records
        .iter()
        .filter_map(|r| r.line_code.clone())
        .chain(retention.records.iter().filter_map(|r| r.line_code.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
