// ==========================================
// 留置质量报表系统 - 列解析器
// ==========================================
// 职责: 语义字段 → 实际列名（关键字子串匹配，大小写不敏感）
// 规则: 关键字按优先级扫描，每个关键字内按列的原始顺序扫描，首个命中即返回
// 输出: 类型化的解析结果（成功 / 缺失字段列表）
// ==========================================

use crate::domain::DatasetKind;
use crate::importer::error::SchemaError;
use serde::{Deserialize, Serialize};

// ==========================================
// 关键字表
// ==========================================

pub const TEAM_KEYWORDS: &[&str] = &["equipe", "team", "turno"];
pub const LINE_KEYWORDS: &[&str] = &["forno", "linha", "maq"];
pub const PRODUCED_KEYWORDS: &[&str] = &["metragem", "m2", "prod"];
pub const PRODUCTION_DATE_KEYWORDS: &[&str] = &["data", "date", "dia"];
pub const REASON_KEYWORDS: &[&str] = &["motivo", "defeito", "causa"];
pub const RETAINED_KEYWORDS: &[&str] = &["m²", "m2", "metragem", "quant"];
pub const RETENTION_DATE_KEYWORDS: &[&str] = &["data", "date", "dia", "hora"];

/// 在列名中查找关键字
///
/// 关键字优先级高于列顺序：先找到的关键字决定结果，
/// 同一关键字命中多列时取原始顺序中的第一列。
pub fn resolve_column(columns: &[String], keywords: &[&str]) -> Option<String> {
    let normalized: Vec<String> = columns.iter().map(|c| c.trim().to_lowercase()).collect();

    keywords.iter().find_map(|kw| {
        let kw = kw.to_lowercase();
        normalized
            .iter()
            .position(|col| col.contains(&kw))
            .map(|idx| columns[idx].clone())
    })
}

// ==========================================
// 已解析的表结构
// ==========================================

/// 产量表结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionSchema {
    pub team: String,
    pub line: String,
    pub produced: String,
    pub date: Option<String>,
}

/// 留置表结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionSchema {
    pub reason: String,
    pub retained: String,
    pub team: String,
    pub line: String,
    pub date: Option<String>,
}

// ==========================================
// SchemaResolver
// ==========================================
pub struct SchemaResolver;

impl SchemaResolver {
    /// 解析产量表结构，缺失任一必需字段即失败
    pub fn resolve_production(&self, columns: &[String]) -> Result<ProductionSchema, SchemaError> {
        let mut missing = Vec::new();
        let mut require = |keywords: &[&str], label: &str| {
            let found = resolve_column(columns, keywords);
            if found.is_none() {
                missing.push(label.to_string());
            }
            found
        };

        let team = require(TEAM_KEYWORDS, "Equipe");
        let line = require(LINE_KEYWORDS, "Forno/Linha");
        let produced = require(PRODUCED_KEYWORDS, "Metragem/Produção");
        let date = resolve_column(columns, PRODUCTION_DATE_KEYWORDS);

        match (team, line, produced) {
            (Some(team), Some(line), Some(produced)) => {
                tracing::debug!(%team, %line, %produced, ?date, "产量表列解析完成");
                Ok(ProductionSchema {
                    team,
                    line,
                    produced,
                    date,
                })
            }
            _ => Err(SchemaError {
                dataset: DatasetKind::Production,
                missing,
            }),
        }
    }

    /// 解析留置表结构，缺失任一必需字段即失败
    pub fn resolve_retention(&self, columns: &[String]) -> Result<RetentionSchema, SchemaError> {
        let mut missing = Vec::new();
        let mut require = |keywords: &[&str], label: &str| {
            let found = resolve_column(columns, keywords);
            if found.is_none() {
                missing.push(label.to_string());
            }
            found
        };

        let reason = require(REASON_KEYWORDS, "Motivo");
        let retained = require(RETAINED_KEYWORDS, "M2 Retido");
        let team = require(TEAM_KEYWORDS, "Equipe");
        let line = require(LINE_KEYWORDS, "Forno/Linha");
        let date = resolve_column(columns, RETENTION_DATE_KEYWORDS);

        match (reason, retained, team, line) {
            (Some(reason), Some(retained), Some(team), Some(line)) => {
                tracing::debug!(%reason, %retained, %team, %line, ?date, "留置表列解析完成");
                Ok(RetentionSchema {
                    reason,
                    retained,
                    team,
                    line,
                    date,
                })
            }
            _ => Err(SchemaError {
                dataset: DatasetKind::Retention,
                missing,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_column_case_insensitive_substring() {
        let columns = cols(&["Team Name", "Furnace ID"]);
        assert_eq!(
            resolve_column(&columns, &["equipe", "team"]),
            Some("Team Name".to_string())
        );
    }

    #[test]
    fn test_resolve_column_no_match() {
        let columns = cols(&["Team Name", "Furnace ID"]);
        assert_eq!(resolve_column(&columns, &["motivo", "causa"]), None);
    }

    #[test]
    fn test_resolve_column_keyword_priority_beats_column_order() {
        // "turno" 列在前，但 "equipe" 优先级更高
        let columns = cols(&["Turno", "Equipe Responsável"]);
        assert_eq!(
            resolve_column(&columns, TEAM_KEYWORDS),
            Some("Equipe Responsável".to_string())
        );
    }

    #[test]
    fn test_resolve_column_first_column_wins_for_same_keyword() {
        let columns = cols(&["Data Início", "Data Fim"]);
        assert_eq!(
            resolve_column(&columns, PRODUCTION_DATE_KEYWORDS),
            Some("Data Início".to_string())
        );
    }

    #[test]
    fn test_resolve_column_trims_names() {
        let columns = cols(&["  EQUIPE  "]);
        assert_eq!(
            resolve_column(&columns, TEAM_KEYWORDS),
            Some("  EQUIPE  ".to_string())
        );
    }

    #[test]
    fn test_resolve_production_schema() {
        let columns = cols(&["Data", "Equipe", "Forno", "Metragem"]);
        let schema = SchemaResolver.resolve_production(&columns).unwrap();
        assert_eq!(schema.team, "Equipe");
        assert_eq!(schema.line, "Forno");
        assert_eq!(schema.produced, "Metragem");
        assert_eq!(schema.date, Some("Data".to_string()));
    }

    #[test]
    fn test_resolve_production_without_date_is_ok() {
        let columns = cols(&["Equipe", "Linha", "Produção"]);
        let schema = SchemaResolver.resolve_production(&columns).unwrap();
        assert_eq!(schema.produced, "Produção");
        assert_eq!(schema.date, None);
    }

    #[test]
    fn test_resolve_retention_reports_all_missing_fields() {
        let columns = cols(&["Equipe", "Observação"]);
        let err = SchemaResolver.resolve_retention(&columns).unwrap_err();
        assert_eq!(err.dataset, DatasetKind::Retention);
        assert_eq!(err.missing, vec!["Motivo", "M2 Retido", "Forno/Linha"]);
    }

    #[test]
    fn test_resolve_retention_schema_with_m2_symbol() {
        let columns = cols(&["Data/Hora", "Turno", "Maquina", "Motivo", "M² Retido"]);
        let schema = SchemaResolver.resolve_retention(&columns).unwrap();
        assert_eq!(schema.retained, "M² Retido");
        assert_eq!(schema.team, "Turno");
        assert_eq!(schema.line, "Maquina");
        assert_eq!(schema.date, Some("Data/Hora".to_string()));
    }
}
