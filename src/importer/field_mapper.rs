// ==========================================
// 留置质量报表系统 - 字段映射器实现
// ==========================================
// 职责: 原始行 + 已解析表结构 → 产量/留置记录 + 数值/日期标准化
// ==========================================

use crate::domain::{MonthBucket, ProductionRecord, RawTable, RetentionRecord};
use crate::importer::column_resolver::{ProductionSchema, RetentionSchema};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::importer_trait::RecordMapper;

pub struct FieldMapper;

impl RecordMapper for FieldMapper {
    fn map_production(&self, table: &RawTable, schema: &ProductionSchema) -> Vec<ProductionRecord> {
        let cleaner = DataCleaner;
        let team_col = table.column_index(&schema.team);
        let line_col = table.column_index(&schema.line);
        let produced_col = table.column_index(&schema.produced);
        let date_col = schema.date.as_deref().and_then(|d| table.column_index(d));

        (0..table.row_count())
            .map(|row| ProductionRecord {
                team: self.get_key(table, row, team_col),
                line_code: self.get_key(table, row, line_col),
                produced: produced_col
                    .map_or(0.0, |col| cleaner.normalize_number(table.cell(row, col))),
                month: self.get_month(&cleaner, table, row, date_col),
                row_number: row + 1,
            })
            .collect()
    }

    fn map_retention(&self, table: &RawTable, schema: &RetentionSchema) -> Vec<RetentionRecord> {
        let cleaner = DataCleaner;
        let team_col = table.column_index(&schema.team);
        let line_col = table.column_index(&schema.line);
        let reason_col = table.column_index(&schema.reason);
        let retained_col = table.column_index(&schema.retained);
        let date_col = schema.date.as_deref().and_then(|d| table.column_index(d));

        (0..table.row_count())
            .map(|row| RetentionRecord {
                team: self.get_key(table, row, team_col),
                line_code: self.get_key(table, row, line_col),
                reason: self.get_key(table, row, reason_col).unwrap_or_default(),
                retained: retained_col
                    .map_or(0.0, |col| cleaner.normalize_number(table.cell(row, col))),
                month: self.get_month(&cleaner, table, row, date_col),
                row_number: row + 1,
            })
            .collect()
    }
}

impl FieldMapper {
    /// 提取分组键（空值返回 None）
    fn get_key(&self, table: &RawTable, row: usize, col: Option<usize>) -> Option<String> {
        col.and_then(|c| table.cell(row, c).as_key())
    }

    /// 无日期列时所有记录归入 "Sem Data"
    fn get_month(
        &self,
        cleaner: &DataCleaner,
        table: &RawTable,
        row: usize,
        col: Option<usize>,
    ) -> MonthBucket {
        col.map_or(MonthBucket::NoDate, |c| cleaner.parse_month(table.cell(row, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CellValue;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_map_production_basic() {
        let table = RawTable::new(
            vec!["Data".into(), "Equipe".into(), "Forno".into(), "Metragem".into()],
            vec![
                vec![text("10/01/2024"), text("A"), CellValue::Number(1.0), text("1.000,50")],
                vec![text("xx"), CellValue::Empty, text("F2"), CellValue::Empty],
            ],
        );
        let schema = ProductionSchema {
            team: "Equipe".into(),
            line: "Forno".into(),
            produced: "Metragem".into(),
            date: Some("Data".into()),
        };

        let records = FieldMapper.map_production(&table, &schema);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].team, Some("A".to_string()));
        assert_eq!(records[0].line_code, Some("1".to_string()));
        assert_eq!(records[0].produced, 1000.5);
        assert_eq!(records[0].month, MonthBucket::Month { year: 2024, month: 1 });
        assert_eq!(records[1].team, None);
        assert_eq!(records[1].produced, 0.0);
        assert_eq!(records[1].month, MonthBucket::NoDate);
        assert_eq!(records[1].row_number, 2);
    }

    #[test]
    fn test_map_retention_without_date_column() {
        let table = RawTable::new(
            vec!["Equipe".into(), "Linha".into(), "Motivo".into(), "M2".into()],
            vec![vec![text("B"), text("L1"), text("Trinca"), CellValue::Number(3.5)]],
        );
        let schema = RetentionSchema {
            reason: "Motivo".into(),
            retained: "M2".into(),
            team: "Equipe".into(),
            line: "Linha".into(),
            date: None,
        };

        let records = FieldMapper.map_retention(&table, &schema);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reason, "Trinca");
        assert_eq!(records[0].retained, 3.5);
        assert_eq!(records[0].month, MonthBucket::NoDate);
    }
}
