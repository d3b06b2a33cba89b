// ==========================================
// 留置质量报表系统 - 原始表格与记录实体
// ==========================================
// 职责: 定义导入后的原始单元格/表格结构，以及映射后的产量、留置记录
// 红线: 不含解析逻辑
// ==========================================

use crate::domain::types::MonthBucket;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 单元格值 (CellValue)
// ==========================================
// 文件解析后每个单元格的类型: 空 / 数值 / 文本 / 日期时间 / 布尔
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    DateTime(NaiveDateTime),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 作为分组键使用的文本形式
    ///
    /// 整数值的数值单元格输出为不带小数的形式（例如炉号 1.0 → "1"）
    pub fn as_key(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

// ==========================================
// 原始表格 (RawTable)
// ==========================================
// 保留列的原始顺序（列名解析依赖列顺序）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 读取指定行指定列的单元格（越界视为空）
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// 数据集类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatasetKind {
    Production, // 产量
    Retention,  // 留置
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::Production => write!(f, "produção"),
            DatasetKind::Retention => write!(f, "retidos"),
        }
    }
}

// ==========================================
// 产量记录 (Production Record)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    /// 班组（空值表示缺失，该行不参与汇总）
    pub team: Option<String>,
    /// 炉号/产线代码
    pub line_code: Option<String>,
    /// 已标准化的产量（m²）
    pub produced: f64,
    pub month: MonthBucket,
    /// 源文件行号（表头之后从 1 开始）
    pub row_number: usize,
}

// ==========================================
// 留置记录 (Retention Record)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionRecord {
    pub team: Option<String>,
    pub line_code: Option<String>,
    /// 原始缺陷原因（未经缺陷分组重命名）
    pub reason: String,
    /// 已标准化的留置量（m²）
    pub retained: f64,
    pub month: MonthBucket,
    pub row_number: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_key_integer_number() {
        assert_eq!(CellValue::Number(1.0).as_key(), Some("1".to_string()));
        assert_eq!(CellValue::Number(2.5).as_key(), Some("2.5".to_string()));
    }

    #[test]
    fn test_cell_key_blank_text_is_none() {
        assert_eq!(CellValue::Text("   ".to_string()).as_key(), None);
        assert_eq!(CellValue::Empty.as_key(), None);
        assert_eq!(
            CellValue::Text(" F1 ".to_string()).as_key(),
            Some("F1".to_string())
        );
    }

    #[test]
    fn test_raw_table_cell_out_of_range() {
        let table = RawTable::new(
            vec!["a".to_string()],
            vec![vec![CellValue::Number(1.0)]],
        );
        assert_eq!(table.cell(0, 0), &CellValue::Number(1.0));
        assert_eq!(table.cell(0, 5), &CellValue::Empty);
        assert_eq!(table.cell(9, 0), &CellValue::Empty);
    }
}
