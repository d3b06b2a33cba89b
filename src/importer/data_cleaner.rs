// ==========================================
// 留置质量报表系统 - 数据清洗器实现
// ==========================================
// 职责: 数值标准化（千分位点 / 小数逗号 / 货币前缀）与日期归月
// 口径: 尽力而为，单元格解析失败静默取默认值（0 或 "Sem Data"）
// ==========================================

use crate::domain::{CellValue, MonthBucket};
use chrono::{NaiveDate, NaiveDateTime};

/// 货币前缀
const CURRENCY_MARKER: &str = "R$";

/// 日优先的日期格式（按顺序尝试）
/// 两位年份必须排在四位年份之前: chrono 的 %Y 也接受 "24"，会落到公元 24 年
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%d.%m.%y",
    "%d.%m.%Y",
    "%Y-%m-%d",
];

/// 日优先的日期时间格式（%.f 可选匹配小数秒）
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%y %H:%M:%S%.f",
    "%d/%m/%y %H:%M",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d-%m-%y %H:%M:%S%.f",
    "%d-%m-%y %H:%M",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d-%m-%Y %H:%M",
    "%d.%m.%y %H:%M:%S%.f",
    "%d.%m.%y %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub struct DataCleaner;

impl DataCleaner {
    /// 单元格 → 浮点数
    ///
    /// - 空值 → 0
    /// - 数值 → 原样
    /// - 文本 → 去货币符号与空格，"1.234,56" → 1234.56，失败 → 0
    /// - 日期/布尔 → 0
    pub fn normalize_number(&self, value: &CellValue) -> f64 {
        match value {
            CellValue::Empty => 0.0,
            CellValue::Number(n) => *n,
            CellValue::Text(s) => normalize_text(s),
            CellValue::DateTime(_) | CellValue::Bool(_) => 0.0,
        }
    }

    /// 单元格 → 月份桶（日优先），无法解析 → NoDate
    pub fn parse_month(&self, value: &CellValue) -> MonthBucket {
        match value {
            CellValue::DateTime(dt) => MonthBucket::from_date(dt.date()),
            CellValue::Text(s) => parse_day_first(s)
                .map(MonthBucket::from_date)
                .unwrap_or(MonthBucket::NoDate),
            _ => MonthBucket::NoDate,
        }
    }
}

/// 可缺失单元格的数值标准化
pub fn normalize_cell(value: Option<&CellValue>) -> f64 {
    value.map_or(0.0, |v| DataCleaner.normalize_number(v))
}

/// 文本数值标准化（千分位点、小数逗号）
pub fn normalize_text(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .replace(CURRENCY_MARKER, "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// 日优先解析日期文本
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        })
}
