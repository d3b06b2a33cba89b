// ==========================================
// 留置质量报表系统 - 文件解析器实现
// ==========================================
// 职责: 文件读取与解析 → 保留列顺序的 RawTable
// 支持: Excel (.xlsx/.xls/.xlsm/.ods) / 分隔文本 (.csv/.txt，逗号或分号)
// ==========================================

use crate::domain::{CellValue, RawTable};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::path::Path;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = extension_of(path);
        if ext != "csv" && ext != "txt" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let text = decode_text(std::fs::read(path)?);

        // 先按逗号解析；失败或只得到一列且表头含分号时，改按分号解析
        let table = match parse_delimited(&text, b',') {
            Ok(table) if !looks_semicolon_delimited(&table) => table,
            Ok(_) | Err(_) => {
                tracing::debug!(path = %path.display(), "逗号解析不适用，改用分号分隔");
                parse_delimited(&text, b';')?
            }
        };

        if table.headers.is_empty() {
            return Err(ImportError::MissingHeader(path.display().to_string()));
        }

        Ok(infer_column_types(table))
    }
}

/// 按指定分隔符解析为全文本单元格
fn parse_delimited(text: &str, delimiter: u8) -> ImportResult<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true) // 允许行长度不一致
        .from_reader(text.as_bytes());

    // 读取表头
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    // 读取所有行
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: Vec<CellValue> = (0..headers.len())
            .map(|idx| match record.get(idx).map(str::trim) {
                Some(v) if !v.is_empty() => CellValue::Text(v.to_string()),
                _ => CellValue::Empty,
            })
            .collect();

        // 跳过完全空白的行
        if row.iter().all(CellValue::is_empty) {
            continue;
        }

        rows.push(row);
    }

    Ok(RawTable::new(headers, rows))
}

fn looks_semicolon_delimited(table: &RawTable) -> bool {
    table.headers.len() <= 1 && table.headers.iter().any(|h| h.contains(';'))
}

/// UTF-8 优先，否则按 Latin-1 逐字节解码
fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

/// 列类型推断：一列中所有非空单元格均为普通十进制数时，整列视为数值列
fn infer_column_types(mut table: RawTable) -> RawTable {
    for col in 0..table.headers.len() {
        let numeric = table.rows.iter().all(|row| match row.get(col) {
            Some(CellValue::Text(s)) => parse_plain_number(s).is_some(),
            _ => true,
        });
        let has_values = table
            .rows
            .iter()
            .any(|row| row.get(col).map_or(false, |c| !c.is_empty()));

        if !(numeric && has_values) {
            continue;
        }

        for row in table.rows.iter_mut() {
            if let Some(cell) = row.get_mut(col) {
                if let CellValue::Text(s) = cell {
                    if let Some(n) = parse_plain_number(s) {
                        *cell = CellValue::Number(n);
                    }
                }
            }
        }
    }
    table
}

/// 普通十进制数（不接受 inf/nan 等字面量）
fn parse_plain_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.chars().any(|c| c.is_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = extension_of(path);
        if !matches!(ext.as_str(), "xlsx" | "xls" | "xlsm" | "xlsb" | "ods") {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 打开 Excel 文件
        let mut workbook = open_workbook_auto(path)?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::MissingHeader(path.display().to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        // 读取数据行
        let mut records = Vec::new();
        for data_row in rows {
            let row: Vec<CellValue> = (0..headers.len())
                .map(|idx| data_row.get(idx).map_or(CellValue::Empty, convert_cell))
                .collect();

            // 跳过完全空白的行
            if row.iter().all(CellValue::is_empty) {
                continue;
            }

            records.push(row);
        }

        Ok(RawTable::new(headers, records))
    }
}

/// calamine 单元格 → CellValue
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Empty),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Excel 序列日期（1900 日期系统）→ NaiveDateTime
fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::seconds(seconds))
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        match extension_of(file_path).as_str() {
            "csv" | "txt" => CsvParser.parse_table(file_path),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => ExcelParser.parse_table(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn temp_csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(temp_file, "{}", line).unwrap();
        }
        temp_file
    }

    #[test]
    fn test_csv_parser_comma_file() {
        let temp_file = temp_csv(&["Equipe,Forno,Metragem", "A,F1,1000", "B,F2,2500.5"]);

        let table = CsvParser.parse_table(temp_file.path()).unwrap();

        assert_eq!(table.headers, vec!["Equipe", "Forno", "Metragem"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 0), &CellValue::Text("A".to_string()));
        assert_eq!(table.cell(1, 2), &CellValue::Number(2500.5));
    }

    #[test]
    fn test_csv_parser_semicolon_fallback() {
        let temp_file = temp_csv(&["Equipe;Forno;M2 Retido", "A;F1;1.234,56", "B;F2;10"]);

        let table = CsvParser.parse_table(temp_file.path()).unwrap();

        assert_eq!(table.headers.len(), 3);
        // 含小数逗号的列保持文本，由数值标准化处理
        assert_eq!(table.cell(0, 2), &CellValue::Text("1.234,56".to_string()));
        assert_eq!(table.cell(1, 2), &CellValue::Text("10".to_string()));
    }

    #[test]
    fn test_dot_only_column_reads_as_decimal() {
        use crate::importer::data_cleaner::DataCleaner;

        // 整列都是普通小数 → 数值列，"1.500" 按小数点读取
        let uniform = temp_csv(&["Equipe;M2", "A;1.500", "B;2.25"]);
        let table = CsvParser.parse_table(uniform.path()).unwrap();
        assert_eq!(table.cell(0, 1), &CellValue::Number(1.5));
        assert_eq!(DataCleaner.normalize_number(table.cell(0, 1)), 1.5);

        // 同列出现小数逗号 → 文本列，"1.500" 的点按千分位去除
        let mixed = temp_csv(&["Equipe;M2", "A;1.500", "B;2,5"]);
        let table = CsvParser.parse_table(mixed.path()).unwrap();
        assert_eq!(table.cell(0, 1), &CellValue::Text("1.500".to_string()));
        assert_eq!(DataCleaner.normalize_number(table.cell(0, 1)), 1500.0);
        assert_eq!(DataCleaner.normalize_number(table.cell(1, 1)), 2.5);
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let temp_file = temp_csv(&["Equipe,Metragem", "A,2.5", ",", "B,3.0"]);

        let table = CsvParser.parse_table(temp_file.path()).unwrap();

        // 应跳过空行
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_table(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let temp_file = Builder::new().suffix(".pdf").tempfile().unwrap();
        let result = UniversalFileParser.parse_table(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_excel_parser_corrupt_file() {
        let mut temp_file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        writeln!(temp_file, "not a workbook").unwrap();
        let result = ExcelParser.parse_table(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_latin1_fallback() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        temp_file.write_all(b"Equipe,Cod\xe7\n").unwrap();
        temp_file.write_all(b"A,1\n").unwrap();

        let table = CsvParser.parse_table(temp_file.path()).unwrap();
        assert_eq!(table.headers[1], "Codç");
    }

    #[test]
    fn test_excel_serial_to_datetime() {
        let dt = excel_serial_to_datetime(45292.5).unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }
}
