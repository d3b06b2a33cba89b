// ==========================================
// 留置质量报表系统 - Excel 导出器
// ==========================================
// 职责: 将合并汇总表（全部分组，含总体行）写为单工作表工作簿
// 格式: 工作表 "Dados"，首行表头，其后每行一条汇总记录
// ==========================================

use crate::domain::{AggregateRow, Report};
use crate::exporter::error::{ExportError, ExportResult};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::fs;
use std::path::Path;
use tracing::info;

/// 工作表名
pub const EXPORT_SHEET_NAME: &str = "Dados";

/// 导出列（顺序固定）
pub const EXPORT_COLUMNS: [&str; 8] = [
    "Grupo_Relatorio",
    "Equipe",
    "M2_Produzido",
    "M2_Retido",
    "Meta_M2",
    "Saldo_M2",
    "% Realizado",
    "Status",
];

struct ExportFormats {
    header: Format,
    text: Format,
    number: Format,
    percent: Format,
    overall_text: Format,
    overall_number: Format,
    overall_percent: Format,
}

impl ExportFormats {
    fn new() -> Self {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(0x1F4E78)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);
        let text = Format::new().set_border(FormatBorder::Thin);
        let number = Format::new()
            .set_num_format("#,##0.00")
            .set_border(FormatBorder::Thin);
        let percent = Format::new()
            .set_num_format("0.00")
            .set_border(FormatBorder::Thin);

        Self {
            overall_text: text.clone().set_bold().set_background_color(0xE2EFDA),
            overall_number: number.clone().set_bold().set_background_color(0xE2EFDA),
            overall_percent: percent.clone().set_bold().set_background_color(0xE2EFDA),
            header,
            text,
            number,
            percent,
        }
    }
}

// ==========================================
// XlsxExporter - Excel 导出器
// ==========================================
#[derive(Debug, Default)]
pub struct XlsxExporter;

impl XlsxExporter {
    pub fn new() -> Self {
        Self
    }

    /// 生成工作簿字节
    pub fn to_bytes(&self, rows: &[AggregateRow]) -> ExportResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let formats = ExportFormats::new();

        let sheet = workbook.add_worksheet();
        sheet.set_name(EXPORT_SHEET_NAME)?;
        write_sheet(sheet, rows, &formats)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// 导出报表的合并汇总表到文件
    ///
    /// # 参数
    /// - report: 报表
    /// - path: 目标 .xlsx 路径（父目录需存在）
    pub fn export_report<P: AsRef<Path>>(&self, report: &Report, path: P) -> ExportResult<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes(&report.rows)?;
        fs::write(path, bytes).map_err(|e| ExportError::FileWrite {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        info!(
            path = %path.display(),
            rows = report.rows.len(),
            report_id = %report.report_id,
            "报表已导出"
        );
        Ok(())
    }
}

fn write_sheet(
    sheet: &mut Worksheet,
    rows: &[AggregateRow],
    formats: &ExportFormats,
) -> ExportResult<()> {
    for (col, header) in EXPORT_COLUMNS.iter().enumerate() {
        sheet.write_with_format(0, col as u16, *header, &formats.header)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let r = (idx + 1) as u32;
        let (text, number, percent) = if row.is_overall() {
            (&formats.overall_text, &formats.overall_number, &formats.overall_percent)
        } else {
            (&formats.text, &formats.number, &formats.percent)
        };

        sheet.write_with_format(r, 0, row.group.as_str(), text)?;
        sheet.write_with_format(r, 1, row.team.as_str(), text)?;
        sheet.write_with_format(r, 2, row.produced, number)?;
        sheet.write_with_format(r, 3, row.retained, number)?;
        sheet.write_with_format(r, 4, row.target, number)?;
        sheet.write_with_format(r, 5, row.balance, number)?;
        sheet.write_with_format(r, 6, row.realized_pct, percent)?;
        sheet.write_with_format(r, 7, row.status.label(), text)?;
    }

    sheet.set_column_width(0, 24)?;
    sheet.set_column_width(1, 16)?;
    for col in 2..=6 {
        sheet.set_column_width(col, 14)?;
    }
    sheet.set_column_width(7, 16)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TargetStatus, OVERALL_TEAM};
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;

    fn row(team: &str, produced: f64, retained: f64) -> AggregateRow {
        AggregateRow {
            group: "L1".to_string(),
            team: team.to_string(),
            produced,
            retained,
            target: produced * 0.005,
            balance: produced * 0.005 - retained,
            realized_pct: 0.25,
            status: TargetStatus::Within,
        }
    }

    #[test]
    fn test_to_bytes_writes_dados_sheet() {
        let rows = vec![row("A", 2000.0, 5.0), row(OVERALL_TEAM, 2000.0, 5.0)];
        let bytes = XlsxExporter::new().to_bytes(&rows).unwrap();

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![EXPORT_SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range(EXPORT_SHEET_NAME).unwrap();
        assert_eq!(range.height(), 3);
        assert_eq!(range.width(), EXPORT_COLUMNS.len());
        assert_eq!(
            range.get((0, 0)),
            Some(&Data::String("Grupo_Relatorio".to_string()))
        );
        assert_eq!(range.get((0, 6)), Some(&Data::String("% Realizado".to_string())));
        assert_eq!(range.get((1, 2)), Some(&Data::Float(2000.0)));
        assert_eq!(range.get((2, 1)), Some(&Data::String(OVERALL_TEAM.to_string())));
    }

    #[test]
    fn test_empty_rows_only_header() {
        let bytes = XlsxExporter::new().to_bytes(&[]).unwrap();
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(EXPORT_SHEET_NAME).unwrap();
        assert_eq!(range.height(), 1);
    }
}
