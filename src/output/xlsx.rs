//! XLSX Export
//!
//! 正規化結果を1シートのXLSXファイルとして書き出す。

use std::path::Path;

use log::info;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::error::CardNormError;
use crate::result::ParsedRow;
use crate::types::CellValue;

/// エクスポートするシートの既定名
pub const DEFAULT_EXPORT_SHEET_NAME: &str = "정규화데이터";

/// 元ファイル名が分からない場合のエクスポートファイル名
pub const DEFAULT_EXPORT_FILE_NAME: &str = "정규화_사업관리카드.xlsx";

const MIN_COLUMN_WIDTH: usize = 10;
const MAX_COLUMN_WIDTH: usize = 50;

/// 元ファイル名からエクスポートファイル名を決める
///
/// 末尾の`.xls` / `.xlsx`（大文字小文字を区別しない）を取り除き、`_정규화.xlsx`を付けます。
///
/// ```
/// use cardnorm::export_file_name;
///
/// assert_eq!(export_file_name("2024 사업관리카드.XLS"), "2024 사업관리카드_정규화.xlsx");
/// assert_eq!(export_file_name(""), "정규화_사업관리카드.xlsx");
/// ```
pub fn export_file_name(source_name: &str) -> String {
    if source_name.is_empty() {
        return DEFAULT_EXPORT_FILE_NAME.to_string();
    }

    let lower = source_name.to_ascii_lowercase();
    let base = [".xlsx", ".xls"]
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &source_name[..source_name.len() - ext.len()])
        .unwrap_or(source_name);

    format!("{}_정규화.xlsx", base)
}

/// XLSXエクスポーター
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    sheet_name: String,
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_SHEET_NAME)
    }
}

impl XlsxExporter {
    pub fn new(sheet_name: &str) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
        }
    }

    /// XLSXファイルのバイト列を生成
    pub fn to_buffer(
        &self,
        headers: &[String],
        rows: &[&ParsedRow],
    ) -> Result<Vec<u8>, CardNormError> {
        let mut workbook = self.build_workbook(headers, rows)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// XLSXファイルとして保存
    pub fn save<P: AsRef<Path>>(
        &self,
        headers: &[String],
        rows: &[&ParsedRow],
        path: P,
    ) -> Result<(), CardNormError> {
        let mut workbook = self.build_workbook(headers, rows)?;
        workbook.save(path.as_ref())?;
        info!(
            "exported {} rows to {}",
            rows.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    fn build_workbook(
        &self,
        headers: &[String],
        rows: &[&ParsedRow],
    ) -> Result<Workbook, CardNormError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (col, header) in headers.iter().enumerate() {
            worksheet.write_string(0, column_index(col)?, header)?;
        }

        for (row_idx, row) in rows.iter().enumerate() {
            let sheet_row = row_idx as u32 + 1;
            for (col, value) in row.fields().enumerate() {
                write_value(worksheet, sheet_row, column_index(col)?, &value)?;
            }
        }

        for (col, width) in column_widths(headers, rows).into_iter().enumerate() {
            worksheet.set_column_width(column_index(col)?, width as f64)?;
        }

        Ok(workbook)
    }
}

fn write_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
) -> Result<(), CardNormError> {
    match value {
        CellValue::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        CellValue::String(s) | CellValue::Error(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::Empty => {}
    }
    Ok(())
}

fn column_index(col: usize) -> Result<u16, CardNormError> {
    u16::try_from(col)
        .map_err(|_| CardNormError::Config(format!("Too many columns to export: {}", col + 1)))
}

/// 列幅（文字数）を計算
///
/// 列名と各値の文字数の最大値を、10〜50の範囲に収めます。
fn column_widths(headers: &[String], rows: &[&ParsedRow]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let longest_value = rows
                .iter()
                .filter_map(|row| row.field(col))
                .map(|value| value.to_display_string().chars().count())
                .max()
                .unwrap_or(0);

            header
                .chars()
                .count()
                .max(longest_value)
                .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}
