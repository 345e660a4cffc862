//! Output Formatters Implementation
//!
//! 各出力フォーマットの実装を提供するモジュール。

use crate::error::CardNormError;
use crate::result::ParsedRow;
use std::io::Write;
use unicode_width::UnicodeWidthStr;

/// TSV形式のフォーマッター
///
/// 表計算ソフトへの貼り付け用。フィールドはタブ、行は改行で連結し、
/// 最終行の後に改行は付けません。値のエスケープは行いません。
pub struct TsvFormatter;

impl TsvFormatter {
    pub fn render<W: Write>(
        &self,
        headers: &[String],
        rows: &[&ParsedRow],
        writer: &mut W,
    ) -> Result<(), CardNormError> {
        write!(writer, "{}", headers.join("\t"))?;

        for row in rows {
            let fields: Vec<String> = row.fields().map(|v| v.to_display_string()).collect();
            write!(writer, "\n{}", fields.join("\t"))?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// CSV形式のフォーマッター
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn render<W: Write>(
        &self,
        headers: &[String],
        rows: &[&ParsedRow],
        writer: &mut W,
    ) -> Result<(), CardNormError> {
        let header_line: Vec<String> = headers.iter().map(|h| escape_csv(h)).collect();
        writeln!(writer, "{}", header_line.join(","))?;

        for row in rows {
            let fields: Vec<String> = row
                .fields()
                .map(|v| escape_csv(&v.to_display_string()))
                .collect();
            writeln!(writer, "{}", fields.join(","))?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// JSON形式のフォーマッター
///
/// 各行は列名をキーとするオブジェクトになります。同名の列がある場合は後の列が優先されます。
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn render<W: Write>(
        &self,
        headers: &[String],
        rows: &[&ParsedRow],
        writer: &mut W,
    ) -> Result<(), CardNormError> {
        use serde_json::json;

        let json_rows = rows
            .iter()
            .map(|row| {
                let mut row_obj = serde_json::Map::new();
                for (header, value) in headers.iter().zip(row.fields()) {
                    row_obj.insert(header.clone(), serde_json::to_value(value.as_ref())?);
                }
                Ok(serde_json::Value::Object(row_obj))
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;

        let json_output = json!({
            "headers": headers,
            "rows": json_rows,
        });

        serde_json::to_writer_pretty(&mut *writer, &json_output)?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(())
    }
}

/// Markdownテーブル形式のフォーマッター
///
/// 列幅は表示幅（全角文字は2）で揃え、最小幅は3です。
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn render<W: Write>(
        &self,
        headers: &[String],
        rows: &[&ParsedRow],
        writer: &mut W,
    ) -> Result<(), CardNormError> {
        if headers.is_empty() {
            return Ok(());
        }

        let header_cells: Vec<String> = headers.iter().map(|h| escape_markdown(h)).collect();
        let body: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                row.fields()
                    .map(|v| escape_markdown(&v.to_display_string()))
                    .collect()
            })
            .collect();

        // 1. 列幅の計算
        let mut col_widths = vec![3; header_cells.len()];
        for cells in std::iter::once(&header_cells).chain(body.iter()) {
            for (col_idx, cell) in cells.iter().enumerate() {
                if let Some(width) = col_widths.get_mut(col_idx) {
                    *width = (*width).max(cell.width());
                }
            }
        }

        // 2. ヘッダー行と区切り行
        write_markdown_row(writer, &header_cells, &col_widths)?;
        let separator: String = col_widths
            .iter()
            .map(|&width| format!("{}|", "-".repeat(width + 2)))
            .collect();
        writeln!(writer, "|{}", separator)?;

        // 3. データ行
        for cells in &body {
            write_markdown_row(writer, cells, &col_widths)?;
        }

        writer.flush()?;
        Ok(())
    }
}

fn write_markdown_row<W: Write>(
    writer: &mut W,
    cells: &[String],
    col_widths: &[usize],
) -> Result<(), CardNormError> {
    write!(writer, "|")?;
    for (cell, &width) in cells.iter().zip(col_widths) {
        // 表示幅に基づいて右側を埋める
        let padding = width.saturating_sub(cell.width());
        write!(writer, " {}{} |", cell, " ".repeat(padding))?;
    }
    writeln!(writer)?;
    Ok(())
}

/// CSV文字列をエスケープ
///
/// ダブルクォート、改行、カンマを含む場合はダブルクォートで囲み、
/// 内部のダブルクォートは2つにエスケープします。
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Markdown特殊文字をエスケープ
fn escape_markdown(s: &str) -> String {
    s.trim()
        .replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('\n', "<br>")
}
