//! Output Format Module
//!
//! 正規化結果をテキスト形式（TSV / CSV / JSON / Markdown）で出力する
//! フォーマッターと、XLSXエクスポーターを提供するモジュール。

mod formatters;
mod xlsx;

use crate::error::CardNormError;
use crate::result::ParsedRow;
use std::io::Write;

pub use formatters::*;
pub use xlsx::{export_file_name, XlsxExporter, DEFAULT_EXPORT_FILE_NAME, DEFAULT_EXPORT_SHEET_NAME};

/// 出力フォーマッター（Strategy Pattern）
#[derive(Debug, Clone, Copy)]
pub enum OutputFormatter {
    Tsv,
    Csv,
    Json,
    Markdown,
}

impl OutputFormatter {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: crate::api::OutputFormat) -> Self {
        match format {
            crate::api::OutputFormat::Tsv => OutputFormatter::Tsv,
            crate::api::OutputFormat::Csv => OutputFormatter::Csv,
            crate::api::OutputFormat::Json => OutputFormatter::Json,
            crate::api::OutputFormat::Markdown => OutputFormatter::Markdown,
        }
    }

    /// 列名と行を指定されたフォーマットで出力する
    ///
    /// # 引数
    ///
    /// * `headers` - 列名（階層列が先頭）
    /// * `rows` - 出力する行（全行、または選択された行）
    /// * `writer` - 出力先のライター
    pub fn render<W: Write>(
        &self,
        headers: &[String],
        rows: &[&ParsedRow],
        writer: &mut W,
    ) -> Result<(), CardNormError> {
        match self {
            OutputFormatter::Tsv => TsvFormatter.render(headers, rows, writer),
            OutputFormatter::Csv => CsvFormatter.render(headers, rows, writer),
            OutputFormatter::Json => JsonFormatter.render(headers, rows, writer),
            OutputFormatter::Markdown => MarkdownFormatter.render(headers, rows, writer),
        }
    }
}
