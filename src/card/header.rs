//! Header Detection
//!
//! ヘッダー行の検出と、2行結合ヘッダーからの列名抽出。

use crate::card::{placeholder_column_name, HEADER_KEYWORDS, MERGED_COLUMN_NAME};
use crate::grid::CellGrid;
use crate::types::CellValue;

/// 1列目を上から走査し、キーワードを含む最初の行を返す
///
/// 文字列セルのみを対象に、大文字小文字を区別しない部分一致で判定します。
pub(crate) fn locate_header_row<G: CellGrid + ?Sized>(grid: &G) -> Option<u32> {
    let range = grid.used_range()?;
    let keywords: Vec<String> = HEADER_KEYWORDS.iter().map(|k| k.to_lowercase()).collect();

    (range.start.row..=range.end.row).find(|&row| {
        grid.cell_value(row, 0)
            .and_then(CellValue::as_text)
            .map(|text| {
                let text = text.to_lowercase();
                keywords.iter().any(|keyword| text.contains(keyword.as_str()))
            })
            .unwrap_or(false)
    })
}

/// ヘッダー行とその直下の行から列名を抽出する
///
/// 戻り値の長さは`col_max + 1`です。1列目は常に`병합컬럼`になります。
/// 2行目の文字列が空でなく1行目と異なる場合は`"<1行目> <2行目>"`と連結し、
/// 両方が空の場合は`컬럼<n>`を割り当てます。
pub(crate) fn extract_headers<G: CellGrid + ?Sized>(grid: &G, header_row: u32) -> Vec<String> {
    let Some(range) = grid.used_range() else {
        return vec![MERGED_COLUMN_NAME.to_string()];
    };

    let mut headers = Vec::with_capacity(range.end.col as usize + 1);
    headers.push(MERGED_COLUMN_NAME.to_string());

    for col in 1..=range.end.col {
        let upper = header_text(grid.cell_value(header_row, col));
        let lower = header_text(grid.cell_value(header_row + 1, col));

        let mut name = upper;
        if !lower.is_empty() && lower != name {
            name = format!("{} {}", name, lower);
        }

        if name.is_empty() {
            name = placeholder_column_name(col);
        }
        headers.push(name);
    }

    headers
}

/// ヘッダーセルの文字列（`0`と`false`は空欄として扱う）
fn header_text(value: Option<&CellValue>) -> String {
    match value {
        Some(CellValue::Number(n)) if *n == 0.0 => String::new(),
        Some(CellValue::Bool(false)) => String::new(),
        Some(v) => v.to_display_string().trim().to_string(),
        None => String::new(),
    }
}
