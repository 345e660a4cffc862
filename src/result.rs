//! Parse Result Module
//!
//! 正規化結果（列名の並びと、列名の並びに揃った行データ）を定義するモジュール。

use std::borrow::Cow;
use std::collections::HashMap;

use crate::card::HIERARCHY_COLUMNS;
use crate::types::CellValue;

/// 正規化された1行
///
/// 3つの階層列は常に文字列（空の場合あり）で、残りの列は元のセル値を
/// 列の並び順どおりに保持します。
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    project: String,
    sub_item: String,
    cost_category: String,
    values: Vec<CellValue>,
}

impl ParsedRow {
    pub(crate) fn new(
        project: String,
        sub_item: String,
        cost_category: String,
        values: Vec<CellValue>,
    ) -> Self {
        Self {
            project,
            sub_item,
            cost_category,
            values,
        }
    }

    /// 세부사업
    pub fn project(&self) -> &str {
        &self.project
    }

    /// 세부항목
    pub fn sub_item(&self) -> &str {
        &self.sub_item
    }

    /// 원가통계비목
    pub fn cost_category(&self) -> &str {
        &self.cost_category
    }

    /// 階層列以外の値（元の列順）
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// 列位置で値を取得（0〜2は階層列）
    pub fn field(&self, column: usize) -> Option<Cow<'_, CellValue>> {
        let hierarchy = |s: &str| Cow::Owned(CellValue::String(s.to_string()));
        match column {
            0 => Some(hierarchy(&self.project)),
            1 => Some(hierarchy(&self.sub_item)),
            2 => Some(hierarchy(&self.cost_category)),
            n => self.values.get(n - HIERARCHY_COLUMNS.len()).map(Cow::Borrowed),
        }
    }

    /// すべての列の値を列順に返す
    pub fn fields(&self) -> impl Iterator<Item = Cow<'_, CellValue>> + '_ {
        (0..HIERARCHY_COLUMNS.len() + self.values.len()).filter_map(move |col| self.field(col))
    }
}

/// 1ファイル分の正規化結果
///
/// 生成後は変更されません。新しいファイルを読み込んだ場合は丸ごと置き換えます。
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    headers: Vec<String>,
    rows: Vec<ParsedRow>,
    /// 列名 → 列位置（同名の列がある場合は先頭の列）
    index: HashMap<String, usize>,
}

impl ParseResult {
    /// 階層列以外の列名と行データから結果を生成
    ///
    /// 出力列は`세부사업, 세부항목, 원가통계비목`の後に`data_headers`が続きます。
    pub(crate) fn new(data_headers: Vec<String>, rows: Vec<ParsedRow>) -> Self {
        let headers: Vec<String> = HIERARCHY_COLUMNS
            .iter()
            .map(|h| h.to_string())
            .chain(data_headers)
            .collect();

        let mut index = HashMap::with_capacity(headers.len());
        for (position, name) in headers.iter().enumerate() {
            index.entry(name.clone()).or_insert(position);
        }

        debug_assert!(rows
            .iter()
            .all(|row| row.values.len() + HIERARCHY_COLUMNS.len() == headers.len()));

        Self {
            headers,
            rows,
            index,
        }
    }

    /// 列名（階層列が先頭）
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// 行データ
    pub fn rows(&self) -> &[ParsedRow] {
        &self.rows
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列名から列位置を取得
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.index.get(header).copied()
    }

    /// 行番号と列名で値を取得
    pub fn value(&self, row: usize, header: &str) -> Option<Cow<'_, CellValue>> {
        let column = self.column_index(header)?;
        self.rows.get(row)?.field(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParseResult {
        ParseResult::new(
            vec!["예산".to_string(), "집행".to_string()],
            vec![ParsedRow::new(
                "교육활동".to_string(),
                "방과후".to_string(),
                "강사료".to_string(),
                vec![CellValue::Number(100.0), CellValue::Empty],
            )],
        )
    }

    #[test]
    fn test_headers_put_hierarchy_first() {
        let result = sample();
        assert_eq!(
            result.headers(),
            &["세부사업", "세부항목", "원가통계비목", "예산", "집행"]
        );
    }

    #[test]
    fn test_lookup_by_header_name() {
        let result = sample();

        assert_eq!(
            result.value(0, "세부사업").unwrap().as_ref(),
            &CellValue::from("교육활동")
        );
        assert_eq!(
            result.value(0, "예산").unwrap().as_ref(),
            &CellValue::Number(100.0)
        );
        assert_eq!(result.value(0, "집행").unwrap().as_ref(), &CellValue::Empty);
        assert!(result.value(0, "비고").is_none());
        assert!(result.value(1, "예산").is_none());
    }

    #[test]
    fn test_fields_follow_header_order() {
        let result = sample();
        let fields: Vec<String> = result.rows()[0]
            .fields()
            .map(|v| v.to_display_string())
            .collect();
        assert_eq!(fields, vec!["교육활동", "방과후", "강사료", "100", ""]);
    }

    #[test]
    fn test_duplicate_header_names_keep_both_columns() {
        let result = ParseResult::new(
            vec!["금액".to_string(), "금액".to_string()],
            vec![ParsedRow::new(
                String::new(),
                String::new(),
                String::new(),
                vec![CellValue::Number(1.0), CellValue::Number(2.0)],
            )],
        );

        assert_eq!(result.headers().len(), 5);
        assert_eq!(result.column_index("금액"), Some(3));
        assert_eq!(result.rows()[0].field(4).unwrap().as_ref(), &CellValue::Number(2.0));
    }
}
