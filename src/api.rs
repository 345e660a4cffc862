//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// シート選択方式
///
/// 正規化対象のシートを選択する方法を指定します。
/// 既定では先頭シートのみを対象とし、他のシートは無視されます。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SheetSelector {
    /// ワークブックの先頭シート（デフォルト）
    #[default]
    First,

    /// インデックス指定（0始まり）
    Index(usize),

    /// シート名指定
    ///
    /// 例: `SheetSelector::Name("예산".to_string())`
    Name(String),
}

/// 日付セルの出力形式
///
/// ワークブック内の日付セルを正規化結果に取り込む際の表現を指定します。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum DateFormat {
    /// Excelのシリアル値（数値）のまま取り込む（デフォルト）
    ///
    /// 例: `45000`
    #[default]
    Serial,

    /// ISO 8601形式（YYYY-MM-DD、時刻成分がある場合は`YYYY-MM-DD HH:MM:SS`）
    Iso8601,

    /// カスタム形式（chrono互換フォーマット文字列）
    ///
    /// ```rust,no_run
    /// use cardnorm::{DateFormat, NormalizerBuilder};
    ///
    /// # fn main() -> Result<(), cardnorm::CardNormError> {
    /// let normalizer = NormalizerBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%Y.%m.%d".to_string()))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Custom(String),
}

/// テキスト出力フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum OutputFormat {
    /// タブ区切りテキスト（デフォルト）
    ///
    /// 表計算ソフトへの貼り付け用。フィールドはタブ、行は改行で連結し、
    /// エスケープは行いません。
    #[default]
    Tsv,

    /// CSV形式
    ///
    /// カンマ・ダブルクォート・改行を含むフィールドのみクォートします。
    Csv,

    /// JSON形式
    ///
    /// ```json
    /// {
    ///   "headers": ["세부사업", "세부항목", "원가통계비목", "예산액"],
    ///   "rows": [
    ///     {"세부사업": "교육활동", "세부항목": "방과후", "원가통계비목": "강사료", "예산액": 1000}
    ///   ]
    /// }
    /// ```
    Json,

    /// Markdownテーブル形式
    Markdown,
}
