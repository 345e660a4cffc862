//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

use crate::card::HEADER_KEYWORDS;

/// cardnormクレート全体で使用するエラー型
///
/// 사업관리카드ファイルの読み込み、ヘッダー検出、正規化、出力の各段階で
/// 発生するすべてのエラーを統一的に扱います。
///
/// `Display`の文字列は、そのまま利用者に提示する唯一のメッセージとして使用されます。
///
/// # 使用例
///
/// ```rust,no_run
/// use cardnorm::{CardNormError, NormalizerBuilder};
/// use std::fs::File;
///
/// fn load(path: &str) -> Result<usize, CardNormError> {
///     let normalizer = NormalizerBuilder::new().build()?;
///     let result = normalizer.parse(File::open(path)?)?;
///     Ok(result.rows().len())
/// }
/// ```
#[derive(Error, Debug)]
pub enum CardNormError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ワークブックの解析中に発生したエラー（calamine由来）
    ///
    /// ファイル形式が不正、破損したファイル、サポートされていない形式などが原因です。
    #[error("Failed to parse spreadsheet file: {0}")]
    Parse(#[from] calamine::Error),

    /// XLSXエクスポート中に発生したエラー（rust_xlsxwriter由来）
    #[error("Failed to export spreadsheet: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    /// JSON出力中に発生したエラー
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `NormalizerBuilder::build()`時に検出されます。
    #[error("Configuration error: {0}")]
    Config(String),

    /// 入力サイズ制限に違反したエラー
    #[error("Security violation: {0}")]
    SecurityViolation(String),

    /// 読み込み可能なワークシートが存在しない
    ///
    /// ワークブックにシートが1つもない場合、または指定したシートが存在しない場合に発生します。
    #[error("Worksheet not found: {sheet}")]
    WorksheetMissing {
        /// 要求されたシート（先頭シートの場合は`(first sheet)`）
        sheet: String,
    },

    /// 階層列のヘッダー行が見つからない
    ///
    /// 1列目のどの行にも`세부사업`・`세부항목`・`원가통계비목`のいずれも含まれていない場合に
    /// 発生します。これがデータ解釈前の唯一の検証ゲートです。
    #[error(
        "Header row not found: the first column must contain one of \"{}\", \"{}\" or \"{}\"",
        HEADER_KEYWORDS[0],
        HEADER_KEYWORDS[1],
        HEADER_KEYWORDS[2]
    )]
    HeaderNotFound,
}
