//! Builder Module
//!
//! Fluent Builder APIを提供し、`Normalizer`インスタンスを段階的に構築する。

use crate::api::{DateFormat, OutputFormat, SheetSelector};
use crate::error::CardNormError;
use crate::formatter::{CellFormatter, DateFormatter};
use crate::output::{OutputFormatter, XlsxExporter, DEFAULT_EXPORT_SHEET_NAME};
use crate::parser::WorkbookParser;
use crate::result::{ParseResult, ParsedRow};
use crate::security::{SecurityConfig, DEFAULT_MAX_INPUT_FILE_SIZE};
use crate::selection::RowSelection;
use log::debug;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// XLSXのシート名に使えない文字
const INVALID_SHEET_NAME_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// XLSXのシート名の最大文字数
const MAX_SHEET_NAME_CHARS: usize = 31;

/// 正規化処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct NormalizerConfig {
    /// シート選択方式
    pub sheet_selector: SheetSelector,

    /// 日付形式
    pub date_format: DateFormat,

    /// 出力フォーマット
    pub output_format: OutputFormat,

    /// エクスポートするシートの名前
    pub export_sheet_name: String,

    /// 入力ファイルの最大サイズ（バイト）
    pub max_input_file_size: u64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            sheet_selector: SheetSelector::First,
            date_format: DateFormat::Serial,
            output_format: OutputFormat::Tsv,
            export_sheet_name: DEFAULT_EXPORT_SHEET_NAME.to_string(),
            max_input_file_size: DEFAULT_MAX_INPUT_FILE_SIZE,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use cardnorm::{NormalizerBuilder, OutputFormat, SheetSelector};
///
/// # fn main() -> Result<(), cardnorm::CardNormError> {
/// let normalizer = NormalizerBuilder::new()
///     .with_sheet_selector(SheetSelector::Index(0))
///     .with_output_format(OutputFormat::Csv)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NormalizerBuilder {
    /// 内部設定（構築中）
    config: NormalizerConfig,
}

impl Default for NormalizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalizerBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート選択: 先頭のシート
    /// - 日付形式: シリアル値のまま
    /// - 出力フォーマット: TSV
    /// - エクスポートシート名: `정규화데이터`
    /// - 入力ファイルの上限: 100MB
    pub fn new() -> Self {
        Self {
            config: NormalizerConfig::default(),
        }
    }

    /// 読み込むシートを選択する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use cardnorm::{NormalizerBuilder, SheetSelector};
    ///
    /// let builder = NormalizerBuilder::new()
    ///     .with_sheet_selector(SheetSelector::Name("2024".to_string()));
    /// ```
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// 日付セルの取り込み方を指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use cardnorm::{NormalizerBuilder, DateFormat};
    ///
    /// let builder = NormalizerBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%Y.%m.%d".to_string()));
    /// ```
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// テキスト出力のフォーマットを指定する
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// XLSXエクスポート時のシート名を指定する
    pub fn with_export_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.config.export_sheet_name = name.into();
        self
    }

    /// 入力ファイルの最大サイズ（バイト）を指定する
    pub fn with_max_input_size(mut self, bytes: u64) -> Self {
        self.config.max_input_file_size = bytes;
        self
    }

    /// 設定を検証し、`Normalizer`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Normalizer)`: 設定が有効な場合
    /// * `Err(CardNormError::Config)`: 設定が無効な場合
    ///
    /// # 発生し得るエラー
    ///
    /// * カスタム日付形式が不正な書式文字列、または空の出力になる
    /// * エクスポートシート名が空、31文字超、または`[]:*?/\`を含む
    /// * 入力ファイルの上限が0
    pub fn build(self) -> Result<Normalizer, CardNormError> {
        // 1. カスタム日付形式の検証
        if let DateFormat::Custom(_) = self.config.date_format {
            // テスト用の日付（2023-03-15）でフォーマット試行
            let formatted = DateFormatter.format(45000.0, &self.config.date_format)?;
            if formatted.is_empty() {
                return Err(CardNormError::Config(
                    "Invalid date format string: renders an empty string".to_string(),
                ));
            }
        }

        // 2. エクスポートシート名の検証
        validate_sheet_name(&self.config.export_sheet_name)?;

        // 3. 入力サイズ上限の検証
        if self.config.max_input_file_size == 0 {
            return Err(CardNormError::Config(
                "Maximum input size must be greater than zero".to_string(),
            ));
        }

        Ok(Normalizer::new(self.config))
    }
}

fn validate_sheet_name(name: &str) -> Result<(), CardNormError> {
    if name.is_empty() {
        return Err(CardNormError::Config(
            "Export sheet name must not be empty".to_string(),
        ));
    }

    if name.chars().count() > MAX_SHEET_NAME_CHARS {
        return Err(CardNormError::Config(format!(
            "Export sheet name is longer than {} characters: '{}'",
            MAX_SHEET_NAME_CHARS, name
        )));
    }

    if let Some(c) = name.chars().find(|c| INVALID_SHEET_NAME_CHARS.contains(c)) {
        return Err(CardNormError::Config(format!(
            "Export sheet name contains invalid character '{}': '{}'",
            c, name
        )));
    }

    Ok(())
}

/// 正規化処理のファサード
///
/// 사업관리카드を読み込み、正規化結果の生成・テキスト出力・XLSXエクスポートを行う
/// メインエントリーポイントです。
///
/// # 使用例
///
/// ```rust,no_run
/// use cardnorm::NormalizerBuilder;
/// use std::fs::File;
///
/// # fn main() -> Result<(), cardnorm::CardNormError> {
/// let normalizer = NormalizerBuilder::new().build()?;
/// let result = normalizer.parse(File::open("card.xlsx")?)?;
/// println!("총 {}행", result.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Normalizer {
    /// 正規化設定
    config: NormalizerConfig,

    /// セルフォーマッター
    formatter: CellFormatter,

    /// 入力サイズ制限
    security: SecurityConfig,
}

impl Normalizer {
    pub(crate) fn new(config: NormalizerConfig) -> Self {
        Self {
            formatter: CellFormatter::new(config.date_format.clone()),
            security: SecurityConfig {
                max_input_file_size: config.max_input_file_size,
            },
            config,
        }
    }

    /// 設定された出力フォーマット
    pub fn output_format(&self) -> OutputFormat {
        self.config.output_format
    }

    /// ワークブックを読み込み、正規化結果を返す
    ///
    /// # 引数
    ///
    /// * `input` - ワークブックのバイト列を読み込むリーダー
    ///
    /// # 処理フロー
    ///
    /// 1. 入力をメモリに読み込む（サイズ制限あり）
    /// 2. シート選択
    /// 3. グリッドの構築
    /// 4. ヘッダー検出・インデント分類・行の正規化
    ///
    /// # 発生し得るエラー
    ///
    /// * `CardNormError::SecurityViolation` - 入力が上限を超えた場合
    /// * `CardNormError::Parse` - スプレッドシートとして解釈できない場合
    /// * `CardNormError::WorksheetMissing` - 選択したシートがない場合
    /// * `CardNormError::HeaderNotFound` - ヘッダー行が見つからない場合
    pub fn parse<R: Read>(&self, input: R) -> Result<ParseResult, CardNormError> {
        let mut parser = WorkbookParser::open(input, &self.security)?;
        let sheet_name = parser.select_sheet(&self.config.sheet_selector)?;
        debug!("selected sheet '{}'", sheet_name);

        let grid = parser.load_grid(&sheet_name, &self.formatter)?;
        crate::card::parse_card(&grid)
    }

    /// ファイルパスを指定して読み込む
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ParseResult, CardNormError> {
        let file = File::open(path.as_ref())?;
        self.parse(file)
    }

    /// 複数のファイルを並列に読み込む
    ///
    /// 各ファイルは独立して処理され、結果は入力と同じ順序で返ります。
    /// 1つのファイルが失敗しても、他のファイルの処理は継続します。
    pub fn parse_files(&self, paths: &[PathBuf]) -> Vec<Result<ParseResult, CardNormError>> {
        let mut results: Vec<(usize, Result<ParseResult, CardNormError>)> = paths
            .par_iter()
            .enumerate()
            .map(|(idx, path)| (idx, self.parse_file(path)))
            .collect();

        // 結果をインデックス順にソート
        results.sort_by_key(|(idx, _)| *idx);
        results.into_iter().map(|(_, result)| result).collect()
    }

    /// 正規化結果を設定されたフォーマットで出力
    ///
    /// # 引数
    ///
    /// * `result` - 正規化結果
    /// * `selection` - 出力する行の選択（`None`の場合は全行）
    /// * `output` - 出力先のライター
    pub fn render<W: Write>(
        &self,
        result: &ParseResult,
        selection: Option<&RowSelection>,
        output: W,
    ) -> Result<(), CardNormError> {
        let rows = project_rows(result, selection);
        let formatter = OutputFormatter::from_format(self.config.output_format);

        let mut writer = BufWriter::new(output);
        formatter.render(result.headers(), &rows, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// 正規化結果を文字列として出力
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use cardnorm::{NormalizerBuilder, RowSelection};
    ///
    /// # fn main() -> Result<(), cardnorm::CardNormError> {
    /// let normalizer = NormalizerBuilder::new().build()?;
    /// let result = normalizer.parse_file("card.xlsx")?;
    ///
    /// let selection: RowSelection = [0, 2].into_iter().collect();
    /// let tsv = normalizer.render_to_string(&result, Some(&selection))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn render_to_string(
        &self,
        result: &ParseResult,
        selection: Option<&RowSelection>,
    ) -> Result<String, CardNormError> {
        let mut buffer = Vec::new();
        self.render(result, selection, &mut buffer)?;
        bytes_to_string(buffer)
    }

    /// ワークブックを読み込み、そのまま全行を出力
    pub fn convert<R: Read, W: Write>(&self, input: R, output: W) -> Result<(), CardNormError> {
        let result = self.parse(input)?;
        self.render(&result, None, output)
    }

    /// ワークブックを読み込み、全行を文字列として出力
    pub fn convert_to_string<R: Read>(&self, input: R) -> Result<String, CardNormError> {
        let mut buffer = Vec::new();
        self.convert(input, &mut buffer)?;
        bytes_to_string(buffer)
    }

    /// 正規化結果をXLSXのバイト列としてエクスポート
    pub fn export_xlsx(
        &self,
        result: &ParseResult,
        selection: Option<&RowSelection>,
    ) -> Result<Vec<u8>, CardNormError> {
        let rows = project_rows(result, selection);
        self.exporter().to_buffer(result.headers(), &rows)
    }

    /// 正規化結果をXLSXファイルとして保存
    pub fn export_xlsx_to_path<P: AsRef<Path>>(
        &self,
        result: &ParseResult,
        selection: Option<&RowSelection>,
        path: P,
    ) -> Result<(), CardNormError> {
        let rows = project_rows(result, selection);
        self.exporter().save(result.headers(), &rows, path)
    }

    fn exporter(&self) -> XlsxExporter {
        XlsxExporter::new(&self.config.export_sheet_name)
    }
}

fn project_rows<'a>(
    result: &'a ParseResult,
    selection: Option<&RowSelection>,
) -> Vec<&'a ParsedRow> {
    match selection {
        Some(selection) => selection.project(result),
        None => result.rows().iter().collect(),
    }
}

fn bytes_to_string(buffer: Vec<u8>) -> Result<String, CardNormError> {
    String::from_utf8(buffer)
        .map_err(|e| CardNormError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
