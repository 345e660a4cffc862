//! Card Module
//!
//! 사업관리카드（学校予算の事業管理カード）の正規化エンジン。
//!
//! 1列目のテキストの先頭スペース数で表現された3階層
//! （세부사업 → 세부항목 → 원가통계비목）を、各データ行に明示的な列として
//! 展開します。処理は次の順で1回だけ実行されます。
//!
//! 1. ヘッダー行の検出（[`header::locate_header_row`]）
//! 2. 列名の抽出（[`header::extract_headers`]）
//! 3. インデント階層の判定（[`levels::LevelMap::classify`]）
//! 4. 行の正規化（[`normalize::normalize_rows`]）

pub(crate) mod header;
pub(crate) mod levels;
pub(crate) mod normalize;

use log::{debug, info};

use crate::error::CardNormError;
use crate::grid::CellGrid;
use crate::result::ParseResult;
use crate::types::CellCoord;

/// 세부사업（レベル1）の出力列名
pub const PROJECT_COLUMN: &str = "세부사업";

/// 세부항목（レベル2）の出力列名
pub const SUB_ITEM_COLUMN: &str = "세부항목";

/// 원가통계비목（レベル3）の出力列名
pub const COST_CATEGORY_COLUMN: &str = "원가통계비목";

/// 階層列の出力列名（出力時の並び順）
pub const HIERARCHY_COLUMNS: [&str; 3] = [PROJECT_COLUMN, SUB_ITEM_COLUMN, COST_CATEGORY_COLUMN];

/// ヘッダー行の検出に使うキーワード
pub const HEADER_KEYWORDS: [&str; 3] = HIERARCHY_COLUMNS;

/// 1列目（階層が結合された列）の内部列名
pub(crate) const MERGED_COLUMN_NAME: &str = "병합컬럼";

/// ヘッダーが空の列に付与する列名（`col`は列インデックス）
pub(crate) fn placeholder_column_name(col: u32) -> String {
    format!("컬럼{}", col)
}

/// 文字列の先頭にある半角スペースの数を返す
///
/// タブや全角スペースは数えません。
pub(crate) fn leading_space_count(text: &str) -> usize {
    text.bytes().take_while(|&b| b == b' ').count()
}

/// ワークシートを解析して正規化結果を返す
///
/// # 戻り値
///
/// * `Ok(ParseResult)` - 正規化に成功した場合（データ行が0件でも成功）
/// * `Err(CardNormError::HeaderNotFound)` - 1列目にキーワードを含む行がない場合
pub fn parse_card<G: CellGrid + ?Sized>(grid: &G) -> Result<ParseResult, CardNormError> {
    let header_row = header::locate_header_row(grid).ok_or(CardNormError::HeaderNotFound)?;
    debug!(
        "header row located at {}",
        CellCoord::new(header_row, 0).to_a1_notation()
    );

    let source_headers = header::extract_headers(grid, header_row);
    let level_map = levels::LevelMap::classify(grid, header_row);
    if level_map.is_empty() {
        debug!("no text rows below the header");
    } else {
        debug!(
            "{} indentation levels: {:?}",
            level_map.len(),
            level_map.space_counts()
        );
    }

    let rows = normalize::normalize_rows(grid, header_row, &source_headers, &level_map);

    // 1列目（병합컬럼）は3つの階層列に置き換える
    let data_headers = source_headers.into_iter().skip(1).collect();
    let result = ParseResult::new(data_headers, rows);
    info!(
        "normalized {} rows across {} columns",
        result.len(),
        result.headers().len()
    );

    Ok(result)
}
