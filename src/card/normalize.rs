//! Row Normalizer
//!
//! 階層コンテキストを保持しながらデータ行を上から走査し、
//! 원가통계비목（レベル3）の行ごとに1つの出力行を生成する。

use log::debug;

use crate::card::levels::LevelMap;
use crate::card::leading_space_count;
use crate::grid::CellGrid;
use crate::result::ParsedRow;
use crate::types::{CellCoord, CellValue};

/// 各レベルで直近に見たラベル
///
/// 1回の解析の間だけ存在し、上位レベルが更新されると下位レベルは空に戻ります。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct HierarchyContext {
    pub project: String,
    pub sub_item: String,
    pub cost_category: String,
}

impl HierarchyContext {
    /// 세부사업を設定し、세부항목と원가통계비목をクリア
    pub fn set_project(&mut self, label: &str) {
        self.project = label.to_string();
        self.sub_item.clear();
        self.cost_category.clear();
    }

    /// 세부항목を設定し、원가통계비목をクリア
    pub fn set_sub_item(&mut self, label: &str) {
        self.sub_item = label.to_string();
        self.cost_category.clear();
    }

    pub fn set_cost_category(&mut self, label: &str) {
        self.cost_category = label.to_string();
    }
}

/// データ行を正規化する
///
/// # 引数
///
/// * `grid` - 対象ワークシート
/// * `header_row` - ヘッダー行（データはその2行下から始まる）
/// * `headers` - `extract_headers`の結果（先頭は병합컬럼）
/// * `levels` - インデント対応表
///
/// # レベルごとの動作
///
/// | レベル | 動作 |
/// |---|---|
/// | 0 | 합계行。破棄し、コンテキストも変更しない |
/// | 1 | 세부사업を更新、下位をクリア |
/// | 2 | 세부항목を更新、원가통계비목をクリア |
/// | 3 | 원가통계비목を更新し、1行出力 |
/// | 4以上 | 未定義。何もせず破棄する |
pub(crate) fn normalize_rows<G: CellGrid + ?Sized>(
    grid: &G,
    header_row: u32,
    headers: &[String],
    levels: &LevelMap,
) -> Vec<ParsedRow> {
    let Some(range) = grid.used_range() else {
        return Vec::new();
    };

    let mut context = HierarchyContext::default();
    let mut rows = Vec::new();

    for row in header_row.saturating_add(2)..=range.end.row {
        // 数値・論理値の階層セルはインデントを持たないため、レベル0と同じく破棄される
        let Some(raw) = grid.cell_value(row, 0).and_then(CellValue::as_text) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }

        let space_count = leading_space_count(raw);
        let level = levels.level_of(space_count).unwrap_or_else(|| {
            debug!(
                "{}: indentation of {} spaces is not in the level map, treating as level 0",
                CellCoord::new(row, 0).to_a1_notation(),
                space_count
            );
            0
        });
        let label = raw.trim();

        match level {
            0 => continue,
            1 => context.set_project(label),
            2 => context.set_sub_item(label),
            3 => {
                context.set_cost_category(label);
                let values = (1..headers.len() as u32)
                    .map(|col| grid.cell_value(row, col).cloned().unwrap_or_default())
                    .collect();
                rows.push(ParsedRow::new(
                    context.project.clone(),
                    context.sub_item.clone(),
                    context.cost_category.clone(),
                    values,
                ));
            }
            // 4段以上の階層は扱わない。コンテキストを変えずに行ごと捨てる
            deeper => debug!(
                "{}: level {} is deeper than 원가통계비목, row dropped",
                CellCoord::new(row, 0).to_a1_notation(),
                deeper
            ),
        }
    }

    rows
}
