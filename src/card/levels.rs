//! Indentation Levels
//!
//! 1列目の先頭スペース数から階層レベルへの対応表。
//!
//! インデント幅はファイルごとに異なるため、固定幅を仮定せず、
//! データ領域で実際に観測されたスペース数を昇順に並べて 0, 1, 2, ... を割り当てます。
//! 対応表はワークシート全体で1つだけなので、セクションごとにインデント幅が
//! 異なるファイルでは一方のセクションが誤分類されます。

use std::collections::BTreeMap;

use crate::card::leading_space_count;
use crate::grid::CellGrid;
use crate::types::CellValue;

/// 先頭スペース数 → 階層レベル（0始まりの連番）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct LevelMap {
    levels: BTreeMap<usize, usize>,
}

impl LevelMap {
    /// 観測されたスペース数の集合から対応表を生成
    ///
    /// 重複は無視され、昇順に密なレベルが割り当てられます。
    pub fn from_counts<I: IntoIterator<Item = usize>>(counts: I) -> Self {
        let mut levels: BTreeMap<usize, usize> = counts.into_iter().map(|c| (c, 0)).collect();
        for (level, slot) in levels.values_mut().enumerate() {
            *slot = level;
        }
        Self { levels }
    }

    /// ヘッダーの2行下から最終行までの1列目を走査して対応表を生成
    ///
    /// 空でない文字列セルのみが対象です。空白だけのセルも数えます。
    pub fn classify<G: CellGrid + ?Sized>(grid: &G, header_row: u32) -> Self {
        let Some(range) = grid.used_range() else {
            return Self::default();
        };

        let counts = (header_row.saturating_add(2)..=range.end.row).filter_map(|row| {
            grid.cell_value(row, 0)
                .and_then(CellValue::as_text)
                .filter(|text| !text.is_empty())
                .map(leading_space_count)
        });

        Self::from_counts(counts)
    }

    /// スペース数に対応するレベル（観測されていない場合は`None`）
    pub fn level_of(&self, space_count: usize) -> Option<usize> {
        self.levels.get(&space_count).copied()
    }

    /// 観測されたスペース数（昇順）
    pub fn space_counts(&self) -> Vec<usize> {
        self.levels.keys().copied().collect()
    }

    /// レベル数
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
