//! Row Selection Module
//!
//! 正規化結果の一部の行だけを出力するための選択集合。
//! 選択は結果とは別に保持され、結果そのものは変更しません。

use std::collections::BTreeSet;

use crate::result::{ParseResult, ParsedRow};

/// 選択された行番号の集合
///
/// 出力時は選択順ではなく、常に行番号の昇順で並びます。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    indices: BTreeSet<usize>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 行を選択に追加
    pub fn select(&mut self, index: usize) {
        self.indices.insert(index);
    }

    /// 行を選択から外す
    pub fn deselect(&mut self, index: usize) {
        self.indices.remove(&index);
    }

    /// 選択状態を反転し、反転後に選択されていれば`true`を返す
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.indices.remove(&index) {
            false
        } else {
            self.indices.insert(index);
            true
        }
    }

    /// `0..len`をすべて選択
    pub fn select_all(&mut self, len: usize) {
        self.indices.extend(0..len);
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// 選択された行番号（昇順）
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// 選択された行を昇順で取り出す
    ///
    /// 結果の行数を超える行番号は無視されます。
    pub fn project<'a>(&self, result: &'a ParseResult) -> Vec<&'a ParsedRow> {
        self.indices
            .iter()
            .filter_map(|&index| result.rows().get(index))
            .collect()
    }
}

impl FromIterator<usize> for RowSelection {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

impl Extend<usize> for RowSelection {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        self.indices.extend(iter);
    }
}
