//! Grid Module
//!
//! ワークシートのセルを行・列の絶対座標で参照するためのアクセサを提供するモジュール。
//! 正規化処理（`card`モジュール）はこの`CellGrid`トレイトだけに依存します。

use calamine::{Data, Range};

use crate::error::CardNormError;
use crate::formatter::CellFormatter;
use crate::types::{CellCoord, CellRange, CellValue};

/// セルグリッドへの読み取り専用アクセサ
///
/// 座標はワークシート上の絶対座標（0始まり）です。
pub trait CellGrid {
    /// 指定座標のセル値を取得（空セルまたは範囲外は`None`）
    fn cell_value(&self, row: u32, col: u32) -> Option<&CellValue>;

    /// 使用範囲（空のワークシートでは`None`）
    fn used_range(&self) -> Option<CellRange>;
}

/// 稠密なセルグリッド
///
/// 使用範囲の左上を`origin`として、範囲内のセルを行優先で保持します。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetGrid {
    /// 使用範囲の左上座標
    origin: CellCoord,

    /// セル値（行優先、各行の長さは`cols`）
    cells: Vec<Vec<CellValue>>,

    /// 列数
    cols: usize,
}

impl SheetGrid {
    /// A1を原点とする行データからグリッドを生成
    ///
    /// 行ごとに長さが異なっていても構いません。短い行は空セルで補完されます。
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        Self::with_origin(CellCoord::new(0, 0), rows)
    }

    /// 任意の原点を持つグリッドを生成
    pub fn with_origin(origin: CellCoord, mut rows: Vec<Vec<CellValue>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(cols, CellValue::Empty);
        }
        if cols == 0 {
            rows.clear();
        }

        Self {
            origin,
            cells: rows,
            cols,
        }
    }

    /// calamineのレンジからグリッドを生成
    ///
    /// # 引数
    ///
    /// * `range` - `worksheet_range()`で取得したレンジ
    /// * `formatter` - セル値の変換に使用するフォーマッター
    pub(crate) fn from_range(
        range: &Range<Data>,
        formatter: &CellFormatter,
    ) -> Result<Self, CardNormError> {
        let Some((start_row, start_col)) = range.start() else {
            return Ok(Self::default());
        };

        let rows = range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| formatter.to_cell_value(cell))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::with_origin(CellCoord::new(start_row, start_col), rows))
    }
}

impl CellGrid for SheetGrid {
    fn cell_value(&self, row: u32, col: u32) -> Option<&CellValue> {
        let row_idx = row.checked_sub(self.origin.row)? as usize;
        let col_idx = col.checked_sub(self.origin.col)? as usize;

        self.cells
            .get(row_idx)
            .and_then(|r| r.get(col_idx))
            .filter(|value| !value.is_empty())
    }

    fn used_range(&self) -> Option<CellRange> {
        if self.cells.is_empty() || self.cols == 0 {
            return None;
        }

        let end = CellCoord::new(
            self.origin.row + self.cells.len() as u32 - 1,
            self.origin.col + self.cols as u32 - 1,
        );
        Some(CellRange::new(self.origin, end))
    }
}
