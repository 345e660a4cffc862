//! Workbook Parser
//!
//! calamineのラッパーとして、ワークブックレベルの操作を提供します。

use calamine::{open_workbook_auto_from_rs, Reader, Sheets};
use log::debug;
use std::io::{Cursor, Read};

use crate::api::SheetSelector;
use crate::error::CardNormError;
use crate::formatter::CellFormatter;
use crate::grid::{CellGrid, SheetGrid};
use crate::security::SecurityConfig;

/// ワークブックパーサー
///
/// `.xls` / `.xlsx` / `.xlsb` / `.ods`のいずれも受け付けます。
/// 形式はcalamineが内容から判定します。
pub(crate) struct WorkbookParser {
    workbook: Sheets<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// # 引数
    ///
    /// * `reader` - ワークブックのバイト列を読み込むリーダー
    /// * `security` - 入力サイズの上限
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - 読み込みに成功した場合
    /// * `Err(CardNormError::SecurityViolation)` - 入力が上限を超えた場合
    /// * `Err(CardNormError::Parse)` - スプレッドシートとして解釈できない場合
    pub fn open<R: Read>(reader: R, security: &SecurityConfig) -> Result<Self, CardNormError> {
        let buffer = security.read_input(reader)?;
        debug!("read {} bytes of workbook data", buffer.len());

        let workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        Ok(Self { workbook })
    }

    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// シート選択方式に基づいてシートを1つ選択
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 選択されたシート名
    /// * `Err(CardNormError::WorksheetMissing)` - シートがない、またはインデックス・名前が一致しない場合
    pub fn select_sheet(&self, selector: &SheetSelector) -> Result<String, CardNormError> {
        let names = self.sheet_names();

        let selected = match selector {
            SheetSelector::First => names.into_iter().next(),
            SheetSelector::Index(index) => names.into_iter().nth(*index),
            SheetSelector::Name(name) => names.into_iter().find(|n| n == name),
        };

        selected.ok_or_else(|| CardNormError::WorksheetMissing {
            sheet: describe_selector(selector),
        })
    }

    /// シートを読み込み、グリッドに変換
    pub fn load_grid(
        &mut self,
        sheet_name: &str,
        formatter: &CellFormatter,
    ) -> Result<SheetGrid, CardNormError> {
        let range = self.workbook.worksheet_range(sheet_name)?;
        let grid = SheetGrid::from_range(&range, formatter)?;

        match grid.used_range() {
            Some(used) => debug!(
                "sheet '{}' used range {}:{}, size {:?}",
                sheet_name,
                used.start.to_a1_notation(),
                used.end.to_a1_notation(),
                used.size()
            ),
            None => debug!("sheet '{}' is empty", sheet_name),
        }

        Ok(grid)
    }
}

fn describe_selector(selector: &SheetSelector) -> String {
    match selector {
        SheetSelector::First => "(first sheet)".to_string(),
        SheetSelector::Index(index) => format!("#{}", index),
        SheetSelector::Name(name) => name.clone(),
    }
}
