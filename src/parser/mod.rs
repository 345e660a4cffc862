//! Parser Module
//!
//! calamineを使用したワークブックの読み込み。
//! 選択したシートを`SheetGrid`に変換するところまでを担当します。

mod workbook;

pub(crate) use workbook::WorkbookParser;
