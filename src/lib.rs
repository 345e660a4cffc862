//! cardnorm - Normalizer for indented school budget "business-management cards"
//!
//! A 사업관리카드 lists its hierarchy (세부사업 → 세부항목 → 원가통계비목) in a single
//! column, encoding the level of each row by leading spaces. This crate reads such
//! a workbook (`.xls`, `.xlsx`, `.xlsb`, `.ods`), locates the header row, infers the
//! indentation levels, and flattens the hierarchy into explicit columns on every
//! leaf row.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use cardnorm::NormalizerBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a normalizer with default settings (first sheet, TSV output)
//!     let normalizer = NormalizerBuilder::new().build()?;
//!
//!     // Parse the card
//!     let result = normalizer.parse(File::open("card.xlsx")?)?;
//!     println!("총 {}행", result.len());
//!
//!     // Render every row as TSV, ready to paste into a spreadsheet
//!     let tsv = normalizer.render_to_string(&result, None)?;
//!     println!("{}", tsv);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Selecting Rows and Exporting
//!
//! ```rust,no_run
//! use cardnorm::{export_file_name, NormalizerBuilder, RowSelection};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let normalizer = NormalizerBuilder::new()
//!         .with_export_sheet_name("정규화데이터")
//!         .build()?;
//!     let result = normalizer.parse_file("2024 사업관리카드.xlsx")?;
//!
//!     // Rows come out in ascending index order regardless of selection order
//!     let selection: RowSelection = [3, 1].into_iter().collect();
//!     normalizer.export_xlsx_to_path(
//!         &result,
//!         Some(&selection),
//!         export_file_name("2024 사업관리카드.xlsx"),
//!     )?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Working With Any Grid
//!
//! The normalization core only needs the [`CellGrid`] trait, so cards that are
//! already in memory can be normalized without a workbook:
//!
//! ```rust
//! use cardnorm::{parse_card, CellValue, SheetGrid};
//!
//! let grid = SheetGrid::from_rows(vec![
//!     vec![CellValue::from("세부사업"), CellValue::from("예산")],
//!     vec![CellValue::Empty, CellValue::from("본예산")],
//!     vec![CellValue::from("합계"), CellValue::from(1500.0)],
//!     vec![CellValue::from("  교육활동")],
//!     vec![CellValue::from("    방과후")],
//!     vec![CellValue::from("      강사료"), CellValue::from(1500.0)],
//! ]);
//!
//! let result = parse_card(&grid).unwrap();
//! assert_eq!(result.len(), 1);
//! assert_eq!(result.rows()[0].project(), "교육활동");
//! assert_eq!(result.headers()[3], "예산 본예산");
//! ```

mod api;
mod builder;
mod card;
mod error;
mod formatter;
mod grid;
mod output;
mod parser;
mod result;
mod security;
mod selection;
mod session;
mod types;

// 公開API
pub use api::{DateFormat, OutputFormat, SheetSelector};
pub use builder::{Normalizer, NormalizerBuilder};
pub use card::{
    parse_card, COST_CATEGORY_COLUMN, HEADER_KEYWORDS, HIERARCHY_COLUMNS, PROJECT_COLUMN,
    SUB_ITEM_COLUMN,
};
pub use error::CardNormError;
pub use grid::{CellGrid, SheetGrid};
pub use output::{
    export_file_name, OutputFormatter, XlsxExporter, DEFAULT_EXPORT_FILE_NAME,
    DEFAULT_EXPORT_SHEET_NAME,
};
pub use result::{ParseResult, ParsedRow};
pub use selection::RowSelection;
pub use session::{CardSession, LoadTicket, LoadedCard};
pub use types::{CellCoord, CellRange, CellValue};
