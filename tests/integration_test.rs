//! Integration Tests for cardnorm
//!
//! ワークブックをメモリ上で生成し、公開APIを通して読み込み・正規化・出力までを検証します。

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::*;
use std::io::Cursor;
use cardnorm::{
    CardNormError, CardSession, CellValue, DateFormat, NormalizerBuilder, OutputFormat,
    RowSelection, SheetSelector,
};

// Helper module for generating test fixtures
mod fixtures {
    use super::*;

    /// 2段ヘッダー・4段インデントの標準的な사업관리카드をシートに書き込む
    pub fn write_card(worksheet: &mut Worksheet) -> Result<(), XlsxError> {
        worksheet.write_string(0, 0, "2024학년도 사업관리카드")?;

        // ヘッダー（2行）
        worksheet.write_string(1, 0, "세부사업/세부항목/원가통계비목")?;
        worksheet.write_string(1, 1, "예산")?;
        worksheet.write_string(1, 2, "집행")?;
        worksheet.write_string(1, 3, "비고")?;
        worksheet.write_string(2, 1, "본예산")?;
        worksheet.write_string(2, 2, "누계")?;

        // データ
        worksheet.write_string(3, 0, "합계")?;
        worksheet.write_number(3, 1, 3000)?;
        worksheet.write_number(3, 2, 1200)?;
        worksheet.write_string(4, 0, "  교육활동")?;
        worksheet.write_number(4, 1, 2000)?;
        worksheet.write_string(5, 0, "    방과후학교")?;
        worksheet.write_number(5, 1, 1500)?;
        worksheet.write_string(6, 0, "      강사료")?;
        worksheet.write_number(6, 1, 1000)?;
        worksheet.write_number(6, 2, 400)?;
        worksheet.write_string(6, 3, "월별 지급")?;
        worksheet.write_string(7, 0, "      재료비")?;
        worksheet.write_number(7, 1, 500)?;
        worksheet.write_number(7, 2, 300)?;
        worksheet.write_string(8, 0, "    현장체험")?;
        worksheet.write_number(8, 1, 500)?;
        worksheet.write_string(9, 0, "      차량임차료")?;
        worksheet.write_number(9, 1, 500)?;
        worksheet.write_number(9, 2, 200)?;
        worksheet.write_string(10, 0, "  학교운영")?;
        worksheet.write_string(11, 0, "      소모품비")?;
        worksheet.write_number(11, 1, 1000)?;
        worksheet.write_number(11, 2, 300)?;

        Ok(())
    }

    /// 標準的なカード1枚だけのワークブック
    pub fn generate_card() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        write_card(workbook.add_worksheet())?;
        Ok(workbook.save_to_buffer()?)
    }

    /// 先頭シートがメモで、2番目のシートにカードがあるワークブック
    pub fn generate_card_on_second_sheet() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();

        let memo = workbook.add_worksheet();
        memo.set_name("메모")?;
        memo.write_string(0, 0, "작성 안내")?;

        let card = workbook.add_worksheet();
        card.set_name("카드")?;
        write_card(card)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// 1列目にキーワードがないワークブック
    pub fn generate_without_header() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "구분")?;
        // キーワードが1列目以外にあっても検出されない
        worksheet.write_string(0, 1, "세부사업")?;
        worksheet.write_string(2, 0, "  교육활동")?;
        Ok(workbook.save_to_buffer()?)
    }

    /// 値の列に日付セルを含むカード
    pub fn generate_card_with_date() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        worksheet.write_string(0, 0, "원가통계비목")?;
        worksheet.write_string(0, 1, "집행일")?;
        worksheet.write_string(2, 0, "합계")?;
        worksheet.write_string(3, 0, " 교육활동")?;
        worksheet.write_string(4, 0, "  방과후")?;
        worksheet.write_string(5, 0, "   강사료")?;
        worksheet.write_datetime_with_format(
            5,
            1,
            &ExcelDateTime::from_ymd(2024, 3, 15)?,
            &date_format,
        )?;

        Ok(workbook.save_to_buffer()?)
    }
}

#[test]
fn test_end_to_end_card() {
    let data = fixtures::generate_card().unwrap();
    let normalizer = NormalizerBuilder::new().build().unwrap();

    let result = normalizer.parse(Cursor::new(data)).unwrap();

    assert_eq!(
        result.headers(),
        &["세부사업", "세부항목", "원가통계비목", "예산 본예산", "집행 누계", "비고"]
    );
    assert_eq!(result.len(), 4);

    let hierarchy: Vec<(&str, &str, &str)> = result
        .rows()
        .iter()
        .map(|r| (r.project(), r.sub_item(), r.cost_category()))
        .collect();
    assert_eq!(
        hierarchy,
        vec![
            ("교육활동", "방과후학교", "강사료"),
            ("교육활동", "방과후학교", "재료비"),
            ("교육활동", "현장체험", "차량임차료"),
            // 세부항목がないまま원가통계비목が現れた場合は空のまま
            ("학교운영", "", "소모품비"),
        ]
    );

    assert_eq!(
        result.value(0, "예산 본예산").unwrap().as_ref(),
        &CellValue::Number(1000.0)
    );
    assert_eq!(
        result.value(0, "비고").unwrap().as_ref(),
        &CellValue::from("월별 지급")
    );
    assert_eq!(result.value(1, "비고").unwrap().as_ref(), &CellValue::Empty);
}

#[test]
fn test_tsv_output() {
    let data = fixtures::generate_card().unwrap();
    let normalizer = NormalizerBuilder::new().build().unwrap();

    let tsv = normalizer.convert_to_string(Cursor::new(data)).unwrap();
    let lines: Vec<&str> = tsv.split('\n').collect();

    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        "세부사업\t세부항목\t원가통계비목\t예산 본예산\t집행 누계\t비고"
    );
    assert_eq!(lines[1], "교육활동\t방과후학교\t강사료\t1000\t400\t월별 지급");
    assert_eq!(lines[4], "학교운영\t\t소모품비\t1000\t300\t");
    assert!(!tsv.ends_with('\n'));
}

#[test]
fn test_selected_rows_are_index_ordered() {
    let data = fixtures::generate_card().unwrap();
    let normalizer = NormalizerBuilder::new().build().unwrap();
    let result = normalizer.parse(Cursor::new(data)).unwrap();

    let mut selection = RowSelection::new();
    selection.select(3);
    selection.select(1);

    let tsv = normalizer.render_to_string(&result, Some(&selection)).unwrap();
    let categories: Vec<&str> = tsv
        .lines()
        .skip(1)
        .map(|line| line.split('\t').nth(2).unwrap())
        .collect();
    assert_eq!(categories, vec!["재료비", "소모품비"]);
}

#[test]
fn test_json_output() {
    let data = fixtures::generate_card().unwrap();
    let normalizer = NormalizerBuilder::new()
        .with_output_format(OutputFormat::Json)
        .build()
        .unwrap();

    let json = normalizer.convert_to_string(Cursor::new(data)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["rows"].as_array().unwrap().len(), 4);
    assert_eq!(parsed["rows"][2]["세부항목"], "현장체험");
    assert_eq!(parsed["rows"][2]["집행 누계"], 200.0);
}

#[test]
fn test_markdown_output() {
    let data = fixtures::generate_card().unwrap();
    let normalizer = NormalizerBuilder::new()
        .with_output_format(OutputFormat::Markdown)
        .build()
        .unwrap();

    let markdown = normalizer.convert_to_string(Cursor::new(data)).unwrap();
    let lines: Vec<&str> = markdown.lines().collect();

    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("| 세부사업"));
    assert!(lines[1].starts_with("|---"));
}

#[test]
fn test_header_not_found() {
    let data = fixtures::generate_without_header().unwrap();
    let normalizer = NormalizerBuilder::new().build().unwrap();

    let err = normalizer.parse(Cursor::new(data)).unwrap_err();
    assert!(matches!(err, CardNormError::HeaderNotFound));

    let message = err.to_string();
    for keyword in ["세부사업", "세부항목", "원가통계비목"] {
        assert!(message.contains(keyword), "{}", message);
    }
}

#[test]
fn test_only_first_sheet_is_read_by_default() {
    let data = fixtures::generate_card_on_second_sheet().unwrap();
    let normalizer = NormalizerBuilder::new().build().unwrap();

    let result = normalizer.parse(Cursor::new(data));
    assert!(matches!(result, Err(CardNormError::HeaderNotFound)));
}

#[test]
fn test_sheet_selection() {
    let data = fixtures::generate_card_on_second_sheet().unwrap();

    let by_index = NormalizerBuilder::new()
        .with_sheet_selector(SheetSelector::Index(1))
        .build()
        .unwrap();
    assert_eq!(by_index.parse(Cursor::new(data.clone())).unwrap().len(), 4);

    let by_name = NormalizerBuilder::new()
        .with_sheet_selector(SheetSelector::Name("카드".to_string()))
        .build()
        .unwrap();
    assert_eq!(by_name.parse(Cursor::new(data.clone())).unwrap().len(), 4);

    let missing = NormalizerBuilder::new()
        .with_sheet_selector(SheetSelector::Name("없는시트".to_string()))
        .build()
        .unwrap();
    match missing.parse(Cursor::new(data)) {
        Err(CardNormError::WorksheetMissing { sheet }) => assert_eq!(sheet, "없는시트"),
        other => panic!("Expected WorksheetMissing, got {:?}", other),
    }
}

#[test]
fn test_invalid_input_is_parse_error() {
    let normalizer = NormalizerBuilder::new().build().unwrap();
    let result = normalizer.parse(Cursor::new(b"PK\x03\x04 broken".to_vec()));
    assert!(matches!(result, Err(CardNormError::Parse(_))));
}

#[test]
fn test_dates_default_to_serial() {
    let data = fixtures::generate_card_with_date().unwrap();
    let normalizer = NormalizerBuilder::new().build().unwrap();

    let result = normalizer.parse(Cursor::new(data)).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(
        result.value(0, "집행일").unwrap().as_ref(),
        &CellValue::Number(45366.0)
    );
}

#[test]
fn test_dates_as_iso8601() {
    let data = fixtures::generate_card_with_date().unwrap();
    let normalizer = NormalizerBuilder::new()
        .with_date_format(DateFormat::Iso8601)
        .build()
        .unwrap();

    let result = normalizer.parse(Cursor::new(data)).unwrap();
    assert_eq!(
        result.value(0, "집행일").unwrap().as_ref(),
        &CellValue::from("2024-03-15")
    );
}

#[test]
fn test_xlsx_export_reads_back() {
    let data = fixtures::generate_card().unwrap();
    let normalizer = NormalizerBuilder::new().build().unwrap();
    let result = normalizer.parse(Cursor::new(data)).unwrap();

    let bytes = normalizer.export_xlsx(&result, None).unwrap();

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["정규화데이터".to_string()]);

    let range = workbook.worksheet_range("정규화데이터").unwrap();
    assert_eq!(range.get_size(), (5, 6));
    assert_eq!(range.get((0, 0)), Some(&Data::String("세부사업".to_string())));
    assert_eq!(range.get((1, 2)), Some(&Data::String("강사료".to_string())));
    assert_eq!(range.get((1, 3)), Some(&Data::Float(1000.0)));
    // 空の値はセルとして書き込まれない
    assert_eq!(range.get((2, 5)), Some(&Data::Empty));
}

#[test]
fn test_xlsx_export_with_selection_to_path() {
    let data = fixtures::generate_card().unwrap();
    let normalizer = NormalizerBuilder::new()
        .with_export_sheet_name("선택")
        .build()
        .unwrap();
    let result = normalizer.parse(Cursor::new(data)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(cardnorm::export_file_name("card.xlsx"));
    let selection: RowSelection = [2].into_iter().collect();
    normalizer
        .export_xlsx_to_path(&result, Some(&selection), &path)
        .unwrap();

    assert!(path.ends_with("card_정규화.xlsx"));
    let bytes = std::fs::read(&path).unwrap();
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range("선택").unwrap();
    assert_eq!(range.get_size(), (2, 6));
    assert_eq!(range.get((1, 2)), Some(&Data::String("차량임차료".to_string())));
}

#[test]
fn test_parse_files_keeps_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let card = dir.path().join("card.xlsx");
    let broken = dir.path().join("broken.xlsx");
    let second = dir.path().join("second.xlsx");
    std::fs::write(&card, fixtures::generate_card().unwrap()).unwrap();
    std::fs::write(&broken, b"not a workbook").unwrap();
    std::fs::write(&second, fixtures::generate_card_on_second_sheet().unwrap()).unwrap();

    let normalizer = NormalizerBuilder::new().build().unwrap();
    let results = normalizer.parse_files(&[card, broken, second, dir.path().join("missing.xlsx")]);

    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().len(), 4);
    assert!(matches!(results[1], Err(CardNormError::Parse(_))));
    assert!(matches!(results[2], Err(CardNormError::HeaderNotFound)));
    assert!(matches!(results[3], Err(CardNormError::Io(_))));
}

#[test]
fn test_session_tracks_latest_load() {
    let normalizer = NormalizerBuilder::new().build().unwrap();
    let mut session = CardSession::new();

    let stale = session.begin_load("old.xlsx");
    let current = session.begin_load("card.xlsx");

    let outcome = normalizer.parse(Cursor::new(fixtures::generate_card().unwrap()));
    assert!(session.finish_load(current, outcome));

    let outcome = normalizer.parse(Cursor::new(fixtures::generate_without_header().unwrap()));
    assert!(!session.finish_load(stale, outcome));

    assert_eq!(session.file_name(), Some("card.xlsx"));
    assert_eq!(session.row_count(), 4);
    assert!(session.error().is_none());
}
