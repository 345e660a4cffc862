//! パフォーマンステスト
//!
//! 大きなカードの正規化が現実的な時間で終わることを確認します。
//!
//! 注意: 実行時間はマシンに依存するため、時間の検証は手動実行用です。

use cardnorm::{parse_card, CellValue, NormalizerBuilder, SheetGrid};
use rust_xlsxwriter::Workbook;
use std::io::Cursor;
use std::time::{Duration, Instant};

/// 세부사업×세부항목×원가통계비목 の組み合わせで大きなカードを生成
fn large_grid(projects: usize, items: usize, categories: usize) -> SheetGrid {
    let mut rows = vec![
        vec![
            CellValue::from("세부사업"),
            CellValue::from("예산"),
            CellValue::from("집행"),
        ],
        vec![CellValue::Empty, CellValue::from("본예산"), CellValue::from("누계")],
        vec![CellValue::from("합계")],
    ];

    for p in 0..projects {
        rows.push(vec![CellValue::from(format!("  사업{}", p))]);
        for i in 0..items {
            rows.push(vec![CellValue::from(format!("    항목{}", i))]);
            for c in 0..categories {
                rows.push(vec![
                    CellValue::from(format!("      비목{}", c)),
                    CellValue::Number((p * 1000 + i * 10 + c) as f64),
                    CellValue::Number(c as f64),
                ]);
            }
        }
    }

    SheetGrid::from_rows(rows)
}

#[test]
fn test_large_grid_row_count() {
    let grid = large_grid(20, 10, 10);
    let result = parse_card(&grid).unwrap();

    assert_eq!(result.len(), 20 * 10 * 10);
    let last = result.rows().last().unwrap();
    assert_eq!(
        (last.project(), last.sub_item(), last.cost_category()),
        ("사업19", "항목9", "비목9")
    );
}

#[test]
#[ignore] // 手動実行用
fn test_large_workbook_speed() {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "세부사업").unwrap();
    worksheet.write_string(0, 1, "예산").unwrap();
    worksheet.write_string(2, 0, "합계").unwrap();

    let mut row = 3;
    for p in 0..50 {
        worksheet.write_string(row, 0, format!("  사업{}", p)).unwrap();
        row += 1;
        for i in 0..20 {
            worksheet.write_string(row, 0, format!("    항목{}", i)).unwrap();
            row += 1;
            for c in 0..20 {
                worksheet.write_string(row, 0, format!("      비목{}", c)).unwrap();
                worksheet.write_number(row, 1, c as f64).unwrap();
                row += 1;
            }
        }
    }
    let data = workbook.save_to_buffer().unwrap();

    let normalizer = NormalizerBuilder::new().build().unwrap();
    let start = Instant::now();
    let result = normalizer.parse(Cursor::new(data)).unwrap();
    let elapsed = start.elapsed();

    println!("normalized {} rows in {:?}", result.len(), elapsed);
    assert_eq!(result.len(), 50 * 20 * 20);
    assert!(elapsed < Duration::from_secs(5));
}
