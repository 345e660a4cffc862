//! Formatter Module
//!
//! calamineのセルデータを`CellValue`へ変換するモジュール。
//! 日付セルは`DateFormat`に従ってシリアル値のまま、または文字列として取り込みます。

use std::fmt::Write as _;

use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::api::DateFormat;
use crate::error::CardNormError;
use crate::types::CellValue;

/// セルフォーマッター
///
/// calamineの`Data`から正規化処理で使う`CellValue`への変換を担当します。
#[derive(Debug, Clone, Default)]
pub(crate) struct CellFormatter {
    /// 日付セルの取り込み方
    date_format: DateFormat,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new(date_format: DateFormat) -> Self {
        Self { date_format }
    }

    /// セル値を変換
    ///
    /// # 引数
    ///
    /// * `cell` - calamineのセルデータ
    ///
    /// # 戻り値
    ///
    /// * `Ok(CellValue)` - 変換後の値
    /// * `Err(CardNormError)` - 日付計算がオーバーフローした場合
    pub fn to_cell_value(&self, cell: &Data) -> Result<CellValue, CardNormError> {
        let value = match cell {
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) => CellValue::String(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => {
                let serial = dt.as_f64();
                match self.date_format {
                    DateFormat::Serial => CellValue::Number(serial),
                    _ if dt.is_duration() => CellValue::Number(serial),
                    _ => CellValue::String(DateFormatter.format(serial, &self.date_format)?),
                }
            }
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
            Data::Empty => CellValue::Empty,
        };

        Ok(value)
    }
}

/// 日付フォーマッター
///
/// Excelのシリアル日付値を文字列に変換します。
/// 1900年システム（1899年12月30日起算）として処理します。
#[derive(Debug)]
pub(crate) struct DateFormatter;

impl DateFormatter {
    /// 日付値をフォーマット
    ///
    /// 小数部（時刻成分）がある場合、ISO 8601では`YYYY-MM-DD HH:MM:SS`になります。
    /// シリアル値60以下は1900年うるう年バグの影響で1日ずれますが、
    /// 사업관리카드で扱う日付の範囲では問題になりません。
    pub fn format(&self, serial_value: f64, format: &DateFormat) -> Result<String, CardNormError> {
        let datetime = Self::to_datetime(serial_value)?;

        let mut formatted = String::new();
        let result = match format {
            DateFormat::Serial => write!(formatted, "{}", serial_value),
            DateFormat::Iso8601 if serial_value.fract() == 0.0 => {
                write!(formatted, "{}", datetime.format("%Y-%m-%d"))
            }
            DateFormat::Iso8601 => write!(formatted, "{}", datetime.format("%Y-%m-%d %H:%M:%S")),
            DateFormat::Custom(format_str) => write!(formatted, "{}", datetime.format(format_str)),
        };

        // chronoは不正な書式指定子をfmt::Errorとして報告する
        result.map_err(|_| {
            CardNormError::Config(format!("Invalid date format string: {:?}", format))
        })?;

        Ok(formatted)
    }

    fn to_datetime(serial_value: f64) -> Result<NaiveDateTime, CardNormError> {
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| CardNormError::Config("Invalid epoch date".to_string()))?;

        let days = serial_value.floor() as i64;
        let seconds = ((serial_value - serial_value.floor()) * 86_400.0).round() as i64;

        epoch
            .checked_add_signed(Duration::days(days))
            .and_then(|d| d.checked_add_signed(Duration::seconds(seconds)))
            .ok_or_else(|| {
                CardNormError::Config(format!(
                    "Date calculation overflow: serial_value={}",
                    serial_value
                ))
            })
    }
}
