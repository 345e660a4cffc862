//! Session Module
//!
//! 「現在読み込まれているファイル」の状態を保持するモジュール。
//!
//! 読み込みは`begin_load`で受け取ったチケットを`finish_load`に渡して完了させます。
//! 後から開始された読み込みは、それ以前のすべての読み込みを無効にします。
//! 無効になったチケットの結果は破棄され、状態には反映されません。

use log::debug;

use crate::error::CardNormError;
use crate::result::ParseResult;
use crate::selection::RowSelection;

/// 読み込み済みのカード
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCard {
    pub file_name: String,
    pub result: ParseResult,
}

/// 読み込み要求を識別するチケット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    file_name: String,
}

impl LoadTicket {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// 現在のファイル・エラー・行選択を保持するセッション
#[derive(Debug, Default)]
pub struct CardSession {
    generation: u64,
    loaded: Option<LoadedCard>,
    error: Option<String>,
    selection: RowSelection,
}

impl CardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しい読み込みを開始し、それ以前のチケットを無効にする
    pub fn begin_load(&mut self, file_name: impl Into<String>) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
            file_name: file_name.into(),
        }
    }

    /// 読み込みを完了する
    ///
    /// # 戻り値
    ///
    /// * `true` - 結果が状態に反映された場合
    /// * `false` - チケットが古く、結果が破棄された場合
    ///
    /// 成功時は読み込み済みのカードを丸ごと置き換え、エラーと行選択をクリアします。
    /// 失敗時は以前の結果も破棄し、エラーメッセージを保持します。
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        outcome: Result<ParseResult, CardNormError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "ignoring stale load of '{}' (generation {}, current {})",
                ticket.file_name, ticket.generation, self.generation
            );
            return false;
        }

        self.selection.clear();
        match outcome {
            Ok(result) => {
                self.loaded = Some(LoadedCard {
                    file_name: ticket.file_name,
                    result,
                });
                self.error = None;
            }
            Err(err) => {
                self.loaded = None;
                self.error = Some(err.to_string());
            }
        }
        true
    }

    /// 結果・ファイル名・エラー・行選択をすべてクリア
    pub fn reset(&mut self) {
        self.generation += 1;
        self.loaded = None;
        self.error = None;
        self.selection.clear();
    }

    pub fn loaded(&self) -> Option<&LoadedCard> {
        self.loaded.as_ref()
    }

    pub fn result(&self) -> Option<&ParseResult> {
        self.loaded.as_ref().map(|card| &card.result)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.loaded.as_ref().map(|card| card.file_name.as_str())
    }

    /// 直近の読み込みのエラーメッセージ
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut RowSelection {
        &mut self.selection
    }

    /// 読み込み済みの行数（未読み込みなら0）
    pub fn row_count(&self) -> usize {
        self.result().map_or(0, ParseResult::len)
    }
}
