//! Security Module
//!
//! 入力ファイルのサイズ制限を実装するモジュール。
//! ワークブックはメモリ上に読み込んでから解析するため、上限を超える入力は読み込み時点で拒否します。

use std::io::Read;

use crate::error::CardNormError;

/// 入力ファイルの既定の最大サイズ（100MB）
pub(crate) const DEFAULT_MAX_INPUT_FILE_SIZE: u64 = 104_857_600;

/// セキュリティ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 100MB (104_857_600 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: DEFAULT_MAX_INPUT_FILE_SIZE,
        }
    }
}

impl SecurityConfig {
    /// 入力全体をメモリに読み込む
    ///
    /// 上限を1バイト超えた時点で読み込みを打ち切ります。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<u8>)` - 読み込んだバイト列
    /// * `Err(CardNormError::SecurityViolation)` - 入力が上限を超えた場合
    pub fn read_input<R: Read>(&self, reader: R) -> Result<Vec<u8>, CardNormError> {
        let mut buffer = Vec::new();
        let bytes_read = reader
            .take(self.max_input_file_size.saturating_add(1))
            .read_to_end(&mut buffer)?;

        self.check_input_size(bytes_read as u64)?;
        Ok(buffer)
    }

    /// 入力サイズが上限以内かを検証
    pub fn check_input_size(&self, size: u64) -> Result<(), CardNormError> {
        if size > self.max_input_file_size {
            return Err(CardNormError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                size, self.max_input_file_size
            )));
        }
        Ok(())
    }
}
