//! Batch Module
//!
//! 複数の文書を順に処理します。1つの文書の失敗は他の文書に影響しません。

use std::path::{Path, PathBuf};

use crate::builder::Extractor;
use crate::document::CurriculumDocument;
use crate::error::CurriMapError;

/// 1文書分の処理結果
#[derive(Debug)]
pub enum BatchOutcome {
    /// 抽出に成功した（色の警告を含む場合がある）
    Extracted(CurriculumDocument),
    /// 入力ファイルが存在しない
    Missing,
    /// 読み込みに失敗した
    Failed(CurriMapError),
}

/// バッチ内の1件
#[derive(Debug)]
pub struct BatchItem {
    /// 指定されたファイル名
    pub file: String,
    /// 実際に参照したパス
    pub path: PathBuf,
    pub outcome: BatchOutcome,
}

impl BatchItem {
    pub fn document(&self) -> Option<&CurriculumDocument> {
        match &self.outcome {
            BatchOutcome::Extracted(document) => Some(document),
            _ => None,
        }
    }

    pub fn is_extracted(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Extracted(_))
    }
}

/// ソースディレクトリ基準のファイル名の一覧を順に処理する
///
/// 存在しないファイルは`Missing`、読み込めないファイルは`Failed`として記録し、
/// 残りの処理を続けます。
///
/// # 引数
///
/// * `extractor` - 抽出に使用する設定済みの`Extractor`
/// * `source_dir` - ファイル名を解決する基準ディレクトリ
/// * `files` - 処理するファイル名（処理順）
pub fn run_batch<S: AsRef<str>>(
    extractor: &Extractor,
    source_dir: impl AsRef<Path>,
    files: &[S],
) -> Vec<BatchItem> {
    let source_dir = source_dir.as_ref();
    files
        .iter()
        .map(|file| {
            let file = file.as_ref();
            let path = source_dir.join(file);
            let outcome = process_one(extractor, &path);
            BatchItem {
                file: file.to_string(),
                path,
                outcome,
            }
        })
        .collect()
}

fn process_one(extractor: &Extractor, path: &Path) -> BatchOutcome {
    if !path.is_file() {
        log::warn!("file not found: {}", path.display());
        return BatchOutcome::Missing;
    }

    log::info!("processing {}", path.display());
    match extractor.extract_path(path) {
        Ok(document) => BatchOutcome::Extracted(document),
        Err(e) => {
            log::warn!("{}: {}", path.display(), e);
            BatchOutcome::Failed(e)
        }
    }
}
