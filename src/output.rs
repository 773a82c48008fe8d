//! Output Module
//!
//! 抽出結果とレイアウトをJSONとして書き出すモジュール。
//! 描画側（PDF/PNG）はこのJSONを入力として受け取ります。

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::document::CurriculumDocument;
use crate::error::CurriMapError;
use crate::layout::SheetLayout;

/// 1文書分の出力（文書のフィールドにレイアウトを加えたもの）
#[derive(Debug, Serialize)]
pub struct DocumentOutput<'a> {
    #[serde(flatten)]
    pub document: &'a CurriculumDocument,
    pub layouts: &'a [SheetLayout],
}

/// JSONを書き出す
///
/// # 引数
///
/// * `document` - 抽出結果
/// * `layouts` - `Extractor::plan`で計算した配置
/// * `writer` - 出力先のライター
pub fn write_json<W: Write>(
    document: &CurriculumDocument,
    layouts: &[SheetLayout],
    mut writer: W,
) -> Result<(), CurriMapError> {
    let output = DocumentOutput { document, layouts };
    serde_json::to_writer_pretty(&mut writer, &output).map_err(std::io::Error::from)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// 出力ディレクトリ内のJSONファイルのパス（`<文書名>.json`）
pub fn output_path(output_dir: impl AsRef<Path>, document: &CurriculumDocument) -> PathBuf {
    output_dir.as_ref().join(format!("{}.json", document.name))
}

/// 出力ディレクトリにJSONファイルを書き出す
///
/// ディレクトリが存在しない場合は作成します。
///
/// # 戻り値
///
/// * `Ok(PathBuf)` - 書き出したファイルのパス
/// * `Err(CurriMapError::Io)` - ディレクトリ作成・書き込みに失敗した場合
pub fn write_json_file(
    document: &CurriculumDocument,
    layouts: &[SheetLayout],
    output_dir: impl AsRef<Path>,
) -> Result<PathBuf, CurriMapError> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let path = output_path(output_dir, document);
    let file = File::create(&path)?;
    write_json(document, layouts, BufWriter::new(file))?;
    Ok(path)
}
