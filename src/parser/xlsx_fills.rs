//! XLSX Fill Extractor Module
//!
//! `StyledWorkbook`のセルごとの塗りつぶしを`ColorIndex`へ移します。
//! ホストモデルの1始まりの位置を0始まりに変換し、ODS由来の色と同じ形で記録します。

use std::io::Cursor;

use crate::color::{ColorIndex, Rgb};
use crate::document::WarningStage;
use crate::parser::xlsx_styles::{PatternType, StyledWorkbook};
use crate::parser::ColorExtraction;
use crate::security::SecurityConfig;

/// XLSXファイルの内容から色インデックスを構築する
///
/// この関数は失敗しません。アーカイブやワークブックを読めない場合は
/// 空のインデックスと警告を返します。
pub(crate) fn extract_colors(bytes: &[u8], security: &SecurityConfig) -> ColorExtraction {
    let mut extraction = ColorExtraction::default();

    let loaded = security
        .open_archive(Cursor::new(bytes))
        .and_then(|mut archive| StyledWorkbook::from_archive(&mut archive));
    let workbook = match loaded {
        Ok(workbook) => workbook,
        Err(e) => {
            extraction.warn(WarningStage::Archive, e.to_string());
            return extraction;
        }
    };

    // シート単位の失敗はStyledWorkbook側でlog::warn!済み
    for message in &workbook.warnings {
        extraction.record(WarningStage::Fills, message.clone());
    }

    let written = extract_fills(&workbook, &mut extraction.index);
    log::debug!("xlsx: {} filled cells", written);
    extraction
}

/// 塗りつぶし色を色インデックスへ書き込む
///
/// 対象は、パターンが`none`以外で、前景色の文字列が6文字以上のセルです。
/// ARGBのアルファを捨て、末尾6桁を色として使います。
///
/// # 戻り値
///
/// 書き込んだエントリ数
pub fn extract_fills(workbook: &StyledWorkbook, index: &mut ColorIndex) -> usize {
    let mut written = 0usize;

    for sheet in workbook.sheets() {
        for cell in workbook.cells(sheet) {
            if cell.fill.pattern == PatternType::None {
                continue;
            }
            let Some(color) = cell.fill.fg_rgb().as_deref().and_then(Rgb::from_argb) else {
                continue;
            };
            // 1始まりの位置を持たないセルは無視する
            let (Some(row), Some(col)) = (cell.row.checked_sub(1), cell.column.checked_sub(1))
            else {
                continue;
            };
            index.insert(&sheet.name, row, col, color);
            written += 1;
        }
    }

    written
}
