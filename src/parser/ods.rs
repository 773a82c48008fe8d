//! ODS Color Strategy
//!
//! ODSアーカイブから`content.xml`と`styles.xml`を読み込み、
//! スタイル表の構築とセルグリッドの走査を順に行います。
//! 途中で失敗しても、それまでに得られた色は残して警告として返します。

use std::io::Cursor;

use crate::color::ColorIndex;
use crate::document::WarningStage;
use crate::error::CurriMapError;
use crate::parser::ods_cells::{walk_cells, RepeatLimits};
use crate::parser::ods_styles::StyleTable;
use crate::parser::ColorExtraction;
use crate::security::{read_part, SecurityConfig};

const CONTENT_PART: &str = "content.xml";
const STYLES_PART: &str = "styles.xml";

/// ODSファイルの内容から色インデックスを構築する
///
/// この関数は失敗しません。問題はすべて`warnings`に記録されます。
pub(crate) fn extract_colors(
    bytes: &[u8],
    security: &SecurityConfig,
    limits: &RepeatLimits,
) -> ColorExtraction {
    let mut extraction = ColorExtraction::default();

    // アーカイブはこのスコープ内で閉じる
    let parts = read_parts(bytes, security);
    let (content, styles) = match parts {
        Ok(parts) => parts,
        Err(e) => {
            extraction.warn(WarningStage::Archive, e.to_string());
            return extraction;
        }
    };

    let mut table = StyleTable::new();
    for (part, xml) in [(CONTENT_PART, Some(&content)), (STYLES_PART, styles.as_ref())] {
        let Some(xml) = xml else { continue };
        if let Err(e) = table.extend_from_xml(part, xml) {
            extraction.warn(WarningStage::Styles, e.to_string());
        }
    }
    log::debug!("ods: {} background styles", table.len());

    let mut index = ColorIndex::new();
    match walk_cells(CONTENT_PART, &content, &table, limits, &mut index) {
        Ok(report) => {
            // 走査中にlog::warn!済みなので記録のみ
            for run in &report.skipped {
                extraction.record(
                    WarningStage::Cells,
                    format!(
                        "sheet '{}': colored rows {}..{} not expanded ({} repeats over threshold {})",
                        run.sheet,
                        run.start_row,
                        run.start_row.saturating_add(run.declared),
                        run.declared,
                        limits.row_skip_threshold
                    ),
                );
            }
            for run in &report.truncated {
                extraction.record(
                    WarningStage::Cells,
                    format!(
                        "sheet '{}': colored rows from {} truncated to {} of {} repeats",
                        run.sheet, run.start_row, run.expanded, run.declared
                    ),
                );
            }
            extraction.walk = Some(report);
        }
        Err(e) => extraction.warn(WarningStage::Cells, e.to_string()),
    }

    extraction.index = index;
    extraction
}

/// `content.xml`（必須）と`styles.xml`（任意）を読み込む
fn read_parts(
    bytes: &[u8],
    security: &SecurityConfig,
) -> Result<(Vec<u8>, Option<Vec<u8>>), CurriMapError> {
    let mut archive = security.open_archive(Cursor::new(bytes))?;
    let content = read_part(&mut archive, CONTENT_PART)?
        .ok_or_else(|| CurriMapError::MissingPart(CONTENT_PART.to_string()))?;
    let styles = read_part(&mut archive, STYLES_PART)?;
    Ok((content, styles))
}
