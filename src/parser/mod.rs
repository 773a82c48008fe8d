//! Parser Module
//!
//! スプレッドシートの読み込みと背景色の抽出を担当します。
//!
//! - 値のグリッドはcalamineで読み込みます（`workbook`）。
//! - 背景色は形式ごとの色抽出ストラテジーで、XMLを直接解析して取得します
//!   （ODS: `ods_styles` + `ods_cells`、XLSX: `xlsx_styles` + `xlsx_fills`）。
//!
//! どちらのストラテジーも同じ`ColorIndex`を生成し、失敗は警告として返します。

mod ods;
mod ods_cells;
mod ods_styles;
mod workbook;
mod xlsx_fills;
mod xlsx_styles;
mod xml;

pub use ods_cells::{walk_cells, RepeatLimits, RowRun, WalkReport};
pub use ods_styles::StyleTable;
pub use xlsx_fills::extract_fills;
pub use xlsx_styles::{ColorRef, Fill, PatternType, StyledCell, StyledSheet, StyledWorkbook};

pub(crate) use workbook::WorkbookParser;

use crate::api::SourceFormat;
use crate::color::ColorIndex;
use crate::document::{ExtractionWarning, WarningStage};
use crate::security::SecurityConfig;

/// 色抽出ストラテジーの結果
#[derive(Debug, Default)]
pub(crate) struct ColorExtraction {
    pub index: ColorIndex,
    pub walk: Option<WalkReport>,
    pub warnings: Vec<ExtractionWarning>,
}

impl ColorExtraction {
    /// 警告を記録してログにも出力する
    pub(crate) fn warn(&mut self, stage: WarningStage, message: String) {
        log::warn!("{}", message);
        self.record(stage, message);
    }

    /// 警告を記録する（ログ出力済みの場合）
    pub(crate) fn record(&mut self, stage: WarningStage, message: String) {
        self.warnings.push(ExtractionWarning::new(stage, message));
    }
}

/// 形式に応じた色抽出ストラテジーを実行する
pub(crate) fn extract_colors(
    format: SourceFormat,
    bytes: &[u8],
    security: &SecurityConfig,
    limits: &RepeatLimits,
) -> ColorExtraction {
    match format {
        SourceFormat::Ods => ods::extract_colors(bytes, security, limits),
        SourceFormat::Xlsx => xlsx_fills::extract_colors(bytes, security),
    }
}
