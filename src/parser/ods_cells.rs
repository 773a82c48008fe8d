//! ODS Cell Grid Walker Module
//!
//! `content.xml`の`table:table` / `table:table-row` / `table:table-cell`を
//! ストリーミングで走査し、スタイル参照を背景色に解決して`ColorIndex`へ書き込みます。
//!
//! ODSは同一の行・セルを`table:number-rows-repeated` /
//! `table:number-columns-repeated`で圧縮します。シート末尾の空白を
//! 「残り100万行」のような巨大な繰り返しで表すことがあるため、
//! 行の繰り返しは`RepeatLimits`の範囲でのみ展開します。

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

use crate::color::ColorIndex;
use crate::error::CurriMapError;
use crate::parser::ods_styles::StyleTable;
use crate::parser::xml::{attr_value, repeat_count};

/// 行の繰り返し展開の上限
///
/// - `row_skip_threshold`を超える繰り返し行は展開せずスキップします
///   （行インデックスは宣言された回数だけ進みます）。
/// - それ以下の繰り返し行は`row_expand_cap`行まで展開します。
///
/// どちらの場合も、失われた色付き行は`WalkReport`に記録されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatLimits {
    pub row_skip_threshold: u32,
    pub row_expand_cap: u32,
}

impl Default for RepeatLimits {
    fn default() -> Self {
        Self {
            row_skip_threshold: 1000,
            row_expand_cap: 500,
        }
    }
}

impl RepeatLimits {
    /// 宣言された繰り返し回数のうち、実際に展開する行数
    pub fn expanded_rows(&self, declared: u32) -> u32 {
        if declared > self.row_skip_threshold {
            0
        } else {
            declared.min(self.row_expand_cap)
        }
    }
}

/// 展開されなかった色付きの行ブロック
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowRun {
    pub sheet: String,
    /// ブロック先頭の行（0始まり）
    pub start_row: u32,
    /// 宣言された繰り返し回数
    pub declared: u32,
    /// 実際に展開した行数
    pub expanded: u32,
}

/// 走査結果のサマリー
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalkReport {
    /// 走査したシート名（文書順）
    pub sheets: Vec<String>,
    /// 書き込んだエントリ数（上書きを含む）
    pub entries_written: usize,
    /// 閾値超過でスキップされた色付き行ブロック
    pub skipped: Vec<RowRun>,
    /// 上限で切り詰められた色付き行ブロック
    pub truncated: Vec<RowRun>,
}

/// 現在の行の状態
struct RowState {
    start: u32,
    declared: u32,
    expanded: u32,
    col: u32,
    /// 展開されなかった行に色付きセルがあったか
    lost_color: bool,
}

/// `content.xml`を走査して色インデックスを構築する
///
/// エラーが発生した場合は走査を中断しますが、それまでに`index`へ
/// 書き込まれたエントリは残ります。
///
/// # 引数
///
/// * `part` - エラーメッセージ用のパート名
/// * `xml` - `content.xml`の本文
/// * `styles` - スタイル名 → 背景色の対応表
/// * `limits` - 行の繰り返し展開の上限
/// * `index` - 書き込み先
pub fn walk_cells(
    part: &str,
    xml: &[u8],
    styles: &StyleTable,
    limits: &RepeatLimits,
    index: &mut ColorIndex,
) -> Result<WalkReport, CurriMapError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut report = WalkReport::default();
    let mut sheet: Option<String> = None;
    let mut row_idx: u32 = 0;
    let mut row: Option<RowState> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"table:table" => {
                    let name = attr_value(&e, b"table:name", part)?.unwrap_or_default();
                    report.sheets.push(name.clone());
                    sheet = Some(name);
                    row_idx = 0;
                }
                b"table:table-row" if sheet.is_some() => {
                    row = Some(open_row(&e, part, limits, row_idx)?);
                }
                b"table:table-cell" | b"table:covered-table-cell" => {
                    if let (Some(sheet), Some(state)) = (sheet.as_deref(), row.as_mut()) {
                        visit_cell(&e, part, sheet, state, styles, index, &mut report)?;
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"table:table" => {
                    let name = attr_value(&e, b"table:name", part)?.unwrap_or_default();
                    report.sheets.push(name);
                }
                b"table:table-row" if sheet.is_some() => {
                    // セルを持たない行は行インデックスを進めるだけ
                    let declared = repeat_count(&e, b"table:number-rows-repeated", part)?;
                    row_idx = row_idx.saturating_add(declared);
                }
                b"table:table-cell" | b"table:covered-table-cell" => {
                    if let (Some(sheet), Some(state)) = (sheet.as_deref(), row.as_mut()) {
                        visit_cell(&e, part, sheet, state, styles, index, &mut report)?;
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"table:table-row" => {
                    if let (Some(sheet), Some(state)) = (sheet.as_deref(), row.take()) {
                        row_idx = row_idx.saturating_add(state.declared);
                        close_row(sheet, state, limits, &mut report);
                    }
                }
                b"table:table" => {
                    sheet = None;
                    row = None;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CurriMapError::xml(
                    part,
                    format!(
                        "XML parse error at byte {}: {}",
                        reader.buffer_position(),
                        e
                    ),
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(report)
}

fn open_row(
    element: &BytesStart<'_>,
    part: &str,
    limits: &RepeatLimits,
    row_idx: u32,
) -> Result<RowState, CurriMapError> {
    let declared = repeat_count(element, b"table:number-rows-repeated", part)?;
    Ok(RowState {
        start: row_idx,
        declared,
        expanded: limits.expanded_rows(declared),
        col: 0,
        lost_color: false,
    })
}

fn visit_cell(
    element: &BytesStart<'_>,
    part: &str,
    sheet: &str,
    state: &mut RowState,
    styles: &StyleTable,
    index: &mut ColorIndex,
    report: &mut WalkReport,
) -> Result<(), CurriMapError> {
    let columns = repeat_count(element, b"table:number-columns-repeated", part)?;
    let color = attr_value(element, b"table:style-name", part)?
        .and_then(|style| styles.resolve(&style));

    if let Some(color) = color {
        for r in 0..state.expanded {
            for c in 0..columns {
                index.insert(
                    sheet,
                    state.start.saturating_add(r),
                    state.col.saturating_add(c),
                    color,
                );
            }
        }
        report.entries_written += state.expanded as usize * columns as usize;
        if state.expanded < state.declared {
            state.lost_color = true;
        }
    }

    state.col = state.col.saturating_add(columns);
    Ok(())
}

fn close_row(sheet: &str, state: RowState, limits: &RepeatLimits, report: &mut WalkReport) {
    if !state.lost_color {
        return;
    }

    let run = RowRun {
        sheet: sheet.to_string(),
        start_row: state.start,
        declared: state.declared,
        expanded: state.expanded,
    };

    if state.expanded == 0 {
        log::warn!(
            "sheet '{}': colored row block at row {} repeated {} times exceeds threshold {}; not expanded",
            sheet,
            state.start,
            state.declared,
            limits.row_skip_threshold
        );
        report.skipped.push(run);
    } else {
        log::warn!(
            "sheet '{}': colored row block at row {} repeated {} times truncated to {} rows",
            sheet,
            state.start,
            state.declared,
            state.expanded
        );
        report.truncated.push(run);
    }
}
