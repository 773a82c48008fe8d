//! Workbook Grid Loader
//!
//! calamineを使用してシート名と値のグリッドを読み込みます。
//! ODSとXLSXのどちらもcalamineの`Sheets`として同じ経路で扱います。

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::{Duration, NaiveDate};
use std::io::Cursor;

use crate::error::CurriMapError;
use crate::types::{CellValue, SheetGrid, SheetRole};

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
pub(crate) struct WorkbookParser {
    workbook: Sheets<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// メモリ上のファイル内容からワークブックを開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - 読み込みに成功した場合
    /// * `Err(CurriMapError::Parse)` - calamineが開けない場合
    pub fn open(bytes: Vec<u8>) -> Result<Self, CurriMapError> {
        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        Ok(Self { workbook })
    }

    /// すべてのシート名を取得（ワークブック内の順序）
    pub fn get_sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// すべてのシートをグリッドとして読み込む
    ///
    /// 最初のシートが主マップ、それ以降が専門課程トラックとして役割が割り当てられます。
    pub fn load_grids(&mut self) -> Result<Vec<SheetGrid>, CurriMapError> {
        let names = self.get_sheet_names();
        let mut grids = Vec::with_capacity(names.len());
        for (index, name) in names.into_iter().enumerate() {
            grids.push(self.load_grid(name, index)?);
        }
        Ok(grids)
    }

    /// 1シートを読み込む
    fn load_grid(&mut self, name: String, index: usize) -> Result<SheetGrid, CurriMapError> {
        let range = self.workbook.worksheet_range(&name)?;
        let cells = dense_cells(&range);
        log::debug!(
            "sheet '{}': {} rows x {} cols",
            name,
            cells.len(),
            cells.first().map(Vec::len).unwrap_or(0)
        );
        Ok(SheetGrid::new(
            name,
            index,
            SheetRole::from_position(index),
            cells,
        ))
    }
}

/// calamineの範囲をA1起点の稠密な行列に変換する
///
/// calamineの範囲は最初の非空セルから始まるため、`start()`の分だけ
/// 先頭に空行・空列を補います。
fn dense_cells(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let start_row = start_row as usize;
    let start_col = start_col as usize;
    let cols = start_col + range.width();

    let mut cells = vec![vec![CellValue::Empty; cols]; start_row];
    for row in range.rows() {
        let mut values = Vec::with_capacity(cols);
        values.resize(start_col, CellValue::Empty);
        values.extend(row.iter().map(convert_cell));
        cells.push(values);
    }
    cells
}

/// calamineのセル値を変換する
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match serial_to_iso(dt.as_f64()) {
            Some(text) => CellValue::String(text),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::Empty => CellValue::Empty,
    }
}

/// シリアル値（1900年システム）をISO 8601形式の文字列に変換する
///
/// 時刻部分がない場合は日付のみを返します。
fn serial_to_iso(serial: f64) -> Option<String> {
    // 9999-12-31まで
    if !(0.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    let datetime = epoch.checked_add_signed(Duration::seconds(seconds))?;

    if seconds % 86_400 == 0 {
        Some(datetime.format("%Y-%m-%d").to_string())
    } else {
        Some(datetime.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_to_iso() {
        assert_eq!(serial_to_iso(45658.0).as_deref(), Some("2025-01-01"));
        assert_eq!(serial_to_iso(45658.5).as_deref(), Some("2025-01-01T12:00:00"));
        assert_eq!(serial_to_iso(f64::NAN), None);
    }

    #[test]
    fn test_convert_cell() {
        assert_eq!(convert_cell(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(
            convert_cell(&Data::String("Cálculo I".to_string())),
            CellValue::String("Cálculo I".to_string())
        );
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_dense_cells_keeps_absolute_positions() {
        let mut range = Range::new((1, 2), (2, 3));
        range.set_value((1, 2), Data::String("Álgebra".to_string()));
        range.set_value((2, 3), Data::Float(8.0));

        let cells = dense_cells(&range);
        assert_eq!(cells.len(), 3);
        assert!(cells[0].iter().all(CellValue::is_empty));
        assert_eq!(cells[1].len(), 4);
        assert_eq!(cells[1][2], CellValue::String("Álgebra".to_string()));
        assert_eq!(cells[2][3], CellValue::Number(8.0));
    }

    #[test]
    fn test_dense_cells_empty_range() {
        let range: Range<Data> = Range::empty();
        assert!(dense_cells(&range).is_empty());
    }

    #[test]
    fn test_open_rejects_garbage() {
        assert!(matches!(
            WorkbookParser::open(b"definitely not a workbook".to_vec()),
            Err(CurriMapError::Parse(_))
        ));
    }
}
