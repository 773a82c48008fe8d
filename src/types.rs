//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use serde::Serialize;

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 空セル、または空白だけの文字列かどうか
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 表示用の文字列
    ///
    /// 整数値の数値は小数点なしで表示します（例: `3.0` → `"3"`）。
    pub fn as_display_string(&self) -> String {
        match self {
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

/// セル座標（0始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// A1形式のセル参照を解析（例: "B3" -> (2, 1)）
    ///
    /// `$`付きの絶対参照も受け付けます。形式が不正な場合は`None`です。
    pub fn from_a1(reference: &str) -> Option<Self> {
        let reference = reference.trim().replace('$', "");
        let split = reference
            .find(|c: char| c.is_ascii_digit())
            .filter(|&i| i > 0)?;
        let (letters, digits) = reference.split_at(split);

        let mut col: u32 = 0;
        for ch in letters.chars() {
            if !ch.is_ascii_alphabetic() {
                return None;
            }
            let value = (ch.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
            col = col.checked_mul(26)?.checked_add(value)?;
        }

        let row: u32 = digits.parse().ok()?;
        if row == 0 {
            return None;
        }

        Some(Self::new(row - 1, col - 1))
    }

    /// A1形式の文字列に変換（例: (0, 0) -> "A1"）
    pub fn to_a1_notation(self) -> String {
        let mut col = self.col;
        let mut letters = String::new();
        loop {
            let remainder = col % 26;
            letters.insert(0, (b'A' + remainder as u8) as char);
            if col < 26 {
                break;
            }
            col = col / 26 - 1;
        }
        format!("{}{}", letters, self.row + 1)
    }
}

/// シートの役割
///
/// 最初のシートが主マップ、それ以降が専門課程トラックです。
/// 読み込み時に明示的に割り当て、レイアウトに渡します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetRole {
    /// 学期ごとのグリッドとして描く主マップ
    MainMap,
    /// 学期ラベル付きの一列として描く専門課程トラック
    Specialization,
}

impl SheetRole {
    /// シートの位置から役割を決める
    pub fn from_position(index: usize) -> Self {
        if index == 0 {
            SheetRole::MainMap
        } else {
            SheetRole::Specialization
        }
    }
}

/// 1シート分の値グリッド
///
/// 座標は絶対位置（A1が(0, 0)）で、先頭の空行・空列も保持します。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetGrid {
    /// シート名
    pub name: String,
    /// ワークブック内の位置（0始まり）
    pub index: usize,
    /// 役割
    pub role: SheetRole,
    rows: usize,
    cols: usize,
    cells: Vec<Vec<CellValue>>,
}

impl SheetGrid {
    /// 行ごとの値から稠密なグリッドを作る
    ///
    /// 行の長さが揃っていない場合は`CellValue::Empty`で埋めます。
    pub fn new(name: String, index: usize, role: SheetRole, mut cells: Vec<Vec<CellValue>>) -> Self {
        let rows = cells.len();
        let cols = cells.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut cells {
            row.resize(cols, CellValue::Empty);
        }
        Self {
            name,
            index,
            role,
            rows,
            cols,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// セルの値。範囲外は`CellValue::Empty`
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// 空白でないセルの表示文字列
    pub fn text(&self, row: usize, col: usize) -> Option<String> {
        let value = self.get(row, col);
        if value.is_blank() {
            None
        } else {
            Some(value.as_display_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_is_blank() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::String("   ".to_string()).is_blank());
        assert!(!CellValue::String("Cálculo".to_string()).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_cell_value_display_string() {
        assert_eq!(CellValue::Number(3.0).as_display_string(), "3");
        assert_eq!(CellValue::Number(8.5).as_display_string(), "8.5");
        assert_eq!(CellValue::Bool(true).as_display_string(), "TRUE");
        assert_eq!(CellValue::Empty.as_display_string(), "");
    }

    #[test]
    fn test_cell_coord_a1_round_trip() {
        assert_eq!(CellCoord::from_a1("A1"), Some(CellCoord::new(0, 0)));
        assert_eq!(CellCoord::from_a1("B3"), Some(CellCoord::new(2, 1)));
        assert_eq!(CellCoord::from_a1("AA10"), Some(CellCoord::new(9, 26)));
        assert_eq!(CellCoord::from_a1("$C$4"), Some(CellCoord::new(3, 2)));
        assert_eq!(CellCoord::new(99, 701).to_a1_notation(), "ZZ100");
    }

    #[test]
    fn test_cell_coord_from_a1_invalid() {
        assert_eq!(CellCoord::from_a1(""), None);
        assert_eq!(CellCoord::from_a1("12"), None);
        assert_eq!(CellCoord::from_a1("A0"), None);
        assert_eq!(CellCoord::from_a1("A1B"), None);
    }

    #[test]
    fn test_sheet_role_from_position() {
        assert_eq!(SheetRole::from_position(0), SheetRole::MainMap);
        assert_eq!(SheetRole::from_position(1), SheetRole::Specialization);
        assert_eq!(SheetRole::from_position(7), SheetRole::Specialization);
    }

    #[test]
    fn test_sheet_grid_pads_ragged_rows() {
        let grid = SheetGrid::new(
            "Plan".to_string(),
            0,
            SheetRole::MainMap,
            vec![
                vec![CellValue::String("A".to_string())],
                vec![CellValue::Empty, CellValue::Number(2.0), CellValue::Empty],
            ],
        );
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.get(0, 2), &CellValue::Empty);
        assert_eq!(grid.get(10, 10), &CellValue::Empty);
        assert_eq!(grid.text(0, 0).as_deref(), Some("A"));
        assert_eq!(grid.text(1, 1).as_deref(), Some("2"));
        assert_eq!(grid.text(1, 0), None);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_a1_notation_round_trip(row in 0u32..100_000, col in 0u32..16_384) {
                let coord = CellCoord::new(row, col);
                prop_assert_eq!(CellCoord::from_a1(&coord.to_a1_notation()), Some(coord));
            }
        }
    }
}
