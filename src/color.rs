//! Color Module
//!
//! 背景色の正規化表現（`Rgb`）、抽出結果の色インデックス（`ColorIndex`）、
//! および背景色から可読な文字色を決めるコントラスト規則を提供するモジュール。

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// 黒に近い背景とみなす各成分の上限（この値未満）
const NEAR_BLACK_THRESHOLD: u8 = 50;

/// 24ビットRGB色
///
/// 文字列表現は常に小文字の`#rrggbb`です。ODSとXLSXのどちらから
/// 抽出した色も、この形式に正規化されてから`ColorIndex`に格納されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// 黒（デフォルトの文字色）
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// 白
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`形式の文字列を解析する
    ///
    /// 先頭の`#`は必須です（重なっていてもよい）。大文字・小文字は問いません。
    /// 形式が不正な場合は`None`を返します（エラーにはしない）。
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?.trim_start_matches('#');
        Self::from_hex_digits(digits)
    }

    /// 先頭記号なしの6桁16進数字列を解析する
    pub fn from_hex_digits(digits: &str) -> Option<Self> {
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let component = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(component(0)?, component(2)?, component(4)?))
    }

    /// ARGB（またはRGB）の16進文字列から色を取り出す
    ///
    /// XLSXの色は`FFRRGGBB`のように先頭にアルファを持つことがあるため、
    /// 末尾の6桁だけを使用します。6桁未満の場合は`None`です。
    pub fn from_argb(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('#');
        if s.len() < 6 || !s.is_ascii() {
            return None;
        }
        Self::from_hex_digits(&s[s.len() - 6..])
    }

    /// ネガ（各成分を255から引いた色）
    pub fn negative(&self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// すべての成分が閾値未満（ほぼ黒）かどうか
    pub fn is_near_black(&self) -> bool {
        self.r < NEAR_BLACK_THRESHOLD
            && self.g < NEAR_BLACK_THRESHOLD
            && self.b < NEAR_BLACK_THRESHOLD
    }

    /// この背景色の上で読みやすい文字色
    ///
    /// ほぼ黒の背景ではネガを、それ以外では黒を返します。
    pub fn contrast_text(&self) -> Rgb {
        if self.is_near_black() {
            self.negative()
        } else {
            Rgb::BLACK
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse_hex(&value).ok_or_else(|| format!("invalid color: '{}'", value))
    }
}

/// 背景色から文字色を決める
///
/// 不正な入力（`None`、`#`なし、長さ違い、16進以外の文字）は
/// すべて黒を返します。エラーにはなりません。
///
/// # 使用例
///
/// ```rust
/// use currimap::{contrast_color, Rgb};
///
/// assert_eq!(contrast_color(Some("#000000")), Rgb::WHITE);
/// assert_eq!(contrast_color(Some("#333333")), Rgb::BLACK);
/// assert_eq!(contrast_color(None), Rgb::BLACK);
/// ```
pub fn contrast_color(background: Option<&str>) -> Rgb {
    background
        .and_then(Rgb::parse_hex)
        .map(|bg| bg.contrast_text())
        .unwrap_or(Rgb::BLACK)
}

/// 色インデックスの1エントリ（シリアライズ用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorEntry<'a> {
    pub sheet: &'a str,
    pub row: u32,
    pub col: u32,
    pub color: Rgb,
}

/// `(シート名, 行, 列) → 色` の対応表
///
/// 行・列は0始まりです。同じキーへの書き込みは後勝ちです。
/// エントリがないセルは「明示的な背景色なし」を意味し、
/// 利用側は自分のデフォルト色を使います。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorIndex {
    sheets: BTreeMap<String, BTreeMap<(u32, u32), Rgb>>,
}

impl ColorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 色を記録する。既存の値があれば置き換えて返す
    pub fn insert(&mut self, sheet: &str, row: u32, col: u32, color: Rgb) -> Option<Rgb> {
        // 同一シートへの連続書き込みでキーの再確保を避ける
        if let Some(cells) = self.sheets.get_mut(sheet) {
            return cells.insert((row, col), color);
        }
        self.sheets
            .entry(sheet.to_string())
            .or_default()
            .insert((row, col), color)
    }

    pub fn get(&self, sheet: &str, row: u32, col: u32) -> Option<Rgb> {
        self.sheets
            .get(sheet)
            .and_then(|cells| cells.get(&(row, col)))
            .copied()
    }

    /// エントリがなければ`default`を返す
    pub fn color_or(&self, sheet: &str, row: u32, col: u32, default: Rgb) -> Rgb {
        self.get(sheet, row, col).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.sheets.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.values().all(BTreeMap::is_empty)
    }

    /// 指定シートのエントリ数
    pub fn sheet_len(&self, sheet: &str) -> usize {
        self.sheets.get(sheet).map(BTreeMap::len).unwrap_or(0)
    }

    /// 色が1つ以上記録されたシート名
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    /// すべてのエントリをシート名・行・列の順に列挙する
    pub fn entries(&self) -> impl Iterator<Item = ColorEntry<'_>> {
        self.sheets.iter().flat_map(|(sheet, cells)| {
            cells.iter().map(move |(&(row, col), &color)| ColorEntry {
                sheet: sheet.as_str(),
                row,
                col,
                color,
            })
        })
    }

    /// 別のインデックスの内容を上書きマージする
    pub fn merge(&mut self, other: ColorIndex) {
        for (sheet, cells) in other.sheets {
            self.sheets.entry(sheet).or_default().extend(cells);
        }
    }

    /// `known`に含まれないシートのエントリを削除し、削除したシート名を返す
    pub fn retain_sheets<S: AsRef<str>>(&mut self, known: &[S]) -> Vec<String> {
        let unknown: Vec<String> = self
            .sheets
            .keys()
            .filter(|name| !known.iter().any(|k| k.as_ref() == name.as_str()))
            .cloned()
            .collect();
        for name in &unknown {
            self.sheets.remove(name);
        }
        unknown
    }
}

impl Serialize for ColorIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries())
    }
}
