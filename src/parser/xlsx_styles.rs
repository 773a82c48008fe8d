//! XLSX Styled Workbook Module
//!
//! calamineはセルの塗りつぶし情報を提供しないため、XLSX内部のXMLを直接解析して
//! 「セルごとに塗りつぶしが解決済み」のワークブックモデルを構築します。
//!
//! 解決の流れ: `<c s="N">` → `cellXfs[N].fillId` → `fills[fillId]`
//!
//! セル位置はホストモデルの慣例に合わせて1始まりで公開します。

use std::collections::HashMap;
use std::io::{Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::CurriMapError;
use crate::parser::xml::{attr_value, decode_value};
use crate::security::read_part;
use crate::types::CellCoord;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const STYLES_PART: &str = "xl/styles.xml";

/// 旧形式の64色インデックスパレット（`<fgColor indexed="N"/>`）
const INDEXED_PALETTE: [&str; 64] = [
    "000000", "FFFFFF", "FF0000", "00FF00", "0000FF", "FFFF00", "FF00FF", "00FFFF",
    "000000", "FFFFFF", "FF0000", "00FF00", "0000FF", "FFFF00", "FF00FF", "00FFFF",
    "800000", "008000", "000080", "808000", "800080", "008080", "C0C0C0", "808080",
    "9999FF", "993366", "FFFFCC", "CCFFFF", "660066", "FF8080", "0066CC", "CCCCFF",
    "000080", "FF00FF", "FFFF00", "00FFFF", "800080", "800000", "008080", "0000FF",
    "00CCFF", "CCFFFF", "CCFFCC", "FFFF99", "99CCFF", "FF99CC", "CC99FF", "FFCC99",
    "3366FF", "33CCCC", "99CC00", "FFCC00", "FF9900", "FF6600", "666699", "969696",
    "003366", "339966", "003300", "333300", "993300", "993366", "333399", "333333",
];

/// 塗りつぶしのパターン種別
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternType {
    /// 塗りつぶしなし（`patternType`属性がない場合も含む）
    None,
    Solid,
    /// `gray125`などその他のパターン
    Other(String),
}

impl PatternType {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            None | Some("none") => PatternType::None,
            Some("solid") => PatternType::Solid,
            Some(other) => PatternType::Other(other.to_string()),
        }
    }
}

/// 色の参照方法
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorRef {
    /// `rgb="FFRRGGBB"`（ARGB文字列そのまま）
    Rgb(String),
    /// `indexed="N"`
    Indexed(u32),
    /// `theme="N"`（テーマ色は解決しません）
    Theme(u32),
    /// `auto="1"`または属性なし
    Auto,
}

/// 1つの塗りつぶし定義（`<fills>`内の`<fill>`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    pub pattern: PatternType,
    pub fg_color: Option<ColorRef>,
}

impl Fill {
    fn none() -> Self {
        Self {
            pattern: PatternType::None,
            fg_color: None,
        }
    }

    /// 前景色のARGB文字列
    ///
    /// インデックス色はパレットから`FF`付きのARGBに変換します。
    /// テーマ色・自動色・範囲外のインデックスは`None`です。
    pub fn fg_rgb(&self) -> Option<String> {
        match self.fg_color.as_ref()? {
            ColorRef::Rgb(argb) => Some(argb.clone()),
            ColorRef::Indexed(i) => INDEXED_PALETTE
                .get(*i as usize)
                .map(|rgb| format!("FF{}", rgb)),
            ColorRef::Theme(_) | ColorRef::Auto => None,
        }
    }
}

/// 塗りつぶしが解決されたセル（1始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledCell<'a> {
    pub row: u32,
    pub column: u32,
    pub fill: &'a Fill,
}

/// 1シート分のスタイル付きセル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSheet {
    pub name: String,
    /// `(行, 列, スタイルID)`、1始まり
    cells: Vec<(u32, u32, u32)>,
}

/// 塗りつぶし解決済みのワークブック
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledWorkbook {
    sheets: Vec<StyledSheet>,
    fills: Vec<Fill>,
    /// cellXfsのインデックス → fillId
    xf_fill_ids: Vec<u32>,
    /// 読み込めなかったシートの警告
    pub warnings: Vec<String>,
}

impl StyledWorkbook {
    /// XLSXアーカイブからスタイル付きワークブックを構築する
    ///
    /// 必要なパートはすべて最初にメモリへ読み込みます。
    /// 個々のワークシートの解析に失敗した場合はそのシートを空として扱い、
    /// `warnings`に記録します。
    ///
    /// # 戻り値
    ///
    /// * `Ok(StyledWorkbook)` - 構築に成功した場合
    /// * `Err(CurriMapError::MissingPart)` - `xl/workbook.xml`が存在しない場合
    /// * `Err(CurriMapError::Xml)` - ワークブック・スタイル定義のXMLが不正な場合
    /// * `Err(CurriMapError::ParseInt)` - `fillId`などの番号が整数でない場合
    pub fn from_archive<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
    ) -> Result<Self, CurriMapError> {
        let workbook_xml = read_part(archive, WORKBOOK_PART)?
            .ok_or_else(|| CurriMapError::MissingPart(WORKBOOK_PART.to_string()))?;
        let sheet_refs = parse_workbook_sheets(&workbook_xml)?;

        let relationships = match read_part(archive, WORKBOOK_RELS_PART)? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        let (fills, xf_fill_ids) = match read_part(archive, STYLES_PART)? {
            Some(xml) => parse_styles(&xml)?,
            None => (Vec::new(), Vec::new()),
        };

        let mut workbook = Self {
            sheets: Vec::with_capacity(sheet_refs.len()),
            fills,
            xf_fill_ids,
            warnings: Vec::new(),
        };

        for (position, (name, rel_id)) in sheet_refs.into_iter().enumerate() {
            let path = rel_id
                .as_deref()
                .and_then(|id| relationships.get(id))
                .map(|target| resolve_target(target))
                .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", position + 1));

            let cells = match read_part(archive, &path) {
                Ok(Some(xml)) => parse_worksheet(&path, &xml),
                Ok(None) => Err(CurriMapError::MissingPart(path.clone())),
                Err(e) => Err(e),
            };

            let cells = cells.unwrap_or_else(|e| {
                let message = format!("sheet '{}': {}", name, e);
                log::warn!("{}", message);
                workbook.warnings.push(message);
                Vec::new()
            });

            workbook.sheets.push(StyledSheet { name, cells });
        }

        Ok(workbook)
    }

    /// シート（ワークブック内の順序）
    pub fn sheets(&self) -> &[StyledSheet] {
        &self.sheets
    }

    /// スタイルIDから塗りつぶしを解決する
    pub fn fill_for_style(&self, style: u32) -> Option<&Fill> {
        let fill_id = self.xf_fill_ids.get(style as usize)?;
        self.fills.get(*fill_id as usize)
    }

    /// シート内の塗りつぶしが解決できるセルを列挙する
    pub fn cells<'a>(&'a self, sheet: &'a StyledSheet) -> impl Iterator<Item = StyledCell<'a>> {
        sheet.cells.iter().filter_map(move |&(row, column, style)| {
            self.fill_for_style(style).map(|fill| StyledCell { row, column, fill })
        })
    }
}

fn xml_error(part: &str, reader: &Reader<&[u8]>, e: quick_xml::Error) -> CurriMapError {
    CurriMapError::xml(
        part,
        format!("XML parse error at byte {}: {}", reader.buffer_position(), e),
    )
}

/// 行番号・スタイル番号などの非負整数属性
fn parse_u32(value: &str) -> Result<u32, CurriMapError> {
    Ok(value.trim().parse::<u32>()?)
}

/// `<sheet name="..." r:id="..."/>`の一覧（文書順）
fn parse_workbook_sheets(xml: &[u8]) -> Result<Vec<(String, Option<String>)>, CurriMapError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"sheet" => {
                let name = attr_value(&e, b"name", WORKBOOK_PART)?.unwrap_or_default();
                sheets.push((name, relationship_id(&e)?));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(WORKBOOK_PART, &reader, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// 名前空間接頭辞付きの`id`属性（通常は`r:id`）
fn relationship_id(element: &BytesStart<'_>) -> Result<Option<String>, CurriMapError> {
    for attr in element.attributes() {
        let attr = attr
            .map_err(|e| CurriMapError::xml(WORKBOOK_PART, format!("XML attribute error: {}", e)))?;
        if attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id" {
            return decode_value(&attr, WORKBOOK_PART).map(Some);
        }
    }
    Ok(None)
}

/// リレーションシップID → ターゲット
fn parse_relationships(xml: &[u8]) -> Result<HashMap<String, String>, CurriMapError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut relationships = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"Relationship" => {
                let id = attr_value(&e, b"Id", WORKBOOK_RELS_PART)?;
                let target = attr_value(&e, b"Target", WORKBOOK_RELS_PART)?;
                if let (Some(id), Some(target)) = (id, target) {
                    relationships.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(WORKBOOK_RELS_PART, &reader, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

/// リレーションシップのターゲットをアーカイブ内のパスに変換する
///
/// `/xl/worksheets/sheet1.xml`のような絶対指定はそのまま、
/// `worksheets/sheet1.xml`のような相対指定は`xl/`を基準にします。
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

/// `<fills>`と`<cellXfs>`の解析状態
#[derive(Default)]
struct StylesState {
    fills: Vec<Fill>,
    xf_fill_ids: Vec<u32>,
    in_fills: bool,
    in_cell_xfs: bool,
    current_fill: Option<Fill>,
}

impl StylesState {
    fn open(&mut self, element: &BytesStart<'_>, is_empty: bool) -> Result<(), CurriMapError> {
        match element.name().as_ref() {
            b"fills" => self.in_fills = !is_empty,
            b"cellXfs" => self.in_cell_xfs = !is_empty,
            b"fill" if self.in_fills => {
                if is_empty {
                    self.fills.push(Fill::none());
                } else {
                    self.current_fill = Some(Fill::none());
                }
            }
            b"patternFill" if self.in_fills => {
                let pattern = attr_value(element, b"patternType", STYLES_PART)?;
                if let Some(fill) = self.current_fill.as_mut() {
                    fill.pattern = PatternType::from_attr(pattern.as_deref());
                }
            }
            b"fgColor" if self.in_fills => {
                let color = parse_color_ref(element)?;
                if let Some(fill) = self.current_fill.as_mut() {
                    fill.fg_color = Some(color);
                }
            }
            b"xf" if self.in_cell_xfs => {
                let fill_id = match attr_value(element, b"fillId", STYLES_PART)? {
                    Some(value) => parse_u32(&value)?,
                    None => 0,
                };
                self.xf_fill_ids.push(fill_id);
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"fills" => self.in_fills = false,
            b"cellXfs" => self.in_cell_xfs = false,
            b"fill" if self.in_fills => {
                let fill = self.current_fill.take().unwrap_or_else(Fill::none);
                self.fills.push(fill);
            }
            _ => {}
        }
    }
}

/// `<fills>`と`<cellXfs>`を解析する
///
/// `<dxfs>`（条件付き書式）内の`<fill>`や`<cellStyleXfs>`内の`<xf>`は対象外です。
fn parse_styles(xml: &[u8]) -> Result<(Vec<Fill>, Vec<u32>), CurriMapError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut state = StylesState::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => state.open(&e, false)?,
            Ok(Event::Empty(e)) => state.open(&e, true)?,
            Ok(Event::End(e)) => state.close(e.name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(STYLES_PART, &reader, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok((state.fills, state.xf_fill_ids))
}

fn parse_color_ref(element: &BytesStart<'_>) -> Result<ColorRef, CurriMapError> {
    if let Some(rgb) = attr_value(element, b"rgb", STYLES_PART)? {
        return Ok(ColorRef::Rgb(rgb));
    }
    if let Some(indexed) = attr_value(element, b"indexed", STYLES_PART)? {
        return Ok(ColorRef::Indexed(parse_u32(&indexed)?));
    }
    if let Some(theme) = attr_value(element, b"theme", STYLES_PART)? {
        return Ok(ColorRef::Theme(parse_u32(&theme)?));
    }
    Ok(ColorRef::Auto)
}

/// ワークシートの`<row>` / `<c>`から`(行, 列, スタイルID)`を収集する（1始まり）
///
/// `r`属性がない行・セルは直前の位置の次として扱います。
/// `s`属性がないセルはスタイル0です。
fn parse_worksheet(part: &str, xml: &[u8]) -> Result<Vec<(u32, u32, u32)>, CurriMapError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut cells = Vec::new();
    let mut row: u32 = 0;
    let mut col: u32 = 0;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"row" => {
                    row = match attr_value(&e, b"r", part)? {
                        Some(r) => parse_u32(&r)?,
                        None => row.saturating_add(1),
                    };
                    col = 0;
                }
                b"c" => {
                    let (cell_row, cell_col) = match attr_value(&e, b"r", part)? {
                        Some(reference) => {
                            let coord = CellCoord::from_a1(&reference).ok_or_else(|| {
                                CurriMapError::xml(
                                    part,
                                    format!("invalid cell reference '{}'", reference),
                                )
                            })?;
                            (coord.row + 1, coord.col + 1)
                        }
                        None => (row.max(1), col.saturating_add(1)),
                    };
                    col = cell_col;

                    let style = match attr_value(&e, b"s", part)? {
                        Some(s) => parse_u32(&s)?,
                        None => 0,
                    };
                    cells.push((cell_row, cell_col, style));
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(part, &reader, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::{FileOptions, ZipWriter};
    use zip::CompressionMethod;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fills count="5">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="gray125"/></fill>
    <fill><patternFill patternType="solid"><fgColor rgb="FFFFFF00"/><bgColor indexed="64"/></patternFill></fill>
    <fill><patternFill patternType="solid"><fgColor indexed="10"/></patternFill></fill>
    <fill><patternFill patternType="solid"><fgColor theme="4" tint="0.5"/></patternFill></fill>
  </fills>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="1"/></cellStyleXfs>
  <cellXfs count="5">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
    <xf numFmtId="0" fontId="0" fillId="2" borderId="0" applyFill="1"/>
    <xf numFmtId="0" fontId="0" fillId="3" borderId="0" applyFill="1"><alignment wrapText="1"/></xf>
    <xf numFmtId="0" fontId="0" fillId="4" borderId="0" applyFill="1"/>
    <xf numFmtId="0" fontId="0" fillId="1" borderId="0"/>
  </cellXfs>
  <dxfs count="1"><dxf><fill><patternFill><bgColor rgb="FFFF0000"/></patternFill></fill></dxf></dxfs>
</styleSheet>"#;

    const WORKBOOK: &str = r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
    xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="Plan" sheetId="1" r:id="rId1"/>
    <sheet name="Redes" sheetId="2" r:id="rId2"/>
  </sheets>
</workbook>"#;

    const RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="worksheet" Target="/xl/worksheets/other.xml"/>
  <Relationship Id="rId3" Type="styles" Target="styles.xml"/>
</Relationships>"#;

    const SHEET1: &str = r#"<worksheet><sheetData>
  <row r="1"><c r="A1" s="1" t="s"><v>0</v></c><c r="B1"/><c r="C1" s="2"/></row>
  <row r="3"><c r="B3" s="3"/><c s="4"/></row>
</sheetData></worksheet>"#;

    fn build_xlsx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut data = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut data));
            let options = FileOptions::default().compression_method(CompressionMethod::Stored);
            for (name, content) in parts {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        data
    }

    fn load(parts: &[(&str, &str)]) -> StyledWorkbook {
        let mut archive = ZipArchive::new(Cursor::new(build_xlsx(parts))).unwrap();
        StyledWorkbook::from_archive(&mut archive).unwrap()
    }

    #[test]
    fn test_parse_styles_fills_and_cell_xfs() {
        let (fills, xf_fill_ids) = parse_styles(STYLES.as_bytes()).unwrap();

        assert_eq!(fills.len(), 5);
        assert_eq!(fills[0].pattern, PatternType::None);
        assert_eq!(fills[1].pattern, PatternType::Other("gray125".to_string()));
        assert_eq!(fills[2].fg_rgb().as_deref(), Some("FFFFFF00"));
        assert_eq!(fills[3].fg_rgb().as_deref(), Some("FFFF0000"));
        assert_eq!(fills[4].fg_color, Some(ColorRef::Theme(4)));
        assert_eq!(fills[4].fg_rgb(), None);
        // cellStyleXfsのxfは含まれない
        assert_eq!(xf_fill_ids, vec![0, 2, 3, 4, 1]);
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(resolve_target("/xl/worksheets/sheet2.xml"), "xl/worksheets/sheet2.xml");
    }

    #[test]
    fn test_worksheet_positions_are_one_based() {
        let cells = parse_worksheet("sheet1.xml", SHEET1.as_bytes()).unwrap();
        assert_eq!(
            cells,
            vec![(1, 1, 1), (1, 2, 0), (1, 3, 2), (3, 2, 3), (3, 3, 4)]
        );
    }

    #[test]
    fn test_from_archive_resolves_fills_per_cell() {
        let workbook = load(&[
            (WORKBOOK_PART, WORKBOOK),
            (WORKBOOK_RELS_PART, RELS),
            (STYLES_PART, STYLES),
            ("xl/worksheets/sheet1.xml", SHEET1),
            (
                "xl/worksheets/other.xml",
                r#"<worksheet><sheetData><row r="2"><c r="D2" s="1"/></row></sheetData></worksheet>"#,
            ),
        ]);

        let names: Vec<_> = workbook.sheets().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Plan", "Redes"]);
        assert!(workbook.warnings.is_empty());

        let plan = &workbook.sheets()[0];
        let a1 = workbook.cells(plan).next().unwrap();
        assert_eq!((a1.row, a1.column), (1, 1));
        assert_eq!(a1.fill.pattern, PatternType::Solid);

        let redes = &workbook.sheets()[1];
        let d2: Vec<_> = workbook.cells(redes).map(|c| (c.row, c.column)).collect();
        assert_eq!(d2, vec![(2, 4)]);
    }

    #[test]
    fn test_missing_worksheet_becomes_warning() {
        let workbook = load(&[
            (WORKBOOK_PART, WORKBOOK),
            (WORKBOOK_RELS_PART, RELS),
            (STYLES_PART, STYLES),
            ("xl/worksheets/sheet1.xml", SHEET1),
        ]);

        assert_eq!(workbook.sheets().len(), 2);
        assert_eq!(workbook.cells(&workbook.sheets()[1]).count(), 0);
        assert_eq!(workbook.warnings.len(), 1);
        assert!(workbook.warnings[0].contains("Redes"));
    }

    #[test]
    fn test_missing_rels_falls_back_to_sheet_position() {
        let workbook = load(&[
            (WORKBOOK_PART, WORKBOOK),
            (STYLES_PART, STYLES),
            ("xl/worksheets/sheet1.xml", SHEET1),
            ("xl/worksheets/sheet2.xml", SHEET1),
        ]);
        assert!(workbook.warnings.is_empty());
        assert_eq!(workbook.cells(&workbook.sheets()[1]).count(), 5);
    }

    #[test]
    fn test_missing_workbook_part() {
        let mut archive =
            ZipArchive::new(Cursor::new(build_xlsx(&[(STYLES_PART, STYLES)]))).unwrap();
        assert!(matches!(
            StyledWorkbook::from_archive(&mut archive),
            Err(CurriMapError::MissingPart(_))
        ));
    }

    #[test]
    fn test_indexed_out_of_range() {
        let fill = Fill {
            pattern: PatternType::Solid,
            fg_color: Some(ColorRef::Indexed(64)),
        };
        assert_eq!(fill.fg_rgb(), None);
    }

    #[test]
    fn test_invalid_style_index_is_parse_int_error() {
        let xml = r#"<worksheet><sheetData><row r="1"><c r="A1" s="x"/></row></sheetData></worksheet>"#;
        assert!(matches!(
            parse_worksheet("xl/worksheets/sheet1.xml", xml.as_bytes()),
            Err(CurriMapError::ParseInt(_))
        ));

        let styles = r#"<styleSheet><cellXfs><xf fillId="-1"/></cellXfs></styleSheet>"#;
        assert!(matches!(
            parse_styles(styles.as_bytes()),
            Err(CurriMapError::ParseInt(_))
        ));
    }

    #[test]
    fn test_invalid_worksheet_index_becomes_sheet_warning() {
        let workbook = load(&[
            (WORKBOOK_PART, WORKBOOK),
            (WORKBOOK_RELS_PART, RELS),
            (STYLES_PART, STYLES),
            ("xl/worksheets/sheet1.xml", SHEET1),
            (
                "xl/worksheets/other.xml",
                r#"<worksheet><sheetData><row r="two"/></sheetData></worksheet>"#,
            ),
        ]);

        assert_eq!(workbook.cells(&workbook.sheets()[0]).count(), 5);
        assert_eq!(workbook.warnings.len(), 1);
        assert!(workbook.warnings[0].contains("Number parse error"));
    }
}
