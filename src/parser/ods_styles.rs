//! ODS Style Table Module
//!
//! ODSのスタイル定義（`content.xml`の自動スタイル、`styles.xml`の共通スタイル）から
//! `スタイル名 → 背景色` の対応表を構築するモジュール。
//!
//! ODSではセルごとに色を持たず、セルは`table:style-name`でスタイルを参照します。
//! 背景色はスタイル内の`style:table-cell-properties`要素の
//! `fo:background-color`属性に格納されています。

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::color::Rgb;
use crate::error::CurriMapError;
use crate::parser::xml::attr_value;

/// スタイル名 → 背景色 の対応表
///
/// 背景色を持たないスタイル（属性なし、`transparent`、`none`）は記録しません。
/// 対応表にないスタイルは「呼び出し側のデフォルト色を使う」ことを意味します。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleTable {
    entries: HashMap<String, Rgb>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 複数のスタイル定義XMLから対応表を構築する
    ///
    /// 同じ名前が複数回現れた場合は最初の定義を採用します。
    ///
    /// # 引数
    ///
    /// * `parts` - `(パート名, XML本文)` のリスト。先に渡したものが優先されます。
    pub fn from_parts(parts: &[(&str, &[u8])]) -> Result<Self, CurriMapError> {
        let mut table = Self::new();
        for (part, xml) in parts {
            table.extend_from_xml(part, xml)?;
        }
        Ok(table)
    }

    /// スタイル定義XMLを解析して対応表に追加する
    ///
    /// 解析エラーが発生した場合、それまでに追加されたエントリは残ります。
    ///
    /// # 戻り値
    ///
    /// * `Ok(usize)` - 新たに追加されたエントリ数
    /// * `Err(CurriMapError::Xml)` - XMLが不正な場合
    pub fn extend_from_xml(&mut self, part: &str, xml: &[u8]) -> Result<usize, CurriMapError> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut added = 0usize;
        // 現在開いている<style:style>の名前
        let mut current_style: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) if e.name().as_ref() == b"style:style" => {
                    current_style = attr_value(&e, b"style:name", part)?;
                }
                Ok(Event::Start(e)) | Ok(Event::Empty(e))
                    if e.name().as_ref() == b"style:table-cell-properties" =>
                {
                    if let Some(name) = current_style.as_deref() {
                        if let Some(color) = background_color(&e, name, part)? {
                            if !self.entries.contains_key(name) {
                                self.entries.insert(name.to_string(), color);
                                added += 1;
                            }
                        }
                    }
                }
                Ok(Event::End(e)) if e.name().as_ref() == b"style:style" => {
                    current_style = None;
                }
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

        Ok(added)
    }

    /// スタイル名から背景色を引く
    pub fn resolve(&self, style_name: &str) -> Option<Rgb> {
        self.entries.get(style_name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `fo:background-color`属性を読み取る
///
/// 属性がない、`transparent`/`none`、または`#rrggbb`として解釈できない場合は`None`。
fn background_color(
    element: &quick_xml::events::BytesStart<'_>,
    style_name: &str,
    part: &str,
) -> Result<Option<Rgb>, CurriMapError> {
    let Some(raw) = attr_value(element, b"fo:background-color", part)? else {
        return Ok(None);
    };
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("transparent") || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    match Rgb::parse_hex(value) {
        Some(color) => Ok(Some(color)),
        None => {
            log::debug!(
                "{}: style '{}' has unsupported background color '{}'",
                part,
                style_name,
                value
            );
            Ok(None)
        }
    }
}
