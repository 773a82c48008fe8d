//! XML Helper Module
//!
//! quick-xmlのイベントから属性を取り出す共通処理。

use quick_xml::events::attributes::Attribute;
use quick_xml::events::BytesStart;

use crate::error::CurriMapError;

/// 要素から属性値を取得する（エスケープ解除済み）
///
/// # 引数
///
/// * `element` - 開始タグまたは空要素タグ
/// * `key` - 接頭辞付きの属性名（例: `b"table:style-name"`）
/// * `part` - エラーメッセージ用のパート名
pub(crate) fn attr_value(
    element: &BytesStart<'_>,
    key: &[u8],
    part: &str,
) -> Result<Option<String>, CurriMapError> {
    for attr in element.attributes() {
        let attr = attr
            .map_err(|e| CurriMapError::xml(part, format!("XML attribute error: {}", e)))?;
        if attr.key.as_ref() == key {
            return decode_value(&attr, part).map(Some);
        }
    }
    Ok(None)
}

/// 属性値をUTF-8として読み、実体参照を展開する
///
/// # 戻り値
///
/// * `Err(CurriMapError::Utf8)` - 値がUTF-8でない場合
/// * `Err(CurriMapError::Xml)` - 不正な実体参照を含む場合
pub(crate) fn decode_value(attr: &Attribute<'_>, part: &str) -> Result<String, CurriMapError> {
    let raw = std::str::from_utf8(&attr.value)?;
    let value = quick_xml::escape::unescape(raw)
        .map_err(|e| CurriMapError::xml(part, format!("XML attribute error: {}", e)))?;
    Ok(value.into_owned())
}

/// 繰り返し回数属性を解析する（属性がなければ1）
pub(crate) fn repeat_count(
    element: &BytesStart<'_>,
    key: &[u8],
    part: &str,
) -> Result<u32, CurriMapError> {
    match attr_value(element, key, part)? {
        None => Ok(1),
        Some(raw) => raw.trim().parse::<u32>().map_err(|e| {
            CurriMapError::xml(
                part,
                format!(
                    "invalid {} '{}': {}",
                    String::from_utf8_lossy(key),
                    raw,
                    e
                ),
            )
        }),
    }
}
