//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::CurriMapError;

/// 入力ファイルの形式
///
/// どちらの形式も値のグリッドはcalamineで読み込みますが、
/// 背景色の抽出方法（色抽出ストラテジー）が異なります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SourceFormat {
    /// OpenDocument Spreadsheet（`.ods`）
    ///
    /// スタイル表と、繰り返し圧縮された`content.xml`のセルグリッドから色を抽出します。
    Ods,

    /// Office Open XML Workbook（`.xlsx` / `.xlsm`）
    ///
    /// `xl/styles.xml`の塗りつぶし定義をセルごとに解決して色を抽出します。
    Xlsx,
}

impl SourceFormat {
    /// 拡張子から形式を判定する（大文字・小文字は区別しない）
    ///
    /// # 引数
    ///
    /// * `extension` - 先頭の`.`を含まない拡張子（例: `"ods"`）
    ///
    /// # 戻り値
    ///
    /// * `Ok(SourceFormat)` - 対応する形式
    /// * `Err(CurriMapError::UnsupportedFormat)` - 未対応の拡張子
    pub fn from_extension(extension: &str) -> Result<Self, CurriMapError> {
        match extension.to_ascii_lowercase().as_str() {
            "ods" => Ok(SourceFormat::Ods),
            "xlsx" | "xlsm" => Ok(SourceFormat::Xlsx),
            other => Err(CurriMapError::UnsupportedFormat(format!(
                "unsupported extension '.{}' (expected .ods or .xlsx)",
                other
            ))),
        }
    }

    /// ファイルパスの拡張子から形式を判定する
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use currimap::SourceFormat;
    ///
    /// assert_eq!(SourceFormat::from_path("Plan_2024.ODS").unwrap(), SourceFormat::Ods);
    /// assert!(SourceFormat::from_path("notes.csv").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CurriMapError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                CurriMapError::UnsupportedFormat(format!(
                    "'{}' has no file extension",
                    path.display()
                ))
            })?;
        Self::from_extension(extension)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Ods => write!(f, "ods"),
            SourceFormat::Xlsx => write!(f, "xlsx"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension_case_insensitive() {
        assert_eq!(SourceFormat::from_extension("ods").unwrap(), SourceFormat::Ods);
        assert_eq!(SourceFormat::from_extension("ODS").unwrap(), SourceFormat::Ods);
        assert_eq!(SourceFormat::from_extension("Xlsx").unwrap(), SourceFormat::Xlsx);
        assert_eq!(SourceFormat::from_extension("xlsm").unwrap(), SourceFormat::Xlsx);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            SourceFormat::from_path("12_Licenciaturas_BIS/LIC_Datos.xlsx").unwrap(),
            SourceFormat::Xlsx
        );
        assert!(matches!(
            SourceFormat::from_path("README"),
            Err(CurriMapError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            SourceFormat::from_path("plan.xls"),
            Err(CurriMapError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(SourceFormat::Ods.to_string(), "ods");
        assert_eq!(SourceFormat::Xlsx.to_string(), "xlsx");
    }
}
