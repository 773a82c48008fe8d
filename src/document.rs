//! Document Module
//!
//! 1文書分の抽出結果（シートのグリッド、色インデックス、警告）を表します。
//! レイアウトやJSON出力はこの型だけを受け取り、元のファイル形式を意識しません。

use std::fmt;

use serde::Serialize;

use crate::api::SourceFormat;
use crate::color::{ColorIndex, Rgb};
use crate::parser::WalkReport;
use crate::types::{SheetGrid, SheetRole};

/// 警告が発生した処理段階
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningStage {
    /// アーカイブを開く・パートを読む
    Archive,
    /// スタイル表の構築
    Styles,
    /// セルグリッドの走査
    Cells,
    /// XLSXの塗りつぶし抽出
    Fills,
    /// 色インデックスとグリッドの突き合わせ
    Index,
}

impl fmt::Display for WarningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WarningStage::Archive => "archive",
            WarningStage::Styles => "styles",
            WarningStage::Cells => "cells",
            WarningStage::Fills => "fills",
            WarningStage::Index => "index",
        };
        f.write_str(name)
    }
}

/// 致命的でない抽出時の問題
///
/// 色の抽出に失敗しても文書の処理は続行し、デフォルト色で描画されます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionWarning {
    pub stage: WarningStage,
    pub message: String,
}

impl ExtractionWarning {
    pub fn new(stage: WarningStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)
    }
}

/// 1文書分の抽出結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurriculumDocument {
    /// 拡張子を除いたファイル名
    pub name: String,
    pub format: SourceFormat,
    /// シート（ワークブック内の順序、役割付き）
    pub sheets: Vec<SheetGrid>,
    pub colors: ColorIndex,
    /// ODSの走査結果（XLSXでは`None`）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walk: Option<WalkReport>,
    pub warnings: Vec<ExtractionWarning>,
}

impl CurriculumDocument {
    /// シート名の一覧
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// 主マップとして描くシート
    pub fn main_map(&self) -> Option<&SheetGrid> {
        self.sheets.iter().find(|s| s.role == SheetRole::MainMap)
    }

    /// 専門課程トラックとして描くシート
    pub fn specializations(&self) -> impl Iterator<Item = &SheetGrid> {
        self.sheets
            .iter()
            .filter(|s| s.role == SheetRole::Specialization)
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetGrid> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// セルの背景色。記録がなければ`None`（呼び出し側のデフォルト色を使う）
    pub fn color_at(&self, sheet: &str, row: u32, col: u32) -> Option<Rgb> {
        self.colors.get(sheet, row, col)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn document() -> CurriculumDocument {
        let grid = |name: &str, index| {
            SheetGrid::new(
                name.to_string(),
                index,
                SheetRole::from_position(index),
                vec![vec![CellValue::String("x".to_string())]],
            )
        };
        let mut colors = ColorIndex::new();
        colors.insert("Redes", 0, 0, Rgb::WHITE);

        CurriculumDocument {
            name: "LIC_Sistemas".to_string(),
            format: SourceFormat::Ods,
            sheets: vec![grid("Plan", 0), grid("Redes", 1), grid("Datos", 2)],
            colors,
            walk: None,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_roles() {
        let doc = document();
        assert_eq!(doc.main_map().map(|s| s.name.as_str()), Some("Plan"));
        let specs: Vec<_> = doc.specializations().map(|s| s.name.as_str()).collect();
        assert_eq!(specs, vec!["Redes", "Datos"]);
        assert_eq!(doc.sheet_names(), vec!["Plan", "Redes", "Datos"]);
    }

    #[test]
    fn test_color_at_default_on_missing() {
        let doc = document();
        assert_eq!(doc.color_at("Redes", 0, 0), Some(Rgb::WHITE));
        assert_eq!(doc.color_at("Plan", 0, 0), None);
        assert_eq!(doc.color_at("Nowhere", 9, 9), None);
    }

    #[test]
    fn test_serialize_shape() {
        let mut doc = document();
        doc.warnings
            .push(ExtractionWarning::new(WarningStage::Styles, "broken styles.xml"));
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["name"], "LIC_Sistemas");
        assert_eq!(json["format"], "ods");
        assert_eq!(json["sheets"][1]["role"], "specialization");
        assert_eq!(json["colors"][0]["color"], "#ffffff");
        assert_eq!(json["warnings"][0]["stage"], "styles");
        assert!(json.get("walk").is_none());
    }

    #[test]
    fn test_warning_display() {
        let warning = ExtractionWarning::new(WarningStage::Cells, "bad repeat count");
        assert_eq!(warning.to_string(), "[cells] bad repeat count");
    }
}
