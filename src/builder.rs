//! Builder Module
//!
//! Fluent Builder APIを提供し、`Extractor`インスタンスを段階的に構築する。

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::api::SourceFormat;
use crate::color::Rgb;
use crate::document::{CurriculumDocument, ExtractionWarning, WarningStage};
use crate::error::CurriMapError;
use crate::layout::{plan_document, LayoutConfig, SheetLayout};
use crate::parser::{self, RepeatLimits, WorkbookParser};
use crate::security::SecurityConfig;

/// 抽出処理の設定を保持する内部構造体
#[derive(Debug, Clone, Default)]
pub(crate) struct ExtractionConfig {
    /// ODSの行の繰り返し展開の上限
    pub limits: RepeatLimits,

    /// 入力・アーカイブのサイズ制限
    pub security: SecurityConfig,

    /// レイアウトの既定値
    pub layout: LayoutConfig,
}

/// Fluent Builder APIを提供する構造体
///
/// `Extractor`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust
/// use currimap::ExtractorBuilder;
///
/// # fn main() -> Result<(), currimap::CurriMapError> {
/// let extractor = ExtractorBuilder::new()
///     .with_row_skip_threshold(2000)
///     .with_row_expand_cap(800)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExtractorBuilder {
    /// 内部設定（構築中）
    config: ExtractionConfig,
}

impl Default for ExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 行の繰り返しのスキップ閾値: 1000
    /// - 行の繰り返しの展開上限: 500
    /// - 入力ファイルの最大サイズ: 2GB
    /// - 主マップの既定色: `#e6e6e6`
    /// - 専門課程トラックの既定色: `#dda0dd`
    /// - ラベルの折り返し幅: 21
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }

    /// 展開せずにスキップする行の繰り返し回数の閾値を指定する
    ///
    /// `table:number-rows-repeated`がこの値を超える行は色を記録しませんが、
    /// 行インデックスは宣言された回数だけ進みます。
    pub fn with_row_skip_threshold(mut self, threshold: u32) -> Self {
        self.config.limits.row_skip_threshold = threshold;
        self
    }

    /// 閾値以下の繰り返し行を展開する最大行数を指定する
    pub fn with_row_expand_cap(mut self, cap: u32) -> Self {
        self.config.limits.row_expand_cap = cap;
        self
    }

    /// 行の繰り返し展開の上限をまとめて指定する
    pub fn with_repeat_limits(mut self, limits: RepeatLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// 入力ファイルの最大サイズ（バイト）を指定する
    pub fn with_max_input_size(mut self, bytes: u64) -> Self {
        self.config.security.max_input_file_size = bytes;
        self
    }

    /// アーカイブ展開後の合計最大サイズ（バイト）を指定する
    pub fn with_max_decompressed_size(mut self, bytes: u64) -> Self {
        self.config.security.max_decompressed_size = bytes;
        self
    }

    /// アーカイブ内の最大ファイル数を指定する
    pub fn with_max_archive_entries(mut self, count: usize) -> Self {
        self.config.security.max_file_count = count;
        self
    }

    /// レイアウト設定をまとめて指定する
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.config.layout = layout;
        self
    }

    /// 主マップで色の記録がないボックスの色を指定する
    pub fn with_main_default_color(mut self, color: Rgb) -> Self {
        self.config.layout.main_default = color;
        self
    }

    /// 専門課程トラックで色の記録がないボックスの色を指定する
    pub fn with_specialization_default_color(mut self, color: Rgb) -> Self {
        self.config.layout.specialization_default = color;
        self
    }

    /// ラベルの折り返し幅（表示幅）を指定する
    pub fn with_wrap_width(mut self, width: usize) -> Self {
        self.config.layout.wrap_width = width;
        self
    }

    /// 設定を検証して`Extractor`を構築する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Extractor)`: 設定が有効な場合
    /// * `Err(CurriMapError::Config)`: 設定が無効な場合
    ///
    /// # 発生し得るエラー
    ///
    /// * 展開上限が0、またはスキップ閾値より大きい
    /// * サイズ制限・ファイル数制限が0
    /// * 折り返し幅が0
    /// * ボックスの大きさが正の有限値でない
    pub fn build(self) -> Result<Extractor, CurriMapError> {
        let limits = &self.config.limits;
        if limits.row_expand_cap == 0 {
            return Err(CurriMapError::Config(
                "Row expand cap must be at least 1".to_string(),
            ));
        }
        if limits.row_expand_cap > limits.row_skip_threshold {
            return Err(CurriMapError::Config(format!(
                "Row expand cap ({}) exceeds row skip threshold ({})",
                limits.row_expand_cap, limits.row_skip_threshold
            )));
        }

        let security = &self.config.security;
        if security.max_input_file_size == 0
            || security.max_decompressed_size == 0
            || security.max_file_size == 0
            || security.max_file_count == 0
        {
            return Err(CurriMapError::Config(
                "Security limits must be greater than zero".to_string(),
            ));
        }

        let layout = &self.config.layout;
        if layout.wrap_width == 0 {
            return Err(CurriMapError::Config(
                "Wrap width must be at least 1".to_string(),
            ));
        }
        for (name, value) in [("box width", layout.box_width), ("box height", layout.box_height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CurriMapError::Config(format!(
                    "Invalid {}: {}",
                    name, value
                )));
            }
        }

        Ok(Extractor::new(self.config))
    }
}

/// 抽出処理のファサード
///
/// 1文書を読み込み、シートのグリッドと色インデックスをまとめた
/// `CurriculumDocument`を生成します。文書ごとに新しい色インデックスを作るため、
/// 同じ`Extractor`で複数の文書を処理しても状態は持ち越されません。
///
/// # 使用例
///
/// ```rust,no_run
/// use currimap::ExtractorBuilder;
///
/// # fn main() -> Result<(), currimap::CurriMapError> {
/// let extractor = ExtractorBuilder::new().build()?;
/// let document = extractor.extract_path("12_Licenciaturas_BIS/LIC_Sistemas.ods")?;
/// for layout in extractor.plan(&document) {
///     println!("{}: {} boxes", layout.file_stem, layout.boxes.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractionConfig,
}

impl Extractor {
    pub(crate) fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// 行の繰り返し展開の上限
    pub fn repeat_limits(&self) -> RepeatLimits {
        self.config.limits
    }

    /// レイアウト設定
    pub fn layout_config(&self) -> &LayoutConfig {
        &self.config.layout
    }

    /// 入力から1文書を抽出する
    ///
    /// # 引数
    ///
    /// * `name` - 文書名（通常は拡張子を除いたファイル名）
    /// * `format` - 入力の形式
    /// * `input` - ファイル内容を読み込むためのリーダー
    ///
    /// # 戻り値
    ///
    /// * `Ok(CurriculumDocument)` - グリッドの読み込みに成功した場合。
    ///   色の抽出に失敗しても成功として扱い、`warnings`に記録します。
    /// * `Err(CurriMapError)` - 入力が読めない、またはグリッドを読み込めない場合
    ///
    /// # 処理フロー
    ///
    /// 1. 入力をメモリに読み込む（サイズ制限あり）
    /// 2. 形式に応じた色抽出ストラテジーで色インデックスを構築
    /// 3. calamineでシートのグリッドを読み込む
    /// 4. グリッドにないシートの色を破棄
    pub fn extract<R: Read>(
        &self,
        name: &str,
        format: SourceFormat,
        input: R,
    ) -> Result<CurriculumDocument, CurriMapError> {
        let bytes = self.config.security.read_input(input)?;

        let extraction =
            parser::extract_colors(format, &bytes, &self.config.security, &self.config.limits);

        let sheets = WorkbookParser::open(bytes)?.load_grids()?;

        let mut colors = extraction.index;
        let mut warnings = extraction.warnings;
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        for dropped in colors.retain_sheets(&names) {
            let message = format!(
                "colors recorded for sheet '{}' which is not in the workbook",
                dropped
            );
            log::warn!("{}: {}", name, message);
            warnings.push(ExtractionWarning::new(WarningStage::Index, message));
        }

        Ok(CurriculumDocument {
            name: name.to_string(),
            format,
            sheets,
            colors,
            walk: extraction.walk,
            warnings,
        })
    }

    /// ファイルパスから1文書を抽出する
    ///
    /// 形式は拡張子から、文書名は拡張子を除いたファイル名から決まります。
    pub fn extract_path(&self, path: impl AsRef<Path>) -> Result<CurriculumDocument, CurriMapError> {
        let path = path.as_ref();
        let format = SourceFormat::from_path(path)?;
        let name = document_name(path);
        let file = File::open(path)?;
        self.extract(&name, format, BufReader::new(file))
    }

    /// 文書のすべてのシートを配置する
    pub fn plan(&self, document: &CurriculumDocument) -> Vec<SheetLayout> {
        plan_document(document, &self.config.layout)
    }
}

/// 拡張子を除いたファイル名
pub(crate) fn document_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_builder_new() {
        let builder = ExtractorBuilder::new();
        assert_eq!(builder.config.limits, RepeatLimits::default());
        assert_eq!(builder.config.limits.row_skip_threshold, 1000);
        assert_eq!(builder.config.limits.row_expand_cap, 500);
        assert_eq!(builder.config.layout.wrap_width, 21);
    }

    #[test]
    fn test_builder_method_chaining() {
        let extractor = ExtractorBuilder::new()
            .with_row_skip_threshold(5000)
            .with_row_expand_cap(2000)
            .with_main_default_color(Rgb::WHITE)
            .with_specialization_default_color(Rgb::BLACK)
            .with_wrap_width(30)
            .build()
            .unwrap();

        assert_eq!(
            extractor.repeat_limits(),
            RepeatLimits {
                row_skip_threshold: 5000,
                row_expand_cap: 2000
            }
        );
        assert_eq!(extractor.layout_config().main_default, Rgb::WHITE);
        assert_eq!(extractor.layout_config().specialization_default, Rgb::BLACK);
        assert_eq!(extractor.layout_config().wrap_width, 30);
    }

    #[test]
    fn test_build_with_zero_expand_cap() {
        match ExtractorBuilder::new().with_row_expand_cap(0).build() {
            Err(CurriMapError::Config(msg)) => assert!(msg.contains("expand cap")),
            other => panic!("Expected Config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_build_with_cap_over_threshold() {
        let result = ExtractorBuilder::new()
            .with_row_skip_threshold(100)
            .with_row_expand_cap(101)
            .build();
        assert!(matches!(result, Err(CurriMapError::Config(_))));
    }

    #[test]
    fn test_build_with_zero_security_limit() {
        let result = ExtractorBuilder::new().with_max_input_size(0).build();
        assert!(matches!(result, Err(CurriMapError::Config(_))));
        let result = ExtractorBuilder::new().with_max_archive_entries(0).build();
        assert!(matches!(result, Err(CurriMapError::Config(_))));
    }

    #[test]
    fn test_build_with_invalid_layout() {
        assert!(ExtractorBuilder::new().with_wrap_width(0).build().is_err());

        let layout = LayoutConfig {
            box_width: f64::NAN,
            ..LayoutConfig::default()
        };
        assert!(ExtractorBuilder::new().with_layout(layout).build().is_err());
    }

    #[test]
    fn test_extract_with_invalid_input() {
        let extractor = ExtractorBuilder::new().build().unwrap();
        let result = extractor.extract("broken", SourceFormat::Ods, &b"not a spreadsheet"[..]);
        assert!(matches!(result, Err(CurriMapError::Parse(_))));
    }

    #[test]
    fn test_extract_input_over_size_limit() {
        let extractor = ExtractorBuilder::new().with_max_input_size(8).build().unwrap();
        let result = extractor.extract("big", SourceFormat::Xlsx, &[0u8; 16][..]);
        assert!(matches!(result, Err(CurriMapError::SecurityViolation(_))));
    }

    #[test]
    fn test_extract_path_unsupported_extension() {
        let extractor = ExtractorBuilder::new().build().unwrap();
        assert!(matches!(
            extractor.extract_path("plan.csv"),
            Err(CurriMapError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_document_name() {
        assert_eq!(document_name(Path::new("dir/LIC_Datos.ods")), "LIC_Datos");
        assert_eq!(document_name(Path::new("LIC.v2.xlsx")), "LIC.v2");
    }
}
