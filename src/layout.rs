//! Layout Module
//!
//! シートのグリッドと色インデックスから、描画に必要な配置情報
//! （キャンバスサイズ、背景の縞、科目ボックス、接続線）を計算します。
//! 描画そのものは行いません。
//!
//! 座標系は左下原点で、y軸は上向きです。

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::color::{ColorIndex, Rgb};
use crate::document::CurriculumDocument;
use crate::types::{SheetGrid, SheetRole};

/// レイアウトの設定
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutConfig {
    /// 主マップのボックスの既定色
    pub main_default: Rgb,
    /// 専門課程トラックのボックスの既定色
    pub specialization_default: Rgb,
    /// 行ごとに交互に使う縞の色
    pub stripe_colors: [Rgb; 2],
    /// ラベルの折り返し幅（表示幅）
    pub wrap_width: usize,
    pub box_width: f64,
    pub box_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            main_default: Rgb::new(0xe6, 0xe6, 0xe6),
            specialization_default: Rgb::new(0xdd, 0xa0, 0xdd),
            stripe_colors: [Rgb::WHITE, Rgb::new(0xbb, 0xbb, 0xbb)],
            wrap_width: 21,
            box_width: 0.85,
            box_height: 0.65,
        }
    }
}

/// 行の背景の縞（矩形、左下基準）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stripe {
    pub row: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Rgb,
}

/// 科目ボックス（中心座標）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseBox {
    pub row: usize,
    pub col: usize,
    pub x: f64,
    pub y: f64,
    pub label: String,
    /// 折り返し済みのラベル
    pub lines: Vec<String>,
    pub subtext: Option<String>,
    pub fill: Rgb,
    pub text_color: Rgb,
    /// 色インデックスに記録された色かどうか（`false`なら既定色）
    pub explicit_fill: bool,
}

/// 隣り合うボックスを結ぶ水平線
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub row: usize,
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// 専門課程トラックの左端に置く学期ラベル
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterLabel {
    pub row: usize,
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// 1シート分の配置
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetLayout {
    pub sheet: String,
    pub role: SheetRole,
    pub title: String,
    /// 出力ファイル名の拡張子を除いた部分
    pub file_stem: String,
    /// キャンバスサイズ（インチ）
    pub canvas: (f64, f64),
    /// 座標範囲（0からの上限）
    pub x_limit: f64,
    pub y_limit: f64,
    pub stripes: Vec<Stripe>,
    pub labels: Vec<SemesterLabel>,
    pub boxes: Vec<CourseBox>,
    pub connectors: Vec<Connector>,
}

/// 文書のすべてのシートを配置する
///
/// シートの役割（主マップ／専門課程トラック）に応じて配置方法を切り替えます。
pub fn plan_document(document: &CurriculumDocument, config: &LayoutConfig) -> Vec<SheetLayout> {
    document
        .sheets
        .iter()
        .map(|grid| match grid.role {
            SheetRole::MainMap => plan_main_map(&document.name, grid, &document.colors, config),
            SheetRole::Specialization => {
                plan_specialization(&document.name, grid, &document.colors, config)
            }
        })
        .collect()
}

/// 主マップ: 行が学期、列が科目のグリッド
pub fn plan_main_map(
    document_name: &str,
    grid: &SheetGrid,
    colors: &ColorIndex,
    config: &LayoutConfig,
) -> SheetLayout {
    let rows = grid.rows() as f64;
    let cols = grid.cols() as f64;

    let stripes = (0..grid.rows())
        .map(|row| {
            let y = rows + 0.5 - row as f64;
            Stripe {
                row,
                x: 0.0,
                y: y - 0.5,
                width: cols + 2.0,
                height: 1.0,
                color: config.stripe_colors[row % 2],
            }
        })
        .collect();

    let mut boxes = Vec::new();
    for col in 0..grid.cols() {
        for row in 0..grid.rows() {
            let Some(label) = grid.text(row, col) else {
                continue;
            };
            let subtext = if label.contains("Optativa") {
                "Variable"
            } else {
                "8.0 Cr"
            };
            boxes.push(course_box(
                &grid.name,
                (row, col),
                (col as f64 + 1.5, rows + 0.5 - row as f64),
                label,
                Some(subtext.to_string()),
                colors,
                config.main_default,
                config,
            ));
        }
    }

    SheetLayout {
        sheet: grid.name.clone(),
        role: grid.role,
        title: format!("Mapa Curricular: {}", document_name),
        file_stem: format!("{}_Main", document_name),
        canvas: ((cols * 1.5).max(14.0), (rows * 1.2).max(8.5)),
        x_limit: cols + 1.5,
        y_limit: rows + 2.0,
        stripes,
        labels: Vec::new(),
        boxes,
        connectors: Vec::new(),
    }
}

/// 専門課程トラック: 1行が1学期、列0が学期ラベル、列1以降が科目の列
pub fn plan_specialization(
    document_name: &str,
    grid: &SheetGrid,
    colors: &ColorIndex,
    config: &LayoutConfig,
) -> SheetLayout {
    let rows = grid.rows() as f64;
    let cols = grid.cols() as f64;
    let x_limit = (cols * 2.5 + 1.0).max(10.0);
    let y_limit = (rows * 1.5 + 2.0).max(10.0);
    let start_y = y_limit - 2.0;
    let column_x = |col: usize| 2.0 + col as f64 * 2.5;

    let mut stripes = Vec::with_capacity(grid.rows());
    let mut labels = Vec::new();
    let mut boxes = Vec::new();
    let mut connectors = Vec::new();

    for row in 0..grid.rows() {
        let y = start_y - row as f64 * 1.5;
        stripes.push(Stripe {
            row,
            x: 0.0,
            y: y - 0.75,
            width: x_limit,
            height: 1.5,
            color: config.stripe_colors[row % 2],
        });

        let semester = grid.text(row, 0);
        if let Some(semester) = &semester {
            labels.push(SemesterLabel {
                row,
                x: 0.8,
                y,
                text: format!("Sem {}", semester),
            });
        }

        for col in 1..grid.cols() {
            let Some(label) = grid.text(row, col) else {
                continue;
            };
            let x = column_x(col);
            if col > 1 {
                connectors.push(Connector {
                    row,
                    from: (column_x(col - 1) + config.box_width / 2.0, y),
                    to: (x - config.box_width / 2.0, y),
                });
            }
            boxes.push(course_box(
                &grid.name,
                (row, col),
                (x, y),
                label,
                semester.as_ref().map(|s| format!("Sem {}", s)),
                colors,
                config.specialization_default,
                config,
            ));
        }
    }

    SheetLayout {
        sheet: grid.name.clone(),
        role: grid.role,
        title: grid.name.clone(),
        file_stem: format!("{}_{}", document_name, safe_sheet_name(&grid.name)),
        canvas: ((x_limit * 1.2).max(14.0), (y_limit * 0.8).max(8.5)),
        x_limit,
        y_limit,
        stripes,
        labels,
        boxes,
        connectors,
    }
}

#[allow(clippy::too_many_arguments)]
fn course_box(
    sheet: &str,
    (row, col): (usize, usize),
    (x, y): (f64, f64),
    label: String,
    subtext: Option<String>,
    colors: &ColorIndex,
    default_fill: Rgb,
    config: &LayoutConfig,
) -> CourseBox {
    let recorded = u32::try_from(row)
        .ok()
        .zip(u32::try_from(col).ok())
        .and_then(|(r, c)| colors.get(sheet, r, c));
    let fill = recorded.unwrap_or(default_fill);

    CourseBox {
        row,
        col,
        x,
        y,
        lines: wrap_label(&label, config.wrap_width),
        label,
        subtext,
        fill,
        text_color: fill.contrast_text(),
        explicit_fill: recorded.is_some(),
    }
}

/// ラベルを単語単位で折り返す
///
/// 幅は表示幅（全角文字は2）で数えます。幅を超える単語は分割せず1行に置きます。
///
/// # 使用例
///
/// ```rust
/// use currimap::wrap_label;
///
/// assert_eq!(
///     wrap_label("Programación Orientada a Objetos", 21),
///     vec!["Programación", "Orientada a Objetos"]
/// );
/// ```
pub fn wrap_label(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.width() + 1 + word.width() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// ファイル名に使えるシート名
///
/// 英数字（Unicodeを含む）・空白・`-`・`_`以外を取り除き、前後の空白を削ります。
pub fn safe_sheet_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim()
        .to_string()
}
