//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// currimapクレート全体で使用するエラー型
///
/// ワークブックの読み込み、スタイル抽出、レイアウト計算中に発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ファイル読み込み失敗など）
/// - `Parse`: グリッド読み込み中に発生したエラー（calamine由来）
/// - `Zip` / `MissingPart`: コンテナ（ZIPアーカイブ）に関するエラー
/// - `Xml`: スタイル・セルXMLの解析エラー
/// - `Config`: 設定の検証に失敗したエラー
///
/// 色抽出で発生したエラーは呼び出し側で警告に変換されます。
/// ドキュメント全体を失敗させるのはグリッド読み込みのエラーのみです。
///
/// # 使用例
///
/// ```rust,no_run
/// use currimap::CurriMapError;
/// use std::fs::File;
///
/// fn read_workbook(path: &str) -> Result<(), CurriMapError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     // ... 処理 ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum CurriMapError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ワークブックの解析中に発生したエラー
    ///
    /// calamineクレートがシートのグリッドを読み込む際に発生したエラーです。
    #[error("Failed to parse workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// UTF-8文字列の変換エラー（XML属性値がUTF-8でない場合）
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// ZIPアーカイブの解析エラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// 数値の解析エラー（XLSXの行番号・スタイル番号・fillIdなど）
    #[error("Number parse error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// XMLの解析エラー
    ///
    /// 不正なXML、属性の読み込み失敗などが原因となります。
    /// このエラーが発生した時点までに書き込まれた色情報は保持されます。
    #[error("XML error in '{part}': {message}")]
    Xml {
        /// 解析中だったアーカイブ内のパス
        part: String,
        /// エラーの詳細メッセージ
        message: String,
    },

    /// 必須のXMLパートがアーカイブ内に存在しない
    ///
    /// 例: ODSファイルに`content.xml`がない場合
    #[error("Missing archive part: {0}")]
    MissingPart(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `ExtractorBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use currimap::{ExtractorBuilder, CurriMapError};
    ///
    /// let result = ExtractorBuilder::new()
    ///     .with_row_expand_cap(0)
    ///     .build();
    ///
    /// match result {
    ///     Err(CurriMapError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 拡張子からファイル形式を判定できなかった
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// ZIP bomb攻撃、パストラバーサル攻撃、ファイルサイズ制限などの
    /// セキュリティ制限に違反した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl CurriMapError {
    /// XMLエラーを生成するヘルパー
    pub(crate) fn xml(part: &str, message: impl std::fmt::Display) -> Self {
        CurriMapError::Xml {
            part: part.to_string(),
            message: message.to_string(),
        }
    }
}
