//! Security Module
//!
//! セキュリティ対策を実装するモジュール。
//! ZIP bomb攻撃、パストラバーサル攻撃、巨大な入力ファイルへの対策を提供します。
//! ODSとXLSXはどちらもZIPコンテナなので、アーカイブを開く処理はここに集約します。

use std::io::{Read, Seek};
use zip::ZipArchive;

use crate::error::CurriMapError;

/// セキュリティ設定
///
/// ファイル処理時のセキュリティ制限を定義します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SecurityConfig {
    /// 展開後の最大サイズ（バイト）
    /// デフォルト: 1GB (1_073_741_824 bytes)
    pub max_decompressed_size: u64,
    /// ZIPアーカイブ内の最大ファイル数
    /// デフォルト: 10000
    pub max_file_count: usize,
    /// 単一ファイルの最大サイズ（バイト）
    /// デフォルト: 100MB (104_857_600 bytes)
    pub max_file_size: u64,
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 2GB (2_147_483_648 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_decompressed_size: 1_073_741_824, // 1GB
            max_file_count: 10_000,
            max_file_size: 104_857_600,         // 100MB
            max_input_file_size: 2_147_483_648, // 2GB
        }
    }
}

impl SecurityConfig {
    /// 入力全体をメモリに読み込み、サイズ上限を検証する
    pub fn read_input<R: Read>(&self, mut reader: R) -> Result<Vec<u8>, CurriMapError> {
        let mut buffer = Vec::new();
        let bytes_read = reader.read_to_end(&mut buffer)?;

        if bytes_read as u64 > self.max_input_file_size {
            return Err(CurriMapError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                bytes_read, self.max_input_file_size
            )));
        }

        Ok(buffer)
    }

    /// ZIPアーカイブを開き、ファイル数・パス・展開サイズを検証する
    ///
    /// # 戻り値
    ///
    /// * `Ok(ZipArchive<R>)` - 検証を通過したアーカイブ
    /// * `Err(CurriMapError::Zip)` - ZIPとして開けない場合
    /// * `Err(CurriMapError::SecurityViolation)` - 制限に違反した場合
    pub fn open_archive<R: Read + Seek>(&self, reader: R) -> Result<ZipArchive<R>, CurriMapError> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| CurriMapError::Zip(format!("{}", e)))?;

        if archive.len() > self.max_file_count {
            return Err(CurriMapError::SecurityViolation(format!(
                "ZIP archive contains too many files: {} (max: {})",
                archive.len(),
                self.max_file_count
            )));
        }

        let mut total_decompressed_size = 0u64;
        for i in 0..archive.len() {
            let file = archive
                .by_index(i)
                .map_err(|e| CurriMapError::Zip(format!("{}", e)))?;

            let file_name = file.name();
            validate_zip_path(file_name).map_err(|e| {
                CurriMapError::SecurityViolation(format!("Invalid ZIP path: {}", e))
            })?;

            let file_size = file.size();
            if file_size > self.max_file_size {
                return Err(CurriMapError::SecurityViolation(format!(
                    "File '{}' exceeds maximum size: {} bytes (max: {} bytes)",
                    file_name, file_size, self.max_file_size
                )));
            }

            total_decompressed_size =
                total_decompressed_size
                    .checked_add(file_size)
                    .ok_or_else(|| {
                        CurriMapError::SecurityViolation(
                            "Total decompressed size calculation overflow".to_string(),
                        )
                    })?;

            if total_decompressed_size > self.max_decompressed_size {
                return Err(CurriMapError::SecurityViolation(format!(
                    "Total decompressed size exceeds maximum: {} bytes (max: {} bytes)",
                    total_decompressed_size, self.max_decompressed_size
                )));
            }
        }

        Ok(archive)
    }
}

/// アーカイブ内のパートを読み込む
///
/// パートが存在しない場合は`Ok(None)`を返します。
/// 返却時にはZipFileのハンドルは解放済みです。
pub(crate) fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>, CurriMapError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(CurriMapError::Zip(format!("{}: {}", name, e))),
    };

    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    Ok(Some(content))
}

/// ファイルパスの検証
///
/// パストラバーサル攻撃を防ぐため、ファイルパスを検証します。
///
/// # 戻り値
///
/// * `Ok(())` - パスが安全な場合
/// * `Err(String)` - パスが危険な場合（`..`や絶対パスを含む）
pub(crate) fn validate_zip_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("Empty path is not allowed".to_string());
    }

    // 絶対パスを拒否（Windows形式の`C:\`やUnix形式の`/`で始まるパス）
    if path.starts_with('/') || path.starts_with("C:\\") || path.starts_with("c:\\") {
        return Err(format!("Absolute path is not allowed: {}", path));
    }

    if path.contains("..") {
        return Err(format!("Path traversal detected: {}", path));
    }

    if path.contains('\\') {
        return Err(format!("Backslash in path is not allowed: {}", path));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::{FileOptions, ZipWriter};
    use zip::CompressionMethod;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut data = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut data));
            let options = FileOptions::default().compression_method(CompressionMethod::Stored);
            for (name, content) in entries {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content).unwrap();
            }
            zip.finish().unwrap();
        }
        data
    }

    #[test]
    fn test_validate_zip_path_valid() {
        assert!(validate_zip_path("content.xml").is_ok());
        assert!(validate_zip_path("META-INF/manifest.xml").is_ok());
        assert!(validate_zip_path("xl/worksheets/sheet1.xml").is_ok());
    }

    #[test]
    fn test_validate_zip_path_empty() {
        assert!(validate_zip_path("").is_err());
    }

    #[test]
    fn test_validate_zip_path_absolute() {
        assert!(validate_zip_path("/etc/passwd").is_err());
        assert!(validate_zip_path("C:\\Windows\\system32").is_err());
        assert!(validate_zip_path("c:\\xl\\workbook.xml").is_err());
    }

    #[test]
    fn test_validate_zip_path_traversal() {
        assert!(validate_zip_path("../etc/passwd").is_err());
        assert!(validate_zip_path("xl/../../etc/passwd").is_err());
        assert!(validate_zip_path("..").is_err());
    }

    #[test]
    fn test_validate_zip_path_backslash() {
        assert!(validate_zip_path("xl\\workbook.xml").is_err());
    }

    #[test]
    fn test_read_input_limit() {
        let config = SecurityConfig {
            max_input_file_size: 4,
            ..SecurityConfig::default()
        };
        assert!(config.read_input(Cursor::new(vec![0u8; 4])).is_ok());
        assert!(matches!(
            config.read_input(Cursor::new(vec![0u8; 5])),
            Err(CurriMapError::SecurityViolation(_))
        ));
    }

    #[test]
    fn test_open_archive_and_read_part() {
        let data = build_zip(&[("content.xml", b"<x/>")]);
        let mut archive = SecurityConfig::default()
            .open_archive(Cursor::new(data))
            .unwrap();

        assert_eq!(read_part(&mut archive, "content.xml").unwrap().unwrap(), b"<x/>");
        assert!(read_part(&mut archive, "styles.xml").unwrap().is_none());
    }

    #[test]
    fn test_open_archive_too_many_files() {
        let data = build_zip(&[("a.xml", b"a"), ("b.xml", b"b"), ("c.xml", b"c")]);
        let config = SecurityConfig {
            max_file_count: 2,
            ..SecurityConfig::default()
        };
        match config.open_archive(Cursor::new(data)) {
            Err(CurriMapError::SecurityViolation(msg)) => assert!(msg.contains("too many files")),
            other => panic!("Expected SecurityViolation, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_open_archive_not_a_zip() {
        let result = SecurityConfig::default().open_archive(Cursor::new(b"not a zip".to_vec()));
        assert!(matches!(result, Err(CurriMapError::Zip(_))));
    }
}
