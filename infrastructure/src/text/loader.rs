//! Text file loading with encoding detection
//!
//! Prompts, templates, essays and drafts come from many editors. The
//! encoding is decided in this order: byte-order mark, strict UTF-8, then
//! statistical detection over the whole file.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextLoadError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

/// Decode raw bytes to text, returning the encoding that was used.
pub fn decode(bytes: &[u8]) -> (String, &'static Encoding) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return (text.into_owned(), encoding);
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return (text.to_string(), UTF_8);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    (text.into_owned(), encoding)
}

/// Read and decode a text file.
pub fn load_text(path: impl AsRef<Path>) -> Result<String, TextLoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TextLoadError::NotFound(path.to_path_buf())
        } else {
            TextLoadError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        }
    })?;

    let (text, encoding) = decode(&bytes);
    debug!("Loaded {} ({} bytes, {})", path.display(), bytes.len(), encoding.name());
    Ok(text)
}

/// Read an optional input: no path means empty text, a given path must exist.
pub fn load_optional(path: Option<&Path>) -> Result<String, TextLoadError> {
    match path {
        Some(path) => load_text(path),
        None => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "本文提出了一种基于多模型投票的论文写作方法，\
        并通过多轮批评与修订不断改进草稿的质量。实验结果表明，\
        该方法在结构完整性和语言流畅性方面均有明显提升。";

    #[test]
    fn test_plain_utf8() {
        let (text, encoding) = decode(SAMPLE.as_bytes());
        assert_eq!(text, SAMPLE);
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn test_utf8_bom_is_dropped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("摘要".as_bytes());
        assert_eq!(decode(&bytes).0, "摘要");
    }

    #[test]
    fn test_utf16le_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "第三章".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let (text, encoding) = decode(&bytes);
        assert_eq!(text, "第三章");
        assert_eq!(encoding, encoding_rs::UTF_16LE);
    }

    #[test]
    fn test_gbk_is_detected() {
        let (bytes, _, unmappable) = encoding_rs::GBK.encode(SAMPLE);
        assert!(!unmappable);
        assert!(std::str::from_utf8(&bytes).is_err());

        let (text, _) = decode(&bytes);
        assert_eq!(text, SAMPLE);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("essay.txt");
        assert_eq!(load_text(&path), Err(TextLoadError::NotFound(path.clone())));
        assert!(load_optional(Some(&path)).is_err());
        assert_eq!(load_optional(None), Ok(String::new()));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.txt");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(load_text(&path).unwrap(), SAMPLE);
    }
}
