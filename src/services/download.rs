use std::fs;
use std::path::{Path, PathBuf};

use base64::prelude::*;

use crate::error::Result;
use crate::services::rebuild::ExportPayload;

pub const CONTENT_TYPE: &str = "application/octet-stream";

const UTF8_BOM: char = '\u{feff}';

/// A file ready to be offered for download, byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Converts every line ending (`\r\n`, lone `\r`, lone `\n`) to `\r\n`.
pub fn normalize_crlf(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "\r\n")
}

/// Final on-disk layout of a WTS file: BOM, CRLF line endings, UTF-8.
pub fn finalize_text(text: &str) -> Vec<u8> {
    let body = normalize_crlf(text.strip_prefix(UTF8_BOM).unwrap_or(text));

    let mut out = String::with_capacity(body.len() + UTF8_BOM.len_utf8());
    out.push(UTF8_BOM);
    out.push_str(&body);
    out.into_bytes()
}

/// Unpacks an export payload into the bytes of the file to save.
pub fn prepare(payload: &ExportPayload) -> Result<DownloadFile> {
    let raw = BASE64_STANDARD.decode(payload.file_content.trim())?;
    let text = String::from_utf8(raw)?;

    Ok(DownloadFile {
        file_name: payload.file_name.clone(),
        bytes: finalize_text(&text),
    })
}

/// Writes the file into `dir` and returns its path.
pub fn save_to(dir: &Path, file: &DownloadFile) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let name = Path::new(&file.file_name)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "strings.wts".into());
    let path = dir.join(name);

    fs::write(&path, &file.bytes)?;
    tracing::info!("Wrote {} bytes to {}", file.bytes.len(), path.display());
    Ok(path)
}
