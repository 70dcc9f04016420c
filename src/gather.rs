use std::path::Path;
use tokio::fs as async_fs;
use tokio::io::AsyncReadExt;
use tracing::{debug, trace, warn};

/// Bytes sniffed for a NUL when deciding whether a file is binary.
pub const BINARY_SNIFF_LEN: u64 = 1024;

/// Bytes of a binary file shown (hex encoded) in the output.
pub const BINARY_PREVIEW_LEN: usize = 32;

pub async fn is_binary(path: &Path) -> bool {
    match read_prefix(path, BINARY_SNIFF_LEN).await {
        Ok(prefix) => prefix.contains(&0),
        Err(e) => {
            trace!("Could not sniff {}: {}", path.display(), e);
            false
        }
    }
}

async fn read_prefix(path: &Path, len: u64) -> std::io::Result<Vec<u8>> {
    let file = async_fs::File::open(path).await?;
    let mut prefix = Vec::new();
    file.take(len).read_to_end(&mut prefix).await?;
    Ok(prefix)
}

/// Decodes UTF-8, dropping invalid sequences instead of replacing them.
pub fn decode_utf8_dropping_invalid(mut bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                text.push_str(valid);
                return text;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                if let Ok(valid) = std::str::from_utf8(valid) {
                    text.push_str(valid);
                }
                let skip = e.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}

/// Keeps the first `preview_length` lines, or all of them.
pub fn preview_lines(text: &str, preview_length: Option<usize>) -> String {
    let lines = text.lines();
    match preview_length {
        Some(limit) => lines.take(limit).collect::<Vec<_>>().join("\n"),
        None => lines.collect::<Vec<_>>().join("\n"),
    }
}

fn section(path: &str, body: &str) -> String {
    format!("--- {} ---\n{}\n\n", path, body)
}

async fn format_file(
    full_path: &Path,
    file: &str,
    preview_length: Option<usize>,
) -> std::io::Result<String> {
    if preview_length == Some(0) {
        return Ok(format!("--- {} ---\n\n", file));
    }
    if is_binary(full_path).await {
        let prefix = read_prefix(full_path, BINARY_PREVIEW_LEN as u64).await?;
        let body = format!(
            "[Binary file, first {} bytes: {}]",
            BINARY_PREVIEW_LEN,
            hex::encode(prefix)
        );
        return Ok(section(file, &body));
    }
    let bytes = async_fs::read(full_path).await?;
    let text = decode_utf8_dropping_invalid(&bytes);
    Ok(section(file, &preview_lines(&text, preview_length)))
}

/// Concatenates the labeled contents of `files`, which are relative to `dir`.
pub async fn gather_code(
    dir: &Path,
    files: &[String],
    preview_length: Option<usize>,
    include_dirs: bool,
) -> String {
    let mut result = String::new();
    for file in files {
        let full_path = dir.join(file);
        let metadata = match async_fs::metadata(&full_path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("Skipping {}: {}", file, e);
                continue;
            }
        };

        if metadata.is_file() {
            match format_file(&full_path, file, preview_length).await {
                Ok(formatted) => result.push_str(&formatted),
                Err(e) => warn!("Error reading {}: {}", file, e),
            }
        } else if include_dirs && metadata.is_dir() {
            result.push_str(&section(file, "[Directory]"));
        }
    }
    result
}
