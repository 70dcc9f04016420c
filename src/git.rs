use crate::errors::RstringError;
use std::collections::HashSet;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, trace, warn};

pub async fn is_git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Drops every path git reports as ignored when checked from `dir`.
///
/// Tracked files are never reported by `git check-ignore`, so they stay.
pub async fn filter_ignored_files(
    dir: &Path,
    files: &[String],
) -> Result<Vec<String>, RstringError> {
    if files.is_empty() {
        return Ok(Vec::new());
    }
    if !is_git_available().await {
        warn!("Git command is not available.");
        return Ok(files.to_vec());
    }

    debug!("Filtering ignored files in {}", dir.display());
    let mut child = Command::new("git")
        .args(["check-ignore", "-z", "--stdin"])
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| RstringError::GitError(e.to_string()))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| RstringError::GitError("could not open git stdin".to_owned()))?;
    let mut input = Vec::new();
    for file in files {
        input.extend_from_slice(file.as_bytes());
        input.push(0);
    }
    let writer = tokio::spawn(async move {
        let result = stdin.write_all(&input).await;
        drop(stdin);
        result
    });

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| RstringError::GitError(e.to_string()))?;
    if let Ok(Err(e)) = writer.await {
        debug!("Writing paths to git check-ignore failed: {}", e);
    }

    match output.status.code() {
        Some(0) => {}
        Some(1) => {
            trace!("git check-ignore reported no ignored files");
            return Ok(files.to_vec());
        }
        _ => {
            return Err(RstringError::GitError(
                String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            ))
        }
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let ignored: HashSet<&str> = stdout.split('\0').filter(|p| !p.is_empty()).collect();
    debug!("Git ignores {} of {} files", ignored.len(), files.len());

    Ok(files
        .iter()
        .filter(|file| !ignored.contains(file.as_str()))
        .cloned()
        .collect())
}
