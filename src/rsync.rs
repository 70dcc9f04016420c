use crate::errors::RstringError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, trace};

pub const RSYNC: &str = "rsync";

/// Flags that turn rsync into a dry-run lister.
pub const LIST_FLAGS: &[&str] = &["-ain", "--list-only"];

/// Options whose value may be passed as the following token.
const VALUE_OPTIONS: &[&str] = &[
    "--include",
    "--exclude",
    "--filter",
    "-f",
    "--include-from",
    "--exclude-from",
    "--files-from",
];

pub async fn check_rsync() -> Result<(), RstringError> {
    let status = Command::new(RSYNC)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match status {
        Ok(status) if status.success() => Ok(()),
        _ => Err(RstringError::RsyncNotFound),
    }
}

/// Whether `args` already name a source path for rsync.
pub fn has_source(args: &[String]) -> bool {
    let mut skip_value = false;
    for arg in args {
        if skip_value {
            skip_value = false;
            continue;
        }
        if VALUE_OPTIONS.contains(&arg.as_str()) {
            skip_value = true;
        } else if !arg.starts_with('-') {
            return true;
        }
    }
    false
}

/// Appends `.` when no source path is present.
pub fn ensure_source(args: &mut Vec<String>) {
    if !has_source(args) {
        args.push(".".to_owned());
    }
}

/// `args` without a trailing `.` that only `ensure_source` would have added.
pub fn without_implicit_source(args: &[String]) -> &[String] {
    match args.split_last() {
        Some((last, rest)) if last == "." && !has_source(rest) => rest,
        _ => args,
    }
}

/// Extracts file paths from `rsync --list-only` output.
///
/// Each entry line carries permissions, size, date and time before the path.
/// Directory lines ending in `/` and the transfer root `.` are dropped.
pub fn parse_rsync_output(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.ends_with('/'))
        .filter_map(path_field)
        .filter(|path| *path != ".")
        .map(str::to_owned)
        .collect()
}

fn path_field(line: &str) -> Option<&str> {
    let mut rest = line.trim_start();
    let is_symlink = rest.starts_with('l');
    for _ in 0..4 {
        let end = rest.find(char::is_whitespace)?;
        rest = rest[end..].trim_start();
    }
    if rest.is_empty() {
        return None;
    }
    if is_symlink {
        if let Some((link, _target)) = rest.split_once(" -> ") {
            return Some(link);
        }
    }
    Some(rest)
}

#[async_trait]
pub trait FileLister: Send + Sync {
    async fn list(&self, args: &[String]) -> Result<Vec<String>, RstringError>;

    async fn validate(&self, args: &[String]) -> bool {
        match self.list(args).await {
            Ok(_) => true,
            Err(e) => {
                debug!("Rejected rsync arguments {:?}: {}", args, e);
                false
            }
        }
    }
}

/// Lists files by running rsync inside `dir`.
#[derive(Debug, Clone)]
pub struct RsyncLister {
    dir: PathBuf,
}

impl RsyncLister {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        RsyncLister { dir: dir.into() }
    }
}

#[async_trait]
impl FileLister for RsyncLister {
    async fn list(&self, args: &[String]) -> Result<Vec<String>, RstringError> {
        debug!(
            "Rsync command: {} {} {}",
            RSYNC,
            LIST_FLAGS.join(" "),
            args.join(" ")
        );
        let output = Command::new(RSYNC)
            .args(LIST_FLAGS)
            .args(args)
            .current_dir(&self.dir)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => RstringError::RsyncNotFound,
                _ => RstringError::IoError(e.to_string()),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        trace!("Rsync stdout: {}", stdout);
        trace!("Rsync stderr: {}", stderr);

        if !output.status.success() {
            debug!("Rsync command failed: {}", output.status);
            return Err(RstringError::RsyncFailed {
                status: output.status.to_string(),
                stderr: stderr.trim().to_owned(),
            });
        }
        Ok(parse_rsync_output(&stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn separate_option_values_are_not_sources() {
        assert!(!has_source(&strings(&["--include", "*.txt", "--exclude=*"])));
        assert!(has_source(&strings(&["--include", "*.txt", "src"])));
        assert!(!has_source(&strings(&["-v", "--prune-empty-dirs"])));
    }

    #[test]
    fn ensure_source_appends_dot_once() {
        let mut args = strings(&["--include=*.py"]);
        ensure_source(&mut args);
        ensure_source(&mut args);
        assert_eq!(args, strings(&["--include=*.py", "."]));
    }

    #[test]
    fn path_keeps_inner_spacing_and_drops_link_target() {
        assert_eq!(
            path_field("-rw-r--r--          1,234 2023/04/01 12:00:00 my  notes.txt"),
            Some("my  notes.txt")
        );
        assert_eq!(
            path_field("lrwxrwxrwx             11 2023/04/01 12:00:00 latest -> notes.txt"),
            Some("latest")
        );
        assert_eq!(path_field("sending incremental file list"), None);
    }
}
