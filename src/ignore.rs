use crate::errors::RstringError;
use std::path::Path;
use tracing::{debug, trace};

pub const GITIGNORE_FILE: &str = ".gitignore";

/// Rule that always leads the gitignore-derived filter list.
pub const GIT_DIR_EXCLUDE: &str = "--exclude=.git";

/// Translates `.gitignore` lines into rsync exclude arguments.
///
/// Negated lines never become includes: they would take precedence over the
/// caller's own filters. A `!pattern` instead drops the earlier excludes that
/// match it, and `git check-ignore` settles the exact result afterwards.
pub fn gitignore_to_filter_args(content: &str) -> Vec<String> {
    let mut excludes: Vec<String> = Vec::new();

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (negated, pattern) = if let Some(escaped) = line.strip_prefix('\\') {
            (false, escaped)
        } else if let Some(negated) = line.strip_prefix('!') {
            (true, negated)
        } else {
            (false, line)
        };
        let pattern = pattern.strip_prefix('/').unwrap_or(pattern);
        if pattern.is_empty() {
            continue;
        }

        let pattern = if pattern.ends_with('/') {
            format!("{}*", pattern)
        } else {
            pattern.to_owned()
        };
        trace!("gitignore line '{}' -> pattern '{}'", raw_line, pattern);
        if negated {
            excludes.retain(|exclude| !exclude_matches(exclude, &pattern));
        } else {
            excludes.push(pattern);
        }
    }

    let mut args = vec![GIT_DIR_EXCLUDE.to_owned()];
    args.extend(excludes.into_iter().map(|p| format!("--exclude={}", p)));
    args
}

/// Whether the exclude `pattern` covers the negated path.
fn exclude_matches(pattern: &str, negated: &str) -> bool {
    if pattern == negated {
        return true;
    }
    match glob::Pattern::new(pattern) {
        Ok(glob) => glob.matches(negated),
        Err(e) => {
            trace!("Keeping unparsable exclude '{}': {}", pattern, e);
            false
        }
    }
}

/// Reads a `.gitignore` file; a missing file yields no rules.
pub fn parse_gitignore(path: &Path) -> Result<Vec<String>, RstringError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    let args = gitignore_to_filter_args(&content);
    debug!("Using gitignore filter rules: {:?}", args);
    Ok(args)
}
