use crate::errors::RstringError;
use chrono::{DateTime, Local};
use std::path::Path;
use tiktoken_rs::get_bpe_from_model;
use tracing::debug;

pub const SUMMARY_TITLE: &str = "### COLLECTION SUMMARY ###";
pub const CONTENTS_TITLE: &str = "### FILE CONTENTS ###";

pub fn count_lines(text: &str) -> usize {
    text.lines().count()
}

pub fn count_tokens(text: &str, model: &str) -> Result<usize, RstringError> {
    debug!("Counting tokens with the {} tokenizer", model);
    let tokenizer =
        get_bpe_from_model(model).map_err(|e| RstringError::TokenizerError(e.to_string()))?;
    Ok(tokenizer.encode_ordinary(text).len())
}

/// Prepends the collection summary and tree to the gathered `blob`.
pub fn with_summary(
    blob: &str,
    files: usize,
    tokens: Option<usize>,
    tree: &str,
    collected_at: DateTime<Local>,
) -> String {
    let mut lines = vec![
        SUMMARY_TITLE.to_owned(),
        String::new(),
        "The following files have been collected using the Rstring command.".to_owned(),
        "Binary files are truncated to the first 32 bytes.".to_owned(),
        String::new(),
        format!("Files: {}", files),
        format!("Lines: {}", count_lines(blob)),
    ];
    if let Some(tokens) = tokens {
        lines.push(format!("Tokens: {}", tokens));
    }
    lines.push(format!(
        "Collected at: {}",
        collected_at.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(String::new());
    lines.push(tree.to_owned());
    lines.push(String::new());
    lines.push(CONTENTS_TITLE.to_owned());
    lines.push(blob.to_owned());
    lines.join("\n")
}

/// What produced the final rsync arguments, for the status line.
pub struct Selection<'a> {
    pub preset: Option<(&'a str, &'a [String])>,
    pub gitignore_args: &'a [String],
    /// Final arguments, without an implicitly added source path.
    pub args: &'a [String],
}

impl Selection<'_> {
    fn args_without_gitignore(&self) -> &[String] {
        if !self.gitignore_args.is_empty() && self.args.starts_with(self.gitignore_args) {
            &self.args[self.gitignore_args.len()..]
        } else {
            self.args
        }
    }

    pub fn describe(&self) -> String {
        let own_args = self.args_without_gitignore();
        let from_gitignore = own_args.len() != self.args.len();
        match self.preset {
            Some((name, preset_args)) if self.args == preset_args => {
                format!(" using preset '{}'", name)
            }
            Some((name, preset_args)) if from_gitignore && own_args == preset_args => {
                format!(" using preset '{}' modified by .gitignore", name)
            }
            Some((name, _)) => format!(
                " using preset '{}' with modified rsync options: {}",
                name,
                own_args.join(" ")
            ),
            None if from_gitignore => format!(
                " using custom rsync options modified by .gitignore: {}",
                own_args.join(" ")
            ),
            None => format!(" using custom rsync options: {}", own_args.join(" ")),
        }
    }
}

/// The line printed after the blob lands on the clipboard.
pub fn copy_status(
    lines: usize,
    tokens: Option<usize>,
    files: usize,
    target_dir: &Path,
    cwd: Option<&Path>,
    selection: &Selection<'_>,
) -> String {
    let mut status = format!("Copied {} lines", lines);
    if let Some(tokens) = tokens {
        status.push_str(&format!(" ({} tokens)", tokens));
    }
    status.push_str(&format!(" from {} files to clipboard", files));
    if cwd.map_or(true, |cwd| cwd != target_dir) {
        status.push_str(&format!(" from {}", target_dir.display()));
    }
    status.push_str(&selection.describe());
    status
}
