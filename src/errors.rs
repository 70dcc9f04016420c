use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RstringError {
    #[error("rsync is not installed on this system. Please install rsync and try again.")]
    RsyncNotFound,

    #[error("rsync exited with {status}: {stderr}")]
    RsyncFailed { status: String, stderr: String },

    #[error("Invalid rsync arguments: {0}")]
    InvalidArguments(String),

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Directory '{}' does not exist.", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Preset '{0}' not found.")]
    PresetNotFound(String),

    #[error("Preset configuration error: {0}")]
    PresetConfigError(String),

    #[error("Clipboard initialization failed: {0}")]
    ClipboardInitError(String),

    #[error("Clipboard write failed: {0}")]
    ClipboardWriteError(String),

    #[error("Prompt failed: {0}")]
    PromptError(String),

    #[error("Git Error: {0}")]
    GitError(String),

    #[error("Tokenizer Error: {0}")]
    TokenizerError(String),

    #[error("IO Error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for RstringError {
    fn from(err: std::io::Error) -> Self {
        RstringError::IoError(err.to_string())
    }
}

impl From<serde_yaml::Error> for RstringError {
    fn from(err: serde_yaml::Error) -> Self {
        RstringError::PresetConfigError(err.to_string())
    }
}

impl From<dialoguer::Error> for RstringError {
    fn from(err: dialoguer::Error) -> Self {
        RstringError::PromptError(err.to_string())
    }
}
