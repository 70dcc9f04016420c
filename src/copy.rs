use crate::errors::RstringError;
use arboard::Clipboard;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

#[async_trait]
pub trait ClipboardCopier: Send + Sync {
    async fn copy_text(&self, text: &str) -> Result<(), RstringError>;
}

#[cfg(target_os = "macos")]
const CLIPBOARD_COMMANDS: &[&[&str]] = &[&["pbcopy"]];

#[cfg(windows)]
const CLIPBOARD_COMMANDS: &[&[&str]] = &[&["clip"]];

#[cfg(not(any(target_os = "macos", windows)))]
const CLIPBOARD_COMMANDS: &[&[&str]] = &[
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
];

/// Owning X11/Wayland selections ends with the process, so the forking
/// utilities go first there.
const UTILITIES_FIRST: bool = cfg!(not(any(target_os = "macos", windows)));

/// Copies through `arboard`, falling back to the platform's clipboard utility.
#[derive(Debug, Clone, Copy)]
pub struct SystemClipboard {
    commands: &'static [&'static [&'static str]],
}

impl Default for SystemClipboard {
    fn default() -> Self {
        SystemClipboard::new()
    }
}

impl SystemClipboard {
    pub fn new() -> Self {
        SystemClipboard::with_commands(CLIPBOARD_COMMANDS)
    }

    /// Uses `commands` (program followed by its args) as the clipboard utilities.
    pub fn with_commands(commands: &'static [&'static [&'static str]]) -> Self {
        SystemClipboard { commands }
    }
}

#[async_trait]
impl ClipboardCopier for SystemClipboard {
    async fn copy_text(&self, text: &str) -> Result<(), RstringError> {
        if UTILITIES_FIRST {
            let utility_error = match copy_with_utilities(self.commands, text).await {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };
            return match copy_with_arboard(text) {
                Ok(()) => {
                    info!("Text copied to clipboard.");
                    Ok(())
                }
                Err(e) => {
                    debug!("arboard fallback failed: {}", e);
                    Err(utility_error)
                }
            };
        }

        match copy_with_arboard(text) {
            Ok(()) => {
                info!("Text copied to clipboard.");
                return Ok(());
            }
            Err(e) => warn!("{}; trying clipboard utilities", e),
        }
        copy_with_utilities(self.commands, text).await
    }
}

fn copy_with_arboard(text: &str) -> Result<(), RstringError> {
    debug!("Initializing clipboard");
    let mut clipboard =
        Clipboard::new().map_err(|e| RstringError::ClipboardInitError(e.to_string()))?;
    clipboard
        .set_text(text.to_owned())
        .map_err(|e| RstringError::ClipboardWriteError(e.to_string()))
}

async fn copy_with_utilities(
    commands: &[&[&str]],
    text: &str,
) -> Result<(), RstringError> {
    let mut last_error = String::from("no clipboard utility available");
    for command in commands {
        match pipe_to(command, text).await {
            Ok(()) => {
                info!("Text copied to clipboard with {}.", command[0]);
                return Ok(());
            }
            Err(e) => {
                debug!("{} failed: {}", command[0], e);
                last_error = format!("{}: {}", command[0], e);
            }
        }
    }
    Err(RstringError::ClipboardWriteError(last_error))
}

async fn pipe_to(command: &[&str], text: &str) -> std::io::Result<()> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"))?;
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).await?;
    }
    let status = child.wait().await?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("exited with {}", status),
        ))
    }
}
