#![cfg(target_os = "linux")]

use rstring::copy::{ClipboardCopier, SystemClipboard};
use rstring::errors::RstringError;

const FAILING_UTILITY: &[&[&str]] = &[&["false"]];

#[tokio::test]
async fn test_failed_utilities_report_write_error() {
    let clipboard = SystemClipboard::with_commands(FAILING_UTILITY);

    match clipboard.copy_text("hello").await {
        // A desktop session can still take the text through arboard.
        Ok(()) => {}
        Err(RstringError::ClipboardWriteError(message)) => {
            assert!(message.contains("false"), "{}", message)
        }
        Err(other) => panic!("Expected ClipboardWriteError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_utilities_report_write_error() {
    let clipboard = SystemClipboard::with_commands(&[]);

    match clipboard.copy_text("hello").await {
        Ok(()) => {}
        Err(RstringError::ClipboardWriteError(message)) => {
            assert!(message.contains("no clipboard utility"), "{}", message)
        }
        Err(other) => panic!("Expected ClipboardWriteError, got {:?}", other),
    }
}
