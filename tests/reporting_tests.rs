use chrono::{Local, TimeZone};
use pretty_assertions::assert_eq;
use rstring::reporting::{copy_status, count_lines, with_summary, Selection};
use std::path::Path;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_summary_layout() {
    let collected_at = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let blob = "--- a.py ---\nprint('a')\n\n";
    let summary = with_summary(blob, 1, Some(7), "proj\n└── a.py", collected_at);

    let expected = "\
### COLLECTION SUMMARY ###

The following files have been collected using the Rstring command.
Binary files are truncated to the first 32 bytes.

Files: 1
Lines: 3
Tokens: 7
Collected at: 2024-01-02 03:04:05

proj
└── a.py

### FILE CONTENTS ###
--- a.py ---
print('a')

";
    assert_eq!(summary, expected);
}

#[test]
fn test_count_lines() {
    assert_eq!(count_lines(""), 0);
    assert_eq!(count_lines("a\nb"), 2);
    assert_eq!(count_lines("a\n\n"), 2);
}

#[test]
fn test_selection_with_exact_preset() {
    let preset_args = strings(&["--include=*.py"]);
    let selection = Selection {
        preset: Some(("python", preset_args.as_slice())),
        gitignore_args: &[],
        args: &preset_args,
    };
    assert_eq!(selection.describe(), " using preset 'python'");
}

#[test]
fn test_selection_with_preset_and_gitignore() {
    let preset_args = strings(&["--include=*.py"]);
    let gitignore = strings(&["--exclude=.git", "--exclude=*.log"]);
    let args = strings(&["--exclude=.git", "--exclude=*.log", "--include=*.py"]);
    let selection = Selection {
        preset: Some(("python", preset_args.as_slice())),
        gitignore_args: &gitignore,
        args: &args,
    };
    assert_eq!(selection.describe(), " using preset 'python' modified by .gitignore");
}

#[test]
fn test_selection_with_modified_preset() {
    let preset_args = strings(&["--include=*.py"]);
    let gitignore = strings(&["--exclude=.git"]);
    let args = strings(&["--exclude=.git", "--include=*.py", "--exclude=*"]);
    let selection = Selection {
        preset: Some(("python", preset_args.as_slice())),
        gitignore_args: &gitignore,
        args: &args,
    };
    assert_eq!(
        selection.describe(),
        " using preset 'python' with modified rsync options: --include=*.py --exclude=*"
    );
}

#[test]
fn test_selection_with_custom_args() {
    let gitignore = strings(&["--exclude=.git"]);
    let args = strings(&["--exclude=.git", "--include=*.rs", "src"]);
    let with_gitignore = Selection {
        preset: None,
        gitignore_args: &gitignore,
        args: &args,
    };
    assert_eq!(
        with_gitignore.describe(),
        " using custom rsync options modified by .gitignore: --include=*.rs src"
    );

    let plain_args = strings(&["--include=*.rs"]);
    let plain = Selection {
        preset: None,
        gitignore_args: &[],
        args: &plain_args,
    };
    assert_eq!(plain.describe(), " using custom rsync options: --include=*.rs");
}

#[test]
fn test_copy_status_mentions_target_outside_cwd() {
    let args = strings(&["--include=*.rs"]);
    let selection = Selection {
        preset: None,
        gitignore_args: &[],
        args: &args,
    };

    let here = copy_status(
        10,
        Some(50),
        2,
        Path::new("/work/proj"),
        Some(Path::new("/work/proj")),
        &selection,
    );
    assert_eq!(
        here,
        "Copied 10 lines (50 tokens) from 2 files to clipboard using custom rsync options: --include=*.rs"
    );

    let elsewhere = copy_status(3, None, 1, Path::new("/work/proj"), Some(Path::new("/home")), &selection);
    assert_eq!(
        elsewhere,
        "Copied 3 lines from 1 files to clipboard from /work/proj using custom rsync options: --include=*.rs"
    );
}
