use pretty_assertions::assert_eq;
use rstring::ignore::{gitignore_to_filter_args, parse_gitignore};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_gitignore_lines_become_excludes() {
    let content = "\
# build output
/target
node_modules/
*.log

   .env
";
    assert_eq!(
        gitignore_to_filter_args(content),
        vec![
            "--exclude=.git",
            "--exclude=target",
            "--exclude=node_modules/*",
            "--exclude=*.log",
            "--exclude=.env",
        ]
    );
}

#[test]
fn test_negation_lifts_matching_excludes_without_includes() {
    let content = "*.log\n*.tmp\n!keep.log\n/dist/\n!/dist/index.html\n";
    assert_eq!(
        gitignore_to_filter_args(content),
        vec!["--exclude=.git", "--exclude=*.tmp"]
    );
}

#[test]
fn test_negation_only_affects_earlier_lines() {
    let content = "!keep.log\n*.log\nbuild/\n!build/\n";
    assert_eq!(
        gitignore_to_filter_args(content),
        vec!["--exclude=.git", "--exclude=*.log"]
    );
}

#[test]
fn test_escaped_bang_is_literal() {
    assert_eq!(
        gitignore_to_filter_args("\\!important.txt\n"),
        vec!["--exclude=.git", "--exclude=!important.txt"]
    );
}

#[test]
fn test_empty_gitignore_still_excludes_git_dir() {
    assert_eq!(gitignore_to_filter_args(""), vec!["--exclude=.git"]);
}

#[test]
fn test_parse_gitignore_reads_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".gitignore");
    fs::write(&path, "build/\r\n*.tmp\r\n").unwrap();

    assert_eq!(
        parse_gitignore(&path).unwrap(),
        vec!["--exclude=.git", "--exclude=build/*", "--exclude=*.tmp"]
    );
}

#[test]
fn test_parse_gitignore_missing_file() {
    let dir = tempdir().unwrap();
    assert!(parse_gitignore(&dir.path().join(".gitignore"))
        .unwrap()
        .is_empty());
}
