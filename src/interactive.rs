use crate::errors::RstringError;
use crate::rsync::{ensure_source, FileLister};
use crate::tree::FileTree;
use dialoguer::Input;
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub const ACTION_PROMPT: &str = "Enter an action (a)dd/(r)emove/(e)dit/(d)one";
pub const PATTERN_PROMPT: &str = "Enter a pattern";
pub const EDIT_PROMPT: &str = "Enter the new rsync arguments";

pub trait Prompter: Send {
    fn ask(&mut self, prompt: &str) -> Result<String, RstringError>;
}

/// Reads answers from the terminal.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String, RstringError> {
        let answer = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }
}

/// Checks an rsync pattern against glob syntax. rsync's `***` suffix is accepted.
pub fn validate_pattern(pattern: &str) -> Result<(), RstringError> {
    glob::Pattern::new(&pattern.replace("***", "**"))
        .map(|_| ())
        .map_err(|e| RstringError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: e.to_string(),
        })
}

enum Action {
    Add,
    Remove,
    Edit,
    Done,
}

fn parse_action(answer: &str) -> Option<Action> {
    match answer.trim().to_lowercase().as_str() {
        "a" | "add" => Some(Action::Add),
        "r" | "remove" => Some(Action::Remove),
        "e" | "edit" => Some(Action::Edit),
        "d" | "done" => Some(Action::Done),
        _ => None,
    }
}

/// Refines rsync arguments until the user is done.
///
/// The entry arguments must be valid. Every change is validated with the
/// lister before it is kept, so the returned arguments always list cleanly.
pub async fn interactive_mode<W: Write>(
    initial_args: Vec<String>,
    base: &Path,
    include_dirs: bool,
    lister: &dyn FileLister,
    prompter: &mut dyn Prompter,
    out: &mut W,
) -> Result<Vec<String>, RstringError> {
    if !lister.validate(&initial_args).await {
        return Err(RstringError::InvalidArguments(initial_args.join(" ")));
    }
    let mut args = initial_args;

    loop {
        let files = lister.list(&args).await?;
        writeln!(out, "\nCurrent file list:")?;
        let tree = FileTree::listing_from_disk(&files, base, include_dirs).render_branches();
        if !tree.is_empty() {
            writeln!(out, "{}", tree)?;
        }
        writeln!(out, "\nCurrent rsync arguments: {}", args.join(" "))?;

        let answer = prompter.ask(ACTION_PROMPT)?;
        match parse_action(&answer) {
            Some(Action::Done) => return Ok(args),
            Some(Action::Add) => add_rule(&mut args, "--include", lister, prompter, out).await?,
            Some(Action::Remove) => add_rule(&mut args, "--exclude", lister, prompter, out).await?,
            Some(Action::Edit) => {
                let line = prompter.ask(EDIT_PROMPT)?;
                let Some(mut new_args) = shlex::split(&line) else {
                    writeln!(out, "Error: Unbalanced quotes in arguments. Please try again.")?;
                    continue;
                };
                ensure_source(&mut new_args);
                if lister.validate(&new_args).await {
                    debug!("Replacing rsync arguments with {:?}", new_args);
                    args = new_args;
                } else {
                    writeln!(out, "Error: Invalid rsync arguments. Please try again.")?;
                }
            }
            None => writeln!(out, "Invalid action. Please enter 'a', 'r', 'e', or 'd'.")?,
        }
    }
}

async fn add_rule<W: Write>(
    args: &mut Vec<String>,
    flag: &str,
    lister: &dyn FileLister,
    prompter: &mut dyn Prompter,
    out: &mut W,
) -> Result<(), RstringError> {
    let answer = prompter.ask(PATTERN_PROMPT)?;
    let pattern = answer.trim();
    if pattern.is_empty() {
        return Ok(());
    }
    if let Err(e) = validate_pattern(pattern) {
        writeln!(out, "Error: {}", e)?;
        return Ok(());
    }

    let mut candidate = args.clone();
    candidate.push(flag.to_owned());
    candidate.push(pattern.to_owned());
    if lister.validate(&candidate).await {
        *args = candidate;
    } else {
        writeln!(out, "Error: Invalid rsync arguments. Please try again.")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_are_case_insensitive() {
        assert!(matches!(parse_action("A"), Some(Action::Add)));
        assert!(matches!(parse_action(" Done "), Some(Action::Done)));
        assert!(parse_action("x").is_none());
    }

    #[test]
    fn rsync_triple_star_is_accepted() {
        assert!(validate_pattern("src/***").is_ok());
        assert!(validate_pattern("[unclosed").is_err());
    }
}
