use crate::errors::RstringError;
use crate::gather::gather_code;
use crate::git::filter_ignored_files;
use crate::ignore::{parse_gitignore, GITIGNORE_FILE};
use crate::interactive::{interactive_mode, Prompter};
use crate::reporting::{count_lines, count_tokens, with_summary};
use crate::rsync::{ensure_source, FileLister};
use crate::tree::get_tree_string;
use chrono::Local;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct CollectConfig {
    pub target_dir: PathBuf,
    /// Preset and passthrough args, before gitignore rules are added.
    pub args: Vec<String>,
    pub use_gitignore: bool,
    pub interactive: bool,
    pub preview_length: Option<usize>,
    pub include_dirs: bool,
    pub summary: bool,
    /// Tokenizer model for token counts; `None` skips counting.
    pub model: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Collection {
    pub target_dir: PathBuf,
    /// Final rsync args, including gitignore rules and any implicit source.
    pub args: Vec<String>,
    pub gitignore_args: Vec<String>,
    pub files: Vec<String>,
    /// Listed entries that are not directories.
    pub file_count: usize,
    /// Lines and tokens of the gathered contents, without the summary header.
    pub lines: usize,
    pub tokens: Option<usize>,
    pub output: String,
}

/// Runs the whole selection pipeline and builds the output text.
///
/// Prompts and interactive output only happen when `config.interactive` is set.
pub async fn collect<W: Write>(
    config: &CollectConfig,
    lister: &dyn FileLister,
    prompter: &mut dyn Prompter,
    out: &mut W,
) -> Result<Collection, RstringError> {
    let target_dir = &config.target_dir;

    let mut gitignore_args = Vec::new();
    if config.use_gitignore {
        let gitignore_path = target_dir.join(GITIGNORE_FILE);
        if gitignore_path.exists() {
            gitignore_args = parse_gitignore(&gitignore_path)?;
        } else {
            warn!(
                "No .gitignore file found in {}. Use --no-gitignore to ignore .gitignore patterns",
                target_dir.display()
            );
        }
    }

    let mut args = gitignore_args.clone();
    args.extend(config.args.iter().cloned());
    ensure_source(&mut args);

    let mut files = match lister.list(&args).await {
        Ok(files) => files,
        Err(RstringError::RsyncFailed { stderr, .. }) => {
            return Err(RstringError::InvalidArguments(format!(
                "{} ({})",
                args.join(" "),
                stderr
            )))
        }
        Err(e) => return Err(e),
    };

    if config.interactive {
        args = interactive_mode(args, target_dir, config.include_dirs, lister, prompter, out)
            .await?;
        files = lister.list(&args).await?;
    }

    let filtered = filter_ignored_files(target_dir, &files).await;
    let files = match filtered {
        Ok(filtered) => filtered,
        Err(e) => {
            warn!("Git filtering failed: {}", e);
            files
        }
    };
    debug!("Collecting {} entries", files.len());

    let blob = gather_code(target_dir, &files, config.preview_length, config.include_dirs).await;
    let file_count = files
        .iter()
        .filter(|file| !target_dir.join(file).is_dir())
        .count();

    let lines = count_lines(&blob);
    let tokens = config
        .model
        .as_deref()
        .and_then(|model| match count_tokens(&blob, model) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                warn!("Skipping token count: {}", e);
                None
            }
        });

    let output = if config.summary {
        let tree = get_tree_string(&files, target_dir, config.include_dirs, false);
        with_summary(&blob, file_count, tokens, &tree, Local::now())
    } else {
        blob
    };
    info!("Collected {} files from {}", file_count, target_dir.display());

    Ok(Collection {
        target_dir: target_dir.clone(),
        args,
        gitignore_args,
        files,
        file_count,
        lines,
        tokens,
        output,
    })
}
