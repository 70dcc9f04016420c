use clap::Parser;
use rstring::copy::{ClipboardCopier, SystemClipboard};
use rstring::interactive::TerminalPrompter;
use rstring::logger::initialize_logger;
use rstring::presets::{default_presets_path, PresetStore};
use rstring::reporting::{copy_status, Selection};
use rstring::rsync::{check_rsync, without_implicit_source, RsyncLister};
use rstring::selection::{resolve_target_directory, select_preset_args};
use rstring::tree::get_tree_string;
use rstring::{collect, CollectConfig, RstringError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

/// Stringify code with rsync and manage presets.
///
/// Options must come before the rsync arguments; everything from the first
/// unrecognized argument on is passed to rsync.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    #[arg(short = 'p', long, value_name = "NAME", help = "Use a saved preset")]
    preset: Option<String>,
    #[arg(long, value_name = "NAME", help = "Save the command as a preset")]
    save_preset: Option<String>,
    #[arg(long, help = "List all saved presets")]
    list_presets: bool,
    #[arg(long, value_name = "NAME", help = "Delete a saved preset")]
    delete_preset: Option<String>,
    #[arg(long, value_name = "NAME", help = "Set the default preset")]
    set_default_preset: Option<String>,
    #[arg(short = 'C', long, value_name = "DIR", help = "Change to directory before processing")]
    directory: Option<String>,
    #[arg(short = 'i', long, help = "Enter interactive mode")]
    interactive: bool,
    #[arg(short = 'n', long, help = "Don't copy output to clipboard")]
    no_clipboard: bool,
    #[arg(short = 'l', long, value_name = "N", help = "Show only the first N lines of each file")]
    preview_length: Option<usize>,
    #[arg(short = 's', long, help = "Print a summary including a tree of files")]
    summary: bool,
    #[arg(short = 'd', long, help = "Include empty directories in output and summary")]
    include_dirs: bool,
    #[arg(long, help = "Don't use .gitignore patterns")]
    no_gitignore: bool,
    #[arg(short = 'm', long, default_value = "gpt-4o", help = "Tokenizer model for token counts")]
    model: String,
    #[arg(long, env = "RSTRING_PRESETS_FILE", value_name = "PATH", help = "Presets file location")]
    presets_file: Option<PathBuf>,
    #[arg(short = 'v', long, help = "Enable debug logging")]
    verbose: bool,
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "RSYNC_ARGS",
        help = "Arguments passed to rsync (filters and source paths)"
    )]
    rsync_args: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli_args = CliArgs::parse();
    initialize_logger(cli_args.verbose);

    match run(cli_args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> Result<(), RstringError> {
    let presets_path = match args.presets_file {
        Some(path) => path,
        None => default_presets_path()?,
    };
    let mut store = PresetStore::load(presets_path);

    if args.list_presets {
        print!("{}", store.format_list());
        return Ok(());
    }
    if let Some(name) = &args.delete_preset {
        store.delete(name)?;
        println!("Preset '{}' deleted.", name);
        return Ok(());
    }
    if let Some(name) = &args.set_default_preset {
        store.set_default(name)?;
        println!("Default preset set to '{}'", name);
        return Ok(());
    }

    let cwd = std::env::current_dir()?;
    let (target_dir, passthrough) =
        resolve_target_directory(args.directory.as_deref(), args.rsync_args, &cwd)?;
    let (preset_name, selected_args) =
        select_preset_args(&store, args.preset.as_deref(), passthrough)?;

    if let Some(name) = &args.save_preset {
        store.insert(name, selected_args)?;
        println!("Preset '{}' saved.", name);
        return Ok(());
    }

    check_rsync().await?;

    let config = CollectConfig {
        target_dir: target_dir.clone(),
        args: selected_args,
        use_gitignore: !args.no_gitignore,
        interactive: args.interactive,
        preview_length: args.preview_length,
        include_dirs: args.include_dirs,
        summary: args.summary,
        model: Some(args.model),
    };
    let lister = RsyncLister::new(&target_dir);
    let mut prompter = TerminalPrompter;
    let mut stdout = std::io::stdout();
    let collection = collect(&config, &lister, &mut prompter, &mut stdout).await?;

    if args.no_clipboard {
        println!();
        println!("{}", collection.output);
        return Ok(());
    }

    let tree = get_tree_string(&collection.files, &target_dir, args.include_dirs, true);
    if !tree.is_empty() {
        println!("{}", tree);
    }
    SystemClipboard::new()
        .copy_text(&collection.output)
        .await?;

    let preset = preset_name
        .as_deref()
        .and_then(|name| store.get(name).map(|preset| (name, preset.args.as_slice())));
    let selection = Selection {
        preset,
        gitignore_args: &collection.gitignore_args,
        args: without_implicit_source(&collection.args),
    };
    let cwd = cwd.canonicalize().ok();
    debug!("Final rsync arguments: {:?}", collection.args);
    println!(
        "{}",
        copy_status(
            collection.lines,
            collection.tokens,
            collection.file_count,
            &target_dir,
            cwd.as_deref(),
            &selection,
        )
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsync_args_are_passed_through() {
        let args = CliArgs::parse_from([
            "rstring",
            "-n",
            "--preset",
            "python",
            "--include=*.py",
            "--exclude",
            "*",
            "-v",
        ]);
        assert!(args.no_clipboard);
        assert_eq!(args.preset.as_deref(), Some("python"));
        assert!(!args.verbose);
        assert_eq!(args.rsync_args, vec!["--include=*.py", "--exclude", "*", "-v"]);
    }
}
