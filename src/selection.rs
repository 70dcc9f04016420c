use crate::errors::RstringError;
use crate::presets::PresetStore;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Works out the directory to collect from and the remaining rsync args.
///
/// `-C DIR`, `--directory DIR` and `--directory=DIR` inside the passthrough
/// args override `directory`, the last one winning. Without any of them a
/// leading existing directory argument is taken as the target.
pub fn resolve_target_directory(
    directory: Option<&str>,
    passthrough: Vec<String>,
    cwd: &Path,
) -> Result<(PathBuf, Vec<String>), RstringError> {
    let mut target = directory.map(str::to_owned);
    let mut remaining = Vec::with_capacity(passthrough.len());
    let mut args = passthrough.into_iter();
    while let Some(arg) = args.next() {
        if arg == "-C" || arg == "--directory" {
            let value = args.next().ok_or_else(|| {
                RstringError::InvalidArguments(
                    "-C/--directory requires a directory argument".to_owned(),
                )
            })?;
            target = Some(value);
        } else if let Some(value) = arg.strip_prefix("--directory=") {
            target = Some(value.to_owned());
        } else {
            remaining.push(arg);
        }
    }

    if target.is_none() {
        let leading_dir = remaining
            .first()
            .map_or(false, |first| !first.starts_with('-') && cwd.join(first).is_dir());
        if leading_dir {
            target = Some(remaining.remove(0));
        }
    }

    let dir = cwd.join(target.as_deref().unwrap_or("."));
    if !dir.is_dir() {
        return Err(RstringError::DirectoryNotFound(dir));
    }
    let dir = dir.canonicalize()?;
    debug!("Target directory: {}", dir.display());
    Ok((dir, remaining))
}

/// Picks the preset to apply and builds the rsync args from it.
///
/// An explicit preset always applies, followed by the passthrough args. The
/// default preset is used only when there are no passthrough args.
pub fn select_preset_args(
    store: &PresetStore,
    preset: Option<&str>,
    passthrough: Vec<String>,
) -> Result<(Option<String>, Vec<String>), RstringError> {
    let name = match preset {
        Some(name) => Some(name.to_owned()),
        None if passthrough.is_empty() => store.default_preset().map(str::to_owned),
        None => None,
    };

    let Some(name) = name else {
        return Ok((None, passthrough));
    };
    let preset = store
        .get(&name)
        .ok_or_else(|| RstringError::PresetNotFound(name.clone()))?;
    let mut args = preset.args.clone();
    args.extend(passthrough);
    debug!("Using preset '{}': {:?}", name, args);
    Ok((Some(name), args))
}
