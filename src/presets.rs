use crate::errors::RstringError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Presets shipped with the binary, written out on first use.
pub const DEFAULT_PRESETS: &str = include_str!("default_presets.yaml");

pub const PRESETS_FILE_NAME: &str = ".rstring.yaml";

/// A saved list of rsync arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub args: Vec<String>,
}

pub type Presets = BTreeMap<String, Preset>;

/// Location of the presets file in the user's home directory.
pub fn default_presets_path() -> Result<PathBuf, RstringError> {
    dirs::home_dir()
        .map(|home| home.join(PRESETS_FILE_NAME))
        .ok_or_else(|| {
            RstringError::PresetConfigError("could not determine the home directory".to_owned())
        })
}

pub fn parse_presets(content: &str) -> Result<Presets, RstringError> {
    if content.trim().is_empty() {
        return Ok(Presets::new());
    }
    let presets: Option<Presets> = serde_yaml::from_str(content)?;
    Ok(presets.unwrap_or_default())
}

pub fn bundled_presets() -> Presets {
    parse_presets(DEFAULT_PRESETS).unwrap_or_else(|e| {
        warn!("Bundled presets could not be parsed: {}", e);
        Presets::new()
    })
}

/// The presets file and its contents.
#[derive(Debug, Clone)]
pub struct PresetStore {
    path: PathBuf,
    presets: Presets,
}

impl PresetStore {
    pub fn new(path: impl Into<PathBuf>, presets: Presets) -> Self {
        PresetStore {
            path: path.into(),
            presets,
        }
    }

    /// Loads presets from `path`.
    ///
    /// A missing file is seeded with the bundled presets. An unreadable or
    /// malformed file yields an empty store so the tool keeps working.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.exists() {
            debug!("Loading presets from {}", path.display());
            let presets = match fs::read_to_string(&path) {
                Ok(content) => parse_presets(&content).unwrap_or_else(|e| {
                    warn!("Error parsing {}: {}. Using empty presets.", path.display(), e);
                    Presets::new()
                }),
                Err(e) => {
                    warn!("Error reading {}: {}. Using empty presets.", path.display(), e);
                    Presets::new()
                }
            };
            return PresetStore::new(path, presets);
        }

        debug!("No presets file at {}, writing defaults", path.display());
        let store = PresetStore::new(path, bundled_presets());
        if let Err(e) = store.write_raw(DEFAULT_PRESETS) {
            warn!("Error writing default presets: {}", e);
        }
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn presets(&self) -> &Presets {
        &self.presets
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    pub fn default_preset(&self) -> Option<&str> {
        self.presets
            .iter()
            .find(|(_, preset)| preset.is_default)
            .map(|(name, _)| name.as_str())
    }

    pub fn set_default(&mut self, name: &str) -> Result<(), RstringError> {
        if !self.presets.contains_key(name) {
            return Err(RstringError::PresetNotFound(name.to_owned()));
        }
        for (preset_name, preset) in self.presets.iter_mut() {
            preset.is_default = preset_name == name;
        }
        self.save()
    }

    pub fn delete(&mut self, name: &str) -> Result<(), RstringError> {
        if self.presets.remove(name).is_none() {
            return Err(RstringError::PresetNotFound(name.to_owned()));
        }
        self.save()
    }

    /// Saves `args` under `name`. Overwriting keeps the existing default flag.
    pub fn insert(&mut self, name: &str, args: Vec<String>) -> Result<(), RstringError> {
        let is_default = self.presets.get(name).map_or(false, |p| p.is_default);
        self.presets
            .insert(name.to_owned(), Preset { is_default, args });
        self.save()
    }

    pub fn save(&self) -> Result<(), RstringError> {
        let yaml = serde_yaml::to_string(&self.presets)?;
        self.write_raw(&yaml)
    }

    fn write_raw(&self, content: &str) -> Result<(), RstringError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    RstringError::PresetConfigError(format!("{}: {}", parent.display(), e))
                })?;
            }
        }
        fs::write(&self.path, content)
            .map_err(|e| RstringError::PresetConfigError(format!("{}: {}", self.path.display(), e)))
    }

    pub fn format_list(&self) -> String {
        let mut listing = String::from("Saved presets:\n");
        for (name, preset) in &self.presets {
            let args = if preset.args.is_empty() {
                "(no args)".to_owned()
            } else {
                preset.args.join(" ")
            };
            let marker = if preset.is_default { '*' } else { ' ' };
            listing.push_str(&format!("  {} {}: {}\n", marker, name, args));
        }
        listing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_presets_have_a_single_default() {
        let presets = bundled_presets();
        assert!(!presets.is_empty());
        assert_eq!(presets.values().filter(|p| p.is_default).count(), 1);
    }

    #[test]
    fn preset_without_default_flag_parses() {
        let presets = parse_presets("test_preset:\n  args:\n  - --include=*.py\n").unwrap();
        assert_eq!(
            presets["test_preset"],
            Preset {
                is_default: false,
                args: vec!["--include=*.py".to_owned()],
            }
        );
    }

    #[test]
    fn null_document_is_empty() {
        assert!(parse_presets("~\n").unwrap().is_empty());
        assert!(parse_presets("   \n").unwrap().is_empty());
    }
}
