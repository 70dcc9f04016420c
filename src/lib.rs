pub mod collect;
pub mod copy;
pub mod errors;
pub mod gather;
pub mod git;
pub mod ignore;
pub mod interactive;
pub mod logger;
pub mod presets;
pub mod reporting;
pub mod rsync;
pub mod selection;
pub mod tree;
pub mod utils;

pub use collect::{collect, CollectConfig, Collection};
pub use errors::RstringError;
pub use presets::{Preset, PresetStore};
pub use rsync::{FileLister, RsyncLister};
