//! Configuration for fixture loading.

use std::path::PathBuf;

/// Environment variable overriding the data folder.
pub const DATA_DIR_ENV: &str = "DEX_DATA_DIR";

/// Default data folder, relative to the working directory.
pub const DEFAULT_DATA_FOLDER: &str = "dataset/json";

/// Configuration for importing JSON fixture files into a dataset.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Folder containing `<Collection>.json` files.
    pub data_folder: PathBuf,
    /// Clear each target collection before importing into it.
    pub drop_existing: bool,
    /// Count what would be imported without writing.
    pub dry_run: bool,
    /// Restrict the import to these file names (e.g. `Pokemon.json`).
    pub files: Option<Vec<String>>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_folder: PathBuf::from(DEFAULT_DATA_FOLDER),
            drop_existing: false,
            dry_run: false,
            files: None,
        }
    }
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the data folder taken from `DEX_DATA_DIR` when set.
    pub fn from_env() -> Self {
        match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Self::default().with_data_folder(dir.trim()),
            _ => Self::default(),
        }
    }

    pub fn with_data_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.data_folder = folder.into();
        self
    }

    pub fn with_drop_existing(mut self, drop_existing: bool) -> Self {
        self.drop_existing = drop_existing;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = Some(files.into_iter().map(Into::into).collect());
        self
    }

    /// Whether a file name passes the optional file filter.
    pub fn includes_file(&self, file_name: &str) -> bool {
        self.files
            .as_ref()
            .map(|files| files.iter().any(|f| f == file_name))
            .unwrap_or(true)
    }
}
