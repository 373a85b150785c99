use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Manages the data directory the file-backed repositories live in.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a connection rooted at `base_directory`, creating it if
    /// needed.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a connection in the default data directory:
    /// `$CALENDAR_KIDS_DATA_DIR` when set, else
    /// `~/Documents/Calendar Kids`.
    pub fn new_default() -> Result<Self> {
        if let Ok(dir) = std::env::var("CALENDAR_KIDS_DATA_DIR") {
            let path = PathBuf::from(dir);
            info!("Using data directory from environment: {}", path.display());
            return Self::new(path);
        }

        let home_dir = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;

        let data_dir = PathBuf::from(home_dir)
            .join("Documents")
            .join("Calendar Kids");
        info!("Using default data directory: {}", data_dir.display());
        Self::new(data_dir)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn family_file(&self) -> PathBuf {
        self.base_directory.join("family.yaml")
    }

    pub fn templates_file(&self) -> PathBuf {
        self.base_directory.join("tasks.yaml")
    }

    pub fn completions_file(&self) -> PathBuf {
        self.base_directory.join("completions.csv")
    }

    pub fn rewards_file(&self) -> PathBuf {
        self.base_directory.join("rewards.csv")
    }
}

/// Write `contents` to `path` atomically: temp file first, then rename.
pub(super) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
