use dirs::home_dir;
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::errors::Result;

const DEFAULT_DIR_NAME: &str = ".budget_form";
const CONFIG_FILE: &str = "config.json";
const EXPORT_DIR: &str = "exports";
const TMP_SUFFIX: &str = "tmp";

/// Environment variable overriding the application directory.
pub const HOME_ENV: &str = "BUDGET_FORM_HOME";

/// Resolves well-known locations under the application directory.
pub struct PathResolver;

impl PathResolver {
    /// Returns the application data directory, defaulting to `~/.budget_form`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }

    /// Directory exports land in when the config does not name one.
    pub fn export_dir_in(base: &Path) -> PathBuf {
        base.join(EXPORT_DIR)
    }
}

/// Creates `path` and its parents when missing.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Writes `data` to a sibling temp file, then renames it over `path`.
pub fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
