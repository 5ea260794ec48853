//! Where gatechat keeps `config.toml`, and first-run creation of it.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use gatechat_common::ConfigError;
use tracing::{debug, info};

use super::template::default_config_toml;

const APP_DIR: &str = "gatechat";
const CONFIG_FILE: &str = "config.toml";

/// `<os config dir>/gatechat/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))
}

/// Write the commented template to `path`.
///
/// The file will hold the access secret and API keys, so on unix it is
/// created readable by the owner only. An existing file is left untouched.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = match options.open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("config already exists at {}, keeping it", path.display());
            return Ok(());
        }
        Err(e) => return Err(write_error(path, e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(|e| write_error(path, e))?;

    info!("created default config at {}", path.display());
    Ok(())
}

fn write_error(path: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::ParseError(format!(
        "failed to write default config to {}: {e}",
        path.display()
    ))
}
