use std::path::{Path, PathBuf};

use crate::{ClientError, ClientResult};

pub const HOME_ENV_VAR: &str = "RECEIPTLY_HOME";
pub const LOG_ENV_VAR: &str = "RECEIPTLY_LOG";
const DEFAULT_HOME_DIR: &str = ".receiptly";
const DEFAULT_SOURCE_FILE: &str = "receipts.json";

pub fn resolve_receipts_home(home_override: Option<&Path>) -> ClientResult<PathBuf> {
    let candidate = match home_override {
        Some(path) => path.to_path_buf(),
        None => {
            if let Some(override_path) = std::env::var_os(HOME_ENV_VAR) {
                PathBuf::from(override_path)
            } else if let Some(home_path) = home::home_dir() {
                home_path.join(DEFAULT_HOME_DIR)
            } else {
                return Err(ClientError::home_unresolved(
                    Path::new("."),
                    "Could not resolve a home directory for receipts.",
                ));
            }
        }
    };

    absolutize(&candidate)
}

pub fn default_source_path(home: &Path) -> PathBuf {
    home.join(DEFAULT_SOURCE_FILE)
}

fn absolutize(path: &Path) -> ClientResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|error| ClientError::home_unresolved(path, &error.to_string()))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{default_source_path, resolve_receipts_home};

    #[test]
    fn explicit_override_wins_and_is_absolute() {
        let resolved = resolve_receipts_home(Some(Path::new("relative-home")));
        assert!(resolved.is_ok());
        if let Ok(path) = resolved {
            assert!(path.is_absolute());
            assert!(path.ends_with("relative-home"));
            assert!(default_source_path(&path).ends_with("relative-home/receipts.json"));
        }
    }
}
