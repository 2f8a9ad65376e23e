use std::{env, path::PathBuf};

use crate::{APP_DIR_NAME, CONFIG_DIR_ENV, ROOT_DIR_ENV};

/// Directory holding the shell's logs.
pub(crate) fn default_data_root_dir() -> Option<PathBuf> {
    resolve_app_dir(
        env::var(ROOT_DIR_ENV).ok(),
        env::var("XDG_DATA_HOME").ok(),
        home::home_dir(),
        &[".local", "share"],
    )
}

/// Directory holding `config.json`.
pub(crate) fn default_config_dir() -> Option<PathBuf> {
    resolve_app_dir(
        env::var(CONFIG_DIR_ENV).ok(),
        env::var("XDG_CONFIG_HOME").ok(),
        home::home_dir(),
        &[".config"],
    )
}

fn non_empty_dir(raw: Option<String>) -> Option<PathBuf> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn resolve_app_dir(
    override_dir: Option<String>,
    xdg_dir: Option<String>,
    home_dir: Option<PathBuf>,
    home_relative: &[&str],
) -> Option<PathBuf> {
    if let Some(dir) = non_empty_dir(override_dir) {
        return Some(dir);
    }
    if let Some(dir) = non_empty_dir(xdg_dir) {
        return Some(dir.join(APP_DIR_NAME));
    }

    home_dir.map(|home| {
        home_relative
            .iter()
            .fold(home, |path, segment| path.join(segment))
            .join(APP_DIR_NAME)
    })
}
