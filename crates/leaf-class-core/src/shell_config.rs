use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_HOME_URL: &str = "https://classroom.google.com/";
pub const DEFAULT_WINDOW_WIDTH: u32 = 1024;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 768;
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Accepts `dark`, `Dark` or a stylesheet name such as `dark.css`.
    pub fn from_name(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_ascii_lowercase();
        match lowered.strip_suffix(".css").unwrap_or(&lowered) {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

/// Settings persisted between runs of the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellConfig {
    pub theme: Theme,
    pub width: u32,
    pub height: u32,
    pub last_url: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            last_url: DEFAULT_HOME_URL.to_string(),
        }
    }
}

/// On-disk shape; every key is optional so a partial file still loads.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StoredShellConfig {
    theme: Option<String>,
    width: Option<i64>,
    height: Option<i64>,
    last_url: Option<String>,
}

impl ShellConfig {
    fn from_stored<F>(stored: StoredShellConfig, log: F) -> Self
    where
        F: Fn(&str),
    {
        let defaults = Self::default();

        let theme = match stored.theme.as_deref() {
            Some(raw) => Theme::from_name(raw).unwrap_or_else(|| {
                log(&format!("unknown theme '{raw}' in shell config; using light"));
                defaults.theme
            }),
            None => defaults.theme,
        };
        let last_url = match stored.last_url.as_deref() {
            Some(raw) => normalize_last_url(raw).unwrap_or_else(|| {
                log(&format!("ignoring unusable last url '{raw}' in shell config"));
                defaults.last_url.clone()
            }),
            None => defaults.last_url.clone(),
        };

        Self {
            theme,
            width: window_dimension(stored.width).unwrap_or(defaults.width),
            height: window_dimension(stored.height).unwrap_or(defaults.height),
            last_url,
        }
    }

    /// Records the window geometry and page at close time. Unusable values
    /// keep what was already stored.
    pub fn remember_window(&mut self, width: u32, height: u32, url: Option<&str>) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
        }
        if let Some(url) = url.and_then(normalize_last_url) {
            self.last_url = url;
        }
    }
}

fn window_dimension(raw: Option<i64>) -> Option<u32> {
    raw.and_then(|value| u32::try_from(value).ok())
        .filter(|value| *value > 0)
}

/// Returns the URL in canonical form when it is an http(s) address.
pub fn normalize_last_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = Url::parse(trimmed).ok()?;
    match parsed.scheme() {
        "http" | "https" => Some(parsed.to_string()),
        _ => None,
    }
}

pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Loads the shell config, falling back to defaults when the file is
/// missing or unreadable.
pub fn load_shell_config<F>(path: &Path, log: F) -> ShellConfig
where
    F: Fn(&str),
{
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return ShellConfig::default();
        }
        Err(error) => {
            log(&format!(
                "failed to read shell config {}: {}. using defaults",
                path.display(),
                error
            ));
            return ShellConfig::default();
        }
    };

    match serde_json::from_str::<StoredShellConfig>(&raw) {
        Ok(stored) => ShellConfig::from_stored(stored, &log),
        Err(error) => {
            log(&format!(
                "failed to parse shell config {}: {}. using defaults",
                path.display(),
                error
            ));
            ShellConfig::default()
        }
    }
}

pub fn save_shell_config(path: &Path, config: &ShellConfig) -> Result<(), String> {
    if let Some(parent_dir) = path.parent() {
        fs::create_dir_all(parent_dir).map_err(|error| {
            format!(
                "Failed to create shell config directory {}: {}",
                parent_dir.display(),
                error
            )
        })?;
    }

    let serialized = serde_json::to_string_pretty(config)
        .map_err(|error| format!("Failed to serialize shell config: {error}"))?;
    fs::write(path, serialized).map_err(|error| {
        format!(
            "Failed to write shell config {}: {}",
            path.display(),
            error
        )
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn no_log(_: &str) {}

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_shell_config(&config_file_path(dir.path()), no_log);
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.theme.as_str(), "light");
        assert_eq!(config.last_url, "https://classroom.google.com/");
        assert_eq!((config.width, config.height), (1024, 768));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("leaf-class").join(CONFIG_FILE_NAME);
        let config = ShellConfig {
            theme: Theme::Dark,
            width: 1280,
            height: 720,
            last_url: "https://classroom.google.com/c/abc".to_string(),
        };

        save_shell_config(&path, &config).expect("config should save");

        assert_eq!(load_shell_config(&path, no_log), config);
        let raw = fs::read_to_string(&path).expect("config file should exist");
        assert!(raw.contains("\"theme\": \"dark\""));
        assert!(raw.contains("\"lastUrl\""));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults_and_logs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = config_file_path(dir.path());
        fs::write(&path, "{ not json").expect("write");
        let messages = RefCell::new(Vec::new());

        let config = load_shell_config(&path, |message| {
            messages.borrow_mut().push(message.to_string())
        });

        assert_eq!(config, ShellConfig::default());
        assert_eq!(messages.borrow().len(), 1);
        assert!(messages.borrow()[0].contains("failed to parse shell config"));
    }

    #[test]
    fn partial_and_invalid_values_are_normalized() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = config_file_path(dir.path());
        fs::write(
            &path,
            r#"{"theme": "Dark.css", "width": 0, "height": 900, "lastUrl": "file:///etc/passwd"}"#,
        )
        .expect("write");

        let config = load_shell_config(&path, no_log);

        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.width, DEFAULT_WINDOW_WIDTH);
        assert_eq!(config.height, 900);
        assert_eq!(config.last_url, DEFAULT_HOME_URL);
    }

    #[test]
    fn unknown_theme_falls_back_to_light() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = config_file_path(dir.path());
        fs::write(&path, r#"{"theme": "solarized"}"#).expect("write");

        assert_eq!(load_shell_config(&path, no_log).theme, Theme::Light);
    }

    #[test]
    fn remember_window_ignores_unusable_values() {
        let mut config = ShellConfig::default();

        config.remember_window(0, 600, Some("about:blank"));
        assert_eq!(config, ShellConfig::default());

        config.remember_window(1440, 900, Some(" https://classroom.google.com/u/1 "));
        assert_eq!((config.width, config.height), (1440, 900));
        assert_eq!(config.last_url, "https://classroom.google.com/u/1");
    }

    #[test]
    fn theme_names_are_case_and_suffix_insensitive() {
        assert_eq!(Theme::from_name(" LIGHT "), Some(Theme::Light));
        assert_eq!(Theme::from_name("dark.css"), Some(Theme::Dark));
        assert_eq!(Theme::from_name("transparent"), None);
    }
}
