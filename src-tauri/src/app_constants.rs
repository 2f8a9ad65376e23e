use std::time::Duration;

pub(crate) const APP_NAME: &str = "Leaf Class";
pub(crate) const APP_DIR_NAME: &str = "leaf-class";

pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const SPLASH_WINDOW_LABEL: &str = "splash";
pub(crate) const SPLASH_DURATION: Duration = Duration::from_millis(1500);
pub(crate) const MIN_WINDOW_WIDTH: f64 = 480.0;
pub(crate) const MIN_WINDOW_HEIGHT: f64 = 360.0;

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const DESKTOP_LOG_MAX_BYTES: u64 = 2 * 1024 * 1024;

pub(crate) const DOWNLOAD_POLL_INTERVAL: Duration = Duration::from_millis(250);

pub(crate) const ROOT_DIR_ENV: &str = "LEAF_CLASS_ROOT";
pub(crate) const CONFIG_DIR_ENV: &str = "LEAF_CLASS_CONFIG_DIR";
