use std::{
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use leaf_class_core::{shell_config, DownloadTracker, ShellConfig};
use tauri::{menu::CheckMenuItem, AppHandle};

use crate::{
    append_download_log,
    download_engine::{DownloadRegistry, TauriDownloadEngine},
    download_presenter::WebviewPresenter,
};

pub(crate) type ShellDownloadTracker = DownloadTracker<WebviewPresenter, TauriDownloadEngine>;

#[derive(Clone)]
pub(crate) struct ThemeMenuState {
    pub(crate) light_item: CheckMenuItem<tauri::Wry>,
    pub(crate) dark_item: CheckMenuItem<tauri::Wry>,
}

pub(crate) struct DownloadState {
    tracker: Mutex<ShellDownloadTracker>,
    registry: Arc<Mutex<DownloadRegistry>>,
}

impl DownloadState {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        let registry = Arc::new(Mutex::new(DownloadRegistry::default()));
        let tracker = DownloadTracker::new(
            WebviewPresenter::new(app_handle),
            TauriDownloadEngine::new(Arc::clone(&registry)),
            append_download_log,
        );
        Self {
            tracker: Mutex::new(tracker),
            registry,
        }
    }

    pub(crate) fn with_tracker<T, F>(&self, apply: F) -> Result<T, String>
    where
        F: FnOnce(&mut ShellDownloadTracker) -> T,
    {
        self.tracker
            .lock()
            .map(|mut tracker| apply(&mut tracker))
            .map_err(|_| "Download tracker lock is poisoned.".to_string())
    }

    pub(crate) fn with_registry<T, F>(&self, apply: F) -> Result<T, String>
    where
        F: FnOnce(&mut DownloadRegistry) -> T,
    {
        self.registry
            .lock()
            .map(|mut registry| apply(&mut registry))
            .map_err(|_| "Download registry lock is poisoned.".to_string())
    }

    pub(crate) fn registry(&self) -> Arc<Mutex<DownloadRegistry>> {
        Arc::clone(&self.registry)
    }
}

#[derive(Debug)]
pub(crate) struct ShellState {
    config: Mutex<ShellConfig>,
    config_path: Option<PathBuf>,
}

impl ShellState {
    pub(crate) fn new(config: ShellConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            config: Mutex::new(config),
            config_path,
        }
    }

    pub(crate) fn snapshot(&self) -> ShellConfig {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies `change` and writes the result to disk.
    pub(crate) fn update_and_save<C, F>(&self, change: C, log: F) -> ShellConfig
    where
        C: FnOnce(&mut ShellConfig),
        F: Fn(&str),
    {
        let updated = {
            let mut config = self.config.lock().unwrap_or_else(PoisonError::into_inner);
            change(&mut config);
            config.clone()
        };

        match &self.config_path {
            Some(path) => {
                if let Err(error) = shell_config::save_shell_config(path, &updated) {
                    log(&error);
                }
            }
            None => log("shell config directory is unavailable; settings are not persisted"),
        }
        updated
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct DownloadBridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

impl DownloadBridgeResult {
    pub(crate) fn accepted() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub(crate) fn rejected(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}
