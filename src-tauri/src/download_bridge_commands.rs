use leaf_class_core::DownloadView;
use tauri::{AppHandle, Manager};

use crate::{
    app_types::ShellDownloadTracker, append_download_log, DownloadBridgeResult,
    DownloadState,
};

fn bridge_result(action: &str, applied: Result<bool, String>) -> DownloadBridgeResult {
    match applied {
        Ok(true) => DownloadBridgeResult::accepted(),
        Ok(false) => {
            DownloadBridgeResult::rejected(format!("Cannot {action} the download right now."))
        }
        Err(error) => {
            append_download_log(&format!("download {action} failed: {error}"));
            DownloadBridgeResult::rejected(error)
        }
    }
}

fn run_download_action<F>(app_handle: &AppHandle, action: &str, apply: F) -> DownloadBridgeResult
where
    F: FnOnce(&mut ShellDownloadTracker) -> bool,
{
    let Some(state) = app_handle.try_state::<DownloadState>() else {
        return DownloadBridgeResult::rejected("Download manager is not ready.");
    };

    bridge_result(action, state.with_tracker(apply))
}

#[tauri::command]
pub(crate) fn download_cancel(app_handle: AppHandle) -> DownloadBridgeResult {
    run_download_action(&app_handle, "cancel", |tracker| tracker.on_user_cancel())
}

#[tauri::command]
pub(crate) fn download_dismiss(app_handle: AppHandle) -> DownloadBridgeResult {
    run_download_action(&app_handle, "dismiss", |tracker| tracker.on_user_dismiss())
}

#[tauri::command]
pub(crate) fn download_minimize(app_handle: AppHandle) -> DownloadBridgeResult {
    run_download_action(&app_handle, "minimize", |tracker| tracker.on_user_minimize())
}

#[tauri::command]
pub(crate) fn download_restore(app_handle: AppHandle) -> DownloadBridgeResult {
    run_download_action(&app_handle, "restore", |tracker| tracker.on_user_restore())
}

#[tauri::command]
pub(crate) fn download_state(app_handle: AppHandle) -> DownloadView {
    app_handle
        .try_state::<DownloadState>()
        .and_then(|state| state.with_tracker(|tracker| tracker.view()).ok())
        .unwrap_or_else(DownloadView::hidden)
}
