use leaf_class_core::{DownloadPresenter, DownloadView};
use tauri::{AppHandle, Manager};

use crate::{append_download_log, shell_overlay, MAIN_WINDOW_LABEL};

/// Draws the download overlay inside the main window's page.
pub(crate) struct WebviewPresenter {
    app_handle: AppHandle,
}

impl WebviewPresenter {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl DownloadPresenter for WebviewPresenter {
    fn render(&mut self, view: &DownloadView) {
        render_download_view(&self.app_handle, view, append_download_log);
    }

    fn session_finished(&mut self, view: &DownloadView) {
        append_download_log(&format!("download finished: {}", view.filename));
        self.render(view);
    }

    fn session_failed(&mut self, view: &DownloadView) {
        append_download_log(&format!("download failed: {}", view.filename));
        self.render(view);
    }
}

pub(crate) fn render_download_view<F>(app_handle: &AppHandle, view: &DownloadView, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("download overlay skipped: main window not found");
        return;
    };

    let script = match shell_overlay::render_downloads_script(view) {
        Ok(script) => script,
        Err(error) => {
            log(&error);
            return;
        }
    };
    if let Err(error) = window.eval(&script) {
        log(&format!("failed to render download overlay: {error}"));
    }
}
