use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    thread,
};

use leaf_class_core::{
    DestinationDecision, DownloadEngine, DownloadFailure, DownloadId, FALLBACK_FILENAME,
};
use tauri::{webview::DownloadEvent, AppHandle, Manager, Webview};
use tauri_plugin_dialog::DialogExt;
use url::Url;

use crate::{
    append_download_log, ui_dispatch, DownloadState, DOWNLOAD_POLL_INTERVAL, MAIN_WINDOW_LABEL,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct FinishedTransfer {
    file: PathBuf,
    success: bool,
}

/// One web view download. The engine writes to `staging_path` until the user
/// has picked a destination and the transfer has finished.
#[derive(Debug)]
struct TrackedDownload {
    id: DownloadId,
    url: String,
    staging_path: PathBuf,
    destination: Option<PathBuf>,
    cancelled: bool,
    finished: Option<FinishedTransfer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FinishedDisposition {
    Completed {
        id: DownloadId,
        file: PathBuf,
        destination: PathBuf,
    },
    DiscardCancelled {
        id: DownloadId,
        file: PathBuf,
    },
    Failed {
        id: DownloadId,
        file: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DestinationSettlement {
    /// Accepted while the transfer is still running; watch this file.
    Watch(PathBuf),
    /// Declined while the transfer is still running.
    AwaitFinish,
    Resolved(FinishedDisposition),
    Untracked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FinishMatch {
    AwaitingDestination(DownloadId),
    Resolved(FinishedDisposition),
    Untracked,
}

fn resolve(download: TrackedDownload, finished: FinishedTransfer) -> Option<FinishedDisposition> {
    let id = download.id;
    let file = finished.file;
    if download.cancelled {
        return Some(FinishedDisposition::DiscardCancelled { id, file });
    }
    if !finished.success {
        return Some(FinishedDisposition::Failed { id, file });
    }
    download
        .destination
        .map(|destination| FinishedDisposition::Completed {
            id,
            file,
            destination,
        })
}

/// Assigns ids to web view downloads and pairs the engine's events with the
/// user's save prompt answers.
#[derive(Debug, Default)]
pub(crate) struct DownloadRegistry {
    next_id: u64,
    downloads: Vec<TrackedDownload>,
}

impl DownloadRegistry {
    pub(crate) fn register(
        &mut self,
        url: &str,
        proposed_destination: &Path,
    ) -> (DownloadId, PathBuf) {
        self.next_id += 1;
        let id = DownloadId(self.next_id);
        let staging_path = staging_path(proposed_destination, id);
        self.downloads.push(TrackedDownload {
            id,
            url: url.to_string(),
            staging_path: staging_path.clone(),
            destination: None,
            cancelled: false,
            finished: None,
        });
        (id, staging_path)
    }

    fn position(&self, id: DownloadId) -> Option<usize> {
        self.downloads.iter().position(|download| download.id == id)
    }

    pub(crate) fn mark_cancelled(&mut self, id: DownloadId) -> bool {
        match self.position(id) {
            Some(index) if !self.downloads[index].cancelled => {
                self.downloads[index].cancelled = true;
                true
            }
            _ => false,
        }
    }

    /// True while the transfer is running toward a chosen destination.
    pub(crate) fn is_active(&self, id: DownloadId) -> bool {
        self.downloads.iter().any(|download| {
            download.id == id
                && !download.cancelled
                && download.destination.is_some()
                && download.finished.is_none()
        })
    }

    /// Records the save prompt answer; `None` means the user declined.
    pub(crate) fn settle_destination(
        &mut self,
        id: DownloadId,
        destination: Option<PathBuf>,
    ) -> DestinationSettlement {
        let Some(index) = self.position(id) else {
            return DestinationSettlement::Untracked;
        };

        let download = &mut self.downloads[index];
        let accepted = destination.is_some();
        match destination {
            Some(destination) => download.destination = Some(destination),
            None => download.cancelled = true,
        }

        let Some(finished) = download.finished.take() else {
            return if accepted && !download.cancelled {
                DestinationSettlement::Watch(download.staging_path.clone())
            } else {
                DestinationSettlement::AwaitFinish
            };
        };

        let download = self.downloads.remove(index);
        match resolve(download, finished) {
            Some(disposition) => DestinationSettlement::Resolved(disposition),
            None => DestinationSettlement::Untracked,
        }
    }

    /// Matches a finished event by the file the engine wrote, falling back to
    /// the oldest unfinished download of the same URL.
    pub(crate) fn finish(
        &mut self,
        url: &str,
        path: Option<&Path>,
        success: bool,
    ) -> FinishMatch {
        let by_path = path.and_then(|path| {
            self.downloads
                .iter()
                .position(|download| download.staging_path == path)
        });
        let index = by_path.or_else(|| {
            self.downloads
                .iter()
                .position(|download| download.url == url && download.finished.is_none())
        });
        let Some(index) = index else {
            return FinishMatch::Untracked;
        };

        let download = &mut self.downloads[index];
        let finished = FinishedTransfer {
            file: path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| download.staging_path.clone()),
            success,
        };
        if !download.cancelled && download.destination.is_none() {
            download.finished = Some(finished);
            return FinishMatch::AwaitingDestination(download.id);
        }

        let download = self.downloads.remove(index);
        match resolve(download, finished) {
            Some(disposition) => FinishMatch::Resolved(disposition),
            None => FinishMatch::Untracked,
        }
    }
}

/// Hidden file next to the engine's proposed destination that receives the
/// bytes until the transfer is settled.
pub(crate) fn staging_path(proposed_destination: &Path, id: DownloadId) -> PathBuf {
    let dir = proposed_destination
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(env::temp_dir);
    let name = proposed_destination
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_FILENAME);
    dir.join(format!(".{name}.leaf-class-{}.part", id.0))
}

/// Name offered in the save dialog: the engine's proposed file name, else the
/// last segment of the URL path.
pub(crate) fn suggested_filename(url: &Url, proposed_destination: &Path) -> Option<String> {
    proposed_destination
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back())
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
        })
}

pub(crate) fn move_into_place(file: &Path, destination: &Path) -> Result<(), String> {
    if let Some(parent_dir) = destination.parent() {
        fs::create_dir_all(parent_dir).map_err(|error| {
            format!(
                "Failed to create download directory {}: {}",
                parent_dir.display(),
                error
            )
        })?;
    }
    if fs::rename(file, destination).is_ok() {
        return Ok(());
    }

    fs::copy(file, destination).map_err(|error| {
        format!(
            "Failed to save download to {}: {}",
            destination.display(),
            error
        )
    })?;
    fs::remove_file(file).map_err(|error| {
        format!(
            "Failed to remove staged download {}: {}",
            file.display(),
            error
        )
    })
}

/// The web engine cannot abort a transfer, so cancelling marks it for
/// discarding when it finishes.
pub(crate) struct TauriDownloadEngine {
    registry: Arc<Mutex<DownloadRegistry>>,
}

impl TauriDownloadEngine {
    pub(crate) fn new(registry: Arc<Mutex<DownloadRegistry>>) -> Self {
        Self { registry }
    }
}

impl DownloadEngine for TauriDownloadEngine {
    fn cancel(&mut self, id: DownloadId) {
        match self.registry.lock() {
            Ok(mut registry) => {
                if registry.mark_cancelled(id) {
                    append_download_log(&format!("download {id} marked as cancelled"));
                }
            }
            Err(_) => append_download_log("failed to cancel download: registry lock is poisoned"),
        }
    }
}

pub(crate) fn handle_download_event(webview: Webview, event: DownloadEvent<'_>) -> bool {
    let app_handle = webview.app_handle();
    let Some(state) = app_handle.try_state::<DownloadState>() else {
        append_download_log("download ignored: download manager is not ready");
        return false;
    };

    match event {
        DownloadEvent::Requested { url, destination } => {
            let proposed = destination.clone();
            let suggested = suggested_filename(&url, &proposed);
            let (id, staging) =
                match state.with_registry(|registry| registry.register(url.as_str(), &proposed)) {
                    Ok(registered) => registered,
                    Err(error) => {
                        append_download_log(&error);
                        return false;
                    }
                };
            append_download_log(&format!(
                "download {id} requested: {url}, staging at {}",
                staging.display()
            ));

            *destination = staging;
            request_destination(app_handle, id, suggested);
            true
        }
        DownloadEvent::Finished { url, path, success } => {
            match state.with_registry(|registry| {
                registry.finish(url.as_str(), path.as_deref(), success)
            }) {
                Ok(FinishMatch::Resolved(disposition)) => settle_finished(&state, disposition),
                Ok(FinishMatch::AwaitingDestination(id)) => append_download_log(&format!(
                    "download {id} finished before a destination was chosen"
                )),
                Ok(FinishMatch::Untracked) => {
                    append_download_log(&format!("finished event for untracked download: {url}"))
                }
                Err(error) => append_download_log(&error),
            }
            true
        }
        _ => true,
    }
}

/// Opens the save dialog without blocking the event loop. The answer is
/// applied on the main thread.
fn request_destination(app_handle: &AppHandle, id: DownloadId, suggested: Option<String>) {
    let mut dialog = app_handle
        .dialog()
        .file()
        .set_title("Save File")
        .set_file_name(suggested.as_deref().unwrap_or(FALLBACK_FILENAME));
    if let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
        dialog = dialog.set_parent(&window);
    }

    let app_handle = app_handle.clone();
    dialog.save_file(move |file_path| {
        let chosen = file_path.and_then(|file_path| file_path.into_path().ok());
        if let Err(error) = ui_dispatch::run_on_main_thread_dispatch(
            &app_handle,
            "apply download destination",
            move |main_app| apply_destination(main_app, id, suggested, chosen),
        ) {
            append_download_log(&error);
        }
    });
}

fn apply_destination(
    app_handle: &AppHandle,
    id: DownloadId,
    suggested: Option<String>,
    chosen: Option<PathBuf>,
) {
    let Some(state) = app_handle.try_state::<DownloadState>() else {
        return;
    };

    let decision = state
        .with_tracker(|tracker| {
            tracker.on_destination_needed(id, suggested.as_deref(), &|_: &str| chosen.clone())
        })
        .unwrap_or_else(|error| {
            append_download_log(&error);
            DestinationDecision::Reject
        });
    let accepted = match decision {
        DestinationDecision::Accept(path) => Some(path),
        DestinationDecision::Reject => None,
    };

    match state.with_registry(|registry| registry.settle_destination(id, accepted)) {
        Ok(DestinationSettlement::Watch(staging)) => {
            spawn_progress_watcher(app_handle.clone(), state.registry(), id, staging)
        }
        Ok(DestinationSettlement::AwaitFinish) => append_download_log(&format!(
            "download {id} declined; discarding it once the engine finishes"
        )),
        Ok(DestinationSettlement::Resolved(disposition)) => settle_finished(&state, disposition),
        Ok(DestinationSettlement::Untracked) => {
            append_download_log(&format!("destination chosen for untracked download {id}"))
        }
        Err(error) => append_download_log(&error),
    }
}

fn settle_finished(state: &DownloadState, disposition: FinishedDisposition) {
    let result = match disposition {
        FinishedDisposition::Completed {
            id,
            file,
            destination,
        } => match move_into_place(&file, &destination) {
            Ok(()) => state.with_tracker(|tracker| tracker.on_finished(id)),
            Err(error) => {
                discard_partial_file(&file);
                state.with_tracker(|tracker| {
                    tracker.on_failed(id, DownloadFailure::Transfer(error))
                })
            }
        },
        FinishedDisposition::DiscardCancelled { id, file } => {
            discard_partial_file(&file);
            state.with_tracker(|tracker| tracker.on_failed(id, DownloadFailure::CancelledByUser))
        }
        FinishedDisposition::Failed { id, file } => {
            discard_partial_file(&file);
            state.with_tracker(|tracker| {
                tracker.on_failed(
                    id,
                    DownloadFailure::Transfer("the web engine reported a failure".to_string()),
                )
            })
        }
    };
    if let Err(error) = result {
        append_download_log(&error);
    }
}

fn discard_partial_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => append_download_log(&format!("removed partial download {}", path.display())),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => append_download_log(&format!(
            "failed to remove partial download {}: {}",
            path.display(),
            error
        )),
    }
}

/// Samples the size of the file being written and reports it as progress.
fn spawn_progress_watcher(
    app_handle: AppHandle,
    registry: Arc<Mutex<DownloadRegistry>>,
    id: DownloadId,
    path: PathBuf,
) {
    let spawn_result = thread::Builder::new()
        .name(format!("download-watch-{}", id.0))
        .spawn(move || {
            let mut last_len = None;
            loop {
                thread::sleep(DOWNLOAD_POLL_INTERVAL);
                let active = registry
                    .lock()
                    .map(|registry| registry.is_active(id))
                    .unwrap_or(false);
                if !active {
                    break;
                }

                let Ok(metadata) = fs::metadata(&path) else {
                    continue;
                };
                let len = metadata.len();
                if last_len == Some(len) {
                    continue;
                }
                last_len = Some(len);

                if let Err(error) = ui_dispatch::run_on_main_thread_dispatch(
                    &app_handle,
                    "deliver download progress",
                    move |main_app| {
                        let Some(state) = main_app.try_state::<DownloadState>() else {
                            return;
                        };
                        if let Err(error) =
                            state.with_tracker(|tracker| tracker.on_progress(id, len, 0))
                        {
                            append_download_log(&error);
                        }
                    },
                ) {
                    append_download_log(&error);
                    break;
                }
            }
        });

    if let Err(error) = spawn_result {
        append_download_log(&format!(
            "failed to start progress watcher for download {id}: {error}"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/files/report.pdf";

    fn proposed() -> PathBuf {
        PathBuf::from("/home/user/Downloads/report.pdf")
    }

    fn dest(name: &str) -> PathBuf {
        PathBuf::from("/home/user/Documents").join(name)
    }

    #[test]
    fn register_assigns_increasing_ids_and_distinct_staging_files() {
        let mut registry = DownloadRegistry::default();
        let (first, first_staging) = registry.register(URL, &proposed());
        let (second, second_staging) = registry.register(URL, &proposed());

        assert_eq!(first, DownloadId(1));
        assert_eq!(second, DownloadId(2));
        assert_ne!(first_staging, second_staging);
        assert!(!registry.is_active(first));
    }

    #[test]
    fn accepted_download_is_watched_until_finished() {
        let mut registry = DownloadRegistry::default();
        let (id, staging) = registry.register(URL, &proposed());

        assert_eq!(
            registry.settle_destination(id, Some(dest("a.pdf"))),
            DestinationSettlement::Watch(staging.clone())
        );
        assert!(registry.is_active(id));

        assert_eq!(
            registry.finish(URL, Some(staging.as_path()), true),
            FinishMatch::Resolved(FinishedDisposition::Completed {
                id,
                file: staging,
                destination: dest("a.pdf"),
            })
        );
        assert!(!registry.is_active(id));
        assert_eq!(registry.finish(URL, None, true), FinishMatch::Untracked);
    }

    #[test]
    fn finish_before_prompt_answer_waits_for_destination() {
        let mut registry = DownloadRegistry::default();
        let (id, staging) = registry.register(URL, &proposed());

        assert_eq!(
            registry.finish(URL, Some(staging.as_path()), true),
            FinishMatch::AwaitingDestination(id)
        );
        assert_eq!(
            registry.settle_destination(id, Some(dest("a.pdf"))),
            DestinationSettlement::Resolved(FinishedDisposition::Completed {
                id,
                file: staging,
                destination: dest("a.pdf"),
            })
        );
    }

    #[test]
    fn declined_prompt_discards_file_when_engine_finishes() {
        let mut registry = DownloadRegistry::default();
        let (id, staging) = registry.register(URL, &proposed());

        assert_eq!(
            registry.settle_destination(id, None),
            DestinationSettlement::AwaitFinish
        );
        assert_eq!(
            registry.finish(URL, Some(staging.as_path()), true),
            FinishMatch::Resolved(FinishedDisposition::DiscardCancelled { id, file: staging })
        );
    }

    #[test]
    fn duplicate_url_with_declined_second_prompt_keeps_first_download() {
        let mut registry = DownloadRegistry::default();
        let (first, first_staging) = registry.register(URL, &proposed());
        registry.settle_destination(first, Some(dest("first.pdf")));
        let (second, second_staging) = registry.register(URL, &proposed());

        assert_eq!(
            registry.settle_destination(second, None),
            DestinationSettlement::AwaitFinish
        );
        assert!(registry.is_active(first));

        assert_eq!(
            registry.finish(URL, Some(first_staging.as_path()), true),
            FinishMatch::Resolved(FinishedDisposition::Completed {
                id: first,
                file: first_staging,
                destination: dest("first.pdf"),
            })
        );
        assert_eq!(
            registry.finish(URL, Some(second_staging.as_path()), true),
            FinishMatch::Resolved(FinishedDisposition::DiscardCancelled {
                id: second,
                file: second_staging,
            })
        );
    }

    #[test]
    fn duplicate_url_with_both_accepted_finishes_the_matching_download() {
        let mut registry = DownloadRegistry::default();
        let (first, first_staging) = registry.register(URL, &proposed());
        registry.settle_destination(first, Some(dest("first.pdf")));
        let (second, second_staging) = registry.register(URL, &proposed());
        registry.settle_destination(second, Some(dest("second.pdf")));

        assert_eq!(
            registry.finish(URL, Some(second_staging.as_path()), false),
            FinishMatch::Resolved(FinishedDisposition::Failed {
                id: second,
                file: second_staging,
            })
        );
        assert!(registry.is_active(first));

        // Without a reported path the oldest unfinished download of the URL wins.
        assert_eq!(
            registry.finish(URL, None, true),
            FinishMatch::Resolved(FinishedDisposition::Completed {
                id: first,
                file: first_staging,
                destination: dest("first.pdf"),
            })
        );
    }

    #[test]
    fn user_cancel_discards_running_download() {
        let registry = Arc::new(Mutex::new(DownloadRegistry::default()));
        let (id, staging) = registry.lock().expect("lock").register(URL, &proposed());
        registry
            .lock()
            .expect("lock")
            .settle_destination(id, Some(dest("a.pdf")));
        let mut engine = TauriDownloadEngine::new(Arc::clone(&registry));

        engine.cancel(id);

        let mut registry = registry.lock().expect("lock");
        assert!(!registry.is_active(id));
        assert!(!registry.mark_cancelled(id));
        assert_eq!(
            registry.finish(URL, Some(staging.as_path()), true),
            FinishMatch::Resolved(FinishedDisposition::DiscardCancelled { id, file: staging })
        );
    }

    #[test]
    fn cancelling_unknown_id_is_ignored() {
        let mut registry = DownloadRegistry::default();
        assert!(!registry.mark_cancelled(DownloadId(9)));
        assert_eq!(
            registry.settle_destination(DownloadId(9), None),
            DestinationSettlement::Untracked
        );
    }

    #[test]
    fn staging_path_sits_next_to_proposed_destination() {
        assert_eq!(
            staging_path(&proposed(), DownloadId(3)),
            PathBuf::from("/home/user/Downloads/.report.pdf.leaf-class-3.part")
        );
        let fallback = staging_path(Path::new(""), DownloadId(4));
        assert!(fallback.starts_with(env::temp_dir()));
        assert!(fallback.ends_with(".download.leaf-class-4.part"));
    }

    #[test]
    fn move_into_place_moves_file_and_creates_parent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let staged = dir.path().join(".report.pdf.leaf-class-1.part");
        fs::write(&staged, b"pdf bytes").expect("write staged file");
        let destination = dir.path().join("saved").join("report.pdf");

        move_into_place(&staged, &destination).expect("move");

        assert!(!staged.exists());
        assert_eq!(fs::read(&destination).expect("read"), b"pdf bytes");
    }

    #[test]
    fn suggested_filename_prefers_proposed_destination() {
        let url = Url::parse("https://example.com/files/ignored.bin").expect("url");
        assert_eq!(
            suggested_filename(&url, Path::new("/home/user/Downloads/report.pdf")),
            Some("report.pdf".to_string())
        );
    }

    #[test]
    fn suggested_filename_falls_back_to_url_path() {
        let url = Url::parse("https://example.com/files/notes.txt?x=1").expect("url");
        assert_eq!(
            suggested_filename(&url, Path::new("")),
            Some("notes.txt".to_string())
        );
        let bare = Url::parse("https://example.com/").expect("url");
        assert_eq!(suggested_filename(&bare, Path::new("")), None);
    }
}
