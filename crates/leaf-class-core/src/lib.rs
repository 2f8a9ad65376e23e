//! Core state for the Leaf Class desktop shell.
//!
//! The shell hosts a web view and overlays a small download manager on top of
//! it. This crate holds everything that does not need a window: the download
//! tracker and the view it renders, the formatting helpers used for sizes and
//! durations, and the persisted shell configuration.
//!
//! The tracker is driven by the host on its UI thread:
//! - the web engine reports new downloads, progress and terminal events,
//! - the user cancels, dismisses, minimizes or restores the overlay,
//! - after every change the tracker hands a [`DownloadView`] to its
//!   [`DownloadPresenter`].

pub mod clock;
pub mod download_session;
pub mod download_tracker;
pub mod download_view;
pub mod format;
pub mod shell_config;

pub use clock::{Clock, MonotonicClock};
pub use download_session::{
    DownloadFailure, DownloadId, DownloadOutcome, DownloadSession, DownloadState,
};
pub use download_tracker::{
    DestinationDecision, DestinationPrompt, DownloadEngine, DownloadTracker, FALLBACK_FILENAME,
};
pub use download_view::{DownloadControls, DownloadPresenter, DownloadView, Surface};
pub use shell_config::{ShellConfig, Theme, DEFAULT_HOME_URL};
