use serde::Serialize;

use crate::{
    download_session::{DownloadSession, DownloadState},
    format::{format_percent, format_speed, format_time},
};

/// Shown in place of speed or ETA until a value is known.
pub const PLACEHOLDER_TEXT: &str = "-";
pub const IDLE_TICKER_TEXT: &str = "Downloads Manager";

/// Which download representation is visible. Card and ticker are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    #[default]
    None,
    Card,
    Ticker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DownloadControls {
    pub cancel: bool,
    pub dismiss: bool,
    pub minimize: bool,
}

/// Everything the download overlay needs to draw itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadView {
    pub filename: String,
    pub status_text: String,
    pub fraction: f64,
    pub percent_text: String,
    pub speed_text: String,
    pub eta_text: String,
    pub ticker_text: String,
    pub controls: DownloadControls,
    pub surface: Surface,
}

impl DownloadView {
    pub fn hidden() -> Self {
        Self {
            filename: String::new(),
            status_text: String::new(),
            fraction: 0.0,
            percent_text: format_percent(0.0),
            speed_text: PLACEHOLDER_TEXT.to_string(),
            eta_text: PLACEHOLDER_TEXT.to_string(),
            ticker_text: IDLE_TICKER_TEXT.to_string(),
            controls: DownloadControls::default(),
            surface: Surface::None,
        }
    }

    pub(crate) fn from_session(session: &DownloadSession, surface: Surface) -> Self {
        let state = session.state();
        let percent_text = format_percent(session.fraction());
        let ticker_text = if state == DownloadState::Downloading {
            format!("Downloading... {percent_text}")
        } else {
            IDLE_TICKER_TEXT.to_string()
        };

        Self {
            filename: session.filename().to_string(),
            status_text: state.status_text().to_string(),
            fraction: session.fraction(),
            percent_text,
            speed_text: session
                .current_speed_bps()
                .map(format_speed)
                .unwrap_or_else(|| PLACEHOLDER_TEXT.to_string()),
            eta_text: session
                .eta_seconds()
                .map(format_time)
                .unwrap_or_else(|| PLACEHOLDER_TEXT.to_string()),
            ticker_text,
            controls: DownloadControls {
                cancel: state == DownloadState::Downloading,
                dismiss: matches!(state, DownloadState::Finished | DownloadState::Failed),
                minimize: state == DownloadState::Downloading,
            },
            surface,
        }
    }
}

/// Rendering side of the tracker. Every notification carries the full view;
/// implementors that do not care which event happened only need `render`.
pub trait DownloadPresenter {
    fn render(&mut self, view: &DownloadView);

    fn session_started(&mut self, view: &DownloadView) {
        self.render(view);
    }

    fn progress_changed(&mut self, view: &DownloadView) {
        self.render(view);
    }

    fn session_finished(&mut self, view: &DownloadView) {
        self.render(view);
    }

    fn session_failed(&mut self, view: &DownloadView) {
        self.render(view);
    }

    fn surface_changed(&mut self, view: &DownloadView) {
        self.render(view);
    }
}
