use std::{fmt, path::PathBuf};

/// Speed and ETA are only resampled once more than this many microseconds
/// have passed since the previous sample.
pub const SAMPLE_INTERVAL_MICROS: u64 = 1_000_000;

/// Opaque handle the web engine assigns to a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DownloadId(pub u64);

impl fmt::Display for DownloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadState {
    AwaitingDestination,
    Downloading,
    Finished,
    Failed,
    Cancelled,
}

impl DownloadState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Failed | Self::Cancelled)
    }

    pub fn status_text(self) -> &'static str {
        match self {
            Self::Downloading => "Downloading...",
            Self::Finished => "Finished",
            Self::Failed => "Failed",
            Self::AwaitingDestination | Self::Cancelled => "",
        }
    }
}

/// Why the engine reported a transfer as failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadFailure {
    CancelledByUser,
    Transfer(String),
}

/// How a download attempt ended, as far as the user is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Completed,
    /// Not an error: the UI is torn down silently.
    UserCancelled,
    /// Network or storage failure, surfaced with a persistent failed card.
    TransferFailed(String),
    /// The save prompt was declined; the engine cancels and no UI is shown.
    DestinationRejected,
}

impl From<DownloadFailure> for DownloadOutcome {
    fn from(failure: DownloadFailure) -> Self {
        match failure {
            DownloadFailure::CancelledByUser => Self::UserCancelled,
            DownloadFailure::Transfer(reason) => Self::TransferFailed(reason),
        }
    }
}

/// Plain data for one tracked transfer. The tracker is the only writer.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSession {
    id: DownloadId,
    filename: String,
    destination: Option<PathBuf>,
    state: DownloadState,
    started_at: u64,
    last_sample_at: u64,
    bytes_received: u64,
    bytes_received_at_last_sample: u64,
    total_bytes: u64,
    fraction: f64,
    current_speed_bps: Option<f64>,
    eta_seconds: Option<u64>,
    failure_reason: Option<String>,
}

impl DownloadSession {
    pub(crate) fn awaiting_destination(id: DownloadId, filename: String) -> Self {
        Self {
            id,
            filename,
            destination: None,
            state: DownloadState::AwaitingDestination,
            started_at: 0,
            last_sample_at: 0,
            bytes_received: 0,
            bytes_received_at_last_sample: 0,
            total_bytes: 0,
            fraction: 0.0,
            current_speed_bps: None,
            eta_seconds: None,
            failure_reason: None,
        }
    }

    pub(crate) fn begin(&mut self, destination: PathBuf, now: u64) {
        self.destination = Some(destination);
        self.state = DownloadState::Downloading;
        self.started_at = now;
        self.last_sample_at = now;
        self.bytes_received_at_last_sample = 0;
    }

    /// Applies a progress report. Returns `false` when the session no longer
    /// accepts byte updates.
    pub(crate) fn record_progress(
        &mut self,
        bytes_received: u64,
        total_bytes: u64,
        now: u64,
    ) -> bool {
        if self.state != DownloadState::Downloading {
            return false;
        }

        let bytes_received = bytes_received.max(self.bytes_received);
        self.bytes_received = bytes_received;
        if total_bytes > 0 {
            self.total_bytes = total_bytes;
            let fraction = (bytes_received as f64 / total_bytes as f64).min(1.0);
            self.fraction = self.fraction.max(fraction);
        }

        let elapsed = now.saturating_sub(self.last_sample_at);
        if elapsed > SAMPLE_INTERVAL_MICROS {
            let elapsed_seconds = elapsed as f64 / 1_000_000.0;
            let delta = bytes_received.saturating_sub(self.bytes_received_at_last_sample);
            let speed = delta as f64 / elapsed_seconds;
            self.current_speed_bps = Some(speed);
            if speed > 0.0 && self.total_bytes > bytes_received {
                let remaining = (self.total_bytes - bytes_received) as f64;
                self.eta_seconds = Some((remaining / speed) as u64);
            }
            self.last_sample_at = now;
            self.bytes_received_at_last_sample = bytes_received;
        }

        true
    }

    pub(crate) fn finish(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = DownloadState::Finished;
        self.fraction = 1.0;
        true
    }

    pub(crate) fn fail(&mut self, reason: String) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = DownloadState::Failed;
        self.failure_reason = Some(reason);
        true
    }

    pub(crate) fn cancel(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = DownloadState::Cancelled;
        true
    }

    pub fn id(&self) -> DownloadId {
        self.id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn destination(&self) -> Option<&PathBuf> {
        self.destination.as_ref()
    }

    pub fn state(&self) -> DownloadState {
        self.state
    }

    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    pub fn last_sample_at(&self) -> u64 {
        self.last_sample_at
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    pub fn bytes_received_at_last_sample(&self) -> u64 {
        self.bytes_received_at_last_sample
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn current_speed_bps(&self) -> Option<f64> {
        self.current_speed_bps
    }

    pub fn eta_seconds(&self) -> Option<u64> {
        self.eta_seconds
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }
}
