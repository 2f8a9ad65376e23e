use std::path::PathBuf;

use crate::{
    clock::{Clock, MonotonicClock},
    download_session::{
        DownloadFailure, DownloadId, DownloadOutcome, DownloadSession, DownloadState,
    },
    download_view::{DownloadPresenter, DownloadView, Surface},
};

/// Display name used when the engine does not suggest one.
pub const FALLBACK_FILENAME: &str = "download";

/// Engine-side controls the tracker may invoke.
pub trait DownloadEngine {
    /// Requests cancellation. The engine later reports
    /// [`DownloadFailure::CancelledByUser`] for the transfer, if at all.
    fn cancel(&mut self, id: DownloadId);
}

/// Blocking save prompt. Returns the chosen path, or `None` when declined.
pub trait DestinationPrompt {
    fn choose_destination(&self, suggested_name: &str) -> Option<PathBuf>;
}

impl<F> DestinationPrompt for F
where
    F: Fn(&str) -> Option<PathBuf>,
{
    fn choose_destination(&self, suggested_name: &str) -> Option<PathBuf> {
        self(suggested_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationDecision {
    Accept(PathBuf),
    Reject,
}

/// Tracks the single foreground download and drives its presenter.
///
/// Only one session is held at a time. Accepting a new download replaces
/// the previous one, and engine events for any other id are dropped.
pub struct DownloadTracker<P, E, C = MonotonicClock> {
    presenter: P,
    engine: E,
    clock: C,
    session: Option<DownloadSession>,
    surface: Surface,
    last_outcome: Option<DownloadOutcome>,
    log: fn(&str),
}

impl<P, E> DownloadTracker<P, E, MonotonicClock>
where
    P: DownloadPresenter,
    E: DownloadEngine,
{
    pub fn new(presenter: P, engine: E, log: fn(&str)) -> Self {
        Self::with_clock(presenter, engine, MonotonicClock::new(), log)
    }
}

impl<P, E, C> DownloadTracker<P, E, C>
where
    P: DownloadPresenter,
    E: DownloadEngine,
    C: Clock,
{
    pub fn with_clock(presenter: P, engine: E, clock: C, log: fn(&str)) -> Self {
        Self {
            presenter,
            engine,
            clock,
            session: None,
            surface: Surface::None,
            last_outcome: None,
            log,
        }
    }

    pub fn session(&self) -> Option<&DownloadSession> {
        self.session.as_ref()
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn last_outcome(&self) -> Option<&DownloadOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn view(&self) -> DownloadView {
        match &self.session {
            Some(session) if self.surface != Surface::None => {
                DownloadView::from_session(session, self.surface)
            }
            _ => DownloadView::hidden(),
        }
    }

    /// Asks `prompt` where to save a new download and starts tracking it if
    /// the user accepts. A declined prompt cancels the transfer in the engine
    /// and leaves whatever is currently displayed alone.
    pub fn on_destination_needed<D>(
        &mut self,
        id: DownloadId,
        suggested_name: Option<&str>,
        prompt: &D,
    ) -> DestinationDecision
    where
        D: DestinationPrompt + ?Sized,
    {
        let filename = suggested_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_FILENAME)
            .to_string();
        let mut session = DownloadSession::awaiting_destination(id, filename);

        let Some(destination) = prompt.choose_destination(session.filename()) else {
            (self.log)(&format!(
                "download {id} rejected: no destination chosen for {}",
                session.filename()
            ));
            self.engine.cancel(id);
            self.last_outcome = Some(DownloadOutcome::DestinationRejected);
            return DestinationDecision::Reject;
        };

        if let Some(previous) = &self.session {
            if previous.state() == DownloadState::Downloading {
                (self.log)(&format!(
                    "download {} superseded by {id}; it is no longer tracked",
                    previous.id()
                ));
            }
        }

        session.begin(destination.clone(), self.clock.now_micros());
        (self.log)(&format!(
            "download {id} started: {} -> {}",
            session.filename(),
            destination.display()
        ));
        self.session = Some(session);
        self.surface = Surface::Card;
        self.last_outcome = None;

        let view = self.view();
        self.presenter.session_started(&view);
        DestinationDecision::Accept(destination)
    }

    pub fn on_progress(&mut self, id: DownloadId, bytes_received: u64, total_bytes: u64) {
        let now = self.clock.now_micros();
        let Some(session) = self.foreground_mut(id) else {
            return;
        };
        if !session.record_progress(bytes_received, total_bytes, now) {
            return;
        }

        let view = self.view();
        self.presenter.progress_changed(&view);
    }

    pub fn on_finished(&mut self, id: DownloadId) {
        let Some(session) = self.foreground_mut(id) else {
            return;
        };
        if !session.finish() {
            (self.log)(&format!("download {id} finished after a terminal state; ignored"));
            return;
        }

        (self.log)(&format!("download {id} finished"));
        self.surface = Surface::Card;
        self.last_outcome = Some(DownloadOutcome::Completed);
        let view = self.view();
        self.presenter.session_finished(&view);
    }

    pub fn on_failed(&mut self, id: DownloadId, failure: DownloadFailure) {
        let Some(session) = self.foreground_mut(id) else {
            return;
        };

        let applied = match &failure {
            DownloadFailure::CancelledByUser => session.cancel(),
            DownloadFailure::Transfer(reason) => session.fail(reason.clone()),
        };
        if !applied {
            (self.log)(&format!("download {id} failed after a terminal state; ignored"));
            return;
        }

        match &failure {
            DownloadFailure::CancelledByUser => {
                (self.log)(&format!("download {id} cancelled"));
                self.release();
            }
            DownloadFailure::Transfer(reason) => {
                (self.log)(&format!("download {id} failed: {reason}"));
                self.surface = Surface::Card;
            }
        }
        self.last_outcome = Some(failure.into());

        let view = self.view();
        self.presenter.session_failed(&view);
    }

    /// Cancels the active transfer and hides the download UI at once, without
    /// waiting for the engine's confirmation. Only a download in progress can
    /// be cancelled; finished or failed cards are closed with dismiss.
    pub fn on_user_cancel(&mut self) -> bool {
        let Some(session) = self
            .session
            .as_mut()
            .filter(|session| session.state() == DownloadState::Downloading)
        else {
            (self.log)("download cancel ignored: no active download");
            return false;
        };

        let id = session.id();
        session.cancel();
        self.engine.cancel(id);
        self.last_outcome = Some(DownloadOutcome::UserCancelled);
        (self.log)(&format!("download {id} cancel requested by user"));

        self.release();
        let view = self.view();
        self.presenter.surface_changed(&view);
        true
    }

    pub fn on_user_dismiss(&mut self) -> bool {
        let dismissable = self
            .session
            .as_ref()
            .is_some_and(|session| {
                matches!(
                    session.state(),
                    DownloadState::Finished | DownloadState::Failed
                )
            });
        if !dismissable {
            (self.log)("download dismiss ignored: no finished or failed download");
            return false;
        }

        self.release();
        let view = self.view();
        self.presenter.surface_changed(&view);
        true
    }

    pub fn on_user_minimize(&mut self) -> bool {
        let downloading = self
            .session
            .as_ref()
            .is_some_and(|session| session.state() == DownloadState::Downloading);
        if !downloading || self.surface != Surface::Card {
            (self.log)("download minimize ignored: no active download card");
            return false;
        }

        self.surface = Surface::Ticker;
        let view = self.view();
        self.presenter.surface_changed(&view);
        true
    }

    pub fn on_user_restore(&mut self) -> bool {
        if self.surface != Surface::Ticker {
            (self.log)("download restore ignored: ticker is not shown");
            return false;
        }

        self.surface = Surface::Card;
        let view = self.view();
        self.presenter.surface_changed(&view);
        true
    }

    fn foreground_mut(&mut self, id: DownloadId) -> Option<&mut DownloadSession> {
        let tracked = self.session.as_ref().is_some_and(|session| session.id() == id);
        if !tracked {
            (self.log)(&format!("download {id} is not tracked; event ignored"));
            return None;
        }
        self.session.as_mut()
    }

    fn release(&mut self) {
        self.session = None;
        self.surface = Surface::None;
    }
}
