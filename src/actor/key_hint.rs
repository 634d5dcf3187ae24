use std::sync::Arc;

use tracing::instrument;

use crate::actor;
use crate::model::CandidateSet;
use crate::ui::scheduler::{DisplayScheduler, Instant};
use crate::ui::surface::HostWindow;

pub struct DisplayRequest {
    pub host: Arc<dyn HostWindow>,
    pub typed: String,
    pub candidates: CandidateSet,
    pub started: Instant,
}

impl DisplayRequest {
    pub fn new(host: Arc<dyn HostWindow>, typed: impl Into<String>, candidates: CandidateSet) -> Self {
        Self {
            host,
            typed: typed.into(),
            candidates,
            started: Instant::now(),
        }
    }
}

impl std::fmt::Debug for DisplayRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayRequest")
            .field("typed", &self.typed)
            .field("candidates", &self.candidates.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum Event {
    Show(DisplayRequest),
    Dismiss,
}

pub type Sender = actor::Sender<Event>;
pub type Receiver = actor::Receiver<Event>;

/// Feeds key-capture events to a [`DisplayScheduler`] in arrival order.
pub struct KeyHintActor {
    rx: Receiver,
    scheduler: DisplayScheduler,
}

impl KeyHintActor {
    pub fn new(rx: Receiver, scheduler: DisplayScheduler) -> Self { Self { rx, scheduler } }

    pub async fn run(mut self) {
        while let Some((span, event)) = self.rx.recv().await {
            let _guard = span.enter();
            self.handle_event(event);
        }
        self.scheduler.hide_popup();
    }

    #[instrument(name = "key_hint::handle_event", skip(self))]
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Show(request) => self.scheduler.request_display(
                request.host,
                &request.typed,
                request.candidates,
                request.started,
            ),
            Event::Dismiss => self.scheduler.hide_popup(),
        }
    }
}
