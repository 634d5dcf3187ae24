//! Debounced, cancellable display of the key hint panel.
//!
//! Each request bumps a generation and installs a fresh cancellation token under the
//! state lock. The debounce task and the dismiss timer re-check both under the same
//! lock before touching the panel, so a newer request or a [`DisplayScheduler::hide_popup`]
//! always wins over work that was already in flight.

use std::cell::RefCell;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::ReentrantMutex;
pub use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

use super::panel::{PanelContent, placement, render_entry};
use super::surface::{HostWindow, PanelHandle, RenderingSurface, ShowOptions};
use crate::common::config::{ConfigService, KeyHintSettings};
use crate::layout_engine::layout;
use crate::model::{CandidateSet, sort_candidates};
use crate::sys::executor::{Dispatcher, runtime_handle};
use crate::sys::timer::DismissTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing scheduled and nothing on screen.
    Idle,
    /// A display is scheduled and waiting out its debounce delay.
    Pending,
    /// A panel is on screen and no newer display is scheduled.
    Visible,
}

struct PendingJob {
    token: CancellationToken,
}

struct VisiblePanel {
    generation: u64,
    handle: Box<dyn PanelHandle>,
}

#[derive(Default)]
struct SchedulerState {
    generation: u64,
    pending: Option<PendingJob>,
    visible: Option<VisiblePanel>,
}

struct Inner {
    surface: Arc<dyn RenderingSurface>,
    config: Arc<dyn ConfigService>,
    dispatcher: Arc<dyn Dispatcher>,
    // Re-entrant so surface callbacks running on the dispatch thread may call back in.
    // The RefCell borrow is never held across a call out of this module.
    state: ReentrantMutex<RefCell<SchedulerState>>,
    dismiss: DismissTimer,
}

/// Owns the panel lifecycle for one host window.
///
/// Dropping the scheduler hides any visible panel and cancels pending work.
pub struct DisplayScheduler {
    inner: Arc<Inner>,
}

/// Remaining debounce wait once the time already spent preparing the request is
/// taken into account.
pub fn effective_delay(configured: Duration, started: Instant, now: Instant) -> Duration {
    configured.saturating_sub(now.saturating_duration_since(started))
}

impl DisplayScheduler {
    pub fn new(
        surface: Arc<dyn RenderingSurface>,
        config: Arc<dyn ConfigService>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                surface,
                config,
                dispatcher,
                state: ReentrantMutex::new(RefCell::new(SchedulerState::default())),
                dismiss: DismissTimer::new(),
            }),
        }
    }

    /// Schedules the panel for `candidates`, replacing any display that is pending.
    ///
    /// `started` is when the caller began handling the key press; the debounce delay
    /// counts from there. An empty candidate set does nothing.
    #[instrument(name = "key_hint::request_display", skip_all, fields(typed = %typed, candidates = candidates.len()))]
    pub fn request_display(
        &self,
        host: Arc<dyn HostWindow>,
        typed: &str,
        candidates: CandidateSet,
        started: Instant,
    ) {
        if candidates.is_empty() {
            trace!("no candidates; nothing to show");
            return;
        }

        let settings = KeyHintSettings::resolve(&*self.inner.config);
        let content = self.compose(&*host, typed, candidates, &settings);
        let delay = effective_delay(settings.delay, started, Instant::now());

        let guard = self.inner.state.lock();
        let (generation, token) = {
            let mut state = guard.borrow_mut();
            if let Some(previous) = state.pending.take() {
                previous.token.cancel();
            }
            state.generation = state.generation.wrapping_add(1);
            let token = CancellationToken::new();
            state.pending = Some(PendingJob { token: token.clone() });
            (state.generation, token)
        };
        self.inner.dismiss.cancel();
        debug!(generation, ?delay, "key hint panel scheduled");

        let inner = Arc::downgrade(&self.inner);
        runtime_handle().spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let dispatcher = inner.dispatcher.clone();
            dispatcher.dispatch(Box::new(move || {
                inner.show(generation, &token, &*host, &content, settings);
            }));
        });
    }

    /// Cancels pending work and closes the visible panel.
    ///
    /// If a show is running concurrently this blocks until it finishes and then
    /// closes what it showed, so no panel is left on screen once this returns.
    #[instrument(name = "key_hint::hide_popup", skip(self))]
    pub fn hide_popup(&self) { self.inner.hide(); }

    pub fn phase(&self) -> Phase {
        let guard = self.inner.state.lock();
        let state = guard.borrow();
        if state.pending.is_some() {
            Phase::Pending
        } else if state.visible.is_some() {
            Phase::Visible
        } else {
            Phase::Idle
        }
    }

    fn compose(
        &self,
        host: &dyn HostWindow,
        typed: &str,
        mut candidates: CandidateSet,
        settings: &KeyHintSettings,
    ) -> PanelContent {
        sort_candidates(&mut candidates, settings.sort_option, settings.sort_case_sensitive);
        let entries = candidates.iter().map(render_entry).collect();
        let surface = &self.inner.surface;
        let plan = layout(entries, host.width(), |fragment| surface.measure_width(fragment));
        trace!(columns = plan.column_count, width = plan.column_width_px, "laid out candidates");
        PanelContent::compose(&plan, settings.show_typed_sequence.then_some(typed))
    }
}

impl Drop for DisplayScheduler {
    fn drop(&mut self) { self.inner.hide(); }
}

impl Inner {
    fn show(
        self: &Arc<Self>,
        generation: u64,
        token: &CancellationToken,
        host: &dyn HostWindow,
        content: &PanelContent,
        settings: KeyHintSettings,
    ) {
        let guard = self.state.lock();
        let replaced = {
            let mut state = guard.borrow_mut();
            if token.is_cancelled() || state.generation != generation {
                trace!(generation, "stale display job");
                return;
            }
            state.pending = None;
            state.visible.take()
        };
        if let Some(previous) = replaced {
            trace!(generation = previous.generation, "replacing visible panel");
            previous.handle.close();
        }

        let size = self.surface.panel_size(content);
        let placement = placement(settings.position, host.content_bounds(), size);
        let options = ShowOptions {
            cancel_on_click_outside: settings.cancel_on_click_outside,
        };
        let weak = Arc::downgrade(self);
        let handle = self.surface.show(
            host,
            content,
            placement,
            options,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.closed_by_surface(generation);
                }
            }),
        );
        // The surface may have called back into the scheduler while showing.
        let current = !token.is_cancelled() && guard.borrow().generation == generation;
        if !current {
            debug!(generation, "display superseded while showing; closing it");
            handle.close();
            return;
        }
        guard.borrow_mut().visible = Some(VisiblePanel { generation, handle });
        debug!(generation, ?placement, "key hint panel shown");

        let weak = Arc::downgrade(self);
        self.dismiss.arm(settings.dismiss_timeout, move || {
            dispatch_upgraded(&weak, move |inner| inner.dismiss_expired(generation));
        });
    }

    fn hide(&self) {
        let guard = self.state.lock();
        let (pending, visible) = {
            let mut state = guard.borrow_mut();
            state.generation = state.generation.wrapping_add(1);
            (state.pending.take(), state.visible.take())
        };
        if let Some(pending) = pending {
            pending.token.cancel();
            trace!("cancelled pending display");
        }
        self.dismiss.cancel();
        if let Some(panel) = visible {
            panel.handle.close();
            debug!(generation = panel.generation, "key hint panel hidden");
        }
    }

    fn dismiss_expired(&self, generation: u64) {
        let guard = self.state.lock();
        let current = {
            let state = guard.borrow();
            state.generation == generation
                && state.visible.as_ref().is_some_and(|panel| panel.generation == generation)
        };
        if current {
            debug!(generation, "key hint panel timed out");
            self.hide();
        } else {
            trace!(generation, "ignoring stale dismiss");
        }
    }

    fn closed_by_surface(&self, generation: u64) {
        let guard = self.state.lock();
        let closed = {
            let mut state = guard.borrow_mut();
            match state.visible.as_ref() {
                Some(panel) if panel.generation == generation => state.visible.take(),
                _ => None,
            }
        };
        if closed.is_some() {
            self.dismiss.cancel();
            debug!(generation, "key hint panel closed by surface");
        }
    }
}

fn dispatch_upgraded(weak: &Weak<Inner>, job: impl FnOnce(&Inner) + Send + 'static) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let dispatcher = inner.dispatcher.clone();
    dispatcher.dispatch(Box::new(move || job(&*inner)));
}
