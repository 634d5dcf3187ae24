#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use keyhint::common::config::{ConfigService, TomlConfig};
use keyhint::model::{Candidate, CandidateSet, MappingEntry};
use keyhint::sys::executor::Dispatcher;
use keyhint::sys::geometry::{Point, Rect, Size};
use keyhint::ui::panel::PanelContent;
use keyhint::ui::surface::{AutoClose, HostWindow, PanelHandle, Placement, RenderingSurface, ShowOptions};
use keyhint::DisplayScheduler;
use parking_lot::Mutex;

pub const ROW_HEIGHT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Shown(usize),
    Closed(usize),
}

#[derive(Debug, Clone)]
pub struct Shown {
    pub id: usize,
    pub content: PanelContent,
    pub placement: Placement,
    pub options: ShowOptions,
    pub thread: Option<String>,
}

struct Gate {
    entered: mpsc::Sender<()>,
    release: Mutex<mpsc::Receiver<()>>,
}

pub struct GateControl {
    pub entered: mpsc::Receiver<()>,
    pub release: mpsc::Sender<()>,
}

/// Records every show and close. Every entry measures `entry_width` pixels.
pub struct FakeSurface {
    entry_width: u32,
    log: Arc<Mutex<Vec<SurfaceEvent>>>,
    shown: Mutex<Vec<Shown>>,
    panels: Mutex<Vec<(Arc<AtomicBool>, Option<AutoClose>)>>,
    on_show: Mutex<Option<Box<dyn FnOnce() + Send>>>,
    gate: Option<Gate>,
}

impl FakeSurface {
    pub fn new(entry_width: u32) -> Arc<Self> {
        Arc::new(Self {
            entry_width,
            log: Arc::default(),
            shown: Mutex::default(),
            panels: Mutex::default(),
            on_show: Mutex::default(),
            gate: None,
        })
    }

    /// A surface whose `show` blocks until released through the returned control.
    pub fn gated(entry_width: u32) -> (Arc<Self>, GateControl) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let surface = Arc::new(Self {
            entry_width,
            log: Arc::default(),
            shown: Mutex::default(),
            panels: Mutex::default(),
            on_show: Mutex::default(),
            gate: Some(Gate {
                entered: entered_tx,
                release: Mutex::new(release_rx),
            }),
        });
        (surface, GateControl { entered: entered_rx, release: release_tx })
    }

    /// Runs `hook` from inside the next `show`, before it returns its handle.
    pub fn on_next_show(&self, hook: impl FnOnce() + Send + 'static) {
        *self.on_show.lock() = Some(Box::new(hook));
    }

    pub fn events(&self) -> Vec<SurfaceEvent> { self.log.lock().clone() }

    pub fn shown(&self) -> Vec<Shown> { self.shown.lock().clone() }

    pub fn last_shown(&self) -> Shown { self.shown().pop().expect("no panel was shown") }

    /// Number of panels currently on screen.
    pub fn visible(&self) -> usize {
        self.panels.lock().iter().filter(|(closed, _)| !closed.load(Ordering::SeqCst)).count()
    }

    /// Simulates the user clicking outside panel `id`: the surface closes it on its
    /// own and reports back.
    pub fn click_outside(&self, id: usize) {
        let callback = {
            let mut panels = self.panels.lock();
            let (closed, callback) = &mut panels[id - 1];
            if !closed.swap(true, Ordering::SeqCst) {
                self.log.lock().push(SurfaceEvent::Closed(id));
            }
            callback.take()
        };
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl RenderingSurface for FakeSurface {
    fn measure_width(&self, _fragment: &str) -> u32 { self.entry_width }

    fn panel_size(&self, content: &PanelContent) -> Size {
        let columns = content.rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let footer = u32::from(content.typed_sequence.is_some());
        Size::new(
            content.column_width_px * columns,
            (content.rows.len() as u32 + footer) * ROW_HEIGHT,
        )
    }

    fn show(
        &self,
        _host: &dyn HostWindow,
        content: &PanelContent,
        placement: Placement,
        options: ShowOptions,
        on_auto_close: AutoClose,
    ) -> Box<dyn PanelHandle> {
        let closed = Arc::new(AtomicBool::new(false));
        let id = {
            let mut panels = self.panels.lock();
            panels.push((closed.clone(), Some(on_auto_close)));
            panels.len()
        };
        self.log.lock().push(SurfaceEvent::Shown(id));
        self.shown.lock().push(Shown {
            id,
            content: content.clone(),
            placement,
            options,
            thread: std::thread::current().name().map(str::to_owned),
        });

        let hook = self.on_show.lock().take();
        if let Some(hook) = hook {
            hook();
        }

        if let Some(gate) = &self.gate {
            _ = gate.entered.send(());
            _ = gate.release.lock().recv_timeout(Duration::from_secs(10));
        }

        Box::new(FakePanel { id, closed, log: self.log.clone() })
    }
}

struct FakePanel {
    id: usize,
    closed: Arc<AtomicBool>,
    log: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl PanelHandle for FakePanel {
    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.log.lock().push(SurfaceEvent::Closed(self.id));
        }
    }
}

pub struct FakeHost {
    pub bounds: Rect,
}

impl FakeHost {
    pub fn new(width: u32, height: u32) -> Arc<Self> {
        Arc::new(Self {
            bounds: Rect::new(Point::new(0, 0), Size::new(width, height)),
        })
    }
}

impl HostWindow for FakeHost {
    fn content_bounds(&self) -> Rect { self.bounds }
}

pub fn config(text: &str) -> Arc<dyn ConfigService> {
    Arc::new(text.parse::<TomlConfig>().expect("valid test config"))
}

pub fn scheduler(
    surface: &Arc<FakeSurface>,
    config: Arc<dyn ConfigService>,
    dispatcher: Arc<dyn Dispatcher>,
) -> DisplayScheduler {
    DisplayScheduler::new(surface.clone(), config, dispatcher)
}

pub fn candidates(entries: &[(&str, &str, bool)]) -> CandidateSet {
    entries
        .iter()
        .map(|&(key, description, is_prefix)| {
            Candidate::from(MappingEntry::new(key, description, is_prefix))
        })
        .collect()
}

pub fn entry(key: &str, description: &str, is_prefix: bool) -> String {
    keyhint::ui::panel::render_entry(&Candidate::from(MappingEntry::new(
        key,
        description,
        is_prefix,
    )))
}
