//! Serialized execution contexts for panel side effects.
//!
//! Showing and closing panels must never race with the host's own key handling, so
//! every such mutation is funneled through a [`Dispatcher`]. Hosts with a native UI
//! loop implement the trait over that loop; [`MainQueue`] provides a dedicated
//! thread for hosts without one.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread::{self, JoinHandle, ThreadId};

use crossbeam_channel::{Sender, unbounded};
use once_cell::sync::Lazy;
use tracing::{error, trace, warn};

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A single serialized context that runs jobs one at a time, in submission order.
pub trait Dispatcher: Send + Sync + 'static {
    fn dispatch(&self, job: Job);
}

/// Runs each job immediately on the calling thread.
///
/// Suitable when every caller already runs on the host's UI thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineDispatcher;

impl Dispatcher for InlineDispatcher {
    fn dispatch(&self, job: Job) { job(); }
}

/// A dedicated thread draining jobs in FIFO order.
///
/// A panicking job is logged and does not take the queue down. Dropping the queue
/// runs every job already submitted, then joins the thread.
pub struct MainQueue {
    tx: Option<Sender<Job>>,
    thread: Option<JoinHandle<()>>,
    thread_id: ThreadId,
}

impl MainQueue {
    pub fn new(name: impl Into<String>) -> std::io::Result<Self> {
        let (tx, rx) = unbounded::<Job>();
        let name = name.into();
        let thread = thread::Builder::new().name(name.clone()).spawn(move || {
            for job in rx {
                if catch_unwind(AssertUnwindSafe(job)).is_err() {
                    error!(queue = %name, "dispatched job panicked");
                }
            }
            trace!(queue = %name, "main queue drained");
        })?;
        let thread_id = thread.thread().id();
        Ok(Self {
            tx: Some(tx),
            thread: Some(thread),
            thread_id,
        })
    }

    /// Whether the caller is running on this queue's thread.
    pub fn is_current(&self) -> bool { thread::current().id() == self.thread_id }
}

impl Dispatcher for MainQueue {
    fn dispatch(&self, job: Job) {
        let Some(tx) = self.tx.as_ref() else {
            return;
        };
        if tx.send(job).is_err() {
            warn!("main queue has shut down; dropping job");
        }
    }
}

impl Drop for MainQueue {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(thread) = self.thread.take() {
            // A job that drops the last reference to its own queue cannot join itself.
            if thread.thread().id() != thread::current().id() {
                _ = thread.join();
            }
        }
    }
}

static SHARED_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(1)
        .thread_name("keyhint-timers")
        .build()
        .expect("failed to build keyhint timer runtime")
});

/// Handle used to spawn debounce and dismiss waits: the ambient runtime when there
/// is one, otherwise a small shared runtime owned by this crate.
pub fn runtime_handle() -> tokio::runtime::Handle {
    tokio::runtime::Handle::try_current().unwrap_or_else(|_| SHARED_RUNTIME.handle().clone())
}
