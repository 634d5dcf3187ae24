use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::executor::runtime_handle;

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    armed: Option<CancellationToken>,
}

/// One-shot countdown that closes the visible panel after inactivity.
///
/// At most one countdown is armed at a time. Each arm gets a generation; an expiring
/// task only fires if its generation is still the armed one, so a cancel or re-arm
/// that wins the slot lock always suppresses the old callback.
#[derive(Debug, Default)]
pub struct DismissTimer {
    slot: Arc<Mutex<Slot>>,
}

impl DismissTimer {
    pub fn new() -> Self { Self::default() }

    /// Arms the countdown, cancelling any previous one first. A zero timeout leaves
    /// the timer disarmed. Returns whether a countdown was armed.
    pub fn arm(&self, timeout: Duration, on_expire: impl FnOnce() + Send + 'static) -> bool {
        self.cancel();
        if timeout.is_zero() {
            trace!("dismiss timeout disabled");
            return false;
        }

        let token = CancellationToken::new();
        let generation = {
            let mut slot = self.slot.lock();
            slot.generation = slot.generation.wrapping_add(1);
            slot.armed = Some(token.clone());
            slot.generation
        };
        trace!(generation, ?timeout, "dismiss timer armed");

        let slot = self.slot.clone();
        runtime_handle().spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(timeout) => {}
            }
            let fire = {
                let mut slot = slot.lock();
                if slot.generation == generation && slot.armed.is_some() && !token.is_cancelled() {
                    slot.armed = None;
                    true
                } else {
                    false
                }
            };
            if fire {
                trace!(generation, "dismiss timer expired");
                on_expire();
            }
        });
        true
    }

    /// Disarms the countdown. Returns whether one was armed.
    pub fn cancel(&self) -> bool {
        let Some(token) = self.slot.lock().armed.take() else {
            return false;
        };
        token.cancel();
        true
    }

    pub fn is_armed(&self) -> bool { self.slot.lock().armed.is_some() }
}

impl Drop for DismissTimer {
    fn drop(&mut self) { self.cancel(); }
}
