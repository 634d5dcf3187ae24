//! Channel plumbing for actors. Every event travels with the span that was current
//! when it was sent, so the receiving side can log under the sender's context.

use tokio::sync::mpsc;
use tracing::Span;

pub mod key_hint;

pub struct Sender<Event>(mpsc::UnboundedSender<(Span, Event)>);

pub type Receiver<Event> = mpsc::UnboundedReceiver<(Span, Event)>;

impl<Event> Sender<Event> {
    pub fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.0
            .send((Span::current(), event))
            .map_err(|mpsc::error::SendError((_, event))| mpsc::error::SendError(event))
    }

    pub fn is_closed(&self) -> bool { self.0.is_closed() }
}

impl<Event> Clone for Sender<Event> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<Event> std::fmt::Debug for Sender<Event> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Sender").finish_non_exhaustive()
    }
}

pub fn channel<Event>() -> (Sender<Event>, Receiver<Event>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Sender(tx), rx)
}
