mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FakeHost, FakeSurface, SurfaceEvent, candidates, config, scheduler};
use keyhint::actor;
use keyhint::actor::key_hint::{DisplayRequest, Event, KeyHintActor};
use keyhint::sys::executor::InlineDispatcher;
use pretty_assertions::assert_eq;
use tokio::time::sleep;

#[test_log::test(tokio::test(start_paused = true))]
async fn dismiss_event_cancels_pending_show() {
    let surface = FakeSurface::new(50);
    let (tx, rx) = actor::channel();
    let actor = KeyHintActor::new(rx, scheduler(&surface, config(""), Arc::new(InlineDispatcher)));
    let task = tokio::spawn(actor.run());
    let host = FakeHost::new(400, 300);

    tx.send(Event::Show(DisplayRequest::new(host.clone(), "g", candidates(&[("g", "top", false)]))))
        .unwrap();
    tx.send(Event::Dismiss).unwrap();
    sleep(Duration::from_secs(2)).await;
    assert_eq!(surface.events(), vec![]);

    tx.send(Event::Show(DisplayRequest::new(host, "d", candidates(&[("d", "delete", false)]))))
        .unwrap();
    sleep(Duration::from_millis(250)).await;
    assert_eq!(surface.events(), vec![SurfaceEvent::Shown(1)]);

    // Closing the channel stops the actor and takes the panel down with it.
    drop(tx);
    task.await.unwrap();
    assert_eq!(surface.events(), vec![SurfaceEvent::Shown(1), SurfaceEvent::Closed(1)]);
}

#[tokio::test(start_paused = true)]
async fn send_after_shutdown_returns_event() {
    let (tx, rx) = actor::channel::<Event>();
    drop(rx);
    assert!(tx.is_closed());
    assert!(matches!(tx.send(Event::Dismiss), Err(err) if matches!(err.0, Event::Dismiss)));
}
