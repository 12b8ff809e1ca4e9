//! Terminal input and frame timing, merged into one channel.
//!
//! A background task reads crossterm events and two timers: the tick that
//! expires toasts and spins the throbber, and the render clock. The app
//! loop only ever awaits [`EventReader::next`].

use std::io;
use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// The terminal changed size; the next draw picks up the new area.
    Resize,
    Tick,
    Render,
}

/// How often the reader emits `Tick` and `Render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRates {
    pub tick: Duration,
    pub render: Duration,
}

/// Keep key presses and resizes. Releases, repeats, mouse, focus and
/// paste events are dropped.
fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(..) => Some(Event::Resize),
        _ => None,
    }
}

/// Forward `input` and the timers to `tx` until cancelled or the receiver
/// is gone. Late timer ticks are skipped, not replayed.
async fn pump<S>(
    mut input: S,
    rates: EventRates,
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
) where
    S: Stream<Item = io::Result<CrosstermEvent>> + Unpin,
{
    let mut tick = interval(rates.tick);
    let mut render = interval(rates.render);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    render.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = tick.tick() => Event::Tick,
            _ = render.tick() => Event::Render,
            Some(Ok(raw)) = input.next() => match translate(raw) {
                Some(event) => event,
                None => continue,
            },
        };
        if tx.send(event).is_err() {
            break;
        }
    }
}

/// Owns the background reader; dropping it stops the task.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Start reading the terminal at the given rates.
    pub fn new(rates: EventRates) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(EventStream::new(), rates, tx, cancel.clone()));
        Self { rx, cancel }
    }

    /// Next event, or `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
