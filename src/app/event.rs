//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task
//! that forwards them over a channel so the main loop stays non-blocking.
//! Ticks fire on a fixed deadline rather than after a quiet period:
//! settle animations and the resize debounce need frames to keep coming
//! even while pointer events stream in during a drag.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

/// Spawns a background task that polls the terminal for events and sends
/// them through the returned channel, interleaving a `Tick` every
/// `tick_rate` regardless of input pressure.
pub fn spawn_event_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut next_tick = Instant::now() + tick_rate;
        loop {
            // Poll only until the next tick deadline so a stream of
            // mouse-drag events cannot starve the animation clock.
            let timeout = next_tick.saturating_duration_since(Instant::now());
            let has_event = event::poll(timeout).unwrap_or(false);
            if has_event {
                if let Ok(ev) = event::read() {
                    let app_event = match ev {
                        CtEvent::Key(k) => AppEvent::Key(k),
                        CtEvent::Mouse(m) => AppEvent::Mouse(m),
                        CtEvent::Resize(w, h) => AppEvent::Resize(w, h),
                        _ => continue,
                    };
                    if tx.send(app_event).is_err() {
                        break; // receiver dropped
                    }
                }
            }
            if Instant::now() >= next_tick {
                if tx.send(AppEvent::Tick).is_err() {
                    break;
                }
                next_tick += tick_rate;
                // After a stall, re-anchor instead of firing catch-up ticks.
                if next_tick < Instant::now() {
                    next_tick = Instant::now() + tick_rate;
                }
            }
        }
    });

    rx
}
