//! Maps key and mouse events onto deck and feed mutations.
//!
//! A left press in the strip opens a pointer session but does not touch
//! the engine; the session is promoted to a drag on the first actual
//! movement, so a motionless press-and-release stays a click. Velocity
//! samples follow the pointer, not the engine, and are read out once at
//! release.

use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::core::feed::{CardItem, Slot};
use crate::ui::deck_widget::{card_geometry, pager_hit, strip_inner};
use crate::ui::layout::AppLayout;

use super::state::{AppState, FeedTab, PointerSession};

/// Resize events are frequent while the user drags the terminal corner;
/// the recenter snap waits for this long a quiet period.
const RESIZE_SNAP_DELAY: Duration = Duration::from_millis(150);

// ── keys ────────────────────────────────────────────────────────

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Enhanced-mode terminals report releases too; act on press/repeat.
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            state.should_quit = true;
        }
        KeyCode::Left | KeyCode::Char('h') => {
            step(state, -1);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            step(state, 1);
        }
        KeyCode::Home => {
            let deck = &mut state.tab_state_mut().deck;
            deck.move_to_index(0, Instant::now());
        }
        KeyCode::End => {
            let deck = &mut state.tab_state_mut().deck;
            deck.move_to_index(deck.max_index() as isize, Instant::now());
        }
        KeyCode::Tab | KeyCode::Char('t') => {
            select_tab(state, state.tab.other());
        }
        KeyCode::Enter => {
            activate_focused(state);
        }
        KeyCode::Char('r') => {
            state.tab_state_mut().begin_refresh();
            state.status_message = Some(format!("Refreshing {}…", state.tab.title()));
        }
        _ => {}
    }
}

/// Move the active card by `delta` positions.
fn step(state: &mut AppState, delta: isize) {
    let deck = &mut state.tab_state_mut().deck;
    let target = deck.active_index() as isize + delta;
    deck.move_to_index(target, Instant::now());
}

/// Bring `tab` on screen, kicking off its first fetch if it has never
/// loaded anything.
fn select_tab(state: &mut AppState, tab: FeedTab) {
    state.tab = tab;
    let ts = state.tab_state_mut();
    if ts.feed.items.is_empty() && !ts.feed.loading && ts.feed.has_more {
        ts.fetch_requested = true;
    }
}

/// Enter (or a click on the centered card): open a job, or follow the
/// end-card's pointer to the other tab.
fn activate_focused(state: &mut AppState) {
    let ts = state.tab_state();
    let placeholders = ts.deck.tuning().placeholder_cards;
    let active = ts.deck.active_index();

    let mut switch = false;
    let mut message = None;
    match ts.feed.slot(active, placeholders) {
        Some(Slot::Card(CardItem::Job(job))) => {
            message = Some(format!("Viewing \"{}\" at {}", job.title, job.org));
        }
        Some(Slot::Card(CardItem::Ad(ad))) => {
            message = Some(format!("Sponsored listing from {}", ad.sponsor));
        }
        Some(Slot::End) => switch = true,
        Some(Slot::Placeholder) | None => {}
    }

    if switch {
        select_tab(state, state.tab.other());
    }
    if message.is_some() {
        state.status_message = message;
    }
}

// ── mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let layout = AppLayout::from_area(state.terminal_area);
    let now = Instant::now();

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if point_in_rect(layout.header_area, mouse.column, mouse.row) {
                if let Some(tab) = header_tab_at(mouse.column) {
                    select_tab(state, tab);
                }
                return;
            }
            if point_in_rect(layout.pager_area, mouse.column, mouse.row) {
                let deck = &state.tab_state().deck;
                if let Some(dot) = pager_hit(deck, layout.pager_area, mouse.column) {
                    state.tab_state_mut().deck.move_to_index(dot as isize, now);
                }
                return;
            }
            if !point_in_rect(layout.deck_area, mouse.column, mouse.row) {
                return;
            }
            let offset = state.tab_state().deck.offset();
            state.pointer = Some(PointerSession::begin(mouse.column, offset, now));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let Some(session) = state.pointer.as_mut() else {
                return;
            };
            session.tracker.push(f32::from(mouse.column), now);
            if !session.moved && mouse.column == session.anchor_col {
                return;
            }
            let first_movement = !session.moved;
            session.moved = true;
            let target = session.offset_at(mouse.column);

            let deck = &mut state.tab_state_mut().deck;
            if first_movement {
                deck.drag_start();
            }
            deck.drag_move(target, now);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(session) = state.pointer.take() else {
                return;
            };
            if session.moved {
                let release = session.offset_at(mouse.column);
                let velocity = session.tracker.velocity(now);
                state.tab_state_mut().deck.drag_end(release, velocity, now);
            } else {
                handle_click(state, mouse.column, mouse.row, now);
            }
        }
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => {
            step(state, -1);
        }
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => {
            step(state, 1);
        }
        _ => {}
    }
}

/// A press-and-release that never moved: focus the card under the
/// pointer, or activate it if it is already centered.
fn handle_click(state: &mut AppState, col: u16, row: u16, now: Instant) {
    let layout = AppLayout::from_area(state.terminal_area);
    let inner = strip_inner(layout.deck_area);

    let ts = state.tab_state();
    let boxes = card_geometry(&ts.deck, inner);

    // Cards overlap near the center; the topmost one under the pointer wins.
    let hit = boxes
        .iter()
        .filter(|b| point_in_rect(b.area, col, row))
        .max_by_key(|b| b.visual.z_index)
        .map(|b| b.index);

    let Some(index) = hit else {
        return;
    };

    if index == ts.deck.active_index() {
        activate_focused(state);
    } else {
        state.tab_state_mut().deck.move_to_index(index as isize, now);
    }
}

/// Which tab title sits under this column in the header row.
///
/// Must mirror the header rendering: one space of padding around each
/// title, jobs first.
fn header_tab_at(col: u16) -> Option<FeedTab> {
    let jobs_end = FeedTab::Jobs.title().len() as u16 + 2;
    let apps_end = jobs_end + FeedTab::Applications.title().len() as u16 + 2;
    if col < jobs_end {
        Some(FeedTab::Jobs)
    } else if col < apps_end {
        Some(FeedTab::Applications)
    } else {
        None
    }
}

// ── ticks & resize ──────────────────────────────────────────────

/// Advance animations, run debounced resize snaps, and surface
/// pagination requests. Called on every frame tick.
pub fn handle_tick(state: &mut AppState) {
    state.tick = state.tick.wrapping_add(1);
    let now = Instant::now();

    if let Some(at) = state.pending_resize {
        if now.duration_since(at) >= RESIZE_SNAP_DELAY {
            sync_viewport(state);
            // Busy decks refuse the snap; keep the request pending and
            // retry next tick rather than yanking a live gesture.
            let jobs = state.jobs.deck.resize_snap();
            let apps = state.applications.deck.resize_snap();
            if jobs && apps {
                state.pending_resize = None;
            }
        }
    }

    // Both decks tick; the background tab finishes its settles off
    // screen and its pagination requests still count.
    for tab in [FeedTab::Jobs, FeedTab::Applications] {
        let ts = state.tab_state_for(tab);
        let outcome = ts.deck.tick(now);
        if outcome.load_more {
            ts.fetch_requested = true;
        }
    }
}

/// Push the measured strip width into both engines. Bounds follow the
/// terminal immediately; only the recenter snap is debounced.
pub fn sync_viewport(state: &mut AppState) {
    let layout = AppLayout::from_area(state.terminal_area);
    let inner = strip_inner(layout.deck_area);
    let width = f32::from(inner.width);
    for tab in [FeedTab::Jobs, FeedTab::Applications] {
        state.tab_state_for(tab).deck.apply_viewport(width);
    }
}

fn point_in_rect(area: ratatui::layout::Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

// ───────────────────────── tests ─────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::feed_runtime::FeedParams;
    use crate::config::AppConfig;
    use crate::core::feed::JobCard;
    use chrono::Utc;
    use ratatui::layout::Rect;

    fn test_state(real_cards: usize) -> AppState {
        let params = FeedParams {
            seed: 1,
            total: real_cards,
            page_size: real_cards.max(1),
            latency_ms: 0,
            ads: false,
            flaky: false,
        };
        let mut state = AppState::new(FeedTab::Jobs, AppConfig::default(), params);
        state.terminal_area = Rect::new(0, 0, 80, 24);
        sync_viewport(&mut state);

        let items = (0..real_cards)
            .map(|i| {
                CardItem::Job(JobCard {
                    title: format!("job {i}"),
                    org: "Acme".into(),
                    location: "Remote".into(),
                    salary: "$100k".into(),
                    tags: vec![],
                    posted_at: Utc::now(),
                    stage: None,
                })
            })
            .collect();
        state.jobs.feed.append_page(items, true);
        state.jobs.deck.sync_feed(&state.jobs.feed);
        state
    }

    fn left(kind: fn(MouseButton) -> MouseEventKind, col: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: kind(MouseButton::Left),
            column: col,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn a_motionless_press_and_release_is_not_a_drag() {
        let mut state = test_state(5);
        handle_mouse(&mut state, left(MouseEventKind::Down, 40, 10));
        assert!(state.pointer.is_some());
        assert!(!state.jobs.deck.is_dragging());

        handle_mouse(&mut state, left(MouseEventKind::Up, 40, 10));
        assert!(state.pointer.is_none());
        assert!(!state.jobs.deck.is_dragging());
    }

    #[test]
    fn movement_promotes_the_session_to_a_drag() {
        let mut state = test_state(5);
        handle_mouse(&mut state, left(MouseEventKind::Down, 40, 10));
        handle_mouse(&mut state, left(MouseEventKind::Drag, 30, 10));
        assert!(state.jobs.deck.is_dragging());

        handle_mouse(&mut state, left(MouseEventKind::Up, 28, 10));
        assert!(!state.jobs.deck.is_dragging());
        assert!(state.jobs.deck.is_animating());
    }

    #[test]
    fn scroll_steps_one_card() {
        let mut state = test_state(5);
        let scroll = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 40,
            row: 10,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(&mut state, scroll);
        assert_eq!(state.jobs.deck.active_index(), 1);
    }

    #[test]
    fn switching_to_an_unloaded_tab_requests_its_first_page() {
        let mut state = test_state(5);
        assert!(!state.applications.fetch_requested);
        select_tab(&mut state, FeedTab::Applications);
        assert_eq!(state.tab, FeedTab::Applications);
        assert!(state.applications.fetch_requested);
    }

    #[test]
    fn header_hit_ranges_cover_both_titles() {
        assert_eq!(header_tab_at(1), Some(FeedTab::Jobs));
        assert_eq!(header_tab_at(5), Some(FeedTab::Jobs));
        assert_eq!(header_tab_at(7), Some(FeedTab::Applications));
        assert_eq!(header_tab_at(60), None);
    }
}
