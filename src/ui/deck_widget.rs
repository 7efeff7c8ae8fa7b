//! The card strip widget: projects engine offsets onto terminal cells.
//!
//! One engine unit is one column. Each card's rectangle is derived from
//! the strip offset plus its tier visuals: scale shrinks the box around
//! its own center, translate-y sinks it by a few rows, and z-order
//! decides paint order so overlapping neighbours stack under the
//! centered card.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, StatefulWidget, Widget},
};

use crate::core::deck::DeckState;
use crate::core::feed::FeedState;
use crate::core::tiers::CardVisual;

use super::cards;
use super::theme::Theme;

/// Engine translate-y is calibrated for pixel layouts; terminal rows are
/// about this many pixels tall.
const ROWS_PER_UNIT: f32 = 4.0;

/// A card's resolved screen rectangle, used for painting and hit tests.
#[derive(Debug, Clone, Copy)]
pub struct CardBox {
    pub index: usize,
    pub area: Rect,
    pub visual: CardVisual,
}

/// Drawable region inside the strip's border. Hit testing must use the
/// same inset the widget draws with.
pub fn strip_inner(deck_area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(deck_area)
}

/// Resolve every slot to a screen rectangle, clipped to `inner`.
/// Off-screen and sub-minimum boxes are dropped.
pub fn card_geometry(deck: &DeckState, inner: Rect) -> Vec<CardBox> {
    let total = deck.total_slots();
    if total == 0 || inner.width == 0 || inner.height < 3 {
        return Vec::new();
    }

    let geo = deck.geometry();
    let offset = deck.offset();
    let strip_h = f32::from(inner.height);

    let mut boxes = Vec::new();
    for index in 0..total {
        let visual = deck.visual(index);
        let left = offset + index as f32 * geo.stride();

        let w = geo.card_width * visual.scale;
        let h = (strip_h * visual.scale).max(3.0);
        let x = left + (geo.card_width - w) / 2.0;
        let y = (strip_h - h) / 2.0 + visual.translate_y / ROWS_PER_UNIT;

        let x0 = inner.x as i32 + x.round() as i32;
        let x1 = x0 + w.round() as i32;
        let y0 = inner.y as i32 + y.round() as i32;
        let y1 = y0 + h.round() as i32;

        let cx0 = x0.max(inner.x as i32);
        let cx1 = x1.min(i32::from(inner.x) + i32::from(inner.width));
        let cy0 = y0.max(inner.y as i32);
        let cy1 = y1.min(i32::from(inner.y) + i32::from(inner.height));
        if cx1 - cx0 < 4 || cy1 - cy0 < 3 {
            continue;
        }

        boxes.push(CardBox {
            index,
            area: Rect::new(cx0 as u16, cy0 as u16, (cx1 - cx0) as u16, (cy1 - cy0) as u16),
            visual,
        });
    }
    boxes
}

// ───────────────────────────────────────── widget ────────────

/// Strip widget, rebuilt each frame and positioned by the engine
/// state it renders with.
pub struct DeckWidget<'a> {
    feed: &'a FeedState,
    tick: u64,
    other_tab: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> DeckWidget<'a> {
    pub fn new(feed: &'a FeedState) -> Self {
        Self {
            feed,
            tick: 0,
            other_tab: "",
            block: None,
        }
    }

    /// Frame counter; drives the skeleton shimmer.
    pub fn tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }

    /// Name the end-card points at.
    pub fn other_tab(mut self, name: &'a str) -> Self {
        self.other_tab = name;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl<'a> StatefulWidget for DeckWidget<'a> {
    type State = DeckState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.feed.is_idle_empty() {
            let hint = "Nothing here yet · press r to refresh";
            let hint_width = hint.chars().count() as u16;
            let x = inner.x + inner.width.saturating_sub(hint_width) / 2;
            let y = inner.y + inner.height / 2;
            let line = Line::from(Span::styled(hint, Theme::hint_style()));
            buf.set_line(x, y, &line, inner.width);
            return;
        }

        let mut boxes = card_geometry(state, inner);
        // Paint back-to-front; the active card's z puts it on top.
        boxes.sort_by_key(|b| b.visual.z_index);

        let placeholders = state.tuning().placeholder_cards;
        for b in &boxes {
            if let Some(slot) = self.feed.slot(b.index, placeholders) {
                cards::render_slot(slot, b.visual, self.tick, self.other_tab, b.area, buf);
            }
        }
    }
}

// ───────────────────────────────────────── pager ─────────────

/// One dot per slot, the active one emphasised; collapses to a
/// `current / total` counter when the dots outgrow the row.
pub struct PagerDots<'a> {
    deck: &'a DeckState,
}

impl<'a> PagerDots<'a> {
    pub fn new(deck: &'a DeckState) -> Self {
        Self { deck }
    }
}

impl<'a> Widget for PagerDots<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let total = self.deck.total_slots();
        if total == 0 || area.height == 0 || area.width == 0 {
            return;
        }
        let active = self.deck.active_index();

        if let Some(start_x) = dot_origin(total, area) {
            for i in 0..total {
                let (symbol, style) = if i == active {
                    ("●", Theme::pager_active_style())
                } else {
                    ("·", Theme::pager_style())
                };
                buf.set_string(start_x + (2 * i) as u16, area.y, symbol, style);
            }
        } else {
            let text = format!("{} / {total}", active + 1);
            let x = area.x + area.width.saturating_sub(text.len() as u16) / 2;
            buf.set_string(x, area.y, text, Theme::pager_style());
        }
    }
}

/// Leftmost column of the dot run, or `None` when the dots don't fit
/// and the counter is shown instead.
fn dot_origin(total: usize, area: Rect) -> Option<u16> {
    let needed = total * 2 - 1;
    if needed > area.width as usize {
        return None;
    }
    Some(area.x + (area.width - needed as u16) / 2)
}

/// Which dot a click on the pager row lands on. Gap cells resolve to
/// the nearest dot on the right; the counter form takes no clicks.
pub fn pager_hit(deck: &DeckState, area: Rect, col: u16) -> Option<usize> {
    let total = deck.total_slots();
    if total == 0 || area.width == 0 {
        return None;
    }
    let start_x = dot_origin(total, area)?;
    if col < start_x {
        return None;
    }
    let rel = (col - start_x) as usize;
    if rel >= total * 2 - 1 {
        return None;
    }
    Some((rel + 1) / 2)
}

// ───────────────────────── tests ─────────────────────────
