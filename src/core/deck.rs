//! Drag, momentum, and settle control for one card strip.
//!
//! The offset is the authoritative value while a pointer is down and
//! the active index is derived from it; when settling, the relationship
//! inverts: the landing index is chosen first and the offset glides to
//! its centered position. At most one offset-mutating operation is in
//! flight at a time: a drag or a settle owns the offset until it ends,
//! and programmatic moves issued meanwhile are dropped, not queued.

use std::time::{Duration, Instant};

use tracing::debug;

use super::easing::SettleTween;
use super::feed::{self, FeedState};
use super::geometry::{OffsetBounds, StripGeometry};
use super::tiers::{self, CardVisual};

/// Live drag previews re-resolve the active index at most this often.
const PREVIEW_INTERVAL: Duration = Duration::from_millis(16);

/// Interaction constants, all in the same units as the geometry.
///
/// Defaults are calibrated for pixel-sized layouts; terminal hosts
/// supply column-sized values through their config.
#[derive(Debug, Clone, Copy)]
pub struct DeckTuning {
    /// Release speed (units/s) beyond which the flick direction
    /// overrides the nearest snap by one card.
    pub momentum_threshold: f32,
    /// Settle duration starts here and shortens as the flick speeds up.
    pub settle_base_ms: f32,
    pub settle_min_ms: f32,
    pub settle_max_ms: f32,
    /// Milliseconds shaved off the settle per unit/s of release speed.
    pub settle_shorten: f32,
    /// Duration of programmatic (click/key) moves.
    pub step_duration_ms: u64,
    /// Settling within this many cards of the loaded end requests more.
    pub lookahead: usize,
    /// Skeleton slots appended while a fetch is in flight.
    pub placeholder_cards: usize,
}

impl Default for DeckTuning {
    fn default() -> Self {
        Self {
            momentum_threshold: 300.0,
            settle_base_ms: 320.0,
            settle_min_ms: 140.0,
            settle_max_ms: 420.0,
            settle_shorten: 0.25,
            step_duration_ms: 220,
            lookahead: 2,
            placeholder_cards: 2,
        }
    }
}

/// What a completed settle asks of the host.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SettleOutcome {
    /// Index the strip came to rest on, if a settle completed this tick.
    pub settled: Option<usize>,
    /// The landing index qualified for a pagination request.
    pub load_more: bool,
}

/// Positioning state for one strip of cards.
#[derive(Debug, Clone)]
pub struct DeckState {
    geometry: StripGeometry,
    tuning: DeckTuning,
    offset: f32,
    active: usize,
    total_slots: usize,
    real_count: usize,
    loading: bool,
    has_more: bool,
    bounds: OffsetBounds,
    dragging: bool,
    tween: Option<SettleTween>,
    last_preview: Option<Instant>,
}

impl DeckState {
    pub fn new(geometry: StripGeometry, tuning: DeckTuning) -> Self {
        Self {
            geometry,
            tuning,
            offset: geometry.center_position(0),
            active: 0,
            total_slots: 0,
            real_count: 0,
            loading: false,
            has_more: true,
            bounds: geometry.bounds(0),
            dragging: false,
            tween: None,
            last_preview: None,
        }
    }

    // ───────────────────── accessors ─────────────────────

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn total_slots(&self) -> usize {
        self.total_slots
    }

    pub fn max_index(&self) -> usize {
        self.total_slots.saturating_sub(1)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// True while any offset-mutating operation is in flight.
    pub fn is_animating(&self) -> bool {
        self.dragging || self.tween.is_some()
    }

    pub fn geometry(&self) -> StripGeometry {
        self.geometry
    }

    pub fn tuning(&self) -> DeckTuning {
        self.tuning
    }

    /// Rendering treatment for a slot given the current active card.
    pub fn visual(&self, index: usize) -> CardVisual {
        tiers::visual_state(index, self.active)
    }

    // ───────────────────── feed & viewport ─────────────────────

    /// Pick up the provider's latest `items`/`loading`/`has_more`.
    ///
    /// Slot count and bounds follow; an active index left beyond the new
    /// end (the list shrank underneath us) resets to the first card.
    pub fn sync_feed(&mut self, feed: &FeedState) {
        self.real_count = feed.real_count();
        self.loading = feed.loading;
        self.has_more = feed.has_more;
        self.total_slots = feed.total_slots(self.tuning.placeholder_cards);
        self.bounds = self.geometry.bounds(self.max_index());
        if self.active > self.max_index() {
            debug!(
                active = self.active,
                max = self.max_index(),
                "active index went stale, resetting to first card"
            );
            self.snap_to(0);
        }
    }

    /// Track a container resize. Bounds always follow immediately; the
    /// offset snap is the caller's call (debounce, drag suppression).
    pub fn apply_viewport(&mut self, width: f32) {
        self.geometry.set_container_width(width);
        self.bounds = self.geometry.bounds(self.max_index());
    }

    /// Instantly re-center the active card after a resize, unless a drag
    /// or settle owns the offset (their completion re-centers anyway).
    pub fn resize_snap(&mut self) -> bool {
        if self.is_animating() {
            return false;
        }
        self.offset = self.geometry.center_position(self.active);
        debug!(active = self.active, offset = self.offset, "resize snap");
        true
    }

    /// Rest on `index` with no animation.
    pub fn snap_to(&mut self, index: usize) {
        let index = index.min(self.max_index());
        self.tween = None;
        self.dragging = false;
        self.last_preview = None;
        self.active = index;
        self.offset = self.geometry.center_position(index);
    }

    // ───────────────────── drag lifecycle ─────────────────────

    /// Begin a pointer gesture. Any in-flight settle is cancelled; the
    /// new gesture owns the offset now.
    pub fn drag_start(&mut self) {
        self.tween = None;
        self.dragging = true;
        self.last_preview = None;
    }

    /// Live pointer move. Clamps into bounds and, at most once per
    /// frame, re-derives the active index for visual feedback.
    pub fn drag_move(&mut self, offset: f32, now: Instant) {
        if !self.dragging {
            return;
        }
        self.offset = self.bounds.clamp(offset);
        let due = self
            .last_preview
            .map_or(true, |at| now.duration_since(at) >= PREVIEW_INTERVAL);
        if due {
            self.last_preview = Some(now);
            self.active = self.geometry.nearest_index(self.offset, self.max_index());
        }
    }

    /// Release the pointer: pick the landing index (nearest center,
    /// shifted one card against the flick when it beat the momentum
    /// threshold) and start the settle. The active index updates when
    /// the settle completes, not here.
    pub fn drag_end(&mut self, offset: f32, velocity: f32, now: Instant) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.last_preview = None;
        self.offset = self.bounds.clamp(offset);

        let base = self.geometry.nearest_index(self.offset, self.max_index());
        let target = if velocity.abs() > self.tuning.momentum_threshold {
            // Positive velocity moves content right, revealing earlier
            // indices; negative pushes on toward later ones.
            if velocity > 0.0 {
                base.saturating_sub(1)
            } else {
                (base + 1).min(self.max_index())
            }
        } else {
            base
        };
        let duration = self.settle_duration(velocity.abs());
        debug!(base, target, velocity, ?duration, "drag released");
        self.start_settle(target, duration, now);
    }

    // ───────────────────── programmatic moves ─────────────────────

    /// Programmatic focus (card click, key step). Dropped while any
    /// offset-mutating operation is in flight; out-of-range targets are
    /// clamped, and a clamped target equal to the active card is a
    /// no-op. The active index updates immediately, ahead of the glide.
    pub fn move_to_index(&mut self, index: isize, now: Instant) -> bool {
        if self.is_animating() || self.total_slots == 0 {
            return false;
        }
        let clamped = index.clamp(0, self.max_index() as isize) as usize;
        if clamped == self.active {
            return false;
        }
        self.active = clamped;
        let duration = Duration::from_millis(self.tuning.step_duration_ms);
        self.start_settle(clamped, duration, now);
        true
    }

    // ───────────────────── animation ─────────────────────

    /// Advance the settle animation. On completion the strip rests
    /// exactly on the landing index's center and the pagination check
    /// runs for that index.
    pub fn tick(&mut self, now: Instant) -> SettleOutcome {
        let Some(tween) = self.tween else {
            return SettleOutcome::default();
        };
        if !tween.is_done(now) {
            self.offset = tween.sample(now);
            return SettleOutcome::default();
        }
        self.tween = None;
        let landed = tween.index();
        self.active = landed;
        // Recomputed rather than read off the tween: geometry may have
        // changed mid-flight (resize during a settle).
        self.offset = self.geometry.center_position(landed);
        let load_more = feed::load_more_due(
            landed,
            self.real_count,
            self.loading,
            self.has_more,
            self.tuning.lookahead,
        );
        if load_more {
            debug!(landed, "settled near the loaded end, requesting more");
        }
        SettleOutcome {
            settled: Some(landed),
            load_more,
        }
    }

    fn settle_duration(&self, speed: f32) -> Duration {
        let t = &self.tuning;
        let ms = (t.settle_base_ms - t.settle_shorten * speed).clamp(t.settle_min_ms, t.settle_max_ms);
        Duration::from_millis(ms as u64)
    }

    fn start_settle(&mut self, index: usize, duration: Duration, now: Instant) {
        let target = self.geometry.center_position(index);
        self.tween = Some(SettleTween::new(self.offset, target, index, now, duration));
    }
}

// ───────────────────────── tests ─────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::{CardItem, JobCard};
    use chrono::Utc;

    fn job(i: usize) -> CardItem {
        CardItem::Job(JobCard {
            title: format!("job {i}"),
            org: "Acme".into(),
            location: "Remote".into(),
            salary: "$100k".into(),
            tags: vec!["rust".into()],
            posted_at: Utc::now(),
            stage: None,
        })
    }

    fn feed_of(real: usize, has_more: bool) -> FeedState {
        let mut feed = FeedState::new();
        feed.append_page((0..real).map(job).collect(), has_more);
        feed
    }

    /// 320-wide container, 290/12 cards, defaults otherwise.
    fn deck_of(real: usize, has_more: bool) -> DeckState {
        let geo = StripGeometry::new(320.0, 290.0, 12.0, 8.0);
        let mut deck = DeckState::new(geo, DeckTuning::default());
        deck.sync_feed(&feed_of(real, has_more));
        deck
    }

    /// Run the pending settle to completion.
    fn finish(deck: &mut DeckState, now: Instant) -> SettleOutcome {
        deck.tick(now + Duration::from_secs(2))
    }

    #[test]
    fn settling_centers_the_active_card() {
        let now = Instant::now();
        let mut deck = deck_of(8, true);
        assert!(deck.move_to_index(4, now));
        assert!(deck.is_animating());

        let outcome = finish(&mut deck, now);
        assert_eq!(outcome.settled, Some(4));
        assert!(!deck.is_animating());
        assert_eq!(deck.active_index(), 4);
        assert_eq!(deck.offset(), deck.geometry().center_position(4));
    }

    #[test]
    fn moves_clamp_far_out_of_range_targets() {
        let now = Instant::now();
        let mut deck = deck_of(6, true);

        assert!(deck.move_to_index(999, now));
        assert!(deck.active_index() <= deck.max_index());
        assert_eq!(deck.active_index(), deck.max_index());
        finish(&mut deck, now);

        assert!(deck.move_to_index(-50, now));
        assert_eq!(deck.active_index(), 0);
        finish(&mut deck, now);
        assert_eq!(deck.offset(), deck.geometry().center_position(0));
    }

    #[test]
    fn targeting_the_active_index_is_a_no_op() {
        let now = Instant::now();
        let mut deck = deck_of(6, true);
        let before = deck.offset();

        assert!(!deck.move_to_index(0, now));
        assert!(!deck.is_animating());
        assert_eq!(deck.offset(), before);

        // Out of range but clamping to the active card: still a no-op.
        assert!(!deck.move_to_index(-3, now));
        assert!(!deck.is_animating());
    }

    #[test]
    fn programmatic_moves_drop_while_animating() {
        let now = Instant::now();
        let mut deck = deck_of(8, true);

        assert!(deck.move_to_index(2, now));
        assert!(!deck.move_to_index(5, now));
        assert_eq!(deck.active_index(), 2);
        finish(&mut deck, now);
        assert_eq!(deck.active_index(), 2);

        // Same lock during a raw drag.
        deck.drag_start();
        assert!(!deck.move_to_index(5, now));
        assert_eq!(deck.active_index(), 2);
    }

    #[test]
    fn pagination_fires_only_near_the_loaded_end() {
        let now = Instant::now();
        let mut deck = deck_of(10, true);

        deck.move_to_index(7, now);
        let outcome = finish(&mut deck, now);
        assert_eq!(outcome.settled, Some(7));
        assert!(!outcome.load_more);

        deck.move_to_index(8, now);
        assert!(finish(&mut deck, now).load_more);

        deck.move_to_index(9, now);
        assert!(finish(&mut deck, now).load_more);

        // One outcome per settle: further ticks are quiet.
        assert_eq!(deck.tick(now + Duration::from_secs(3)), SettleOutcome::default());
    }

    #[test]
    fn pagination_skips_placeholders_and_in_flight_fetches() {
        let now = Instant::now();
        let geo = StripGeometry::new(320.0, 290.0, 12.0, 8.0);
        let mut deck = DeckState::new(geo, DeckTuning::default());

        // Fetch in flight: two placeholder slots beyond the 4 real cards.
        let mut feed = feed_of(4, true);
        feed.loading = true;
        deck.sync_feed(&feed);
        assert_eq!(deck.total_slots(), 6);

        // Parked on a placeholder: no trigger (and none while loading).
        deck.move_to_index(5, now);
        assert!(!finish(&mut deck, now).load_more);

        // Exhausted feed never triggers, even at the very end.
        let mut deck = deck_of(5, false);
        deck.move_to_index(4, now);
        assert!(!finish(&mut deck, now).load_more);
    }

    #[test]
    fn momentum_overrides_the_nearest_snap_by_one() {
        let now = Instant::now();
        let mut deck = deck_of(8, true);
        let geo = deck.geometry();

        // Rightward flick from card 3: reveal the earlier card.
        deck.drag_start();
        deck.drag_move(geo.center_position(3) + 5.0, now);
        deck.drag_end(geo.center_position(3) + 5.0, 400.0, now);
        finish(&mut deck, now);
        assert_eq!(deck.active_index(), 2);
        assert_eq!(deck.offset(), geo.center_position(2));

        // Leftward flick pushes on to the later card.
        deck.drag_start();
        deck.drag_move(geo.center_position(3), now);
        deck.drag_end(geo.center_position(3), -400.0, now);
        finish(&mut deck, now);
        assert_eq!(deck.active_index(), 4);
    }

    #[test]
    fn momentum_below_threshold_keeps_the_nearest_snap() {
        let now = Instant::now();
        let mut deck = deck_of(8, true);
        let geo = deck.geometry();

        deck.drag_start();
        deck.drag_end(geo.center_position(3) - 20.0, 200.0, now);
        finish(&mut deck, now);
        assert_eq!(deck.active_index(), 3);
    }

    #[test]
    fn momentum_clamps_at_the_strip_ends() {
        let now = Instant::now();
        let mut deck = deck_of(6, true);
        let geo = deck.geometry();
        let last = deck.max_index();

        deck.drag_start();
        deck.drag_end(geo.center_position(last), -900.0, now);
        finish(&mut deck, now);
        assert_eq!(deck.active_index(), last);

        deck.drag_start();
        deck.drag_end(geo.center_position(0), 900.0, now);
        finish(&mut deck, now);
        assert_eq!(deck.active_index(), 0);
    }

    #[test]
    fn example_scenario_five_cards_plus_end_card() {
        let now = Instant::now();
        let mut deck = deck_of(5, false);

        // 5 real cards + 1 end-card.
        assert_eq!(deck.total_slots(), 6);
        assert_eq!(deck.max_index(), 5);

        assert!(deck.move_to_index(5, now));
        assert_eq!(deck.active_index(), 5);
        let outcome = finish(&mut deck, now);
        assert_eq!(outcome.settled, Some(5));
        assert!(!outcome.load_more);
        // (320/2 - 290/2 - 8) - 5*302
        assert!((deck.offset() - -1503.0).abs() < 0.001);
    }

    #[test]
    fn drag_preview_tracks_the_nearest_card_throttled() {
        let now = Instant::now();
        let mut deck = deck_of(8, true);
        let geo = deck.geometry();

        deck.drag_start();
        deck.drag_move(geo.center_position(2), now);
        assert_eq!(deck.active_index(), 2);

        // 1 ms later: inside the preview interval, index holds.
        deck.drag_move(geo.center_position(4), now + Duration::from_millis(1));
        assert_eq!(deck.active_index(), 2);

        // Next frame: the preview catches up.
        deck.drag_move(geo.center_position(4), now + Duration::from_millis(17));
        assert_eq!(deck.active_index(), 4);
    }

    #[test]
    fn drag_clamps_into_bounds() {
        let now = Instant::now();
        let mut deck = deck_of(6, true);
        let geo = deck.geometry();
        let bounds = geo.bounds(deck.max_index());

        deck.drag_start();
        deck.drag_move(99_999.0, now);
        assert_eq!(deck.offset(), bounds.max);
        deck.drag_move(-99_999.0, now + Duration::from_millis(20));
        assert_eq!(deck.offset(), bounds.min);
        deck.drag_end(-99_999.0, 0.0, now + Duration::from_millis(40));
        finish(&mut deck, now);
        assert_eq!(deck.active_index(), deck.max_index());
    }

    #[test]
    fn a_new_drag_cancels_the_pending_settle() {
        let now = Instant::now();
        let mut deck = deck_of(8, true);
        let geo = deck.geometry();

        deck.move_to_index(5, now);
        assert!(deck.is_animating());

        deck.drag_start();
        deck.drag_move(geo.center_position(1), now + Duration::from_millis(20));
        deck.drag_end(geo.center_position(1), 0.0, now + Duration::from_millis(40));
        finish(&mut deck, now);

        assert_eq!(deck.active_index(), 1);
        assert_eq!(deck.offset(), geo.center_position(1));
    }

    #[test]
    fn stale_active_index_resets_to_the_first_card() {
        let now = Instant::now();
        let mut deck = deck_of(8, true);
        deck.move_to_index(6, now);
        finish(&mut deck, now);
        assert_eq!(deck.active_index(), 6);

        // The list shrinks underneath the strip.
        deck.sync_feed(&feed_of(3, true));
        assert_eq!(deck.active_index(), 0);
        assert_eq!(deck.offset(), deck.geometry().center_position(0));
        assert!(!deck.is_animating());
    }

    #[test]
    fn resize_snap_recenters_only_when_idle() {
        let now = Instant::now();
        let mut deck = deck_of(8, true);
        deck.move_to_index(2, now);
        finish(&mut deck, now);

        deck.apply_viewport(900.0);
        assert!(deck.resize_snap());
        assert_eq!(deck.offset(), deck.geometry().center_position(2));

        // Suppressed while a pointer owns the offset.
        deck.drag_start();
        let held = deck.offset();
        deck.apply_viewport(320.0);
        assert!(!deck.resize_snap());
        assert_eq!(deck.offset(), held);
    }

    #[test]
    fn settle_duration_shortens_with_flick_speed() {
        let deck = deck_of(4, true);
        let slow = deck.settle_duration(0.0);
        let brisk = deck.settle_duration(400.0);
        let flick = deck.settle_duration(5_000.0);
        assert_eq!(slow, Duration::from_millis(320));
        assert_eq!(brisk, Duration::from_millis(220));
        assert_eq!(flick, Duration::from_millis(140));
    }

    #[test]
    fn empty_deck_ignores_every_gesture() {
        let now = Instant::now();
        let geo = StripGeometry::new(320.0, 290.0, 12.0, 8.0);
        let mut deck = DeckState::new(geo, DeckTuning::default());
        deck.sync_feed(&FeedState::new());

        assert_eq!(deck.total_slots(), 0);
        assert!(!deck.move_to_index(2, now));
        deck.drag_start();
        deck.drag_move(50.0, now);
        deck.drag_end(50.0, 500.0, now);
        finish(&mut deck, now);
        assert_eq!(deck.active_index(), 0);
        assert!(deck.offset().is_finite());
    }
}
