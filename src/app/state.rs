//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::time::Instant;

use ratatui::layout::Rect;

use crate::app::feed_runtime::FeedParams;
use crate::config::AppConfig;
use crate::core::deck::DeckState;
use crate::core::feed::FeedState;
use crate::core::geometry::StripGeometry;
use crate::core::velocity::VelocityTracker;

/// The two card feeds the app can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedTab {
    #[default]
    Jobs,
    Applications,
}

impl FeedTab {
    pub fn title(self) -> &'static str {
        match self {
            FeedTab::Jobs => "Jobs",
            FeedTab::Applications => "Applications",
        }
    }

    /// The sibling feed the end-card offers to jump to.
    pub fn other(self) -> Self {
        match self {
            FeedTab::Jobs => FeedTab::Applications,
            FeedTab::Applications => FeedTab::Jobs,
        }
    }
}

/// One tab's feed data plus its strip positioning.
pub struct TabState {
    pub feed: FeedState,
    pub deck: DeckState,
    /// Monotonic id; fetches stamped with an older one are stale.
    pub fetch_generation: u64,
    /// Next page to request from the provider.
    pub next_page: usize,
    /// How many times the current page has already failed.
    pub retry: u32,
    /// Set by settle outcomes; the main loop turns it into a fetch.
    pub fetch_requested: bool,
}

impl TabState {
    pub fn new(geometry: StripGeometry, config: &AppConfig) -> Self {
        let feed = FeedState::new();
        let mut deck = DeckState::new(geometry, config.tuning());
        deck.sync_feed(&feed);
        Self {
            feed,
            deck,
            fetch_generation: 0,
            next_page: 0,
            retry: 0,
            fetch_requested: false,
        }
    }

    /// Throw the loaded list away and start the feed over.
    pub fn begin_refresh(&mut self) {
        self.fetch_generation = self.fetch_generation.wrapping_add(1);
        self.next_page = 0;
        self.retry = 0;
        self.feed.reset();
        self.deck.sync_feed(&self.feed);
        self.fetch_requested = true;
    }
}

/// A live pointer gesture over the strip.
pub struct PointerSession {
    /// Column where the button went down.
    pub anchor_col: u16,
    /// Strip offset at that moment.
    pub anchor_offset: f32,
    /// True once the pointer has actually travelled; a press/release
    /// with no travel is a click.
    pub moved: bool,
    pub tracker: VelocityTracker,
}

impl PointerSession {
    pub fn begin(col: u16, offset: f32, now: Instant) -> Self {
        let mut tracker = VelocityTracker::new();
        tracker.push(col as f32, now);
        Self {
            anchor_col: col,
            anchor_offset: offset,
            moved: false,
            tracker,
        }
    }

    /// Strip offset implied by the pointer sitting at `col`.
    pub fn offset_at(&self, col: u16) -> f32 {
        self.anchor_offset + (col as f32 - self.anchor_col as f32)
    }
}

/// Top-level application state.
pub struct AppState {
    /// Which feed is on screen.
    pub tab: FeedTab,
    pub jobs: TabState,
    pub applications: TabState,
    /// In-progress mouse gesture, if any.
    pub pointer: Option<PointerSession>,
    /// Most recent resize event, waiting out its debounce window.
    pub pending_resize: Option<Instant>,
    /// Cached terminal area, refreshed on every draw and resize event.
    pub terminal_area: Rect,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Frame counter; drives the skeleton shimmer.
    pub tick: u64,
    /// Persisted tunables.
    pub config: AppConfig,
    /// Demo feed parameters (config merged with CLI overrides).
    pub feed_params: FeedParams,
}

impl AppState {
    pub fn new(tab: FeedTab, config: AppConfig, feed_params: FeedParams) -> Self {
        let geometry = config.strip_geometry(0.0);
        Self {
            tab,
            jobs: TabState::new(geometry, &config),
            applications: TabState::new(geometry, &config),
            pointer: None,
            pending_resize: None,
            terminal_area: Rect::ZERO,
            should_quit: false,
            status_message: None,
            tick: 0,
            config,
            feed_params,
        }
    }

    pub fn tab_state(&self) -> &TabState {
        match self.tab {
            FeedTab::Jobs => &self.jobs,
            FeedTab::Applications => &self.applications,
        }
    }

    pub fn tab_state_mut(&mut self) -> &mut TabState {
        self.tab_state_for(self.tab)
    }

    /// Tab-addressed access, for feed updates that name their tab.
    pub fn tab_state_for(&mut self, tab: FeedTab) -> &mut TabState {
        match tab {
            FeedTab::Jobs => &mut self.jobs,
            FeedTab::Applications => &mut self.applications,
        }
    }
}
