//! Card data and slot composition for one feed tab.
//!
//! The positioning engine never inspects card content; it only counts
//! slots. A strip is composed of the real items, then a run of loading
//! placeholders while a fetch is in flight, then at most one synthetic
//! end-card once the feed is exhausted. Variant dispatch happens at the
//! render boundary, nowhere else.

use chrono::{DateTime, Utc};

/// One real entry in a feed. Tagged so the renderer can dispatch
/// exhaustively; positioning code treats every variant identically.
#[derive(Debug, Clone, PartialEq)]
pub enum CardItem {
    Job(JobCard),
    Ad(AdCard),
}

/// A job opening, or (on the applications tab) one the user applied to.
#[derive(Debug, Clone, PartialEq)]
pub struct JobCard {
    pub title: String,
    pub org: String,
    pub location: String,
    pub salary: String,
    pub tags: Vec<String>,
    pub posted_at: DateTime<Utc>,
    /// Present on application cards only.
    pub stage: Option<Stage>,
}

/// Where an application currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Applied,
    Screening,
    Interview,
    Offer,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Applied => "applied",
            Stage::Screening => "screening",
            Stage::Interview => "interview",
            Stage::Offer => "offer",
        }
    }
}

/// Sponsored slot interleaved by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct AdCard {
    pub sponsor: String,
    pub tagline: String,
}

/// What a given logical slot renders as.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    Card(&'a CardItem),
    Placeholder,
    End,
}

/// Everything the provider has told us about one tab's feed.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub items: Vec<CardItem>,
    pub loading: bool,
    pub has_more: bool,
}

impl FeedState {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            has_more: true,
        }
    }

    /// Forget everything, as when the underlying list is replaced.
    pub fn reset(&mut self) {
        self.items.clear();
        self.loading = false;
        self.has_more = true;
    }

    pub fn real_count(&self) -> usize {
        self.items.len()
    }

    /// Fold a fetched page into the feed and end the in-flight state.
    pub fn append_page(&mut self, items: Vec<CardItem>, has_more: bool) {
        self.items.extend(items);
        self.has_more = has_more;
        self.loading = false;
    }

    /// Nothing to show and nothing on the way: the strip renders nothing.
    pub fn is_idle_empty(&self) -> bool {
        self.items.is_empty() && !self.loading
    }

    /// The exhausted feed earns exactly one trailing end-card.
    pub fn end_card_present(&self) -> bool {
        !self.has_more && !self.loading && !self.items.is_empty()
    }

    /// Number of logical slots the strip currently holds.
    pub fn total_slots(&self, placeholder_cards: usize) -> usize {
        if self.is_idle_empty() {
            return 0;
        }
        let placeholders = if self.loading { placeholder_cards } else { 0 };
        let end = usize::from(self.end_card_present());
        self.items.len() + placeholders + end
    }

    /// Resolve a logical index to its rendered content.
    pub fn slot(&self, index: usize, placeholder_cards: usize) -> Option<Slot<'_>> {
        if index >= self.total_slots(placeholder_cards) {
            return None;
        }
        if let Some(item) = self.items.get(index) {
            return Some(Slot::Card(item));
        }
        if self.loading {
            Some(Slot::Placeholder)
        } else {
            Some(Slot::End)
        }
    }
}

/// Whether settling on `settled` should ask the provider for more.
///
/// Fires only from a real card within `lookahead` of the loaded end,
/// never from a placeholder or the end-card, and never while a fetch
/// is already in flight.
pub fn load_more_due(
    settled: usize,
    real_count: usize,
    loading: bool,
    has_more: bool,
    lookahead: usize,
) -> bool {
    has_more && !loading && settled < real_count && settled + lookahead >= real_count
}

// ───────────────────────── tests ─────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str) -> CardItem {
        CardItem::Job(JobCard {
            title: title.into(),
            org: "Acme".into(),
            location: "Remote".into(),
            salary: "$100k".into(),
            tags: vec!["rust".into()],
            posted_at: Utc::now(),
            stage: None,
        })
    }

    fn feed_with(n: usize) -> FeedState {
        let mut feed = FeedState::new();
        feed.append_page((0..n).map(|i| job(&format!("job {i}"))).collect(), true);
        feed
    }

    #[test]
    fn loading_feed_appends_placeholders() {
        let mut feed = feed_with(3);
        feed.loading = true;
        assert_eq!(feed.total_slots(2), 5);
        assert!(matches!(feed.slot(2, 2), Some(Slot::Card(_))));
        assert_eq!(feed.slot(3, 2), Some(Slot::Placeholder));
        assert_eq!(feed.slot(4, 2), Some(Slot::Placeholder));
        assert_eq!(feed.slot(5, 2), None);
    }

    #[test]
    fn exhausted_feed_gets_exactly_one_end_card() {
        let mut feed = feed_with(5);
        assert_eq!(feed.total_slots(2), 5);

        feed.has_more = false;
        assert_eq!(feed.total_slots(2), 6);
        assert_eq!(feed.slot(5, 2), Some(Slot::End));
        assert_eq!(feed.slot(6, 2), None);

        // Still loading means not yet exhausted.
        feed.loading = true;
        assert!(!feed.end_card_present());
    }

    #[test]
    fn empty_idle_feed_has_no_slots() {
        let feed = FeedState::new();
        assert!(feed.is_idle_empty());
        assert_eq!(feed.total_slots(2), 0);
        assert_eq!(feed.slot(0, 2), None);

        let mut exhausted = FeedState::new();
        exhausted.has_more = false;
        assert_eq!(exhausted.total_slots(2), 0);

        let mut first_fetch = FeedState::new();
        first_fetch.loading = true;
        assert_eq!(first_fetch.total_slots(2), 2);
        assert_eq!(first_fetch.slot(0, 2), Some(Slot::Placeholder));
    }

    #[test]
    fn append_page_folds_in_and_stops_loading() {
        let mut feed = FeedState::new();
        feed.loading = true;
        feed.append_page(vec![job("a"), job("b")], false);
        assert!(!feed.loading);
        assert!(!feed.has_more);
        assert_eq!(feed.real_count(), 2);
        assert!(feed.end_card_present());
    }

    #[test]
    fn load_more_fires_within_two_of_the_end() {
        // 10 real items, more available, nothing in flight.
        assert!(!load_more_due(7, 10, false, true, 2));
        assert!(load_more_due(8, 10, false, true, 2));
        assert!(load_more_due(9, 10, false, true, 2));
        // Parked past the real items (placeholder/end-card): no trigger.
        assert!(!load_more_due(10, 10, false, true, 2));
        assert!(!load_more_due(11, 10, false, true, 2));
    }

    #[test]
    fn load_more_respects_flight_and_exhaustion() {
        assert!(!load_more_due(9, 10, true, true, 2));
        assert!(!load_more_due(9, 10, false, false, 2));
        assert!(!load_more_due(0, 0, false, true, 2));
    }
}
