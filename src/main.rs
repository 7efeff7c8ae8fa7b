//! A swipeable card-deck TUI for job feeds.
//!
//! Drag cards with the mouse and release with a flick; the deck snaps
//! to the nearest card, or one past it when the flick is fast enough.
//! Pages load on demand as you approach the end of the strip.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    feed_runtime::{self, FeedError, FeedParams, FeedUpdate},
    handler,
    state::{AppState, FeedTab},
};
use crate::ui::{
    deck_widget::{DeckWidget, PagerDots},
    layout::AppLayout,
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Swipeable job-feed card deck")]
struct Cli {
    /// Tab to open at launch.
    #[arg(long, value_enum, default_value = "jobs")]
    tab: TabArg,

    /// Seed for the demo feed.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// How many jobs the demo provider pretends to have.
    #[arg(long, default_value_t = 57)]
    total: usize,

    /// Cards per fetched page (overrides the config file).
    #[arg(long)]
    page_size: Option<usize>,

    /// Simulated fetch latency in milliseconds (overrides the config file).
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Leave sponsored cards out of the feed.
    #[arg(long)]
    no_ads: bool,

    /// Make every third page fail its first attempt.
    #[arg(long)]
    flaky: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TabArg {
    Jobs,
    Applications,
}

impl From<TabArg> for FeedTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Jobs => FeedTab::Jobs,
            TabArg::Applications => FeedTab::Applications,
        }
    }
}

// ───────────────────────────────────────── fetches ───────────

/// Launch any fetch the handlers flagged, at most one per tab.
fn start_pending_fetches(state: &mut AppState, tx: &UnboundedSender<(FeedTab, u64, FeedUpdate)>) {
    for tab in [FeedTab::Jobs, FeedTab::Applications] {
        let params = state.feed_params.clone();
        let ts = state.tab_state_for(tab);
        if !ts.fetch_requested {
            continue;
        }
        ts.fetch_requested = false;
        if ts.feed.loading || !ts.feed.has_more {
            continue;
        }
        ts.feed.loading = true;
        ts.deck.sync_feed(&ts.feed);
        feed_runtime::spawn_fetch(
            tx.clone(),
            tab,
            ts.fetch_generation,
            ts.next_page,
            ts.retry,
            params,
        );
    }
}

/// Fold one finished fetch into its tab. Results stamped with an old
/// generation (a refresh happened meanwhile) are dropped.
fn apply_feed_update(state: &mut AppState, tab: FeedTab, generation: u64, update: FeedUpdate) {
    let ts = state.tab_state_for(tab);
    if generation != ts.fetch_generation {
        tracing::debug!(?tab, generation, "dropping page from a superseded fetch");
        return;
    }
    match update {
        FeedUpdate::Page { items, has_more } => {
            ts.feed.append_page(items, has_more);
            ts.next_page += 1;
            ts.retry = 0;
            ts.deck.sync_feed(&ts.feed);
        }
        FeedUpdate::Failed { error } => {
            ts.feed.loading = false;
            ts.retry += 1;
            if matches!(error, FeedError::PastEnd { .. }) {
                ts.feed.has_more = false;
            }
            ts.deck.sync_feed(&ts.feed);
            state.status_message = Some(format!("Feed error: {error}"));
        }
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Tracing stays on stderr; the alternate screen owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let user_config = config::AppConfig::load();
    let params = FeedParams {
        seed: cli.seed,
        total: cli.total,
        page_size: cli.page_size.unwrap_or(user_config.page_size),
        latency_ms: cli.latency_ms.unwrap_or(user_config.fetch_latency_ms),
        ads: !cli.no_ads && user_config.show_ads,
        flaky: cli.flaky,
    };

    let mut state = AppState::new(cli.tab.into(), user_config, params);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    // Measure before the first draw so the opening card is centered.
    let size = terminal.size()?;
    state.terminal_area = Rect::new(0, 0, size.width, size.height);
    handler::sync_viewport(&mut state);
    state.jobs.deck.resize_snap();
    state.applications.deck.resize_snap();
    state.tab_state_mut().fetch_requested = true;

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(16));
    let (feed_tx, mut feed_rx) =
        tokio::sync::mpsc::unbounded_channel::<(FeedTab, u64, FeedUpdate)>();

    // ── event loop ────────────────────────────────────────────
    loop {
        // ── draw first ─────────────────────────────────────────
        // Always render before doing other work so the UI stays
        // responsive.  Pages fill in asynchronously.
        terminal.draw(|frame| {
            state.terminal_area = frame.area();
            let layout = AppLayout::from_area(frame.area());

            // Leading header spans must stay aligned with handler::header_tab_at.
            let current = state.tab;
            let loading = state.tab_state().feed.loading;
            let loaded = state.tab_state().feed.real_count();
            let mut spans = Vec::new();
            for tab in [FeedTab::Jobs, FeedTab::Applications] {
                let style = if tab == current {
                    Theme::tab_active_style()
                } else {
                    Theme::tab_inactive_style()
                };
                spans.push(Span::styled(format!(" {} ", tab.title()), style));
            }
            if loaded > 0 {
                spans.push(Span::styled(format!("  {loaded} loaded"), Theme::hint_style()));
            }
            if loading {
                spans.push(Span::styled("  fetching…", Theme::loading_style()));
            }
            frame.render_widget(Paragraph::new(Line::from(spans)), layout.header_area);

            let tick = state.tick;
            let other = current.other().title();
            let deck_block = Block::default()
                .title(format!(" {} ", current.title()))
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::border_style());

            let ts = state.tab_state_mut();
            let deck_widget = DeckWidget::new(&ts.feed)
                .tick(tick)
                .other_tab(other)
                .block(deck_block);
            frame.render_stateful_widget(deck_widget, layout.deck_area, &mut ts.deck);
            frame.render_widget(PagerDots::new(&ts.deck), layout.pager_area);

            let hint = "←/→ step · drag to flick · Enter open · Tab switch · r refresh · q quit";
            let status_text = state.status_message.as_deref().unwrap_or(hint);
            let status = Paragraph::new(status_text).style(Theme::status_bar_style());
            frame.render_widget(status, layout.status_area);
        })?;

        // ── kick off fetches AFTER draw ───────────────────────
        // The frame above already shows the skeleton placeholders for
        // anything flagged; the data lands on a later frame.
        start_pending_fetches(&mut state, &feed_tx);

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(w, h) => {
                        state.terminal_area = Rect::new(0, 0, w, h);
                        state.pending_resize = Some(Instant::now());
                        handler::sync_viewport(&mut state);
                    }
                    AppEvent::Tick => handler::handle_tick(&mut state),
                }
            }

            Some((tab, generation, update)) = feed_rx.recv() => {
                apply_feed_update(&mut state, tab, generation, update);
                // Drain anything else already queued before redrawing.
                while let Ok((tab, generation, update)) = feed_rx.try_recv() {
                    apply_feed_update(&mut state, tab, generation, update);
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
