//! Card content rendering: one slot painted into one card rectangle.
//!
//! The deck widget decides where each card sits and how big it is; this
//! module only fills the rectangle. Dispatch over the slot variants
//! happens here and nowhere else.

use chrono::{DateTime, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Widget},
};

use crate::core::feed::{AdCard, CardItem, JobCard, Slot};
use crate::core::tiers::CardVisual;

use super::theme::Theme;

/// Shimmer bands cycled by the frame tick while a page loads.
const SHIMMER: [char; 3] = ['░', '▒', '▓'];

/// Paint one slot into `area`. `other_tab` names the tab the end-card
/// points at.
pub fn render_slot(
    slot: Slot<'_>,
    visual: CardVisual,
    tick: u64,
    other_tab: &str,
    area: Rect,
    buf: &mut Buffer,
) {
    if area.width < 4 || area.height < 3 {
        return;
    }

    let border_type = if visual.is_active {
        BorderType::Thick
    } else {
        BorderType::Rounded
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Theme::card_border_style(visual.opacity, visual.is_active));
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    match slot {
        Slot::Card(CardItem::Job(job)) => render_job(job, visual, inner, buf),
        Slot::Card(CardItem::Ad(ad)) => render_ad(ad, visual, inner, buf),
        Slot::Placeholder => render_skeleton(tick, inner, buf),
        Slot::End => render_end(other_tab, visual, inner, buf),
    }
}

fn render_job(job: &JobCard, visual: CardVisual, inner: Rect, buf: &mut Buffer) {
    let op = visual.opacity;
    let width = inner.width as usize;

    let mut lines = vec![
        Line::from(Span::styled(fit(&job.title, width), Theme::card_title_style(op))),
        Line::from(Span::styled(fit(&job.org, width), Theme::card_text_style(op))),
        Line::from(Span::styled(fit(&job.location, width), Theme::card_text_style(op))),
        Line::default(),
        Line::from(Span::styled(fit(&job.salary, width), Theme::salary_style(op))),
    ];
    if !job.tags.is_empty() {
        let tags = job.tags.join(" · ");
        lines.push(Line::from(Span::styled(fit(&tags, width), Theme::tag_style(op))));
    }

    // Footer pinned to the card's bottom row.
    let mut footer = vec![Span::styled(
        age_label(job.posted_at, Utc::now()),
        Theme::card_text_style(op),
    )];
    if let Some(stage) = job.stage {
        footer.push(Span::styled("  ◆ ", Theme::card_text_style(op)));
        footer.push(Span::styled(stage.label(), Theme::stage_style(stage)));
    }
    while lines.len() + 1 < inner.height as usize {
        lines.push(Line::default());
    }
    lines.push(Line::from(footer));

    paint(&lines, inner, buf);
}

fn render_ad(ad: &AdCard, visual: CardVisual, inner: Rect, buf: &mut Buffer) {
    let op = visual.opacity;
    let width = inner.width as usize;

    let lines = vec![
        Line::from(Span::styled("sponsored", Theme::sponsored_label_style())),
        Line::default(),
        Line::from(Span::styled(fit(&ad.sponsor, width), Theme::sponsor_style(op))),
        Line::default(),
        Line::from(Span::styled(fit(&ad.tagline, width), Theme::card_text_style(op))),
    ];

    paint(&lines, inner, buf);
}

fn render_skeleton(tick: u64, inner: Rect, buf: &mut Buffer) {
    let width = inner.width as usize;
    // Title bar, gap, then body bars, roughly a job card's silhouette.
    let bars: [usize; 6] = [
        width * 3 / 5,
        width * 2 / 5,
        0,
        width * 4 / 5,
        width * 4 / 5,
        width / 2,
    ];

    let mut lines = Vec::with_capacity(bars.len());
    for (row, &w) in bars.iter().enumerate() {
        let phase = (tick / 2) as usize + row;
        let text: String = (0..w).map(|i| SHIMMER[(i / 4 + phase) % SHIMMER.len()]).collect();
        lines.push(Line::from(Span::styled(text, Theme::skeleton_style())));
    }

    paint(&lines, inner, buf);
}

fn render_end(other_tab: &str, visual: CardVisual, inner: Rect, buf: &mut Buffer) {
    let width = inner.width as usize;
    let hint = format!("Press Enter for {other_tab}");

    let mut lines = Vec::new();
    let pad = (inner.height as usize).saturating_sub(3) / 2;
    lines.resize(pad, Line::default());
    lines.push(centered("You're all caught up", width, Theme::card_title_style(visual.opacity)));
    lines.push(Line::default());
    lines.push(centered(&fit(&hint, width), width, Theme::end_card_style()));

    paint(&lines, inner, buf);
}

fn paint(lines: &[Line], inner: Rect, buf: &mut Buffer) {
    for (i, line) in lines.iter().take(inner.height as usize).enumerate() {
        buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
    }
}

fn centered(text: &str, width: usize, style: ratatui::style::Style) -> Line<'static> {
    let text_width = text.chars().count();
    let pad = width.saturating_sub(text_width) / 2;
    Line::from(vec![
        Span::raw(" ".repeat(pad)),
        Span::styled(text.to_string(), style),
    ])
}

/// Truncate to `width` terminal columns, appending `…` when cut.
fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Compact "posted n ago" label.
fn age_label(posted_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - posted_at).num_days();
    if days <= 0 {
        "today".to_string()
    } else if days < 7 {
        format!("{days}d ago")
    } else if days < 30 {
        format!("{}w ago", days / 7)
    } else {
        format!("{}mo ago", days / 30)
    }
}

// ───────────────────────── tests ─────────────────────────
