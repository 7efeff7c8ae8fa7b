//! Screen layout: four stacked full-width regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: tab header, card strip, pager dots, status bar.
pub struct AppLayout {
    pub header_area: Rect,
    pub deck_area: Rect,
    pub pager_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // tab header
                Constraint::Min(7),    // card strip (takes all remaining space)
                Constraint::Length(1), // pager dots
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            header_area: chunks[0],
            deck_area: chunks[1],
            pager_area: chunks[2],
            status_area: chunks[3],
        }
    }
}
