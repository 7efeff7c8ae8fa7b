//! Colour palette and text styles used across the UI.
//!
//! The engine reports continuous opacities for the depth-of-field
//! effect; a terminal cell has no alpha channel, so they are bucketed
//! into brightness tiers here.

use ratatui::style::{Color, Modifier, Style};

use crate::core::feed::Stage;

/// Central palette; restyle here and every widget follows.
pub struct Theme;

impl Theme {
    // ── chrome ─────────────────────────────────────────────────
    pub fn tab_active_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn tab_inactive_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn loading_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn hint_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    // ── cards ──────────────────────────────────────────────────
    pub fn card_border_style(opacity: f32, is_active: bool) -> Style {
        if is_active {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Self::fade(Style::default().fg(Self::bucket(opacity)), opacity)
        }
    }

    pub fn card_title_style(opacity: f32) -> Style {
        Self::fade(
            Style::default()
                .fg(Self::bucket(opacity))
                .add_modifier(Modifier::BOLD),
            opacity,
        )
    }

    pub fn card_text_style(opacity: f32) -> Style {
        Self::fade(Style::default().fg(Self::bucket(opacity)), opacity)
    }

    pub fn salary_style(opacity: f32) -> Style {
        if opacity >= 0.55 {
            Style::default().fg(Color::Green)
        } else {
            Self::card_text_style(opacity)
        }
    }

    pub fn tag_style(opacity: f32) -> Style {
        if opacity >= 0.55 {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC)
        } else {
            Self::card_text_style(opacity)
        }
    }

    pub fn stage_style(stage: Stage) -> Style {
        let color = match stage {
            Stage::Applied => Color::Blue,
            Stage::Screening => Color::Yellow,
            Stage::Interview => Color::Magenta,
            Stage::Offer => Color::Green,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn sponsor_style(opacity: f32) -> Style {
        if opacity >= 0.55 {
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Self::card_title_style(opacity)
        }
    }

    pub fn sponsored_label_style() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn skeleton_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn end_card_style() -> Style {
        Style::default().fg(Color::Cyan)
    }

    // ── pager ──────────────────────────────────────────────────
    pub fn pager_active_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn pager_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    fn bucket(opacity: f32) -> Color {
        if opacity >= 0.95 {
            Color::White
        } else if opacity >= 0.55 {
            Color::Gray
        } else {
            Color::DarkGray
        }
    }

    fn fade(style: Style, opacity: f32) -> Style {
        if opacity < 0.3 {
            style.add_modifier(Modifier::DIM)
        } else {
            style
        }
    }
}
