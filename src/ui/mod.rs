//! Rendering layer; the only modules allowed to touch ratatui widgets.
//!
//! Everything here projects *core* engine state into buffer cells.
//! Engine mutation stays in `app`.

pub mod cards;
pub mod deck_widget;
pub mod layout;
pub mod theme;
