//! The positioning engine: strip geometry, visual tiering, velocity
//! estimation, the drag/momentum controller, and feed slot composition.
//!
//! Nothing here may depend on a TUI or rendering crate; the host decides
//! what a layout "unit" is. Every type is `Send + Sync`.

pub mod deck;
pub mod easing;
pub mod feed;
pub mod geometry;
pub mod tiers;
pub mod velocity;
