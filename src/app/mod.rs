//! Application layer: shared state, terminal events, input dispatch, and
//! the demo feed runtime.

pub mod event;
pub mod feed_runtime;
pub mod handler;
pub mod state;
