//! Strip geometry: where each card rests and how far the strip may travel.
//!
//! All math is in abstract layout units (pixels in a browser, terminal
//! columns here); nothing in this module assumes a unit. Positions are
//! horizontal offsets of the strip relative to the container's left edge:
//! card `i` sits at `offset + i * stride`, so larger offsets reveal
//! earlier cards.

/// Card footprint of the original mobile layout, used by hosts that do
/// not supply their own measurements.
pub const DEFAULT_CARD_WIDTH: f32 = 290.0;
pub const DEFAULT_CARD_GAP: f32 = 12.0;

/// Small leftward nudge applied to every centered position so the
/// slivers of the neighboring cards read evenly on both sides.
pub const DEFAULT_CENTER_BIAS: f32 = 8.0;

/// Substitute for a zero/unreported container width (first frame of a
/// mount, typically). Keeps every downstream division finite.
const FALLBACK_CONTAINER_WIDTH: f32 = 360.0;

/// Containers wider than this get the roomier overscroll allowance.
const WIDE_CONTAINER: f32 = 480.0;
const WIDE_OVERSCROLL: f32 = 150.0;
const NARROW_OVERSCROLL: f32 = 80.0;

/// Measurements that determine every card's resting position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripGeometry {
    pub container_width: f32,
    pub card_width: f32,
    pub card_gap: f32,
    pub center_bias: f32,
}

impl Default for StripGeometry {
    fn default() -> Self {
        Self::new(
            FALLBACK_CONTAINER_WIDTH,
            DEFAULT_CARD_WIDTH,
            DEFAULT_CARD_GAP,
            DEFAULT_CENTER_BIAS,
        )
    }
}

impl StripGeometry {
    pub fn new(container_width: f32, card_width: f32, card_gap: f32, center_bias: f32) -> Self {
        let mut geo = Self {
            container_width: FALLBACK_CONTAINER_WIDTH,
            card_width,
            card_gap,
            center_bias,
        };
        geo.set_container_width(container_width);
        geo
    }

    /// Update the measured container width, ignoring degenerate values.
    pub fn set_container_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.container_width = width;
        }
    }

    /// Horizontal distance between the left edges of adjacent cards.
    #[inline]
    pub fn stride(&self) -> f32 {
        self.card_width + self.card_gap
    }

    /// Offset at which card `index` sits centered in the container.
    #[inline]
    pub fn center_position(&self, index: usize) -> f32 {
        let lead_in = self.container_width / 2.0 - self.card_width / 2.0 - self.center_bias;
        lead_in - index as f32 * self.stride()
    }

    /// Elastic travel allowed past the first/last centered position.
    pub fn overscroll(&self) -> f32 {
        if self.container_width > WIDE_CONTAINER {
            WIDE_OVERSCROLL
        } else {
            NARROW_OVERSCROLL
        }
    }

    /// Drag limits for a strip whose last card is `max_index`.
    pub fn bounds(&self, max_index: usize) -> OffsetBounds {
        OffsetBounds {
            min: self.center_position(max_index) - self.overscroll(),
            max: self.center_position(0) + self.overscroll(),
        }
    }

    /// The index whose centered position lies closest to `offset`.
    ///
    /// Linear scan from 0; ties keep the earlier index (strict `<`).
    pub fn nearest_index(&self, offset: f32, max_index: usize) -> usize {
        let mut best = 0;
        let mut best_dist = (offset - self.center_position(0)).abs();
        for i in 1..=max_index {
            let dist = (offset - self.center_position(i)).abs();
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        best
    }
}

/// Horizontal limits for the strip offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetBounds {
    pub min: f32,
    pub max: f32,
}

impl OffsetBounds {
    pub fn clamp(&self, offset: f32) -> f32 {
        offset.clamp(self.min, self.max)
    }
}

// ───────────────────────── tests ─────────────────────────
