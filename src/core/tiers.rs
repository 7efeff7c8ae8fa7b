//! Visual tiering: depth-of-field treatment by distance from the
//! active card.
//!
//! Scale and opacity fall off monotonically with distance; the small
//! positive `translate_y` keeps shrunken card tops aligned with the
//! active card despite the top-anchored scale origin.

/// Rendering treatment for one card slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardVisual {
    pub scale: f32,
    pub opacity: f32,
    pub translate_y: f32,
    pub z_index: u8,
    pub is_active: bool,
}

/// Tier table keyed by `|index - active|`. Only the active card is
/// interactive; the rest exist to be glanced at (and clicked to focus).
pub fn visual_state(index: usize, active: usize) -> CardVisual {
    let distance = index.abs_diff(active);
    let (scale, opacity, translate_y, z_index) = match distance {
        0 => (1.0, 1.0, 0.0, 20),
        1 => (0.85, 0.7, 5.0, 15),
        2 => (0.75, 0.4, 8.0, 10),
        _ => (0.70, 0.2, 10.0, 5),
    };
    CardVisual {
        scale,
        opacity,
        translate_y,
        z_index,
        is_active: distance == 0,
    }
}

// ───────────────────────── tests ─────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_table_matches_distance() {
        let active = visual_state(4, 4);
        assert_eq!(active.scale, 1.0);
        assert_eq!(active.opacity, 1.0);
        assert_eq!(active.translate_y, 0.0);
        assert_eq!(active.z_index, 20);
        assert!(active.is_active);

        let adjacent = visual_state(5, 4);
        assert_eq!(adjacent.scale, 0.85);
        assert_eq!(adjacent.opacity, 0.7);
        assert_eq!(adjacent.translate_y, 5.0);
        assert_eq!(adjacent.z_index, 15);
        assert!(!adjacent.is_active);

        let visible = visual_state(6, 4);
        assert_eq!(visible.scale, 0.75);
        assert_eq!(visible.opacity, 0.4);
        assert_eq!(visible.z_index, 10);

        let far = visual_state(9, 4);
        assert_eq!(far.scale, 0.70);
        assert_eq!(far.opacity, 0.2);
        assert_eq!(far.translate_y, 10.0);
        assert_eq!(far.z_index, 5);
        // Everything past distance 2 sits on the same tier.
        assert_eq!(visual_state(40, 4), far);
    }

    #[test]
    fn tiers_are_symmetric_around_active() {
        for dist in 0..6usize {
            assert_eq!(visual_state(10 + dist, 10), visual_state(10 - dist, 10));
        }
    }
}
