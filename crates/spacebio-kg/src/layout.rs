//! Deterministic band layout.

use crate::graph::{ConceptGroup, Position};

pub const H_SPACING: f64 = 220.0;
pub const BAND_HEIGHT: f64 = 160.0;

/// Vertical band for a group: organism, stressor and platform rows stacked
/// below the center at origin.
pub fn band_y(group: ConceptGroup) -> f64 {
    let band = match group {
        ConceptGroup::Center => 0.0,
        ConceptGroup::Organism => 1.0,
        ConceptGroup::Stressor => 2.0,
        ConceptGroup::Platform => 3.0,
    };
    band * BAND_HEIGHT
}

/// Position of rank `i` in a row of `n`, centred horizontally on x = 0.
pub fn position(group: ConceptGroup, i: usize, n: usize) -> Position {
    let offset = i as f64 - (n.saturating_sub(1)) as f64 / 2.0;
    Position { x: offset * H_SPACING, y: band_y(group) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_is_centred() {
        let xs: Vec<f64> = (0..3).map(|i| position(ConceptGroup::Organism, i, 3).x).collect();
        assert_eq!(xs, vec![-220.0, 0.0, 220.0]);
        let xs: Vec<f64> = (0..2).map(|i| position(ConceptGroup::Platform, i, 2).x).collect();
        assert_eq!(xs, vec![-110.0, 110.0]);
        assert_eq!(position(ConceptGroup::Stressor, 0, 1), Position { x: 0.0, y: 320.0 });
    }

    #[test]
    fn test_bands_stack_in_group_order() {
        assert_eq!(band_y(ConceptGroup::Center), 0.0);
        assert_eq!(band_y(ConceptGroup::Organism), 160.0);
        assert_eq!(band_y(ConceptGroup::Platform), 480.0);
    }
}
