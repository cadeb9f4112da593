//! The six edge directions of a pointy-side-up hex cell.

use std::fmt;

/// Edge direction of a hex cell, clockwise starting north-east.
///
/// The wedge between two corners of the hexagon faces one of these
/// directions; neighbor links, rivers and mesh connections are all
/// keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HexDirection {
    /// North-east.
    NE,
    /// East.
    E,
    /// South-east.
    SE,
    /// South-west.
    SW,
    /// West.
    W,
    /// North-west.
    NW,
}

impl HexDirection {
    /// All six directions in clockwise order.
    pub const ALL: [HexDirection; 6] = [
        HexDirection::NE,
        HexDirection::E,
        HexDirection::SE,
        HexDirection::SW,
        HexDirection::W,
        HexDirection::NW,
    ];

    /// Index into direction-keyed arrays (NE = 0 .. NW = 5).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The direction pointing the opposite way.
    pub const fn opposite(self) -> HexDirection {
        Self::ALL[(self as usize + 3) % 6]
    }

    /// Next direction clockwise.
    pub const fn next(self) -> HexDirection {
        Self::ALL[(self as usize + 1) % 6]
    }

    /// Previous direction (counter-clockwise).
    pub const fn previous(self) -> HexDirection {
        Self::ALL[(self as usize + 5) % 6]
    }

    /// Two steps clockwise.
    pub const fn next2(self) -> HexDirection {
        Self::ALL[(self as usize + 2) % 6]
    }

    /// Two steps counter-clockwise.
    pub const fn previous2(self) -> HexDirection {
        Self::ALL[(self as usize + 4) % 6]
    }
}

impl fmt::Display for HexDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_three_steps_away() {
        assert_eq!(HexDirection::NE.opposite(), HexDirection::SW);
        assert_eq!(HexDirection::E.opposite(), HexDirection::W);
        assert_eq!(HexDirection::SE.opposite(), HexDirection::NW);
    }

    #[test]
    fn opposite_is_involutive() {
        for d in HexDirection::ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn next_and_previous_cancel() {
        for d in HexDirection::ALL {
            assert_eq!(d.next().previous(), d);
            assert_eq!(d.previous().next(), d);
        }
    }

    #[test]
    fn next_wraps_around() {
        assert_eq!(HexDirection::NW.next(), HexDirection::NE);
        assert_eq!(HexDirection::NE.previous(), HexDirection::NW);
    }

    #[test]
    fn double_steps_match_single_steps() {
        for d in HexDirection::ALL {
            assert_eq!(d.next2(), d.next().next());
            assert_eq!(d.previous2(), d.previous().previous());
        }
    }
}
