use strum::VariantArray;

use crate::location::Location;

/// A travel direction for the beam on the rectangular grid.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Step one cell from `location` in the direction `self`.
    ///
    /// Bounds are not checked here; an off-grid step wraps to a huge
    /// coordinate which any later array lookup rejects.
    pub(crate) fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::Up => location.offset_by((0, -1)),
            Self::Down => location.offset_by((0, 1)),
            Self::Left => location.offset_by((-1, 0)),
            Self::Right => location.offset_by((1, 0)),
        }
    }

    /// Invert the direction specified by `self`.
    pub(crate) fn opposite(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether `self` and `other` lie on different axes, i.e. moving from one
    /// to the other is a 90° turn and needs a mirror.
    pub(crate) fn is_perpendicular(&self, other: Self) -> bool {
        *self != other && *self != other.opposite()
    }
}
