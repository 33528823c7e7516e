use crate::direction::Direction;

/// One of the two diagonal reflector orientations.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MirrorKind {
    /// `/`, the 45° mirror: links the west/north arms and the east/south arms.
    Slash,
    /// `\`, the 135° mirror: links the west/south arms and the north/east arms.
    Backslash,
}

impl MirrorKind {
    /// The orientation that redirects a beam travelling `from` onto `to`.
    ///
    /// Total over the perpendicular (from, to) combinations; collinear pairs
    /// are a caller bug.
    pub(crate) fn between(from: Direction, to: Direction) -> Self {
        use Direction::*;

        debug_assert!(from.is_perpendicular(to));
        match (from, to) {
            (Right, Up) | (Up, Right) | (Left, Down) | (Down, Left) => Self::Slash,
            (Right, Down) | (Down, Right) | (Left, Up) | (Up, Left) => Self::Backslash,
            _ => unreachable!("collinear directions have no mirror"),
        }
    }

    /// Redirect a beam arriving with travel direction `travel`.
    pub(crate) fn deflect(&self, travel: Direction) -> Direction {
        use Direction::*;

        match (self, travel) {
            (Self::Slash, Right) => Up,
            (Self::Slash, Up) => Right,
            (Self::Slash, Left) => Down,
            (Self::Slash, Down) => Left,
            (Self::Backslash, Right) => Down,
            (Self::Backslash, Down) => Right,
            (Self::Backslash, Left) => Up,
            (Self::Backslash, Up) => Left,
        }
    }
}

/// A single cell of the puzzle grid.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Cell {
    /// A blank cell the beam may cross and a mirror may occupy.
    #[default]
    Empty,
    /// An opaque cell the beam may never touch.
    Block,
    /// A cell the beam must pass through exactly once.
    Crystal,
    /// A placed reflector.
    Mirror(MirrorKind),
}

impl Cell {
    pub(crate) fn from_char(ch: char) -> Option<Self> {
        match ch {
            ' ' => Some(Self::Empty),
            '#' => Some(Self::Block),
            '*' => Some(Self::Crystal),
            '/' => Some(Self::Mirror(MirrorKind::Slash)),
            '\\' => Some(Self::Mirror(MirrorKind::Backslash)),
            _ => None,
        }
    }

    pub(crate) fn as_char(&self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Block => '#',
            Self::Crystal => '*',
            Self::Mirror(MirrorKind::Slash) => '/',
            Self::Mirror(MirrorKind::Backslash) => '\\',
        }
    }
}
