//! Geometry Primitives
//!
//! Axis-aligned boxes in terminal cells and the edge points focus
//! navigation measures between.

/// A movement direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// A point in (possibly aspect-corrected) cell space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned bounding box, in cells
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Aabb {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Aabb {
    #[must_use]
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.w)
    }

    #[must_use]
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.h)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point {
            x: f32::from(self.x) + f32::from(self.w) / 2.0,
            y: f32::from(self.y) + f32::from(self.h) / 2.0,
        }
    }

    /// Midpoint of the edge facing `dir`
    #[must_use]
    pub fn edge(&self, dir: Direction) -> Point {
        let center = self.center();
        match dir {
            Direction::Left => Point {
                x: f32::from(self.x),
                y: center.y,
            },
            Direction::Right => Point {
                x: f32::from(self.right()),
                y: center.y,
            },
            Direction::Up => Point {
                x: center.x,
                y: f32::from(self.y),
            },
            Direction::Down => Point {
                x: center.x,
                y: f32::from(self.bottom()),
            },
        }
    }
}
