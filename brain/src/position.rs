use std::fmt;

use kinematics::Point2D;
use serde::{Deserialize, Serialize};

/// Grid coordinate: `x` is the row (grows downward), `y` the column (grows rightward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Wraps at the `i32` limits; a wrapped coordinate lands far outside any map.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.wrapping_add(dx), self.y.wrapping_add(dy))
    }

    pub fn distance(self, other: Position) -> f64 {
        (self.to_point() - other.to_point()).norm()
    }

    pub fn to_point(self) -> Point2D {
        Point2D::new(self.x as f64, self.y as f64)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Position> for Point2D {
    fn from(position: Position) -> Self {
        position.to_point()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
