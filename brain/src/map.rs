use kinematics::Point2D;
use log::{debug, warn};

use crate::Position;

pub const DEFAULT_ROWS: usize = 10;
pub const DEFAULT_COLS: usize = 10;

/// Static obstacle layout installed by [`Map::create_map`].
pub const DEFAULT_OBSTACLES: &[(i32, i32)] = &[
    // wall along column 6, open below row 5
    (0, 6),
    (1, 6),
    (2, 6),
    (3, 6),
    (4, 6),
    (5, 6),
    // ledge on row 4
    (4, 1),
    (4, 2),
    (4, 3),
    // block in the lower left
    (7, 2),
    (7, 3),
    (8, 2),
    (8, 3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Free,
    Obstacle,
}

/// Fixed-size occupancy grid plus the last path computed on it.
#[derive(Debug, Clone)]
pub struct Map {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    path: Vec<Point2D>,
}

impl Default for Map {
    fn default() -> Self {
        let mut map = Self::new(DEFAULT_ROWS, DEFAULT_COLS);
        map.create_map();
        map
    }
}

impl Map {
    /// Obstacle-free grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Free; rows * cols],
            path: Vec::new(),
        }
    }

    pub fn with_obstacles<I, P>(rows: usize, cols: usize, obstacles: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Position>,
    {
        let mut map = Self::new(rows, cols);
        map.place_obstacles(obstacles);
        map
    }

    /// Resets every cell to the built-in layout and drops the stored path.
    /// Cells of the default layout that fall outside a smaller grid are skipped.
    pub fn create_map(&mut self) {
        self.cells.fill(Cell::Free);
        self.path.clear();
        self.place_obstacles(DEFAULT_OBSTACLES.iter().copied());
        debug!("map {}x{} created with {} obstacles", self.rows, self.cols, self.obstacle_count());
    }

    fn place_obstacles<I, P>(&mut self, obstacles: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<Position>,
    {
        for position in obstacles.into_iter().map(Into::into) {
            match self.index_of(position) {
                Some(index) => self.cells[index] = Cell::Obstacle,
                None => warn!("obstacle {} lies outside the {}x{} grid", position, self.rows, self.cols),
            }
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Obstacle).count()
    }

    /// True if the cell is an obstacle. Anything outside the grid counts as one.
    pub fn obstacle_check(&self, position: Position) -> bool {
        self.index_of(position).is_none_or(|index| self.cells[index] == Cell::Obstacle)
    }

    /// True if the position lies inside the grid, whatever the cell holds.
    pub fn validity_check(&self, position: Position) -> bool {
        position.x >= 0 && position.y >= 0 && (position.x as usize) < self.rows && (position.y as usize) < self.cols
    }

    pub fn is_traversable(&self, position: Position) -> bool {
        self.validity_check(position) && !self.obstacle_check(position)
    }

    pub fn set_path(&mut self, path: Vec<Point2D>) {
        self.path = path;
    }

    pub fn path(&self) -> &[Point2D] {
        &self.path
    }

    /// Row-major index of a cell.
    pub fn index_of(&self, position: Position) -> Option<usize> {
        self.validity_check(position)
            .then(|| position.x as usize * self.cols + position.y as usize)
    }

    pub fn position_of(&self, index: usize) -> Option<Position> {
        (index < self.cells.len()).then(|| Position::new((index / self.cols) as i32, (index % self.cols) as i32))
    }
}
