use std::f64::consts::SQRT_2;

use crate::Position;

/// The eight grid moves. `x` is the row, so "up" decreases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    UpRight,
    UpLeft,
    DownRight,
    DownLeft,
}

impl Action {
    /// Expansion order used by the search.
    pub const ALL: [Action; 8] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::UpRight,
        Action::UpLeft,
        Action::DownRight,
        Action::DownLeft,
    ];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
            Action::UpRight => (-1, 1),
            Action::UpLeft => (-1, -1),
            Action::DownRight => (1, 1),
            Action::DownLeft => (1, -1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        let (dx, dy) = self.offset();
        dx != 0 && dy != 0
    }

    /// Edge weight of the move.
    pub fn cost(self) -> f64 {
        if self.is_diagonal() { SQRT_2 } else { 1.0 }
    }

    pub fn opposite(self) -> Action {
        match self {
            Action::Up => Action::Down,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
            Action::Right => Action::Left,
            Action::UpRight => Action::DownLeft,
            Action::UpLeft => Action::DownRight,
            Action::DownRight => Action::UpLeft,
            Action::DownLeft => Action::UpRight,
        }
    }

    /// Neighbor in this direction. No bounds or obstacle check.
    pub fn apply(self, position: Position) -> Position {
        let (dx, dy) = self.offset();
        position.offset(dx, dy)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Actions;

impl Actions {
    pub fn move_up(&self, position: Position) -> Position {
        Action::Up.apply(position)
    }

    pub fn move_down(&self, position: Position) -> Position {
        Action::Down.apply(position)
    }

    pub fn move_left(&self, position: Position) -> Position {
        Action::Left.apply(position)
    }

    pub fn move_right(&self, position: Position) -> Position {
        Action::Right.apply(position)
    }

    pub fn move_up_right(&self, position: Position) -> Position {
        Action::UpRight.apply(position)
    }

    pub fn move_up_left(&self, position: Position) -> Position {
        Action::UpLeft.apply(position)
    }

    pub fn move_down_right(&self, position: Position) -> Position {
        Action::DownRight.apply(position)
    }

    pub fn move_down_left(&self, position: Position) -> Position {
        Action::DownLeft.apply(position)
    }

    /// Candidate moves in [`Action::ALL`] order, diagonals dropped when not allowed.
    pub fn successors(&self, position: Position, allow_diagonal: bool) -> impl Iterator<Item = (Action, Position)> + use<> {
        Action::ALL
            .into_iter()
            .filter(move |action| allow_diagonal || !action.is_diagonal())
            .map(move |action| (action, action.apply(position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_methods() {
        let action = Actions;
        let position = Position::new(1, 1);

        assert_eq!(action.move_up(position), Position::new(0, 1));
        assert_eq!(action.move_down(position), Position::new(2, 1));
        assert_eq!(action.move_left(position), Position::new(1, 0));
        assert_eq!(action.move_right(position), Position::new(1, 2));
        assert_eq!(action.move_up_right(position), Position::new(0, 2));
        assert_eq!(action.move_up_left(position), Position::new(0, 0));
        assert_eq!(action.move_down_right(position), Position::new(2, 2));
        assert_eq!(action.move_down_left(position), Position::new(2, 0));
    }

    #[test]
    fn test_opposite_moves_cancel() {
        let positions = [
            Position::new(-3, 7),
            Position::new(i32::MIN, 0),
            Position::new(i32::MAX, i32::MIN),
            Position::new(0, i32::MAX),
        ];
        let actions = Actions;
        for position in positions {
            for action in Action::ALL {
                assert_eq!(action.opposite().apply(action.apply(position)), position);
                assert_eq!(action.opposite().opposite(), action);
            }

            assert_eq!(actions.move_down(actions.move_up(position)), position);
            assert_eq!(actions.move_right(actions.move_left(position)), position);
            assert_eq!(actions.move_down_left(actions.move_up_right(position)), position);
            assert_eq!(actions.move_down_right(actions.move_up_left(position)), position);
        }
    }

    #[test]
    fn test_moves_wrap_at_coordinate_limits() {
        let actions = Actions;
        assert_eq!(actions.move_up(Position::new(i32::MIN, 0)), Position::new(i32::MAX, 0));
        assert_eq!(actions.move_right(Position::new(0, i32::MAX)), Position::new(0, i32::MIN));
        assert_eq!(actions.move_down_left(Position::new(i32::MAX, i32::MIN)), Position::new(i32::MIN, i32::MAX));
    }

    #[test]
    fn test_move_costs() {
        for action in Action::ALL {
            let (dx, dy) = action.offset();
            let expected = ((dx * dx + dy * dy) as f64).sqrt();
            assert!((action.cost() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_successors() {
        let actions = Actions;
        let origin = Position::new(0, 0);

        let all: Vec<_> = actions.successors(origin, true).collect();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0], (Action::Up, Position::new(-1, 0)));

        let orthogonal: Vec<_> = actions.successors(origin, false).map(|(_, p)| p).collect();
        assert_eq!(
            orthogonal,
            vec![Position::new(-1, 0), Position::new(1, 0), Position::new(0, -1), Position::new(0, 1)]
        );
    }
}
