//! A* search over a [`Map`].
//!
//! - 8-connected by default, orthogonal steps cost 1 and diagonal steps √2
//! - Euclidean heuristic, so the first time the goal is closed the path is optimal
//! - frontier ordered by `cost = cost_to_come + cost_to_go`, ties go to the entry pushed first
//! - closed nodes are never re-opened
//!
//! An unreachable goal is not an error: the search returns an empty path.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use kinematics::Point2D;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::actions::Actions;
use crate::error::PlannerError;
use crate::map::Map;
use crate::nodes::NodesManager;
use crate::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AstarConfig {
    /// Allow diagonal movement (8-connected vs 4-connected grid).
    pub allow_diagonal: bool,
}

impl Default for AstarConfig {
    fn default() -> Self {
        Self { allow_diagonal: true }
    }
}

/// Entry of the open set.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    cost: f64,
    sequence: u64,
    position: Position,
}

impl Eq for OpenEntry {}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behaviour.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub struct Astar {
    map: Map,
    config: AstarConfig,
    actions: Actions,
    nodes: NodesManager,
    start: Position,
    goal: Position,
    expanded: usize,
}

impl Astar {
    pub fn new(map: Map) -> Self {
        Self::with_config(map, AstarConfig::default())
    }

    pub fn with_config(map: Map, config: AstarConfig) -> Self {
        Self {
            map,
            config,
            actions: Actions,
            nodes: NodesManager::new(),
            start: Position::default(),
            goal: Position::default(),
            expanded: 0,
        }
    }

    pub fn set_start_position(&mut self, x: i32, y: i32) {
        self.start = Position::new(x, y);
    }

    pub fn set_goal_position(&mut self, x: i32, y: i32) {
        self.goal = Position::new(x, y);
    }

    pub fn get_start_position(&self) -> Position {
        self.start
    }

    pub fn get_goal_position(&self) -> Position {
        self.goal
    }

    /// Straight-line distance from `position` to the goal.
    pub fn compute_cost_to_go(&self, position: Position) -> f64 {
        position.distance(self.goal)
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn nodes(&self) -> &NodesManager {
        &self.nodes
    }

    /// Nodes closed during the last search.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Runs a fresh search from start to goal.
    ///
    /// Returns the path as points from start to goal inclusive, also stored on the
    /// map, or an empty vector when no path exists. `Err` means the bookkeeping was
    /// inconsistent, which is a bug rather than a planning outcome.
    pub fn a_star_algorithm(&mut self) -> Result<Vec<Point2D>, PlannerError> {
        self.nodes.clear();
        self.expanded = 0;

        let (start, goal) = (self.start, self.goal);
        if !self.map.is_traversable(start) {
            warn!("start {} is outside the grid or blocked", start);
            return Ok(Vec::new());
        }
        if !self.map.is_traversable(goal) {
            warn!("goal {} is outside the grid or blocked", goal);
            return Ok(Vec::new());
        }

        let mut open = BinaryHeap::new();
        let mut sequence = 0u64;

        let cost_to_go = self.compute_cost_to_go(start);
        self.relax(start, 0.0, cost_to_go, None);
        open.push(OpenEntry { cost: cost_to_go, sequence, position: start });

        while let Some(OpenEntry { position: current, .. }) = open.pop() {
            // Superseded by a cheaper entry that was already expanded.
            if self.nodes.get_visited_status(current) {
                continue;
            }
            self.nodes.update_visited(current);
            self.expanded += 1;

            if current == goal {
                let path = self.reconstruct_path()?;
                debug!("path {} -> {} found: {} waypoints, {} nodes expanded", start, goal, path.len(), self.expanded);
                self.map.set_path(path.clone());
                return Ok(path);
            }

            let current_index = self.map.index_of(current).ok_or(PlannerError::OffGrid(current))?;
            let current_cost_to_come = self.nodes.get_cost_to_come(current)?;

            for (action, neighbor) in self.actions.successors(current, self.config.allow_diagonal) {
                if !self.map.is_traversable(neighbor) || self.nodes.get_visited_status(neighbor) {
                    continue;
                }

                let candidate = current_cost_to_come + action.cost();
                let known = self.nodes.record(neighbor).and_then(|r| r.cost_to_come);
                if known.is_some_and(|known| candidate >= known) {
                    continue;
                }

                let cost_to_go = self.compute_cost_to_go(neighbor);
                self.relax(neighbor, candidate, cost_to_go, Some(current_index));
                sequence += 1;
                open.push(OpenEntry { cost: candidate + cost_to_go, sequence, position: neighbor });
            }
        }

        debug!("no path {} -> {} after {} expansions", start, goal, self.expanded);
        Ok(Vec::new())
    }

    fn relax(&mut self, position: Position, cost_to_come: f64, cost_to_go: f64, parent: Option<usize>) {
        self.nodes.update_cost_to_come(position, cost_to_come);
        self.nodes.update_cost_to_go(position, cost_to_go);
        self.nodes.update_cost(position, cost_to_come + cost_to_go);
        if let Some(parent) = parent {
            self.nodes.update_parent(position, parent);
        }
    }

    /// Follows parent indices from the goal back to the start.
    fn reconstruct_path(&self) -> Result<Vec<Point2D>, PlannerError> {
        let (start, goal) = (self.start, self.goal);
        let mut positions = vec![goal];
        let mut current = goal;

        while let Some(index) = self.nodes.get_parent(current)? {
            let parent = self
                .map
                .position_of(index)
                .ok_or(PlannerError::BrokenParent { child: current, index })?;
            positions.push(parent);
            current = parent;
            if positions.len() > self.map.len() {
                return Err(PlannerError::OrphanedPath { start, goal });
            }
        }

        if current != start {
            return Err(PlannerError::OrphanedPath { start, goal });
        }

        positions.reverse();
        Ok(positions.into_iter().map(Position::to_point).collect())
    }
}

/// Sum of segment lengths along a path.
pub fn path_length(path: &[Point2D]) -> f64 {
    path.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{DEFAULT_COLS, DEFAULT_ROWS};

    fn points(cells: &[(i32, i32)]) -> Vec<Point2D> {
        cells.iter().map(|&(x, y)| Point2D::new(x as f64, y as f64)).collect()
    }

    #[test]
    fn test_astar_methods() {
        let mut astar = Astar::new(Map::default());

        astar.set_start_position(1, 1);
        assert_eq!(astar.get_start_position(), Position::new(1, 1));

        astar.set_goal_position(1, 4);
        assert_eq!(astar.get_goal_position(), Position::new(1, 4));

        assert_eq!(astar.compute_cost_to_go(Position::new(1, 3)), 1.0);

        let path = astar.a_star_algorithm().unwrap();
        assert_eq!(path, points(&[(1, 1), (1, 2), (1, 3), (1, 4)]));
        assert_eq!(astar.map().path(), path.as_slice());
    }

    #[test]
    fn test_cost_to_go_is_euclidean() {
        let mut astar = Astar::new(Map::new(DEFAULT_ROWS, DEFAULT_COLS));
        astar.set_goal_position(5, 2);
        assert!((astar.compute_cost_to_go(Position::new(0, 0)) - 29f64.sqrt()).abs() < 1e-12);
        assert_eq!(astar.compute_cost_to_go(Position::new(5, 2)), 0.0);
    }

    #[test]
    fn test_diagonal_path_on_empty_grid() {
        let mut astar = Astar::new(Map::new(6, 6));
        astar.set_start_position(0, 0);
        astar.set_goal_position(4, 4);

        let path = astar.a_star_algorithm().unwrap();
        assert_eq!(path.len(), 5);
        assert!((path_length(&path) - 4.0 * std::f64::consts::SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn test_octile_optimal_cost() {
        let mut astar = Astar::new(Map::new(8, 8));
        astar.set_start_position(0, 0);
        astar.set_goal_position(2, 7);

        let path = astar.a_star_algorithm().unwrap();
        let expected = 2.0 * std::f64::consts::SQRT_2 + 5.0;
        assert!((path_length(&path) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_four_connected() {
        let config = AstarConfig { allow_diagonal: false };
        let mut astar = Astar::with_config(Map::new(5, 5), config);
        astar.set_start_position(0, 0);
        astar.set_goal_position(2, 2);

        let path = astar.a_star_algorithm().unwrap();
        assert_eq!(path.len(), 5);
        for w in path.windows(2) {
            assert!(((w[1] - w[0]).norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_detour_around_wall() {
        // Column 2 blocked except the bottom row.
        let map = Map::with_obstacles(4, 5, [(0, 2), (1, 2), (2, 2)]);
        let mut astar = Astar::new(map);
        astar.set_start_position(0, 0);
        astar.set_goal_position(0, 4);

        let path = astar.a_star_algorithm().unwrap();
        assert_eq!(path.first(), Some(&Point2D::new(0.0, 0.0)));
        assert_eq!(path.last(), Some(&Point2D::new(0.0, 4.0)));
        assert!(path.contains(&Point2D::new(3.0, 2.0)));
        for w in path.windows(2) {
            let step = w[1] - w[0];
            assert!(step.x.abs() <= 1.0 && step.y.abs() <= 1.0);
        }
        let expected = 2.0 + 4.0 * std::f64::consts::SQRT_2;
        assert!((path_length(&path) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_enclosed_goal_yields_empty_path() {
        let ring = [(1, 1), (1, 2), (1, 3), (2, 1), (2, 3), (3, 1), (3, 2), (3, 3)];
        let mut astar = Astar::new(Map::with_obstacles(5, 5, ring));
        astar.set_start_position(0, 0);
        astar.set_goal_position(2, 2);

        let path = astar.a_star_algorithm().unwrap();
        assert!(path.is_empty());
        assert!(astar.map().path().is_empty());
        // Everything outside the ring was explored.
        assert_eq!(astar.expanded(), 25 - 9);
    }

    #[test]
    fn test_out_of_bounds_or_blocked_endpoints() {
        let mut astar = Astar::new(Map::default());
        astar.set_start_position(1, 1);
        astar.set_goal_position(20, 4);
        assert!(astar.a_star_algorithm().unwrap().is_empty());

        astar.set_goal_position(0, 6);
        assert!(astar.a_star_algorithm().unwrap().is_empty());

        astar.set_start_position(-1, 0);
        astar.set_goal_position(1, 4);
        assert!(astar.a_star_algorithm().unwrap().is_empty());
    }

    #[test]
    fn test_start_equals_goal() {
        let mut astar = Astar::new(Map::default());
        astar.set_start_position(2, 2);
        astar.set_goal_position(2, 2);
        assert_eq!(astar.a_star_algorithm().unwrap(), points(&[(2, 2)]));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let mut astar = Astar::new(Map::default());
        astar.set_start_position(0, 0);
        astar.set_goal_position(9, 9);

        let first = astar.a_star_algorithm().unwrap();
        let expanded = astar.expanded();
        assert!(!first.is_empty());
        for _ in 0..3 {
            assert_eq!(astar.a_star_algorithm().unwrap(), first);
            assert_eq!(astar.expanded(), expanded);
        }
    }

    #[test]
    fn test_no_stale_state_between_runs() {
        let mut astar = Astar::new(Map::default());
        astar.set_start_position(0, 0);
        astar.set_goal_position(9, 9);
        astar.a_star_algorithm().unwrap();

        astar.set_start_position(1, 1);
        astar.set_goal_position(1, 4);
        assert_eq!(astar.a_star_algorithm().unwrap(), points(&[(1, 1), (1, 2), (1, 3), (1, 4)]));
        assert_eq!(astar.nodes().get_parent(Position::new(1, 1)), Ok(None));
    }

    #[test]
    fn test_node_records_are_consistent() {
        let mut astar = Astar::new(Map::default());
        astar.set_start_position(0, 0);
        astar.set_goal_position(6, 8);
        astar.a_star_algorithm().unwrap();

        let nodes = astar.nodes();
        for x in 0..DEFAULT_ROWS as i32 {
            for y in 0..DEFAULT_COLS as i32 {
                let position = Position::new(x, y);
                if !nodes.contains(position) {
                    continue;
                }
                let cost = nodes.get_cost(position).unwrap();
                let sum = nodes.get_cost_to_come(position).unwrap() + nodes.get_cost_to_go(position).unwrap();
                assert!((cost - sum).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_open_entry_tie_break() {
        let mut heap = BinaryHeap::new();
        heap.push(OpenEntry { cost: 2.0, sequence: 1, position: Position::new(0, 1) });
        heap.push(OpenEntry { cost: 1.0, sequence: 3, position: Position::new(0, 3) });
        heap.push(OpenEntry { cost: 1.0, sequence: 2, position: Position::new(0, 2) });

        let order: Vec<_> = std::iter::from_fn(|| heap.pop()).map(|e| e.position.y).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }
}
