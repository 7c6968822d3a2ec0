use kinematics::{ArmGeometry, IkSolver, JointAngles, Point2D};
use log::{debug, info, warn};
use std::collections::VecDeque;

pub mod actions;
pub mod astar;
pub mod error;
pub mod map;
pub mod nodes;
pub mod position;

pub use actions::{Action, Actions};
pub use astar::{Astar, AstarConfig};
pub use error::{BrainError, NodeError, PlannerError};
pub use map::Map;
pub use nodes::NodesManager;
pub use position::Position;

#[derive(Debug, Default)]
pub struct Planner {
    trajectory: VecDeque<JointAngles>,
}

impl Planner {
    pub fn new() -> Self {
        Self {
            trajectory: VecDeque::new(),
        }
    }

    pub fn add_waypoint(&mut self, state: JointAngles) {
        self.trajectory.push_back(state);
    }

    pub fn next_step(&mut self) -> Option<JointAngles> {
        self.trajectory.pop_front()
    }

    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }

    pub fn clear(&mut self) {
        self.trajectory.clear();
    }
}

/// Outcome of [`RobotBrain::plan_motion`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanReport {
    /// Poses queued; zero when the goal cannot be reached.
    pub steps: usize,
    /// Waypoints outside the arm's reach, whose poses point at the nearest reachable spot.
    pub clamped: Vec<Point2D>,
}

impl PlanReport {
    pub fn is_fully_reachable(&self) -> bool {
        self.clamped.is_empty()
    }
}

/// Grid search followed by inverse kinematics, one arm pose per waypoint.
pub struct RobotBrain {
    astar: Astar,
    solver: IkSolver,
    planner: Planner,
}

impl RobotBrain {
    pub fn new(map: Map, geometry: ArmGeometry) -> Self {
        Self::with_config(map, AstarConfig::default(), IkSolver::new(geometry))
    }

    pub fn with_config(map: Map, config: AstarConfig, solver: IkSolver) -> Self {
        Self {
            astar: Astar::with_config(map, config),
            solver,
            planner: Planner::new(),
        }
    }

    /// Replaces the current trajectory with one leading from `start` to `goal`.
    ///
    /// Waypoints the arm cannot reach are queued with clamped poses and listed in the report.
    pub fn plan_motion(&mut self, start: Position, goal: Position) -> Result<PlanReport, BrainError> {
        self.planner.clear();
        self.astar.set_start_position(start.x, start.y);
        self.astar.set_goal_position(goal.x, goal.y);

        let path = self.astar.a_star_algorithm()?;
        if path.is_empty() {
            info!("no path from {} to {}", start, goal);
            return Ok(PlanReport::default());
        }

        let mut clamped = Vec::new();
        for (point, solution) in path.iter().zip(self.solver.solve_all(&path)?) {
            debug!("queued pose {:?}", solution.angles);
            if solution.clamped {
                clamped.push(*point);
            }
            self.planner.add_waypoint(solution.angles);
        }
        if !clamped.is_empty() {
            warn!("{} of {} waypoints are out of the arm's reach", clamped.len(), path.len());
        }
        info!("planned {} steps from {} to {}", self.planner.len(), start, goal);
        Ok(PlanReport { steps: self.planner.len(), clamped })
    }

    pub fn execute_next_step(&mut self) -> Option<JointAngles> {
        self.planner.next_step()
    }

    pub fn remaining_steps(&self) -> usize {
        self.planner.len()
    }

    /// Waypoints of the last successful plan.
    pub fn path(&self) -> &[Point2D] {
        self.astar.map().path()
    }

    pub fn map(&self) -> &Map {
        self.astar.map()
    }

    pub fn solver(&self) -> &IkSolver {
        &self.solver
    }
}
