use kinematics::KinematicsError;
use thiserror::Error;

use crate::Position;

/// Which scalar of a node record was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeField {
    Cost,
    CostToCome,
    CostToGo,
    Parent,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    #[error("{field:?} of node {position} was read before being set")]
    Unset { position: Position, field: NodeField },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error(transparent)]
    Node(#[from] NodeError),

    #[error("expanded node {0} is outside the grid")]
    OffGrid(Position),

    #[error("parent index {index} of node {child} is not a grid cell")]
    BrokenParent { child: Position, index: usize },

    #[error("parent chain from {goal} does not lead back to {start}")]
    OrphanedPath { start: Position, goal: Position },
}

#[derive(Error, Debug)]
pub enum BrainError {
    #[error("planning failed: {0}")]
    Planner(#[from] PlannerError),

    #[error("inverse kinematics failed: {0}")]
    Kinematics(#[from] KinematicsError),
}
