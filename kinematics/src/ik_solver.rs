use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{ArmGeometry, ForwardKinematics, JointAngles, KinematicsError, Point2D};

/// Maximum tool tip error accepted by [`IkSolver::verify_solution`].
pub const POSITION_TOLERANCE: f64 = 1e-6;

const SINGULAR_DISTANCE: f64 = 1e-9;

/// What to do with a target the wrist centre cannot reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReachPolicy {
    /// Move the wrist centre radially onto the nearest reachable distance.
    #[default]
    Clamp,
    /// Fail with [`KinematicsError::Unreachable`].
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IkSolution {
    pub angles: JointAngles,
    /// The target was out of reach and the pose points at the nearest reachable spot.
    pub clamped: bool,
}

pub struct IkSolver {
    geometry: ArmGeometry,
    policy: ReachPolicy,
}

impl Default for IkSolver {
    fn default() -> Self {
        Self::new(ArmGeometry::default())
    }
}

impl IkSolver {
    pub fn new(geometry: ArmGeometry) -> Self {
        Self { geometry, policy: ReachPolicy::default() }
    }

    pub fn with_policy(mut self, policy: ReachPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn geometry(&self) -> &ArmGeometry {
        &self.geometry
    }

    /// Solves every target in order, one pose per point.
    pub fn ik_solver(&self, targets: &[Point2D]) -> Result<Vec<JointAngles>, KinematicsError> {
        targets.iter().map(|target| self.solve(target).map(|s| s.angles)).collect()
    }

    /// Like [`IkSolver::ik_solver`], keeping the per-point clamp flag.
    pub fn solve_all(&self, targets: &[Point2D]) -> Result<Vec<IkSolution>, KinematicsError> {
        targets.iter().map(|target| self.solve(target)).collect()
    }

    /// Closed-form solution for a single target, elbow-up branch.
    ///
    /// The wrist centre is `w = p - shoulder - hand * (cos(pitch), sin(pitch))`. With
    /// `L1`, `L2` the upper arm and forearm:
    /// `theta3 = acos((|w|^2 - L1^2 - L2^2) / (2 L1 L2))`,
    /// `theta2 = atan2(w) - atan2(L2 sin(theta3), L1 + L2 cos(theta3))` and
    /// `theta4 = pitch - theta2 - theta3`.
    pub fn solve(&self, target: &Point2D) -> Result<IkSolution, KinematicsError> {
        if !target.x.is_finite() || !target.y.is_finite() {
            return Err(KinematicsError::NonFiniteTarget { x: target.x, y: target.y });
        }

        let geometry = &self.geometry;
        let (l1, l2) = (geometry.upper_arm, geometry.forearm);
        let (min, max) = geometry.wrist_reach();

        let mut wrist = target - geometry.shoulder - geometry.hand_offset();
        let distance = wrist.norm();
        let clamped = distance < min || distance > max;

        if clamped {
            match self.policy {
                ReachPolicy::Reject => {
                    return Err(KinematicsError::Unreachable { x: target.x, y: target.y, distance, min, max });
                }
                ReachPolicy::Clamp => {
                    let direction = if distance > SINGULAR_DISTANCE { wrist / distance } else { Point2D::x() };
                    wrist = direction * distance.clamp(min, max);
                    warn!(
                        "target ({}, {}) out of reach (wrist distance {:.3}), clamped to {:.3}",
                        target.x,
                        target.y,
                        distance,
                        wrist.norm()
                    );
                }
            }
        }

        let cos_elbow = ((wrist.norm_squared() - l1 * l1 - l2 * l2) / (2.0 * l1 * l2)).clamp(-1.0, 1.0);
        let theta3 = cos_elbow.acos();
        let theta2 = wrist.y.atan2(wrist.x) - (l2 * theta3.sin()).atan2(l1 + l2 * theta3.cos());
        let theta2 = theta2.to_degrees();
        let theta3 = theta3.to_degrees();
        let theta4 = wrap_degrees(geometry.tool_pitch - theta2 - theta3);

        let heading = if target.norm() > SINGULAR_DISTANCE { target.y.atan2(target.x).to_degrees() } else { 0.0 };

        let angles = JointAngles {
            theta1: geometry.base_yaw,
            theta2: wrap_degrees(theta2),
            theta3,
            theta4,
            theta5: heading,
            theta6: geometry.tool_roll,
        };
        debug!("ik ({}, {}) -> {:?}", target.x, target.y, angles);

        Ok(IkSolution { angles, clamped })
    }

    pub fn forward_kinematics(&self, joints: &JointAngles) -> Point2D {
        self.geometry.forward_kinematics(joints)
    }

    /// Checks that the chain `shoulder + sum_i L_i (cos(phi_i), sin(phi_i))`, with
    /// `phi_i` the running sum of `theta2..theta4`, lands on the target.
    pub fn verify_solution(&self, target: &Point2D, solution: &JointAngles) -> bool {
        let tip = self.forward_kinematics(solution);
        solution.is_finite() && (target - tip).norm() < POSITION_TOLERANCE
    }
}

/// Wraps an angle in degrees to (-180, 180].
fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 { wrapped + 360.0 } else { wrapped }
}
