use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod ik_solver;

pub use error::KinematicsError;
pub use ik_solver::{IkSolution, IkSolver, ReachPolicy};

/// A point in the grid plane: `x` is the row, `y` the column.
pub type Point2D = Vector2<f64>;

/// One arm pose, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointAngles {
    pub theta1: f64,
    pub theta2: f64,
    pub theta3: f64,
    pub theta4: f64,
    pub theta5: f64,
    pub theta6: f64,
}

impl JointAngles {
    pub fn from_array(angles: [f64; 6]) -> Self {
        let [theta1, theta2, theta3, theta4, theta5, theta6] = angles;
        Self { theta1, theta2, theta3, theta4, theta5, theta6 }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [self.theta1, self.theta2, self.theta3, self.theta4, self.theta5, self.theta6]
    }

    pub fn to_radians(&self) -> [f64; 6] {
        self.as_array().map(f64::to_radians)
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|a| a.is_finite())
    }
}

/// Geometry of the arm. Lengths share the grid's unit (one cell); angles are degrees.
///
/// The shoulder, elbow and wrist pitch joints (`theta2..theta4`) move in the grid
/// plane. `theta1` is the fixed mounting yaw of the base, `theta5` turns the tool
/// towards the target heading and `theta6` is the flange roll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmGeometry {
    pub shoulder: Point2D,
    pub upper_arm: f64,
    pub forearm: f64,
    pub hand: f64,
    pub tool_pitch: f64,
    pub base_yaw: f64,
    pub tool_roll: f64,
}

impl Default for ArmGeometry {
    fn default() -> Self {
        Self {
            shoulder: Point2D::new(-3.0, -2.5),
            upper_arm: 3.45,
            forearm: 5.4,
            hand: 1.0,
            tool_pitch: -60.0,
            base_yaw: -90.0,
            tool_roll: 0.0,
        }
    }
}

impl ArmGeometry {
    pub fn validate(&self) -> Result<(), KinematicsError> {
        let lengths = [("upper_arm", self.upper_arm), ("forearm", self.forearm), ("hand", self.hand)];
        for (name, length) in lengths {
            if !length.is_finite() || length < 0.0 {
                return Err(KinematicsError::InvalidGeometry(format!("{name} must be a finite, non-negative length")));
            }
        }
        if self.upper_arm == 0.0 || self.forearm == 0.0 {
            return Err(KinematicsError::InvalidGeometry("upper_arm and forearm must be non-zero".to_string()));
        }
        let angles = [self.tool_pitch, self.base_yaw, self.tool_roll];
        if !self.shoulder.iter().chain(angles.iter()).all(|v| v.is_finite()) {
            return Err(KinematicsError::InvalidGeometry("shoulder and angles must be finite".to_string()));
        }
        Ok(())
    }

    /// Smallest and largest distance between shoulder and wrist centre.
    pub fn wrist_reach(&self) -> (f64, f64) {
        ((self.upper_arm - self.forearm).abs(), self.upper_arm + self.forearm)
    }

    /// Offset from the wrist centre to the tool tip.
    pub fn hand_offset(&self) -> Point2D {
        let pitch = self.tool_pitch.to_radians();
        Point2D::new(pitch.cos(), pitch.sin()) * self.hand
    }
}

pub trait ForwardKinematics {
    fn forward_kinematics(&self, joints: &JointAngles) -> Point2D;
}

impl ForwardKinematics for ArmGeometry {
    fn forward_kinematics(&self, joints: &JointAngles) -> Point2D {
        let shoulder = joints.theta2.to_radians();
        let elbow = shoulder + joints.theta3.to_radians();
        let tool = elbow + joints.theta4.to_radians();

        self.shoulder
            + Point2D::new(shoulder.cos(), shoulder.sin()) * self.upper_arm
            + Point2D::new(elbow.cos(), elbow.sin()) * self.forearm
            + Point2D::new(tool.cos(), tool.sin()) * self.hand
    }
}
