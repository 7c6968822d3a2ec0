use std::path::Path;

use brain::{AstarConfig, Position};
use kinematics::{ArmGeometry, ReachPolicy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceConfig {
    pub start: Position,
    pub goal: Position,
    /// Simulated hardware time per step.
    pub step_interval_ms: u64,
    pub reach_policy: ReachPolicy,
    pub planner: AstarConfig,
    pub arm: ArmGeometry,
    pub comm: CommConfig,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            start: Position::new(1, 1),
            goal: Position::new(1, 4),
            step_interval_ms: 100,
            reach_policy: ReachPolicy::default(),
            planner: AstarConfig::default(),
            arm: ArmGeometry::default(),
            comm: CommConfig::default(),
        }
    }
}

impl InterfaceConfig {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;
        let config: InterfaceConfig = toml::from_str(&content)?;
        config.arm.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommConfig {
    /// Publish every step on zenoh.
    pub publish: bool,
    pub joint_command_key: String,
    pub joint_state_key: String,
    pub frame_id: String,
}

impl Default for CommConfig {
    fn default() -> Self {
        Self {
            publish: false,
            joint_command_key: "rt/robot/joint_commands".to_string(),
            joint_state_key: "rt/robot/joint_states".to_string(),
            frame_id: "robot_base".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: InterfaceConfig = toml::from_str(
            r#"
            goal = { x = 3, y = 2 }
            step_interval_ms = 5
            reach_policy = "reject"

            [planner]
            allow_diagonal = false

            [arm]
            upper_arm = 4.0
            shoulder = [0.0, -1.0]

            [comm]
            publish = true
            "#,
        )
        .unwrap();

        assert_eq!(config.start, Position::new(1, 1));
        assert_eq!(config.goal, Position::new(3, 2));
        assert_eq!(config.step_interval_ms, 5);
        assert_eq!(config.reach_policy, ReachPolicy::Reject);
        assert!(!config.planner.allow_diagonal);
        assert_eq!(config.arm.upper_arm, 4.0);
        assert_eq!(config.arm.shoulder.y, -1.0);
        assert_eq!(config.arm.forearm, ArmGeometry::default().forearm);
        assert!(config.comm.publish);
        assert_eq!(config.comm.joint_command_key, "rt/robot/joint_commands");
    }

    #[test]
    fn test_load_bundled_config() {
        let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/planner.toml"));
        let config = InterfaceConfig::load(path).unwrap();

        assert_eq!(config.start, Position::new(1, 1));
        assert_eq!(config.arm, ArmGeometry::default());
        assert_eq!(config.reach_policy, ReachPolicy::Clamp);
    }

    #[test]
    fn test_missing_config_file() {
        assert!(InterfaceConfig::load(Path::new("/nonexistent/planner.toml")).is_err());
    }

    #[test]
    fn test_empty_toml() {
        let config: InterfaceConfig = toml::from_str("").unwrap();
        assert_eq!(config.goal, Position::new(1, 4));
        assert!(config.planner.allow_diagonal);
        assert!(!config.comm.publish);
    }
}
