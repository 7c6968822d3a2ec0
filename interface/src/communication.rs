use zenoh::Session;
use edgefirst_schemas::std_msgs::Header;
use edgefirst_schemas::builtin_interfaces::Time;
use serde::{Deserialize, Serialize};
use kinematics::JointAngles;
use log::warn;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::CommConfig;

/// ROS 2 `sensor_msgs/JointState`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JointState {
    pub header: Header,
    pub name: Vec<String>,
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    pub effort: Vec<f64>,
}

impl Default for JointState {
    fn default() -> Self {
        Self {
            header: Header {
                stamp: Time::new(0, 0),
                frame_id: String::new(),
            },
            name: Vec::new(),
            position: Vec::new(),
            velocity: Vec::new(),
            effort: Vec::new(),
        }
    }
}

// ROS 2 CDR encapsulation header, little endian.
const CDR_LE_HEADER: [u8; 4] = [0x00, 0x01, 0x00, 0x00];

pub struct CommunicationLayer {
    session: Session,
    joint_state_key: String,
    joint_command_key: String,
    frame_id: String,
}

impl CommunicationLayer {
    pub async fn new(config: &CommConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let zenoh_config = zenoh::config::Config::default();
        let session = zenoh::open(zenoh_config).await.map_err(|e| e.to_string())?;

        Ok(Self {
            session,
            joint_state_key: config.joint_state_key.clone(),
            joint_command_key: config.joint_command_key.clone(),
            frame_id: config.frame_id.clone(),
        })
    }

    pub async fn publish_joint_command(&self, angles: &JointAngles) -> Result<(), Box<dyn std::error::Error>> {
        let msg = to_ros_joint_state(angles, &self.frame_id);
        let payload = encode_cdr(&msg)?;
        self.session.put(&self.joint_command_key, payload).await.map_err(|e| e.to_string())?;
        Ok(())
    }

    pub async fn subscribe_joint_state<F>(&self, callback: F) -> Result<(), Box<dyn std::error::Error>>
    where F: Fn(JointAngles) + Send + Sync + 'static
    {
        let subscriber = self.session.declare_subscriber(&self.joint_state_key).await.map_err(|e| e.to_string())?;

        tokio::spawn(async move {
            while let Ok(sample) = subscriber.recv_async().await {
                let payload = sample.payload().to_bytes();
                match decode_cdr(&payload) {
                    Some(msg) => match from_ros_joint_state(&msg) {
                        Some(angles) => callback(angles),
                        None => warn!("JointState carries {} positions, expected 6", msg.position.len()),
                    },
                    None => warn!("Failed to deserialize JointState ({} bytes)", payload.len()),
                }
            }
        });
        Ok(())
    }
}

fn encode_cdr(msg: &JointState) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut payload = CDR_LE_HEADER.to_vec();
    let data = cdr::serialize::<_, _, cdr::CdrLe>(msg, cdr::Infinite)?;
    payload.extend(data);
    Ok(payload)
}

fn decode_cdr(payload: &[u8]) -> Option<JointState> {
    // Skip the encapsulation header; little endian is assumed.
    if payload.len() <= CDR_LE_HEADER.len() {
        return None;
    }
    let mut deserializer = cdr::Deserializer::<_, _, cdr::LittleEndian>::new(&payload[CDR_LE_HEADER.len()..], cdr::Infinite);
    serde::Deserialize::deserialize(&mut deserializer).ok()
}

/// Positions go out in radians, as ROS expects.
fn to_ros_joint_state(angles: &JointAngles, frame_id: &str) -> JointState {
    let mut msg = JointState::default();

    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    msg.header.stamp = Time::new(now.as_secs() as i32, now.subsec_nanos());
    msg.header.frame_id = frame_id.to_string();

    for (i, angle) in angles.to_radians().into_iter().enumerate() {
        msg.name.push(format!("joint_{}", i + 1));
        msg.position.push(angle);
    }
    msg
}

fn from_ros_joint_state(msg: &JointState) -> Option<JointAngles> {
    let positions: [f64; 6] = msg.position.as_slice().try_into().ok()?;
    Some(JointAngles::from_array(positions.map(f64::to_degrees)))
}
