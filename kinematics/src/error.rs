use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KinematicsError {
    #[error("target ({x}, {y}) is not a finite point")]
    NonFiniteTarget { x: f64, y: f64 },

    #[error("target ({x}, {y}) is out of reach: wrist distance {distance:.3} outside [{min:.3}, {max:.3}]")]
    Unreachable { x: f64, y: f64, distance: f64, min: f64, max: f64 },

    #[error("invalid arm geometry: {0}")]
    InvalidGeometry(String),
}
