//! Error types for flurry_particles

use thiserror::Error;

/// Configuration errors, raised when an emitter or handler is constructed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParticleError {
    /// Particle lifetime must be positive and finite
    #[error("Invalid particle lifetime: {0} (must be > 0)")]
    InvalidLifetime(f32),

    /// A sampling range has its minimum above its maximum
    #[error("Empty {name}: min {min} is greater than max {max}")]
    EmptyRange {
        /// Which range was rejected
        name: &'static str,
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
    },

    /// Particle capacity cannot be negative
    #[error("Invalid particle capacity: {0} (must be >= 0)")]
    NegativeCapacity(i64),

    /// Emission rate must be non-negative and finite
    #[error("Invalid emission rate: {0} particles/s")]
    InvalidEmissionRate(f32),

    /// Emission angle must be non-negative and finite
    #[error("Invalid emission angle: {0}")]
    InvalidAngle(f32),

    /// Planar emission area must have non-negative dimensions
    #[error("Invalid emission area: {width} x {height}")]
    InvalidArea {
        /// Extent along local X
        width: f32,
        /// Extent along local Z
        height: f32,
    },

    /// Cone main direction cannot be the zero vector
    #[error("Emission direction must be non-zero")]
    InvalidDirection,

    /// Transparency radius cannot be negative
    #[error("Invalid transparency radius: {0}")]
    InvalidTransparencyRadius(f32),

    /// Trail must hold at least one position
    #[error("Trail length must be at least 1")]
    InvalidTrailLength,

    /// Repulsion range must be positive and finite
    #[error("Invalid range of effect: {0} (must be > 0)")]
    InvalidRangeOfEffect(f32),
}

/// Result type for flurry_particles operations
pub type Result<T> = std::result::Result<T, ParticleError>;
