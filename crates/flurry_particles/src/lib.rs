//! # Flurry Particles
//!
//! CPU particle simulation for small 3D scenes.
//!
//! This crate provides:
//! - **Emitters** spawning particles from a point, inside a cone, or across a rectangle
//! - **Trails** recording the last few positions of a particle
//! - **Anti-attraction** pushing particles away from planes and cylinders
//! - **Render interface** exposing read-only per-particle instance data
//!
//! ## Quick Start
//!
//! ```rust
//! use flurry_core::{Solid, Vec3};
//! use flurry_particles::{Emitter, ParticleSystem};
//!
//! let mut system = ParticleSystem::from_solids(vec![Solid::plane()], 5.0)?;
//! system.spawn_emitter(Emitter::cone(Vec3::ZERO, Vec3::UP).with_emission_rate(60.0))?;
//!
//! for _ in 0..60 {
//!     system.update(1.0 / 60.0);
//! }
//! assert!(system.particle_count() > 0);
//! # Ok::<(), flurry_particles::ParticleError>(())
//! ```

pub mod anti_attractor;
pub mod emitter;
pub mod error;
pub mod particle;
pub mod render;
pub mod system;
pub mod trail;

pub use anti_attractor::{
    cylinder_surface, plane_surface, AntiAttractorHandler, SurfaceQuery, DEFAULT_RANGE_OF_EFFECT,
};
pub use emitter::{
    checked_capacity, Emitter, EmitterBuilder, EmitterShape, TickStats, DEFAULT_MAX_ANGLE_DEGREES,
};
pub use error::{ParticleError, Result};
pub use particle::Particle;
pub use render::{render_particle, ParticleInstance, ParticleRenderer};
pub use system::ParticleSystem;
pub use trail::{Trail, DEFAULT_TRAIL_LENGTH};
