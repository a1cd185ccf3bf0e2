//! Flurry Core
//!
//! Math and scene primitives shared by the Flurry crates:
//!
//! - **Vectors**: `Vec2`, `Vec3` with the usual arithmetic operators
//! - **Rotation**: `Mat3` with Euler composition in X, Y, Z order
//! - **Color**: linear RGBA with 0-255 conversion
//! - **Solids**: posed scene shapes used for geometric queries
//!
//! # Example
//!
//! ```rust
//! use flurry_core::{Solid, Vec3};
//!
//! let pillar = Solid::cylinder(1.0, 0.5, 4.0)
//!     .with_position(Vec3::new(0.0, 0.0, -2.0))
//!     .with_rotation(Vec3::new(0.0, 0.0, 15.0));
//!
//! let local = pillar.to_local(Vec3::new(0.0, 1.0, -2.0));
//! assert!(local.y > 0.0);
//! ```

pub mod math;
pub mod solid;

pub use math::{Color, Mat3, Vec2, Vec3};
pub use solid::{Solid, SolidKind};
