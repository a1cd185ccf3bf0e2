//! Repulsion from scene solids
//!
//! Particles that come within `range_of_effect` of a plane or cylinder get a
//! velocity kick along the surface normal. The kick is applied once per tick
//! and is not scaled by `dt`, so its effect depends on the frame rate.
//!
//! Other solid kinds are ignored.

use crate::error::{ParticleError, Result};
use crate::particle::Particle;
use flurry_core::{Mat3, Solid, SolidKind, Vec2, Vec3};
use tracing::debug;

/// Default repulsion range, in world units
pub const DEFAULT_RANGE_OF_EFFECT: f32 = 5.0;

/// Nearest-surface query result
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceQuery {
    /// Distance to the surface; negative inside a cylinder wall
    pub distance: f32,
    /// Unit outward normal, or zero when the direction is undefined
    pub normal: Vec3,
}

/// Nearest surface of a capped cylinder, in the cylinder's local frame.
///
/// The cylinder's base cap is centered on the origin and its axis is `+Y`.
/// A zero `height` is treated as a flat disk of radius `base_radius`.
pub fn cylinder_surface(
    local: Vec3,
    base_radius: f32,
    top_radius: f32,
    height: f32,
) -> SurfaceQuery {
    let radial = Vec2::new(local.x, local.z);
    let radial_len = radial.length();
    let radial_dir = Vec3::new(local.x, 0.0, local.z).normalize();

    if height > 0.0 && (0.0..=height).contains(&local.y) {
        // Lateral wall
        let t = local.y / height;
        let radius = base_radius + (top_radius - base_radius) * t;
        return SurfaceQuery {
            distance: radial_len - radius,
            normal: radial_dir,
        };
    }

    // Above the top cap or below the base cap
    let above = local.y >= height.max(0.0);
    let (cap_y, cap_radius, axial_dir) = if above {
        let radius = if height > 0.0 { top_radius } else { base_radius };
        (height.max(0.0), radius, Vec3::UP)
    } else {
        (0.0, base_radius, Vec3::DOWN)
    };

    let axial = (local.y - cap_y).abs();
    let lateral = radial_len - cap_radius;

    if lateral <= 0.0 {
        SurfaceQuery {
            distance: axial,
            normal: axial_dir,
        }
    } else {
        // Nearest point is on the cap rim
        SurfaceQuery {
            distance: (lateral * lateral + axial * axial).sqrt(),
            normal: (radial_dir * lateral + axial_dir * axial).normalize(),
        }
    }
}

/// Signed repulsion direction and distance for a plane.
///
/// `offset` is the particle position minus the plane's reference point. The
/// distance is measured to that point, not perpendicular to the plane.
pub fn plane_surface(offset: Vec3, normal: Vec3) -> SurfaceQuery {
    let side = if normal.dot(offset) >= 0.0 { 1.0 } else { -1.0 };
    SurfaceQuery {
        distance: offset.length(),
        normal: normal * side,
    }
}

/// Solid with its frame precomputed
#[derive(Clone, Debug)]
enum Repeller {
    Plane {
        origin: Vec3,
        normal: Vec3,
    },
    Cylinder {
        origin: Vec3,
        to_world: Mat3,
        to_local: Mat3,
        base_radius: f32,
        top_radius: f32,
        height: f32,
    },
}

impl Repeller {
    fn from_solid(solid: &Solid) -> Option<Self> {
        match &solid.kind {
            SolidKind::Plane => Some(Repeller::Plane {
                origin: solid.position,
                normal: solid.direction_to_world(Vec3::UP).normalize(),
            }),
            SolidKind::Cylinder {
                base_radius,
                top_radius,
                height,
            } => {
                let to_world = solid.rotation_matrix();
                Some(Repeller::Cylinder {
                    origin: solid.position,
                    to_world,
                    to_local: to_world.inverse_rotation(),
                    base_radius: *base_radius,
                    top_radius: *top_radius,
                    height: *height,
                })
            }
            _ => None,
        }
    }
}

/// Computes repulsion impulses against the scene's planes and cylinders
#[derive(Clone, Debug)]
pub struct AntiAttractorHandler {
    solids: Vec<Solid>,
    repellers: Vec<Repeller>,
    range_of_effect: f32,
}

impl AntiAttractorHandler {
    /// Create a handler for `solids`.
    ///
    /// Fails if `range_of_effect` is not positive and finite.
    pub fn new(solids: Vec<Solid>, range_of_effect: f32) -> Result<Self> {
        if !(range_of_effect > 0.0 && range_of_effect.is_finite()) {
            return Err(ParticleError::InvalidRangeOfEffect(range_of_effect));
        }

        let mut handler = Self {
            solids: Vec::new(),
            repellers: Vec::new(),
            range_of_effect,
        };
        handler.set_solids(solids);
        Ok(handler)
    }

    /// Handler with no solids; every impulse is zero
    pub fn empty() -> Self {
        Self {
            solids: Vec::new(),
            repellers: Vec::new(),
            range_of_effect: DEFAULT_RANGE_OF_EFFECT,
        }
    }

    /// Replace the scene solids, e.g. after they were moved
    pub fn set_solids(&mut self, solids: Vec<Solid>) {
        self.repellers = solids
            .iter()
            .filter_map(|solid| {
                let repeller = Repeller::from_solid(solid);
                if repeller.is_none() {
                    debug!(kind = solid.kind.name(), "solid does not repel particles");
                }
                repeller
            })
            .collect();
        self.solids = solids;

        debug!(
            solids = self.solids.len(),
            repellers = self.repellers.len(),
            range = self.range_of_effect,
            "anti-attractor solids updated"
        );
    }

    pub fn solids(&self) -> &[Solid] {
        &self.solids
    }

    /// Number of solids that take part in repulsion
    pub fn repeller_count(&self) -> usize {
        self.repellers.len()
    }

    pub fn range_of_effect(&self) -> f32 {
        self.range_of_effect
    }

    /// Push `particle` away from every solid within range
    pub fn apply_anti_attraction(&self, particle: &mut Particle) {
        let impulse = self.impulse_at(particle.position());
        if impulse != Vec3::ZERO {
            particle.apply_impulse(impulse);
        }
    }

    /// Total velocity change for a particle at `position`
    pub fn impulse_at(&self, position: Vec3) -> Vec3 {
        self.repellers
            .iter()
            .fold(Vec3::ZERO, |acc, repeller| acc + self.impulse_from(repeller, position))
    }

    fn impulse_from(&self, repeller: &Repeller, position: Vec3) -> Vec3 {
        match repeller {
            Repeller::Plane { origin, normal } => {
                let query = plane_surface(position - *origin, *normal);
                query.normal * self.plane_magnitude(query.distance)
            }
            Repeller::Cylinder {
                origin,
                to_world,
                to_local,
                base_radius,
                top_radius,
                height,
            } => {
                let local = to_local.transform(position - *origin);
                if !self.near_cylinder(local, base_radius.max(*top_radius), *height) {
                    return Vec3::ZERO;
                }

                let query = cylinder_surface(local, *base_radius, *top_radius, *height);
                let magnitude = self.cylinder_magnitude(query.distance);
                if magnitude == 0.0 {
                    return Vec3::ZERO;
                }
                to_world.transform(query.normal).normalize() * magnitude
            }
        }
    }

    /// Cheap rejection against a bounding cylinder grown by the range
    fn near_cylinder(&self, local: Vec3, max_radius: f32, height: f32) -> bool {
        let axial_excess = (-local.y).max(local.y - height.max(0.0)).max(0.0);
        let radial = Vec2::new(local.x, local.z).length();
        axial_excess <= self.range_of_effect && radial <= max_radius + self.range_of_effect
    }

    /// `exp(-5 d / range)`, zero beyond the range
    fn plane_magnitude(&self, distance: f32) -> f32 {
        if distance > self.range_of_effect {
            return 0.0;
        }
        let k = 5.0 / self.range_of_effect;
        (-k * distance).exp()
    }

    /// `exp(-d^2 / range)`, zero beyond the range
    fn cylinder_magnitude(&self, distance: f32) -> f32 {
        if distance.abs() > self.range_of_effect {
            return 0.0;
        }
        (-(distance * distance) / self.range_of_effect).exp()
    }
}

impl Default for AntiAttractorHandler {
    fn default() -> Self {
        Self::empty()
    }
}
