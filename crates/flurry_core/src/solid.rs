//! Scene solids
//!
//! Read-only description of the rigid shapes placed in a scene. Mesh building,
//! materials and drawing live elsewhere; this is only the pose and the
//! dimensions needed for geometric queries.

use crate::math::{Mat3, Vec3};

/// Shape kind with kind-specific dimensions
#[derive(Clone, Debug, PartialEq)]
pub enum SolidKind {
    /// Oriented plane through the solid's position, normal `+Y` before rotation
    Plane,
    /// Capped cylinder or frustum with its origin at the base center, axis along local `+Y`
    Cylinder {
        /// Radius of the base cap (local `y = 0`)
        base_radius: f32,
        /// Radius of the top cap (local `y = height`)
        top_radius: f32,
        /// Distance between the caps
        height: f32,
    },
    /// Axis-aligned cube before rotation
    Cube {
        /// Edge length
        size: f32,
    },
    /// Sphere
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Cone with its base on local `y = 0`
    Cone {
        /// Base radius
        radius: f32,
        /// Height of the apex
        height: f32,
    },
    /// Torus in the local XZ plane
    Torus {
        /// Distance from center to tube center
        major_radius: f32,
        /// Tube radius
        minor_radius: f32,
    },
    /// Regular octahedron
    Octahedron {
        /// Center-to-vertex distance
        size: f32,
    },
    /// Arbitrary loaded mesh
    Mesh {
        /// Source the mesh was loaded from
        source: String,
    },
}

impl SolidKind {
    /// Short lowercase name, used in logs and config files
    pub fn name(&self) -> &'static str {
        match self {
            SolidKind::Plane => "plane",
            SolidKind::Cylinder { .. } => "cylinder",
            SolidKind::Cube { .. } => "cube",
            SolidKind::Sphere { .. } => "sphere",
            SolidKind::Cone { .. } => "cone",
            SolidKind::Torus { .. } => "torus",
            SolidKind::Octahedron { .. } => "octahedron",
            SolidKind::Mesh { .. } => "mesh",
        }
    }
}

/// A posed shape in the scene
#[derive(Clone, Debug, PartialEq)]
pub struct Solid {
    /// Shape kind and dimensions
    pub kind: SolidKind,
    /// World-space position of the shape origin
    pub position: Vec3,
    /// Per-axis rotation in degrees, composed as `Rx * Ry * Rz`
    pub rotation: Vec3,
}

impl Solid {
    /// Create a solid at the origin with no rotation
    pub fn new(kind: SolidKind) -> Self {
        Self {
            kind,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }

    /// Infinite plane
    pub fn plane() -> Self {
        Self::new(SolidKind::Plane)
    }

    /// Capped cylinder, possibly a frustum when the radii differ
    pub fn cylinder(base_radius: f32, top_radius: f32, height: f32) -> Self {
        Self::new(SolidKind::Cylinder {
            base_radius,
            top_radius,
            height,
        })
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set rotation in degrees
    pub fn with_rotation(mut self, degrees: Vec3) -> Self {
        self.rotation = degrees;
        self
    }

    /// Local-to-world rotation
    pub fn rotation_matrix(&self) -> Mat3 {
        Mat3::from_euler_degrees(self.rotation)
    }

    /// Express a world-space point in this solid's local frame
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.rotation_matrix()
            .inverse_rotation()
            .transform(world - self.position)
    }

    /// Rotate a local-space direction into world space
    pub fn direction_to_world(&self, local: Vec3) -> Vec3 {
        self.rotation_matrix().transform(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_frame_round_trip() {
        let solid = Solid::cylinder(1.0, 1.0, 2.0)
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Vec3::new(90.0, 0.0, 0.0));

        // Local +Y points along world +Z after a 90 degree turn about X
        let world = solid.position + Vec3::new(0.0, 0.0, 1.5);
        let local = solid.to_local(world);
        assert!((local - Vec3::new(0.0, 1.5, 0.0)).length() < 1e-5);

        let up = solid.direction_to_world(Vec3::UP);
        assert!((up - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Solid::plane().kind.name(), "plane");
        assert_eq!(SolidKind::Sphere { radius: 1.0 }.name(), "sphere");
    }
}
