//! Vector, color and rotation primitives.
//!
//! Matrices are column-major. Rotations are right-handed, so rotating `+X` by
//! 90 degrees about `+Z` yields `+Y`.

use std::ops::{Add, AddAssign, Mul, Sub};

// ─────────────────────────────────────────────────────────────────────────────
// Vectors
// ─────────────────────────────────────────────────────────────────────────────

/// 2D vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// 3D vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const X: Vec3 = Vec3 {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    pub const DOWN: Vec3 = Vec3 {
        x: 0.0,
        y: -1.0,
        z: 0.0,
    };
    pub const Z: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    /// Standard gravity (9.81 m/s^2 downward)
    pub const GRAVITY: Vec3 = Vec3 {
        x: 0.0,
        y: -9.81,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn from_array(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Unit vector in the same direction, or [`Vec3::ZERO`] for a zero vector
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len)
        } else {
            Self::ZERO
        }
    }

    pub fn dot(&self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn distance(&self, other: Vec3) -> f32 {
        (*self - other).length()
    }


    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Rotate this vector by `angle` radians about `axis`.
    ///
    /// The axis does not need to be normalized. A zero axis leaves the vector
    /// unchanged.
    pub fn rotate_about_axis(&self, axis: Vec3, angle: f32) -> Vec3 {
        let k = axis.normalize();
        if k == Vec3::ZERO {
            return *self;
        }
        let (s, c) = angle.sin_cos();
        // Rodrigues
        *self * c + k.cross(*self) * s + k * (k.dot(*self) * (1.0 - c))
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rotation
// ─────────────────────────────────────────────────────────────────────────────

/// 3x3 matrix (column-major), used for pure rotations
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat3 {
    pub cols: [[f32; 3]; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        cols: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            cols: [[1.0, 0.0, 0.0], [0.0, c, s], [0.0, -s, c]],
        }
    }

    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            cols: [[c, 0.0, -s], [0.0, 1.0, 0.0], [s, 0.0, c]],
        }
    }

    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            cols: [[c, s, 0.0], [-s, c, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Build the combined rotation `Rx * Ry * Rz` from per-axis angles in degrees.
    ///
    /// This is the composition used by scene solids: a local vector is turned
    /// about Z first, then Y, then X.
    pub fn from_euler_degrees(degrees: Vec3) -> Self {
        Self::rotation_x(degrees.x.to_radians())
            .mul(&Self::rotation_y(degrees.y.to_radians()))
            .mul(&Self::rotation_z(degrees.z.to_radians()))
    }

    pub fn col(&self, idx: usize) -> Vec3 {
        Vec3::from_array(self.cols[idx])
    }

    /// Multiply two matrices (`self * other`)
    pub fn mul(&self, other: &Mat3) -> Mat3 {
        let mut cols = [[0.0f32; 3]; 3];
        for (i, col) in cols.iter_mut().enumerate() {
            *col = self.transform(other.col(i)).to_array();
        }
        Mat3 { cols }
    }

    pub fn transpose(&self) -> Mat3 {
        let c = &self.cols;
        Mat3 {
            cols: [
                [c[0][0], c[1][0], c[2][0]],
                [c[0][1], c[1][1], c[2][1]],
                [c[0][2], c[1][2], c[2][2]],
            ],
        }
    }

    /// Inverse of an orthonormal (rotation) matrix
    pub fn inverse_rotation(&self) -> Mat3 {
        self.transpose()
    }

    /// Transform a vector by this matrix
    pub fn transform(&self, v: Vec3) -> Vec3 {
        self.col(0) * v.x + self.col(1) * v.y + self.col(2) * v.z
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Color
// ─────────────────────────────────────────────────────────────────────────────

/// RGBA color (linear space, channels in `[0, 1]`)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Convert 0-255 channels into a normalized color
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    /// Rotate a point about the X axis
    fn rotate_x(p: Vec3, a: f32) -> Vec3 {
        let (s, c) = a.sin_cos();
        Vec3::new(p.x, c * p.y - s * p.z, s * p.y + c * p.z)
    }

    /// Rotate a point about the Y axis
    fn rotate_y(p: Vec3, a: f32) -> Vec3 {
        let (s, c) = a.sin_cos();
        Vec3::new(c * p.x + s * p.z, p.y, -s * p.x + c * p.z)
    }

    /// Rotate a point about the Z axis
    fn rotate_z(p: Vec3, a: f32) -> Vec3 {
        let (s, c) = a.sin_cos();
        Vec3::new(c * p.x - s * p.y, s * p.x + c * p.y, p.z)
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_normalize_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
        assert!((Vec3::new(3.0, 4.0, 0.0).normalize().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_matrices_match_helpers() {
        let p = Vec3::new(0.3, -1.2, 2.0);
        let a = 0.7;
        assert!(approx(Mat3::rotation_x(a).transform(p), rotate_x(p, a)));
        assert!(approx(Mat3::rotation_y(a).transform(p), rotate_y(p, a)));
        assert!(approx(Mat3::rotation_z(a).transform(p), rotate_z(p, a)));
    }

    #[test]
    fn test_right_handed() {
        assert!(approx(rotate_z(Vec3::X, FRAC_PI_2), Vec3::UP));
        assert!(approx(rotate_x(Vec3::UP, FRAC_PI_2), Vec3::Z));
    }

    #[test]
    fn test_euler_order() {
        let rot = Vec3::new(30.0, 45.0, 60.0);
        let p = Vec3::new(1.0, 2.0, 3.0);
        let expected = rotate_x(
            rotate_y(rotate_z(p, 60f32.to_radians()), 45f32.to_radians()),
            30f32.to_radians(),
        );
        assert!(approx(Mat3::from_euler_degrees(rot).transform(p), expected));
    }

    #[test]
    fn test_inverse_rotation() {
        let m = Mat3::from_euler_degrees(Vec3::new(10.0, -75.0, 130.0));
        let p = Vec3::new(-2.0, 0.5, 4.0);
        assert!(approx(m.inverse_rotation().transform(m.transform(p)), p));
    }

    #[test]
    fn test_rotate_about_axis() {
        let v = Vec3::X.rotate_about_axis(Vec3::new(0.0, 0.0, 2.0), FRAC_PI_2);
        assert!(approx(v, Vec3::UP));
        assert_eq!(Vec3::X.rotate_about_axis(Vec3::ZERO, 1.0), Vec3::X);
    }

    #[test]
    fn test_color_from_rgba8() {
        let c = Color::from_rgba8(255, 0, 51, 255);
        assert!((c.r - 1.0).abs() < 1e-6);
        assert!((c.b - 0.2).abs() < 1e-6);
        assert!((c.a - 1.0).abs() < 1e-6);
    }
}
