//! Individual particle data

use crate::error::{ParticleError, Result};
use crate::trail::Trail;
use flurry_core::{Color, Vec3};
use std::num::NonZeroUsize;

/// A single simulated point mass
///
/// Pose and velocity change every tick; everything else is fixed when the
/// particle is spawned.
#[derive(Clone, Debug)]
pub struct Particle {
    start_position: Vec3,
    position: Vec3,
    velocity: Vec3,
    size: f32,
    color: Color,
    color_fading: bool,
    lifetime: f32,
    age: f32,
    transparency_radius: Option<f32>,
    trail: Option<Trail>,
}

impl Particle {
    /// Create a particle at `position` moving with `velocity`.
    ///
    /// Fails if `lifetime` is not a positive, finite number of seconds.
    pub fn new(position: Vec3, velocity: Vec3, lifetime: f32) -> Result<Self> {
        if !(lifetime > 0.0 && lifetime.is_finite()) {
            return Err(ParticleError::InvalidLifetime(lifetime));
        }

        Ok(Self::spawn(position, velocity, lifetime))
    }

    /// Create a particle whose lifetime the caller has already validated
    pub(crate) fn spawn(position: Vec3, velocity: Vec3, lifetime: f32) -> Self {
        Self {
            start_position: position,
            position,
            velocity,
            size: 1.0,
            color: Color::WHITE,
            color_fading: false,
            lifetime,
            age: 0.0,
            transparency_radius: None,
            trail: None,
        }
    }

    /// Set render size
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Set base color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Fade RGB to black over the lifetime
    pub fn with_color_fading(mut self, fading: bool) -> Self {
        self.color_fading = fading;
        self
    }

    /// Drive opacity by travel distance instead of age.
    ///
    /// `Some(0.0)` makes the particle fully transparent.
    pub fn with_transparency_radius(mut self, radius: Option<f32>) -> Self {
        self.transparency_radius = radius;
        self
    }

    /// Record a trail of the last `length` positions
    pub fn with_trail(mut self, length: NonZeroUsize) -> Self {
        self.trail = Some(Trail::new(self.position, length));
        self
    }

    /// Advance the particle by `dt` seconds under a constant acceleration
    pub fn update(&mut self, dt: f32, acceleration: Vec3) {
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
        self.age += dt;

        if let Some(trail) = &mut self.trail {
            trail.push(self.position);
        }
    }

    /// Add an instantaneous velocity change
    pub(crate) fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse;
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.lifetime
    }

    /// Opacity in `[0, 1]`
    pub fn transparency(&self) -> f32 {
        match self.transparency_radius {
            None => (1.0 - self.age / self.lifetime).max(0.0),
            Some(radius) if radius != 0.0 => {
                let travelled = self.start_position.distance(self.position);
                (1.0 - travelled / radius).max(0.0)
            }
            Some(_) => 0.0,
        }
    }

    /// Current color, with RGB faded toward black when fading is enabled.
    ///
    /// Alpha is the base alpha; opacity is reported by [`Particle::transparency`].
    pub fn color(&self) -> Color {
        if !self.color_fading {
            return self.color;
        }

        let fade = |channel: f32| (channel - channel / self.lifetime * self.age).max(0.0);
        Color::rgba(
            fade(self.color.r),
            fade(self.color.g),
            fade(self.color.b),
            self.color.a,
        )
    }

    /// Normalized age (0 = just spawned, 1 = end of life)
    pub fn normalized_age(&self) -> f32 {
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn start_position(&self) -> Vec3 {
        self.start_position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn base_color(&self) -> Color {
        self.color
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    pub fn transparency_radius(&self) -> Option<f32> {
        self.transparency_radius
    }

    pub fn has_trail(&self) -> bool {
        self.trail.is_some()
    }

    pub fn trail(&self) -> Option<&Trail> {
        self.trail.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still(lifetime: f32) -> Particle {
        Particle::new(Vec3::ZERO, Vec3::ZERO, lifetime).unwrap()
    }

    #[test]
    fn test_rejects_bad_lifetime() {
        assert!(matches!(
            Particle::new(Vec3::ZERO, Vec3::ZERO, 0.0),
            Err(ParticleError::InvalidLifetime(_))
        ));
        assert!(Particle::new(Vec3::ZERO, Vec3::ZERO, -1.0).is_err());
        assert!(Particle::new(Vec3::ZERO, Vec3::ZERO, f32::NAN).is_err());
    }

    #[test]
    fn test_integration_order() {
        let mut p = Particle::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 10.0).unwrap();
        p.update(0.5, Vec3::new(0.0, -2.0, 0.0));

        // Velocity is updated before position
        assert!((p.velocity() - Vec3::new(1.0, -1.0, 0.0)).length() < 1e-6);
        assert!((p.position() - Vec3::new(0.5, -0.5, 0.0)).length() < 1e-6);
        assert!((p.age() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_age_sequence_and_death() {
        let mut p = still(2.0);
        let mut ages = Vec::new();
        for _ in 0..4 {
            assert!(p.is_alive());
            p.update(0.5, Vec3::ZERO);
            ages.push(p.age());
        }
        assert_eq!(ages, vec![0.5, 1.0, 1.5, 2.0]);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_transparency_by_age() {
        let mut p = still(2.0);
        assert!((p.transparency() - 1.0).abs() < 1e-6);
        p.update(1.0, Vec3::ZERO);
        assert!((p.transparency() - 0.5).abs() < 1e-6);
        p.update(1.0, Vec3::ZERO);
        assert_eq!(p.transparency(), 0.0);
    }

    #[test]
    fn test_transparency_by_distance() {
        let mut p = Particle::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 100.0)
            .unwrap()
            .with_transparency_radius(Some(4.0));
        p.update(1.0, Vec3::ZERO);
        assert!((p.transparency() - 0.75).abs() < 1e-6);

        for _ in 0..5 {
            p.update(1.0, Vec3::ZERO);
        }
        assert_eq!(p.transparency(), 0.0);
    }

    #[test]
    fn test_zero_transparency_radius() {
        let p = still(1.0).with_transparency_radius(Some(0.0));
        assert_eq!(p.transparency(), 0.0);
    }

    #[test]
    fn test_color_fading() {
        let mut p = still(4.0)
            .with_color(Color::rgba(1.0, 0.5, 0.0, 0.8))
            .with_color_fading(true);
        p.update(1.0, Vec3::ZERO);

        let c = p.color();
        assert!((c.r - 0.75).abs() < 1e-6);
        assert!((c.g - 0.375).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert!((c.a - 0.8).abs() < 1e-6);

        let plain = still(4.0).with_color(Color::RED);
        assert_eq!(plain.color(), Color::RED);
    }

    #[test]
    fn test_trail_follows_position() {
        let mut p = Particle::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 10.0)
            .unwrap()
            .with_trail(NonZeroUsize::new(4).unwrap());
        assert!(p.has_trail());

        p.update(1.0, Vec3::ZERO);
        let trail = p.trail().unwrap();
        assert_eq!(trail.len(), 4);
        assert_eq!(trail.newest(), Some(p.position()));
        assert_eq!(trail.oldest(), Some(Vec3::ZERO));
    }
}
