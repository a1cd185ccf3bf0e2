//! Particle emitters
//!
//! An [`Emitter`] owns a bounded pool of particles and spawns new ones at a
//! fixed rate. Where and in which direction particles start is decided by its
//! [`EmitterShape`].

use crate::error::{ParticleError, Result};
use crate::particle::Particle;
use crate::render::{render_particle, ParticleRenderer};
use crate::trail::DEFAULT_TRAIL_LENGTH;
use flurry_core::{Color, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use std::num::NonZeroUsize;
use std::ops::{AddAssign, RangeInclusive};
use tracing::{debug, trace};

/// Emission strategy
#[derive(Clone, Debug, PartialEq)]
pub enum EmitterShape {
    /// All particles start at the emitter position and fly in any direction
    Point,
    /// Particles leave the emitter position inside a cone around `direction`
    Cone {
        /// Unit axis of the cone
        direction: Vec3,
        /// Maximum deviation from the axis, in radians
        max_angle: f32,
    },
    /// Particles start anywhere on a `width x height` rectangle in the XZ plane
    /// and fly roughly along `+Y`
    Plane {
        /// Extent along X
        width: f32,
        /// Extent along Z
        height: f32,
        /// Maximum deviation from the normal, in radians
        max_angle: f32,
    },
}

impl EmitterShape {
    /// Short lowercase name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            EmitterShape::Point => "point",
            EmitterShape::Cone { .. } => "cone",
            EmitterShape::Plane { .. } => "plane",
        }
    }

    /// Sample a spawn offset relative to the emitter position
    pub fn sample_offset(&self, rng: &mut impl Rng) -> Vec3 {
        match self {
            EmitterShape::Point | EmitterShape::Cone { .. } => Vec3::ZERO,

            EmitterShape::Plane { width, height, .. } => {
                let (hw, hh) = (width * 0.5, height * 0.5);
                Vec3::new(rng.random_range(-hw..=hw), 0.0, rng.random_range(-hh..=hh))
            }
        }
    }

    /// Sample a unit launch direction
    pub fn sample_direction(&self, rng: &mut impl Rng) -> Vec3 {
        match self {
            EmitterShape::Point => {
                // Normalized cube sample; biased toward the cube diagonals
                Vec3::new(
                    rng.random_range(-1.0..=1.0),
                    rng.random_range(-1.0..=1.0),
                    rng.random_range(-1.0..=1.0),
                )
                .normalize()
            }

            EmitterShape::Cone {
                direction,
                max_angle,
            } => {
                // Deviation is uniform in angle, not in solid angle
                let deviation = rng.random_range(0.0..=*max_angle);
                let azimuth = rng.random_range(0.0..TAU);
                let axis = Vec3::new(
                    azimuth.sin(),
                    azimuth.cos(),
                    rng.random_range(-1.0..=1.0),
                );
                direction.rotate_about_axis(axis, deviation).normalize()
            }

            EmitterShape::Plane { max_angle, .. } => {
                let deviation = rng.random_range(0.0..=*max_angle);
                let azimuth = rng.random_range(0.0..TAU);
                let tilted = Vec3::new(
                    deviation.sin() * azimuth.cos(),
                    deviation.cos(),
                    deviation.sin() * azimuth.sin(),
                );
                (Vec3::UP + tilted).normalize()
            }
        }
    }
}

/// Counts produced by one emitter or system tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Particles spawned this tick
    pub emitted: usize,
    /// Spawns skipped because the pool was full
    pub dropped: usize,
    /// Particles removed because they reached their lifetime
    pub culled: usize,
    /// Particles alive after the tick
    pub alive: usize,
}

impl AddAssign for TickStats {
    fn add_assign(&mut self, rhs: TickStats) {
        self.emitted += rhs.emitted;
        self.dropped += rhs.dropped;
        self.culled += rhs.culled;
        self.alive += rhs.alive;
    }
}

/// Convert an untyped particle capacity into a pool size
pub fn checked_capacity(value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| ParticleError::NegativeCapacity(value))
}

/// Owns a bounded particle pool and spawns into it at a fixed rate
#[derive(Clone, Debug)]
pub struct Emitter {
    shape: EmitterShape,
    position: Vec3,
    emission_rate: f32,
    max_particles: usize,
    speed_range: RangeInclusive<f32>,
    size_range: RangeInclusive<f32>,
    color: Color,
    lifetime: f32,
    color_fading: bool,
    transparency_radius: Option<f32>,
    trail_length: Option<NonZeroUsize>,
    acceleration: Vec3,
    accumulator: f32,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl Emitter {
    /// Emitter that sprays in every direction from `position`
    pub fn point(position: Vec3) -> EmitterBuilder {
        EmitterBuilder::new(EmitterShape::Point, position)
    }

    /// Emitter that fires inside a cone around `direction`.
    ///
    /// Particles from cone emitters leave a trail unless disabled.
    pub fn cone(position: Vec3, direction: Vec3) -> EmitterBuilder {
        EmitterBuilder::new(
            EmitterShape::Cone {
                direction,
                max_angle: DEFAULT_MAX_ANGLE_DEGREES.to_radians(),
            },
            position,
        )
        .with_trail(true)
    }

    /// Emitter that spawns over a `width x height` rectangle centered on `position`
    pub fn plane(position: Vec3, width: f32, height: f32) -> EmitterBuilder {
        EmitterBuilder::new(
            EmitterShape::Plane {
                width,
                height,
                max_angle: DEFAULT_MAX_ANGLE_DEGREES.to_radians(),
            },
            position,
        )
    }

    /// Create one particle according to the emission strategy.
    ///
    /// Only the random source is advanced.
    pub fn emit_particle(&mut self) -> Particle {
        let offset = self.shape.sample_offset(&mut self.rng);
        let direction = self.shape.sample_direction(&mut self.rng);
        let speed = self.rng.random_range(self.speed_range.clone());
        let size = self.rng.random_range(self.size_range.clone());

        let particle = Particle::spawn(self.position + offset, direction * speed, self.lifetime)
            .with_size(size)
            .with_color(self.color)
            .with_color_fading(self.color_fading)
            .with_transparency_radius(self.transparency_radius);

        match self.trail_length {
            Some(length) => particle.with_trail(length),
            None => particle,
        }
    }

    /// Advance the emitter by `dt` seconds: spawn, integrate, then cull
    pub fn update(&mut self, dt: f32) -> TickStats {
        let mut stats = TickStats::default();

        self.accumulator += self.emission_rate * dt;
        let to_emit = self.accumulator.floor();

        let owed = to_emit as usize;
        let room = self.max_particles.saturating_sub(self.particles.len());
        let spawn = owed.min(room);

        for _ in 0..spawn {
            let particle = self.emit_particle();
            self.particles.push(particle);
        }
        stats.emitted = spawn;
        stats.dropped = owed - spawn;

        self.accumulator -= to_emit;

        let acceleration = self.acceleration;
        for particle in &mut self.particles {
            particle.update(dt, acceleration);
        }

        let before = self.particles.len();
        self.particles.retain(Particle::is_alive);
        stats.culled = before - self.particles.len();
        stats.alive = self.particles.len();

        trace!(
            shape = self.shape.name(),
            emitted = stats.emitted,
            dropped = stats.dropped,
            culled = stats.culled,
            alive = stats.alive,
            "emitter tick"
        );

        stats
    }

    /// Draw every live particle
    pub fn render(&self, renderer: &mut impl ParticleRenderer) {
        for particle in &self.particles {
            render_particle(particle, renderer);
        }
    }

    /// Drop all live particles and the fractional emission carry
    pub fn clear(&mut self) {
        self.particles.clear();
        self.accumulator = 0.0;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn shape(&self) -> &EmitterShape {
        &self.shape
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn emission_rate(&self) -> f32 {
        self.emission_rate
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Fractional particle count carried to the next tick, always in `[0, 1)`
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// Default emission half-angle for cone and plane emitters, in degrees
pub const DEFAULT_MAX_ANGLE_DEGREES: f32 = 15.0;

/// Builder for [`Emitter`]; all validation happens in [`EmitterBuilder::build`]
#[derive(Clone, Debug)]
pub struct EmitterBuilder {
    shape: EmitterShape,
    position: Vec3,
    emission_rate: f32,
    max_particles: usize,
    speed_range: (f32, f32),
    size_range: (f32, f32),
    color: Color,
    lifetime: f32,
    color_fading: bool,
    transparency_radius: Option<f32>,
    trail_length: Option<usize>,
    acceleration: Option<Vec3>,
    rng: Option<StdRng>,
}

impl EmitterBuilder {
    fn new(shape: EmitterShape, position: Vec3) -> Self {
        Self {
            shape,
            position,
            emission_rate: 10.0,
            max_particles: 1000,
            speed_range: (1.0, 2.0),
            size_range: (1.0, 5.0),
            color: Color::WHITE,
            lifetime: 1.0,
            color_fading: false,
            transparency_radius: None,
            trail_length: None,
            acceleration: None,
            rng: None,
        }
    }

    /// Set emission rate (particles per second)
    pub fn with_emission_rate(mut self, rate: f32) -> Self {
        self.emission_rate = rate;
        self
    }

    /// Set maximum number of simultaneously live particles
    pub fn with_max_particles(mut self, max: usize) -> Self {
        self.max_particles = max;
        self
    }

    /// Set initial speed range
    pub fn with_speed_range(mut self, min: f32, max: f32) -> Self {
        self.speed_range = (min, max);
        self
    }

    /// Set particle size range
    pub fn with_size_range(mut self, min: f32, max: f32) -> Self {
        self.size_range = (min, max);
        self
    }

    /// Set particle color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set particle color from 0-255 channels
    pub fn with_color_rgba8(self, rgba: [u8; 4]) -> Self {
        self.with_color(Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]))
    }

    /// Set particle lifetime in seconds
    pub fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Fade particle color to black over its lifetime
    pub fn with_color_fading(mut self, fading: bool) -> Self {
        self.color_fading = fading;
        self
    }

    /// Fade opacity by distance from the spawn point
    pub fn with_transparency_radius(mut self, radius: f32) -> Self {
        self.transparency_radius = Some(radius);
        self
    }

    /// Enable or disable trails with the default length
    pub fn with_trail(mut self, enabled: bool) -> Self {
        self.trail_length = enabled.then_some(DEFAULT_TRAIL_LENGTH);
        self
    }

    /// Enable trails holding `length` positions
    pub fn with_trail_length(mut self, length: usize) -> Self {
        self.trail_length = Some(length);
        self
    }

    /// Set the maximum deviation angle in degrees (cone and plane only)
    pub fn with_max_angle(mut self, degrees: f32) -> Self {
        match &mut self.shape {
            EmitterShape::Cone { max_angle, .. } | EmitterShape::Plane { max_angle, .. } => {
                *max_angle = degrees.to_radians();
            }
            EmitterShape::Point => {
                debug!("max angle ignored for point emitter");
            }
        }
        self
    }

    /// Set the constant acceleration applied to every particle
    pub fn with_acceleration(mut self, acceleration: Vec3) -> Self {
        self.acceleration = Some(acceleration);
        self
    }

    /// Use `acceleration` unless one was already set
    pub fn with_default_acceleration(mut self, acceleration: Vec3) -> Self {
        self.acceleration.get_or_insert(acceleration);
        self
    }

    /// Seed the random source for reproducible emission
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    /// Use an explicit random source
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Validate the configuration and create the emitter
    pub fn build(self) -> Result<Emitter> {
        if !(self.lifetime > 0.0 && self.lifetime.is_finite()) {
            return Err(ParticleError::InvalidLifetime(self.lifetime));
        }
        if !(self.emission_rate >= 0.0 && self.emission_rate.is_finite()) {
            return Err(ParticleError::InvalidEmissionRate(self.emission_rate));
        }
        let speed_range = checked_range("speed_range", self.speed_range)?;
        let size_range = checked_range("size_range", self.size_range)?;

        if let Some(radius) = self.transparency_radius {
            if !(radius >= 0.0 && radius.is_finite()) {
                return Err(ParticleError::InvalidTransparencyRadius(radius));
            }
        }

        let trail_length = match self.trail_length {
            Some(length) => {
                Some(NonZeroUsize::new(length).ok_or(ParticleError::InvalidTrailLength)?)
            }
            None => None,
        };

        let shape = match self.shape {
            EmitterShape::Point => EmitterShape::Point,
            EmitterShape::Cone {
                direction,
                max_angle,
            } => {
                let direction = direction.normalize();
                if direction == Vec3::ZERO || !direction.is_finite() {
                    return Err(ParticleError::InvalidDirection);
                }
                EmitterShape::Cone {
                    direction,
                    max_angle: checked_angle(max_angle)?,
                }
            }
            EmitterShape::Plane {
                width,
                height,
                max_angle,
            } => {
                if !(width >= 0.0 && height >= 0.0 && width.is_finite() && height.is_finite()) {
                    return Err(ParticleError::InvalidArea { width, height });
                }
                EmitterShape::Plane {
                    width,
                    height,
                    max_angle: checked_angle(max_angle)?,
                }
            }
        };

        debug!(
            shape = shape.name(),
            rate = self.emission_rate,
            capacity = self.max_particles,
            lifetime = self.lifetime,
            "emitter created"
        );

        Ok(Emitter {
            shape,
            position: self.position,
            emission_rate: self.emission_rate,
            max_particles: self.max_particles,
            speed_range,
            size_range,
            color: self.color,
            lifetime: self.lifetime,
            color_fading: self.color_fading,
            transparency_radius: self.transparency_radius,
            trail_length,
            acceleration: self.acceleration.unwrap_or(Vec3::GRAVITY),
            accumulator: 0.0,
            particles: Vec::with_capacity(self.max_particles.min(4096)),
            rng: self.rng.unwrap_or_else(StdRng::from_os_rng),
        })
    }
}

fn checked_range(name: &'static str, (min, max): (f32, f32)) -> Result<RangeInclusive<f32>> {
    if min <= max && min.is_finite() && max.is_finite() {
        Ok(min..=max)
    } else {
        Err(ParticleError::EmptyRange { name, min, max })
    }
}

fn checked_angle(angle: f32) -> Result<f32> {
    if angle >= 0.0 && angle.is_finite() {
        Ok(angle)
    } else {
        Err(ParticleError::InvalidAngle(angle))
    }
}
