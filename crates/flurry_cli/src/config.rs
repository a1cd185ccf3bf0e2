//! Scene file handling
//!
//! A scene is a TOML file listing the solids particles are repelled from,
//! the emitters, and how long to simulate:
//!
//! ```toml
//! seed = 7
//! range_of_effect = 5.0
//! frames = 600
//!
//! [[solids]]
//! kind = "cylinder"
//! base_radius = 1.0
//! top_radius = 0.5
//! height = 3.0
//!
//! [[emitters]]
//! kind = "cone"
//! position = [0.0, 8.0, 3.0]
//! direction = [0.5, 0.0, -1.0]
//! ```

use anyhow::{Context, Result};
use flurry_core::{Color, Solid, SolidKind, Vec3};
use flurry_particles::{
    checked_capacity, Emitter, EmitterBuilder, ParticleSystem, DEFAULT_MAX_ANGLE_DEGREES,
    DEFAULT_RANGE_OF_EFFECT,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default scene file name
pub const SCENE_FILE: &str = "flurry.toml";

// =============================================================================
// Scene
// =============================================================================

/// Top-level scene file
#[derive(Debug, Deserialize, Serialize)]
pub struct SceneConfig {
    /// Base seed for every emitter without its own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_range_of_effect")]
    pub range_of_effect: f32,
    #[serde(default = "default_gravity")]
    pub gravity: [f32; 3],
    /// Number of fixed steps `flurry run` simulates
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Fixed step length in seconds
    #[serde(default = "default_dt")]
    pub dt: f32,
    #[serde(default)]
    pub solids: Vec<SolidConfig>,
    #[serde(default)]
    pub emitters: Vec<EmitterConfig>,
}

fn default_range_of_effect() -> f32 {
    DEFAULT_RANGE_OF_EFFECT
}

fn default_gravity() -> [f32; 3] {
    Vec3::GRAVITY.to_array()
}

fn default_frames() -> u32 {
    600
}

fn default_dt() -> f32 {
    1.0 / 60.0
}

// =============================================================================
// Solids
// =============================================================================

/// A posed scene solid
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SolidConfig {
    #[serde(flatten)]
    pub shape: ShapeConfig,
    #[serde(default)]
    pub position: [f32; 3],
    /// Rotation in degrees, applied X then Y then Z
    #[serde(default)]
    pub rotation: [f32; 3],
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeConfig {
    Plane,
    Cylinder {
        #[serde(default = "one")]
        base_radius: f32,
        #[serde(default = "one")]
        top_radius: f32,
        #[serde(default = "one")]
        height: f32,
    },
    Cube {
        #[serde(default = "one")]
        size: f32,
    },
    Sphere {
        #[serde(default = "one")]
        radius: f32,
    },
    Cone {
        #[serde(default = "one")]
        radius: f32,
        #[serde(default = "one")]
        height: f32,
    },
    Torus {
        #[serde(default = "one")]
        major_radius: f32,
        #[serde(default = "default_minor_radius")]
        minor_radius: f32,
    },
    Octahedron {
        #[serde(default = "one")]
        size: f32,
    },
    Mesh {
        source: String,
    },
}

fn one() -> f32 {
    1.0
}

fn default_minor_radius() -> f32 {
    0.25
}

impl SolidConfig {
    pub fn to_solid(&self) -> Solid {
        let kind = match &self.shape {
            ShapeConfig::Plane => SolidKind::Plane,
            ShapeConfig::Cylinder {
                base_radius,
                top_radius,
                height,
            } => SolidKind::Cylinder {
                base_radius: *base_radius,
                top_radius: *top_radius,
                height: *height,
            },
            ShapeConfig::Cube { size } => SolidKind::Cube { size: *size },
            ShapeConfig::Sphere { radius } => SolidKind::Sphere { radius: *radius },
            ShapeConfig::Cone { radius, height } => SolidKind::Cone {
                radius: *radius,
                height: *height,
            },
            ShapeConfig::Torus {
                major_radius,
                minor_radius,
            } => SolidKind::Torus {
                major_radius: *major_radius,
                minor_radius: *minor_radius,
            },
            ShapeConfig::Octahedron { size } => SolidKind::Octahedron { size: *size },
            ShapeConfig::Mesh { source } => SolidKind::Mesh {
                source: source.clone(),
            },
        };

        Solid::new(kind)
            .with_position(Vec3::from_array(self.position))
            .with_rotation(Vec3::from_array(self.rotation))
    }
}

// =============================================================================
// Emitters
// =============================================================================

/// Emitter settings; omitted keys use the library defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmitterConfig {
    #[serde(flatten)]
    pub shape: EmitterShapeConfig,
    #[serde(default)]
    pub position: [f32; 3],
    /// Particles per second
    #[serde(default = "default_emission_rate")]
    pub emission_rate: f32,
    /// Signed so that a negative value is reported instead of failing to parse
    #[serde(default = "default_max_particles")]
    pub max_particles: i64,
    #[serde(default = "default_speed_range")]
    pub speed_range: [f32; 2],
    #[serde(default = "default_size_range")]
    pub size_range: [f32; 2],
    /// RGBA, 0-255 per channel
    #[serde(default = "default_color")]
    pub color: [u8; 4],
    #[serde(default = "one")]
    pub lifetime: f32,
    #[serde(default)]
    pub color_fading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency_radius: Option<f32>,
    /// Overrides the per-kind trail default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trail: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trail_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmitterShapeConfig {
    Point,
    Cone {
        #[serde(default = "default_direction")]
        direction: [f32; 3],
        /// Degrees
        #[serde(default = "default_max_angle")]
        max_angle: f32,
    },
    Plane {
        #[serde(default = "one")]
        width: f32,
        #[serde(default = "one")]
        height: f32,
        /// Degrees
        #[serde(default = "default_max_angle")]
        max_angle: f32,
    },
}

impl EmitterShapeConfig {
    pub fn name(&self) -> &'static str {
        match self {
            EmitterShapeConfig::Point => "point",
            EmitterShapeConfig::Cone { .. } => "cone",
            EmitterShapeConfig::Plane { .. } => "plane",
        }
    }
}

fn default_emission_rate() -> f32 {
    10.0
}

fn default_max_particles() -> i64 {
    1000
}

fn default_speed_range() -> [f32; 2] {
    [1.0, 2.0]
}

fn default_size_range() -> [f32; 2] {
    [1.0, 5.0]
}

fn default_color() -> [u8; 4] {
    [255, 255, 255, 255]
}

fn default_direction() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_max_angle() -> f32 {
    DEFAULT_MAX_ANGLE_DEGREES
}

impl EmitterConfig {
    /// Translate into a library builder.
    ///
    /// Only the capacity is checked here; everything else is validated by
    /// [`EmitterBuilder::build`].
    pub fn to_builder(&self) -> flurry_particles::Result<EmitterBuilder> {
        let position = Vec3::from_array(self.position);
        let builder = match &self.shape {
            EmitterShapeConfig::Point => Emitter::point(position),
            EmitterShapeConfig::Cone {
                direction,
                max_angle,
            } => Emitter::cone(position, Vec3::from_array(*direction)).with_max_angle(*max_angle),
            EmitterShapeConfig::Plane {
                width,
                height,
                max_angle,
            } => Emitter::plane(position, *width, *height).with_max_angle(*max_angle),
        };

        let [r, g, b, a] = self.color;
        let mut builder = builder
            .with_emission_rate(self.emission_rate)
            .with_max_particles(checked_capacity(self.max_particles)?)
            .with_speed_range(self.speed_range[0], self.speed_range[1])
            .with_size_range(self.size_range[0], self.size_range[1])
            .with_color(Color::from_rgba8(r, g, b, a))
            .with_lifetime(self.lifetime)
            .with_color_fading(self.color_fading);

        if let Some(radius) = self.transparency_radius {
            builder = builder.with_transparency_radius(radius);
        }
        if let Some(enabled) = self.trail {
            builder = builder.with_trail(enabled);
        }
        if let Some(length) = self.trail_length {
            builder = builder.with_trail_length(length);
        }
        if let Some(seed) = self.seed {
            builder = builder.with_seed(seed);
        }

        Ok(builder)
    }
}

// =============================================================================
// Loading and building
// =============================================================================

impl SceneConfig {
    /// Load a scene from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "No scene found at {}. Run `flurry init` to create one.",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse a scene from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: SceneConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize scene")
    }

    pub fn gravity(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }

    pub fn to_solids(&self) -> Vec<Solid> {
        self.solids.iter().map(SolidConfig::to_solid).collect()
    }

    /// Build the particle system described by this scene
    pub fn build_system(&self) -> Result<ParticleSystem> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            anyhow::bail!("Invalid dt: {} (must be a positive number of seconds)", self.dt);
        }

        let mut system = ParticleSystem::from_solids(self.to_solids(), self.range_of_effect)
            .context("Invalid range_of_effect")?
            .with_acceleration(self.gravity());

        for (index, emitter) in self.emitters.iter().enumerate() {
            let mut builder = emitter
                .to_builder()
                .with_context(|| format!("Invalid emitter #{} ({})", index, emitter.shape.name()))?;

            // Emitters without their own seed derive one from the scene seed
            if let (None, Some(seed)) = (emitter.seed, self.seed) {
                builder = builder.with_seed(seed.wrapping_add(index as u64));
            }

            system
                .spawn_emitter(builder)
                .with_context(|| format!("Invalid emitter #{} ({})", index, emitter.shape.name()))?;
        }

        Ok(system)
    }

    /// The demo scene: a floor, a tilted panel above it and a cone
    /// spraying onto the panel
    pub fn demo() -> Self {
        Self {
            seed: None,
            range_of_effect: DEFAULT_RANGE_OF_EFFECT,
            gravity: default_gravity(),
            frames: default_frames(),
            dt: default_dt(),
            solids: vec![
                SolidConfig {
                    shape: ShapeConfig::Plane,
                    position: [0.0, 0.0, 0.0],
                    rotation: [0.0, 180.0, 0.0],
                },
                SolidConfig {
                    shape: ShapeConfig::Plane,
                    position: [0.0, 5.0, 0.0],
                    rotation: [90.0, 180.0, 0.0],
                },
            ],
            emitters: vec![EmitterConfig {
                shape: EmitterShapeConfig::Cone {
                    direction: [0.5, 0.0, -1.0],
                    max_angle: 15.0,
                },
                position: [0.0, 8.0, 3.0],
                emission_rate: 100.0,
                max_particles: 1000,
                speed_range: [6.0, 8.0],
                size_range: [1.0, 5.0],
                color: default_color(),
                lifetime: 1.0,
                color_fading: false,
                transparency_radius: None,
                trail: None,
                trail_length: None,
                seed: None,
            }],
        }
    }
}
