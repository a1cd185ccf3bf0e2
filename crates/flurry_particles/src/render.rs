//! Read-only render interface
//!
//! Renderers only ever see `&Particle`, so drawing cannot change the
//! simulation.

use crate::particle::Particle;
use crate::trail::Trail;
use flurry_core::Color;

/// GPU-friendly particle data for instancing
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    /// Position (xyz) and size (w)
    pub position_size: [f32; 4],
    /// Faded color (rgb) and opacity (a)
    pub color: [f32; 4],
}

impl ParticleInstance {
    /// Create from a particle
    pub fn from_particle(particle: &Particle) -> Self {
        let p = particle.position();
        let c = particle.color();
        Self {
            position_size: [p.x, p.y, p.z, particle.size()],
            color: [c.r, c.g, c.b, particle.transparency()],
        }
    }
}

impl From<&Particle> for ParticleInstance {
    fn from(particle: &Particle) -> Self {
        Self::from_particle(particle)
    }
}

/// Consumer of per-frame particle state
pub trait ParticleRenderer {
    /// Draw one particle as a point sprite
    fn draw_particle(&mut self, instance: &ParticleInstance);

    /// Draw a particle trail as a line strip, oldest point first
    fn draw_trail(&mut self, _trail: &Trail, _color: Color) {}
}

/// Draw a single particle and its trail, if any
pub fn render_particle(particle: &Particle, renderer: &mut impl ParticleRenderer) {
    let instance = ParticleInstance::from_particle(particle);
    renderer.draw_particle(&instance);

    if let Some(trail) = particle.trail() {
        renderer.draw_trail(trail, particle.color().with_alpha(particle.transparency()));
    }
}
