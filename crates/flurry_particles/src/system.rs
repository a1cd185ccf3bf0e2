//! Particle system
//!
//! Owns the emitters of a scene together with the anti-attractor that pushes
//! their particles away from the scene's solids.

use crate::anti_attractor::AntiAttractorHandler;
use crate::emitter::{Emitter, EmitterBuilder, TickStats};
use crate::error::Result;
use crate::particle::Particle;
use crate::render::{ParticleInstance, ParticleRenderer};
use flurry_core::{Solid, Vec3};
use tracing::{debug, trace};

/// Collection of emitters sharing one anti-attractor
#[derive(Clone, Debug)]
pub struct ParticleSystem {
    emitters: Vec<Emitter>,
    handler: AntiAttractorHandler,
    acceleration: Vec3,
}

impl ParticleSystem {
    /// Create an empty system using `handler` for repulsion
    pub fn new(handler: AntiAttractorHandler) -> Self {
        debug!(
            repellers = handler.repeller_count(),
            range = handler.range_of_effect(),
            "particle system created"
        );
        Self {
            emitters: Vec::new(),
            handler,
            acceleration: Vec3::GRAVITY,
        }
    }

    /// Create an empty system that repels from `solids`
    pub fn from_solids(solids: Vec<Solid>, range_of_effect: f32) -> Result<Self> {
        Ok(Self::new(AntiAttractorHandler::new(solids, range_of_effect)?))
    }

    /// Acceleration given to emitters spawned through [`ParticleSystem::spawn_emitter`]
    pub fn with_acceleration(mut self, acceleration: Vec3) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Take ownership of a configured emitter
    pub fn add_emitter(&mut self, emitter: Emitter) {
        debug!(
            shape = emitter.shape().name(),
            index = self.emitters.len(),
            "emitter added"
        );
        self.emitters.push(emitter);
    }

    /// Build an emitter and add it.
    ///
    /// The emitter inherits the system acceleration unless the builder
    /// already sets one.
    pub fn spawn_emitter(&mut self, builder: EmitterBuilder) -> Result<&mut Emitter> {
        let emitter = builder.with_default_acceleration(self.acceleration).build()?;
        self.add_emitter(emitter);
        let last = self.emitters.len() - 1;
        Ok(&mut self.emitters[last])
    }

    /// Advance every emitter, then repel its surviving particles
    pub fn update(&mut self, dt: f32) -> TickStats {
        let mut stats = TickStats::default();

        for emitter in &mut self.emitters {
            stats += emitter.update(dt);
            for particle in emitter.particles_mut() {
                self.handler.apply_anti_attraction(particle);
            }
        }

        trace!(
            emitters = self.emitters.len(),
            alive = stats.alive,
            "system tick"
        );
        stats
    }

    /// Draw all emitters in insertion order
    pub fn render(&self, renderer: &mut impl ParticleRenderer) {
        for emitter in &self.emitters {
            emitter.render(renderer);
        }
    }

    /// Instance data for every live particle, in render order
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.particles().map(ParticleInstance::from_particle).collect()
    }

    /// Every live particle across all emitters
    pub fn particles(&self) -> impl Iterator<Item = &Particle> + '_ {
        self.emitters.iter().flat_map(|e| e.particles().iter())
    }

    pub fn particle_count(&self) -> usize {
        self.emitters.iter().map(Emitter::len).sum()
    }

    /// Remove every live particle, keeping the emitters
    pub fn clear(&mut self) {
        for emitter in &mut self.emitters {
            emitter.clear();
        }
    }

    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    pub fn emitters_mut(&mut self) -> &mut [Emitter] {
        &mut self.emitters
    }

    pub fn handler(&self) -> &AntiAttractorHandler {
        &self.handler
    }

    /// Replace the solids particles are repelled from
    pub fn set_solids(&mut self, solids: Vec<Solid>) {
        self.handler.set_solids(solids);
    }

    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(AntiAttractorHandler::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_system_is_noop() {
        let mut system = ParticleSystem::default();
        assert_eq!(system.update(1.0), TickStats::default());
        assert!(system.instances().is_empty());
    }

    #[test]
    fn test_spawn_inherits_acceleration() {
        let mut system = ParticleSystem::default().with_acceleration(Vec3::new(0.0, -1.0, 0.0));
        system.spawn_emitter(Emitter::point(Vec3::ZERO)).unwrap();
        system
            .spawn_emitter(Emitter::point(Vec3::ZERO).with_acceleration(Vec3::ZERO))
            .unwrap();

        assert_eq!(system.emitters()[0].acceleration(), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(system.emitters()[1].acceleration(), Vec3::ZERO);
    }

    #[test]
    fn test_spawn_propagates_errors() {
        let mut system = ParticleSystem::default();
        assert!(system
            .spawn_emitter(Emitter::point(Vec3::ZERO).with_lifetime(0.0))
            .is_err());
        assert!(system.emitters().is_empty());
    }

    #[test]
    fn test_stats_sum_emitters() {
        let mut system = ParticleSystem::default();
        for _ in 0..2 {
            system
                .spawn_emitter(Emitter::point(Vec3::ZERO).with_emission_rate(4.0).with_seed(1))
                .unwrap();
        }

        let stats = system.update(0.5);
        assert_eq!(stats.emitted, 4);
        assert_eq!(stats.alive, 4);
        assert_eq!(system.particle_count(), 4);
        assert_eq!(system.instances().len(), 4);

        system.clear();
        assert_eq!(system.particle_count(), 0);
        assert_eq!(system.emitters().len(), 2);
    }

    #[test]
    fn test_repulsion_after_integration() {
        // A plane at the origin with no gravity pushes particles straight up
        let mut system = ParticleSystem::from_solids(vec![Solid::plane()], 100.0).unwrap();
        system
            .spawn_emitter(
                Emitter::point(Vec3::ZERO)
                    .with_emission_rate(1.0)
                    .with_speed_range(0.0, 0.0)
                    .with_lifetime(10.0)
                    .with_acceleration(Vec3::ZERO)
                    .with_seed(3),
            )
            .unwrap();

        system.update(1.0);
        let particle = &system.emitters()[0].particles()[0];
        assert_eq!(particle.position(), Vec3::ZERO);
        // Distance zero gives a unit impulse along the plane normal
        assert!((particle.velocity() - Vec3::UP).length() < 1e-6);
    }
}
