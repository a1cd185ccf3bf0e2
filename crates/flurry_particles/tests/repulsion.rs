//! Integration tests for anti-attraction through the particle system.

use flurry_core::{Solid, SolidKind, Vec3};
use flurry_particles::{AntiAttractorHandler, Emitter, Particle, ParticleError, ParticleSystem};

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-5
}

#[test]
fn test_cylinder_wall_scenario() {
    let handler = AntiAttractorHandler::new(vec![Solid::cylinder(2.0, 2.0, 4.0)], 1.0).unwrap();
    let mut particle = Particle::new(Vec3::new(0.0, 2.0, 2.5), Vec3::ZERO, 1.0).unwrap();

    handler.apply_anti_attraction(&mut particle);

    let velocity = particle.velocity();
    assert!(approx(velocity.normalize(), Vec3::Z));
    assert!((velocity.length() - (-0.25f32).exp()).abs() < 1e-6);
}

#[test]
fn test_plane_surface_gets_unit_impulse() {
    let normal_tilt = Vec3::new(-20.0, 0.0, 0.0);
    let plane = Solid::plane()
        .with_position(Vec3::new(0.0, 5.0, 0.0))
        .with_rotation(normal_tilt);
    let normal = plane.direction_to_world(Vec3::UP);
    let handler = AntiAttractorHandler::new(vec![plane], 3.0).unwrap();

    let impulse = handler.impulse_at(Vec3::new(0.0, 5.0, 0.0));
    assert!(approx(impulse, normal));
}

#[test]
fn test_out_of_range_receives_nothing() {
    let solids = vec![
        Solid::cylinder(1.0, 0.5, 3.0).with_rotation(Vec3::new(10.0, 20.0, 30.0)),
        Solid::plane().with_position(Vec3::new(0.0, -20.0, 0.0)),
    ];
    let handler = AntiAttractorHandler::new(solids, 2.0).unwrap();

    for position in [
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(0.0, 8.0, 0.0),
        Vec3::new(-4.0, -4.0, 4.0),
    ] {
        assert_eq!(handler.impulse_at(position), Vec3::ZERO, "at {position:?}");
    }
}

#[test]
fn test_impulses_from_several_solids_add() {
    let left = Solid::plane()
        .with_position(Vec3::new(-1.0, 0.0, 0.0))
        .with_rotation(Vec3::new(0.0, 0.0, -90.0));
    let right = Solid::plane()
        .with_position(Vec3::new(1.0, 0.0, 0.0))
        .with_rotation(Vec3::new(0.0, 0.0, -90.0));
    let handler = AntiAttractorHandler::new(vec![left, right], 4.0).unwrap();

    // Midway between two parallel walls the pushes cancel
    assert!(approx(handler.impulse_at(Vec3::ZERO), Vec3::ZERO));
}

#[test]
fn test_unsupported_solids_do_not_repel() {
    let solids = vec![
        Solid::new(SolidKind::Sphere { radius: 2.0 }),
        Solid::new(SolidKind::Torus {
            major_radius: 2.0,
            minor_radius: 0.5,
        }),
    ];
    let handler = AntiAttractorHandler::new(solids, 5.0).unwrap();
    assert_eq!(handler.impulse_at(Vec3::new(0.0, 0.1, 0.0)), Vec3::ZERO);
}

#[test]
fn test_degenerate_cylinder_stays_finite() {
    let handler = AntiAttractorHandler::new(vec![Solid::cylinder(1.0, 1.0, 0.0)], 2.0).unwrap();
    for position in [
        Vec3::ZERO,
        Vec3::new(0.5, 0.0, 0.0),
        Vec3::new(1.5, 0.5, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
    ] {
        assert!(handler.impulse_at(position).is_finite(), "at {position:?}");
    }
}

#[test]
fn test_invalid_range_rejected() {
    assert_eq!(
        AntiAttractorHandler::new(Vec::new(), f32::INFINITY).unwrap_err(),
        ParticleError::InvalidRangeOfEffect(f32::INFINITY)
    );
}

#[test]
fn test_floor_keeps_particles_up() {
    // Particles dropped onto a floor are pushed back up every tick
    let mut system = ParticleSystem::from_solids(vec![Solid::plane()], 5.0).unwrap();
    system
        .spawn_emitter(
            Emitter::point(Vec3::new(0.0, 0.5, 0.0))
                .with_emission_rate(0.0)
                .with_lifetime(10.0),
        )
        .unwrap();
    let emitter = &mut system.emitters_mut()[0];
    let particle = emitter.emit_particle();
    let unrepelled = {
        let mut p = particle.clone();
        p.update(0.1, Vec3::GRAVITY);
        p
    };

    let mut repelled = particle;
    system.handler().apply_anti_attraction(&mut repelled);
    repelled.update(0.1, Vec3::GRAVITY);

    assert!(repelled.velocity().y > unrepelled.velocity().y);
}

#[test]
fn test_solids_can_be_replaced() {
    let mut system = ParticleSystem::from_solids(Vec::new(), 5.0).unwrap();
    assert_eq!(system.handler().impulse_at(Vec3::ZERO), Vec3::ZERO);

    system.set_solids(vec![Solid::plane()]);
    assert_eq!(system.handler().solids().len(), 1);
    assert!(approx(system.handler().impulse_at(Vec3::ZERO), Vec3::UP));
}
