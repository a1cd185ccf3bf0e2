//! Headless renderer that summarizes a frame instead of drawing it

use flurry_core::{Color, Vec3};
use flurry_particles::{ParticleInstance, ParticleRenderer, TickStats, Trail};
use serde::Serialize;

/// Per-frame aggregate of everything a renderer would draw
#[derive(Debug, Default, Clone, Serialize)]
pub struct FrameReport {
    pub particles: usize,
    pub trails: usize,
    pub trail_points: usize,
    /// Mean particle opacity
    pub mean_opacity: f32,
    /// Axis-aligned bounds of particle positions
    pub bounds_min: Option<[f32; 3]>,
    pub bounds_max: Option<[f32; 3]>,
    #[serde(skip)]
    opacity_sum: f32,
}

impl FrameReport {
    pub fn new() -> Self {
        Self::default()
    }

    fn include(&mut self, p: Vec3) {
        let (min, max) = match (self.bounds_min, self.bounds_max) {
            (Some(min), Some(max)) => (
                [min[0].min(p.x), min[1].min(p.y), min[2].min(p.z)],
                [max[0].max(p.x), max[1].max(p.y), max[2].max(p.z)],
            ),
            _ => (p.to_array(), p.to_array()),
        };
        self.bounds_min = Some(min);
        self.bounds_max = Some(max);
    }
}

impl ParticleRenderer for FrameReport {
    fn draw_particle(&mut self, instance: &ParticleInstance) {
        let [x, y, z, _size] = instance.position_size;
        self.include(Vec3::new(x, y, z));

        self.particles += 1;
        self.opacity_sum += instance.color[3];
        self.mean_opacity = self.opacity_sum / self.particles as f32;
    }

    fn draw_trail(&mut self, trail: &Trail, _color: Color) {
        self.trails += 1;
        self.trail_points += trail.len();
    }
}

/// Totals over a whole run, printed by `flurry run --json`
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub simulated_seconds: f32,
    pub emitted: usize,
    pub dropped: usize,
    pub culled: usize,
    pub peak_alive: usize,
    pub final_frame: FrameReport,
}

impl RunSummary {
    /// Fold one tick into the totals
    pub fn record(&mut self, stats: TickStats) {
        self.emitted += stats.emitted;
        self.dropped += stats.dropped;
        self.culled += stats.culled;
        self.peak_alive = self.peak_alive.max(stats.alive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flurry_particles::{Emitter, ParticleSystem};

    #[test]
    fn test_report_counts_system() {
        let mut system = ParticleSystem::default().with_acceleration(Vec3::ZERO);
        system
            .spawn_emitter(
                Emitter::cone(Vec3::ZERO, Vec3::UP)
                    .with_emission_rate(10.0)
                    .with_trail_length(4)
                    .with_seed(5),
            )
            .unwrap();
        system.update(0.5);

        let mut report = FrameReport::new();
        system.render(&mut report);

        assert_eq!(report.particles, 5);
        assert_eq!(report.trails, 5);
        assert_eq!(report.trail_points, 20);
        assert!(report.mean_opacity > 0.0 && report.mean_opacity <= 1.0);

        let min = report.bounds_min.unwrap();
        let max = report.bounds_max.unwrap();
        assert!(min[1] <= max[1]);
    }

    #[test]
    fn test_empty_report_serializes() {
        let json = serde_json::to_value(RunSummary::default()).unwrap();
        assert_eq!(json["final_frame"]["particles"], 0);
        assert!(json["final_frame"]["bounds_min"].is_null());
        assert!(json["final_frame"].get("opacity_sum").is_none());
    }

    #[test]
    fn test_summary_tracks_peak() {
        let mut summary = RunSummary::default();
        summary.record(TickStats {
            emitted: 3,
            dropped: 1,
            culled: 0,
            alive: 3,
        });
        summary.record(TickStats {
            emitted: 0,
            dropped: 0,
            culled: 2,
            alive: 1,
        });
        assert_eq!(summary.emitted, 3);
        assert_eq!(summary.culled, 2);
        assert_eq!(summary.peak_alive, 3);
    }
}
