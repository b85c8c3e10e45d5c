//! One animated visual per active attack: growing trail, flowing particles,
//! and the impact cluster once every particle has landed.

use glam::Vec3;
use rand::Rng;
use crate::api::config::{ArcSection, AttackSection, ImpactSection};
use crate::api::types::{AttackEvent, AttackId};
use crate::systems::arc::{ArcCurve, ArcPlan};
use crate::systems::impact::ImpactCluster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualPhase {
    /// Particles travelling, trail extending.
    Growing,
    /// All particles landed; only the impact animates.
    Completed,
    /// Past its lifetime; to be removed by the owner.
    Expired,
}

/// A particle flowing along the arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParticle {
    /// Curve parameter in [0, 1].
    pub progress: f32,
    /// Progress per second.
    pub speed: f32,
}

#[derive(Debug, Clone)]
pub struct AttackVisual {
    pub event: AttackEvent,
    pub curve: ArcCurve,
    pub color: [f32; 3],
    pub particles: Vec<ArcParticle>,
    /// Materialized trail points, a prefix of the sampled curve.
    trail: Vec<Vec3>,
    /// Progress already covered by `trail`.
    trail_extent: f32,
    samples: usize,
    pub age: f32,
    pub lifetime: f32,
    phase: VisualPhase,
    pub impact: Option<ImpactCluster>,
    /// Blink period scale for high-intensity events.
    blink_period: Option<f32>,
    base_size: f32,
    trail_opacity: f32,
    /// Current blink multipliers.
    opacity: f32,
    size_scale: f32,
}

impl AttackVisual {
    pub fn lifetime_for(intensity: u8, cfg: &AttackSection) -> f32 {
        cfg.lifetime_base + cfg.lifetime_per_intensity * intensity as f32
    }

    pub fn new<R: Rng>(
        event: AttackEvent,
        plan: ArcPlan,
        arcs: &ArcSection,
        attacks: &AttackSection,
        rng: &mut R,
    ) -> Self {
        let intensity = event.intensity;
        let base_speed = arcs.speed_base + arcs.speed_per_intensity * intensity as f32;
        let particles = (0..plan.particle_count.max(1))
            .map(|_| {
                let jitter = if arcs.speed_jitter > 0.0 { rng.gen_range(0.0..arcs.speed_jitter) } else { 0.0 };
                ArcParticle { progress: 0.0, speed: base_speed + jitter }
            })
            .collect();

        let blink_period = (intensity >= attacks.blink_threshold).then(|| {
            (attacks.blink_base + (10 - intensity.min(10)) as f32 * attacks.blink_step).max(1e-3)
        });

        Self {
            lifetime: Self::lifetime_for(intensity, attacks),
            event,
            curve: plan.curve,
            color: plan.color,
            particles,
            trail: Vec::with_capacity(arcs.samples + 1),
            trail_extent: 0.0,
            samples: arcs.samples,
            age: 0.0,
            phase: VisualPhase::Growing,
            impact: None,
            blink_period,
            base_size: arcs.particle_size_base + arcs.particle_size_per_intensity * intensity as f32,
            trail_opacity: arcs.trail_opacity,
            opacity: 1.0,
            size_scale: 1.0,
        }
    }

    pub fn id(&self) -> AttackId {
        self.event.id
    }

    pub fn phase(&self) -> VisualPhase {
        self.phase
    }

    pub fn trail(&self) -> &[Vec3] {
        &self.trail
    }

    /// Progress of the furthest particle.
    pub fn leading_progress(&self) -> f32 {
        self.particles.iter().map(|p| p.progress).fold(0.0, f32::max)
    }

    pub fn particles_landed(&self) -> bool {
        self.particles.iter().all(|p| p.progress >= 1.0)
    }

    /// Current particle size including the blink pulse.
    pub fn particle_size(&self) -> f32 {
        self.base_size * self.size_scale
    }

    /// Current opacity multiplier (1.0 unless blinking).
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn trail_opacity(&self) -> f32 {
        self.trail_opacity * self.opacity
    }

    pub fn particle_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.particles.iter().map(|p| self.curve.point_at(p.progress))
    }

    /// Advance by `dt` seconds. Returns the new phase when it changed.
    pub fn update<R: Rng>(&mut self, dt: f32, impact_cfg: &ImpactSection, rng: &mut R) -> Option<VisualPhase> {
        if self.phase == VisualPhase::Expired {
            return None;
        }
        self.age += dt;
        if self.age > self.lifetime {
            self.phase = VisualPhase::Expired;
            return Some(VisualPhase::Expired);
        }

        if let Some(period) = self.blink_period {
            let wave = (self.age / period).sin();
            self.opacity = 0.65 + 0.35 * wave;
            self.size_scale = 1.0 + 0.25 * wave.max(0.0);
        }

        match self.phase {
            VisualPhase::Growing => {
                for p in &mut self.particles {
                    p.progress = (p.progress + p.speed * dt).min(1.0);
                }
                self.extend_trail();
                if self.particles_landed() {
                    self.phase = VisualPhase::Completed;
                    self.impact = Some(ImpactCluster::spawn(
                        self.curve.end,
                        self.color,
                        self.event.intensity,
                        impact_cfg,
                        rng,
                    ));
                    return Some(VisualPhase::Completed);
                }
                None
            }
            VisualPhase::Completed => {
                let half = self.lifetime * 0.5;
                if let Some(impact) = &mut self.impact {
                    impact.update(self.age - half, half, dt);
                }
                None
            }
            VisualPhase::Expired => None,
        }
    }

    /// Grow the trail up to the leading particle. Never shrinks.
    fn extend_trail(&mut self) {
        let furthest = self.leading_progress();
        if furthest <= self.trail_extent && !self.trail.is_empty() {
            return;
        }
        let wanted = ((furthest * self.samples as f32).ceil() as usize + 1).min(self.samples + 1);
        for i in self.trail.len()..wanted {
            self.trail.push(self.curve.point_at(i as f32 / self.samples as f32));
        }
        self.trail_extent = furthest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use crate::api::types::{AttackCategory, Endpoint};
    use crate::core::geo::GeoCoord;
    use crate::systems::arc::ArcBuilder;

    fn visual(intensity: u8) -> (AttackVisual, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let event = AttackEvent::new(
            AttackId(1),
            Endpoint::new("US", 37.09, -95.71),
            Endpoint::new("DE", 51.17, 10.45),
            AttackCategory::Dos,
            intensity,
            0.0,
        );
        let arcs = ArcSection::default();
        let plan = ArcBuilder::new(100.0, &arcs).build(
            GeoCoord::new(event.source.latitude, event.source.longitude),
            GeoCoord::new(event.target.latitude, event.target.longitude),
            intensity,
            &event.category,
        );
        let v = AttackVisual::new(event, plan, &arcs, &AttackSection::default(), &mut rng);
        (v, rng)
    }

    #[test]
    fn trail_grows_monotonically_and_is_bounded() {
        let (mut v, mut rng) = visual(5);
        let cfg = ImpactSection::default();
        let mut prev = 0;
        for _ in 0..600 {
            v.update(1.0 / 60.0, &cfg, &mut rng);
            let len = v.trail().len();
            assert!(len >= prev, "trail shrank {} -> {}", prev, len);
            assert!(len <= 51);
            prev = len;
        }
        assert_eq!(prev, 51);
    }

    #[test]
    fn exactly_one_impact_after_all_particles_land() {
        let (mut v, mut rng) = visual(9);
        let cfg = ImpactSection::default();
        let mut completions = 0;
        for _ in 0..400 {
            let before_landed = v.particles_landed();
            match v.update(1.0 / 60.0, &cfg, &mut rng) {
                Some(VisualPhase::Completed) => {
                    completions += 1;
                    assert!(!before_landed);
                    assert!(v.particles_landed());
                }
                _ => {
                    if !v.particles_landed() {
                        assert!(v.impact.is_none());
                    }
                }
            }
        }
        assert_eq!(completions, 1);
        assert!(v.impact.is_some());
    }

    #[test]
    fn expires_only_after_lifetime() {
        let (mut v, mut rng) = visual(4);
        let cfg = ImpactSection::default();
        let lifetime = v.lifetime;
        assert!((lifetime - (5.0 + 0.3 * 4.0)).abs() < 1e-5);
        let dt = 0.05;
        let mut t = 0.0;
        loop {
            let change = v.update(dt, &cfg, &mut rng);
            t += dt;
            if change == Some(VisualPhase::Expired) {
                assert!(v.age > lifetime);
                assert!(t - dt <= lifetime + 1e-4);
                break;
            }
            assert!(v.age <= lifetime);
        }
        assert_eq!(v.update(dt, &cfg, &mut rng), None);
    }

    #[test]
    fn blink_only_for_intense_events() {
        let cfg = ImpactSection::default();
        let (mut calm, mut rng) = visual(3);
        let (mut hot, _) = visual(10);
        let mut hot_min: f32 = 1.0;
        for _ in 0..120 {
            calm.update(1.0 / 60.0, &cfg, &mut rng);
            hot.update(1.0 / 60.0, &cfg, &mut rng);
            assert_eq!(calm.opacity(), 1.0);
            hot_min = hot_min.min(hot.opacity());
            assert!(hot.opacity() >= 0.3 - 1e-5 && hot.opacity() <= 1.0 + 1e-5);
        }
        assert!(hot_min < 0.5);
    }
}
