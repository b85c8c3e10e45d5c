//! Impact clusters: the fade-out effects spawned where an attack lands.
//!
//! A cluster is owned by its attack visual and driven by the visual's clock.
//! Impact age starts at half the visual lifetime, so the cluster has exactly
//! the second half of the lifetime to play out and is dropped with its parent.

use glam::Vec3;
use rand::Rng;
use crate::api::config::ImpactSection;
use crate::extensions::Easing;

/// Angular frequency of the glow size pulse.
const GLOW_PULSE: f32 = 6.0;

/// One particle of the impact burst.
#[derive(Debug, Clone, PartialEq)]
pub struct BurstParticle {
    /// Offset from the impact point.
    pub offset: Vec3,
    /// World units per second, damped every tick.
    pub velocity: Vec3,
    /// Impact age at which this particle starts moving.
    pub delay: f32,
    pub age: f32,
    pub opacity: f32,
    /// Started and not yet past its lifespan.
    pub active: bool,
    pub finished: bool,
}

/// Tagged sub-effects of an impact. Each variant carries its own timing.
#[derive(Debug, Clone, PartialEq)]
pub enum ImpactEffect {
    Glow {
        size: f32,
        opacity: f32,
    },
    Light {
        intensity: f32,
        range: f32,
    },
    Ring {
        /// Impact age at which the ring starts to expand.
        delay: f32,
        /// Radius growth, world units per second.
        speed: f32,
        radius: f32,
        opacity: f32,
    },
    Burst {
        particles: Vec<BurstParticle>,
    },
}

/// The bundle of effects for one landed attack.
#[derive(Debug, Clone)]
pub struct ImpactCluster {
    /// Impact point in the globe frame.
    pub origin: Vec3,
    /// Outward surface normal at the impact point.
    pub normal: Vec3,
    pub color: [f32; 3],
    pub intensity: u8,
    pub effects: Vec<ImpactEffect>,
    /// Global fade factor, 1.0 at impact and 0.0 at the end of the parent's life.
    pub decay: f32,
    cfg: ImpactSection,
}

impl ImpactCluster {
    /// Number of rings for an intensity.
    pub fn ring_count(intensity: u8, cap: u32) -> u32 {
        (2 + intensity as u32 / 4).min(cap)
    }

    pub fn burst_count(intensity: u8, cfg: &ImpactSection) -> u32 {
        cfg.burst_base + cfg.burst_per_intensity * intensity as u32
    }

    pub fn spawn<R: Rng>(origin: Vec3, color: [f32; 3], intensity: u8, cfg: &ImpactSection, rng: &mut R) -> Self {
        let normal = origin.normalize_or_zero();
        let mut effects = Vec::with_capacity(8);

        effects.push(ImpactEffect::Glow { size: cfg.glow_size, opacity: cfg.glow_opacity });
        effects.push(ImpactEffect::Light { intensity: cfg.light_intensity, range: cfg.light_range });

        let ring_speed = cfg.ring_speed_base + cfg.ring_speed_per_intensity * intensity as f32;
        for i in 0..Self::ring_count(intensity, cfg.ring_cap) {
            effects.push(ImpactEffect::Ring {
                delay: i as f32 * cfg.ring_delay_step,
                speed: rng.gen_range(0.8f32..1.2) * ring_speed,
                radius: 0.0,
                opacity: 1.0,
            });
        }

        let strength = 1.0 + intensity as f32 / 10.0;
        let particles = (0..Self::burst_count(intensity, cfg))
            .map(|_| {
                let mut dir = Vec3::new(
                    rng.gen_range(-1.0f32..1.0),
                    rng.gen_range(-1.0f32..1.0),
                    rng.gen_range(-1.0f32..1.0),
                )
                .normalize_or_zero();
                // Keep the spray above the surface.
                if dir.dot(normal) < 0.0 {
                    dir = -dir;
                }
                let dir = (dir + normal * 0.5).normalize_or_zero();
                BurstParticle {
                    offset: Vec3::ZERO,
                    velocity: dir * cfg.burst_speed * rng.gen_range(0.5f32..1.5) * strength,
                    delay: if cfg.burst_max_delay > 0.0 { rng.gen_range(0.0..cfg.burst_max_delay) } else { 0.0 },
                    age: 0.0,
                    opacity: 0.0,
                    active: false,
                    finished: false,
                }
            })
            .collect();
        effects.push(ImpactEffect::Burst { particles });

        Self {
            origin,
            normal,
            color,
            intensity,
            effects,
            decay: 1.0,
            cfg: cfg.clone(),
        }
    }

    /// Advance every sub-effect.
    ///
    /// - `impact_age`: seconds since the parent's lifetime midpoint (≥ 0)
    /// - `impact_life`: the half-lifetime the cluster has to play out
    pub fn update(&mut self, impact_age: f32, impact_life: f32, dt: f32) {
        let life = impact_life.max(1e-3);
        let impact_age = impact_age.max(0.0);
        let remaining = (1.0 - impact_age / life).clamp(0.0, 1.0);
        self.decay = Easing::QuartOut.apply(remaining);
        let decay = self.decay;
        let cfg = &self.cfg;

        for effect in &mut self.effects {
            match effect {
                ImpactEffect::Glow { size, opacity } => {
                    *size = cfg.glow_size * (1.0 + 0.25 * (GLOW_PULSE * impact_age).sin());
                    *opacity = cfg.glow_opacity * decay;
                }
                ImpactEffect::Light { intensity, .. } => {
                    *intensity = cfg.light_intensity
                        * decay
                        * (0.75 + 0.25 * (cfg.light_flicker * impact_age).sin());
                }
                ImpactEffect::Ring { delay, speed, radius, opacity } => {
                    let t = impact_age - *delay;
                    if t > 0.0 {
                        *radius = t * *speed;
                        let span = (life - *delay).max(1e-3);
                        *opacity = (1.0 - t / span).clamp(0.0, 1.0);
                    }
                }
                ImpactEffect::Burst { particles } => {
                    for p in particles.iter_mut() {
                        if p.finished {
                            continue;
                        }
                        if !p.active {
                            if impact_age < p.delay {
                                continue;
                            }
                            p.active = true;
                        }
                        p.age += dt;
                        if p.age >= cfg.burst_lifespan {
                            p.active = false;
                            p.finished = true;
                            p.opacity = 0.0;
                            continue;
                        }
                        p.offset += p.velocity * dt;
                        p.velocity *= cfg.burst_damping;
                        p.opacity = (1.0 - p.age / cfg.burst_lifespan) * decay;
                    }
                }
            }
        }
    }

    /// Count of ring effects.
    pub fn rings(&self) -> usize {
        self.effects.iter().filter(|e| matches!(e, ImpactEffect::Ring { .. })).count()
    }
}
