use crate::core::registry::VisualRegistry;
use crate::renderer::geometry::{push_polyline, ring_points, RING_SEGMENTS};
use crate::renderer::instance::{PointInstance, RenderBuffer};
use crate::systems::attack::AttackVisual;
use crate::systems::impact::{ImpactCluster, ImpactEffect};
use crate::systems::lighting::{LightState, PointLight};

/// Line width hint for trails at intensity 0; grows with intensity.
const TRAIL_WIDTH_BASE: f32 = 1.0;
/// Rings are lifted off the surface to avoid z-fighting.
const RING_LIFT: f32 = 0.3;

/// Build the frame geometry from the active visuals.
///
/// Arc particles are alpha-blended and go first; impact glows and burst
/// particles are additive and follow `additive_split`. Trails and rings are
/// emitted as line segments, impact lights into `lights`.
pub fn build_frame(visuals: &VisualRegistry, buffer: &mut RenderBuffer, lights: &mut LightState) {
    buffer.clear();
    lights.clear();

    for visual in visuals.iter() {
        push_particles(visual, buffer);
    }
    buffer.mark_additive_split();

    for visual in visuals.iter() {
        push_trail(visual, buffer);
        if let Some(impact) = &visual.impact {
            push_impact(impact, buffer, lights);
        }
    }
}

fn push_particles(visual: &AttackVisual, buffer: &mut RenderBuffer) {
    let size = visual.particle_size();
    let alpha = visual.opacity();
    for pos in visual.particle_positions() {
        buffer.push_point(PointInstance::new(pos, size, visual.color, alpha));
    }
}

fn push_trail(visual: &AttackVisual, buffer: &mut RenderBuffer) {
    let width = TRAIL_WIDTH_BASE + visual.event.intensity as f32 * 0.5;
    push_polyline(buffer, visual.trail(), visual.color, visual.trail_opacity(), width);
}

fn push_impact(impact: &ImpactCluster, buffer: &mut RenderBuffer, lights: &mut LightState) {
    for effect in &impact.effects {
        match effect {
            ImpactEffect::Glow { size, opacity } => {
                buffer.push_point(PointInstance::new(impact.origin, *size, impact.color, *opacity));
            }
            ImpactEffect::Light { intensity, range } => {
                let pos = impact.origin + impact.normal * 2.0;
                lights.add(PointLight::new(pos, impact.color, *intensity, *range));
            }
            ImpactEffect::Ring { radius, opacity, .. } => {
                if *radius <= 0.0 || *opacity <= 0.0 {
                    continue;
                }
                let center = impact.origin + impact.normal * RING_LIFT;
                let points = ring_points(center, impact.normal, *radius, RING_SEGMENTS);
                push_polyline(buffer, &points, impact.color, *opacity, 1.0);
            }
            ImpactEffect::Burst { particles } => {
                for p in particles.iter().filter(|p| p.active) {
                    buffer.push_point(PointInstance::new(impact.origin + p.offset, 1.0, impact.color, p.opacity));
                }
            }
        }
    }
}
