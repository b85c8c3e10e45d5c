/// Point lights emitted by impact clusters.
///
/// Unlike the persistent scene rig the host sets up, these lights are
/// rebuilt every frame from the live impacts and serialized for the
/// renderer's lighting pass.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A 3D point light.
///
/// Wire format (8 floats / 32 bytes):
/// `[x, y, z, r, g, b, intensity, range]`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointLight {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub intensity: f32,
    /// Falloff distance in world units.
    pub range: f32,
}

impl PointLight {
    pub const FLOATS: usize = 8;

    pub fn new(pos: Vec3, color: [f32; 3], intensity: f32, range: f32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            r: color[0],
            g: color[1],
            b: color[2],
            intensity,
            range,
        }
    }

    pub fn pos(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// The per-frame light list, capped at `max_lights`.
/// When more impacts are alive than the cap allows, the brightest win.
pub struct LightState {
    lights: Vec<PointLight>,
    max_lights: usize,
}

impl LightState {
    pub fn with_capacity(max_lights: usize) -> Self {
        Self {
            lights: Vec::with_capacity(max_lights),
            max_lights,
        }
    }

    pub fn add(&mut self, light: PointLight) {
        if light.intensity <= 0.0 {
            return;
        }
        if self.lights.len() < self.max_lights {
            self.lights.push(light);
            return;
        }
        // Replace the dimmest light if the new one is brighter.
        if let Some((idx, dimmest)) = self
            .lights
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.intensity.total_cmp(&b.1.intensity))
        {
            if dimmest.intensity < light.intensity {
                self.lights[idx] = light;
            }
        }
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointLight> {
        self.lights.iter()
    }

    pub fn as_slice(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn count(&self) -> usize {
        self.lights.len()
    }

    /// Pointer to the lights data for host-side reads.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.lights.as_ptr() as *const f32
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}
