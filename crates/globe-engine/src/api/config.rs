use glam::Vec3;
use serde::{Deserialize, Serialize};
use crate::core::geo::GeoCoord;
use crate::extensions::Easing;

/// Engine configuration. Every section defaults independently, so a host
/// may ship a partial JSON document such as `{"camera": {"zoom_threshold": 9}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Seed for particle speeds, ring speeds and burst directions.
    pub rng_seed: u64,
    pub globe: GlobeSection,
    pub arcs: ArcSection,
    pub attacks: AttackSection,
    pub impact: ImpactSection,
    pub camera: CameraSection,
    pub popup: PopupSection,
    pub stats: StatsSection,
    pub buffers: BufferSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeSection {
    pub radius: f32,
    /// Radians per second about +Y.
    pub rotation_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcSection {
    /// Samples along the curve; the trail holds at most `samples + 1` points.
    pub samples: usize,
    pub base_altitude: f32,
    /// Multiplies (angle / PI)^2.
    pub distance_gain: f32,
    pub intensity_gain: f32,
    pub particle_base: u32,
    pub particle_per_intensity: u32,
    /// Progress per second.
    pub speed_base: f32,
    pub speed_per_intensity: f32,
    pub speed_jitter: f32,
    pub particle_size_base: f32,
    pub particle_size_per_intensity: f32,
    pub trail_opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackSection {
    /// Seconds.
    pub lifetime_base: f32,
    pub lifetime_per_intensity: f32,
    pub blink_threshold: u8,
    pub blink_base: f32,
    pub blink_step: f32,
    /// Recent events kept for replay by id.
    pub history_len: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactSection {
    pub glow_size: f32,
    pub glow_opacity: f32,
    pub light_intensity: f32,
    pub light_range: f32,
    /// Angular frequency of the light flicker.
    pub light_flicker: f32,
    pub ring_cap: u32,
    pub ring_delay_step: f32,
    pub ring_speed_base: f32,
    pub ring_speed_per_intensity: f32,
    pub burst_base: u32,
    pub burst_per_intensity: u32,
    pub burst_max_delay: f32,
    pub burst_lifespan: f32,
    pub burst_speed: f32,
    /// Velocity multiplier applied every tick.
    pub burst_damping: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSection {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub default_position: Vec3,
    pub default_look_at: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Fraction of orbit velocity removed per tick.
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    /// Events at or above this intensity take over the camera.
    pub zoom_threshold: u8,
    /// Distance from the globe centre of the tracking viewpoints.
    pub view_distance: f32,
    /// Minimum gap kept between a viewpoint and the arc below it.
    pub view_clearance: f32,
    pub pending_duration: f32,
    pub tracking_duration: f32,
    pub reset_duration: f32,
    pub focus_duration: f32,
    pub focus_distance: f32,
    /// Region used when the host toggles focus without naming one.
    pub focus_region: GeoCoord,
    /// Fly-in progress along the detour path.
    pub pending_easing: Easing,
    /// Envelope applied to the leading particle while tracking.
    pub tracking_easing: Easing,
    /// Reset leg from the current pose out to the waypoint.
    pub reset_outbound_easing: Easing,
    /// Reset leg from the waypoint back to the default pose.
    pub reset_inbound_easing: Easing,
    pub reset_look_easing: Easing,
    pub focus_easing: Easing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupSection {
    pub threshold: u8,
    /// Seconds before auto-dismissal.
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSection {
    /// Seconds between statistics pulls.
    pub refresh_interval: f32,
    pub top_n: usize,
}

/// Capacities of the shared frame buffer sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferSection {
    pub max_points: usize,
    pub max_line_vertices: usize,
    pub max_lights: usize,
    pub max_events: usize,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            rng_seed: 0x5eed_a77a_c4ed,
            globe: GlobeSection::default(),
            arcs: ArcSection::default(),
            attacks: AttackSection::default(),
            impact: ImpactSection::default(),
            camera: CameraSection::default(),
            popup: PopupSection::default(),
            stats: StatsSection::default(),
            buffers: BufferSection::default(),
        }
    }
}

impl Default for GlobeSection {
    fn default() -> Self {
        Self { radius: 100.0, rotation_speed: 0.03 }
    }
}

impl Default for ArcSection {
    fn default() -> Self {
        Self {
            samples: 50,
            base_altitude: 15.0,
            distance_gain: 50.0,
            intensity_gain: 0.5,
            particle_base: 6,
            particle_per_intensity: 2,
            speed_base: 0.3,
            speed_per_intensity: 0.02,
            speed_jitter: 0.1,
            particle_size_base: 1.5,
            particle_size_per_intensity: 0.1,
            trail_opacity: 0.8,
        }
    }
}

impl Default for AttackSection {
    fn default() -> Self {
        Self {
            lifetime_base: 5.0,
            lifetime_per_intensity: 0.3,
            blink_threshold: 7,
            blink_base: 0.1,
            blink_step: 0.05,
            history_len: 50,
        }
    }
}

impl Default for ImpactSection {
    fn default() -> Self {
        Self {
            glow_size: 6.0,
            glow_opacity: 0.9,
            light_intensity: 2.0,
            light_range: 30.0,
            light_flicker: 12.0,
            ring_cap: 4,
            ring_delay_step: 0.25,
            ring_speed_base: 4.0,
            ring_speed_per_intensity: 0.6,
            burst_base: 10,
            burst_per_intensity: 2,
            burst_max_delay: 0.3,
            burst_lifespan: 1.2,
            burst_speed: 20.0,
            burst_damping: 0.94,
        }
    }
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            default_position: Vec3::new(0.0, 0.0, 200.0),
            default_look_at: Vec3::ZERO,
            min_distance: 120.0,
            max_distance: 300.0,
            damping: 0.05,
            rotate_speed: 0.5,
            zoom_speed: 0.1,
            zoom_threshold: 8,
            view_distance: 170.0,
            view_clearance: 40.0,
            pending_duration: 1.5,
            tracking_duration: 8.0,
            reset_duration: 2.0,
            focus_duration: 2.0,
            focus_distance: 160.0,
            focus_region: GeoCoord::new(50.0, 10.0),
            pending_easing: Easing::CubicInOut,
            tracking_easing: Easing::CubicInOut,
            reset_outbound_easing: Easing::CubicOut,
            reset_inbound_easing: Easing::SineInOut,
            reset_look_easing: Easing::CubicInOut,
            focus_easing: Easing::CubicInOut,
        }
    }
}

impl Default for PopupSection {
    fn default() -> Self {
        Self { threshold: 7, duration: 5.0 }
    }
}

impl Default for StatsSection {
    fn default() -> Self {
        Self { refresh_interval: 5.0, top_n: 10 }
    }
}

impl Default for BufferSection {
    fn default() -> Self {
        Self {
            max_points: 4096,
            max_line_vertices: 16384,
            max_lights: 64,
            max_events: 64,
        }
    }
}

/// Durations never reach zero; they are divided by.
const MIN_DURATION: f32 = 1e-3;

impl GlobeConfig {
    /// Parse a configuration from a JSON string, then sanitize it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamp values into their usable ranges instead of rejecting the document.
    pub fn sanitized(mut self) -> Self {
        self.fixed_dt = self.fixed_dt.clamp(1e-4, 0.25);
        self.globe.radius = self.globe.radius.max(1.0);

        let arcs = &mut self.arcs;
        arcs.samples = arcs.samples.max(2);
        arcs.base_altitude = arcs.base_altitude.max(0.0);
        arcs.distance_gain = arcs.distance_gain.max(0.0);
        arcs.intensity_gain = arcs.intensity_gain.max(0.0);
        arcs.particle_base = arcs.particle_base.max(1);
        arcs.speed_base = arcs.speed_base.max(MIN_DURATION);
        arcs.speed_jitter = arcs.speed_jitter.max(0.0);

        let attacks = &mut self.attacks;
        attacks.lifetime_base = attacks.lifetime_base.max(MIN_DURATION);
        attacks.lifetime_per_intensity = attacks.lifetime_per_intensity.max(0.0);
        attacks.blink_threshold = attacks.blink_threshold.clamp(1, 11);

        let impact = &mut self.impact;
        impact.ring_cap = impact.ring_cap.max(1);
        impact.burst_lifespan = impact.burst_lifespan.max(MIN_DURATION);
        impact.burst_max_delay = impact.burst_max_delay.max(0.0);
        impact.burst_damping = impact.burst_damping.clamp(0.0, 1.0);

        let cam = &mut self.camera;
        cam.min_distance = cam.min_distance.max(self.globe.radius);
        cam.max_distance = cam.max_distance.max(cam.min_distance);
        cam.damping = cam.damping.clamp(0.0, 1.0);
        cam.zoom_threshold = cam.zoom_threshold.clamp(1, 11);
        cam.pending_duration = cam.pending_duration.max(MIN_DURATION);
        cam.tracking_duration = cam.tracking_duration.max(MIN_DURATION);
        cam.reset_duration = cam.reset_duration.max(MIN_DURATION);
        cam.focus_duration = cam.focus_duration.max(MIN_DURATION);
        cam.fov_y_degrees = cam.fov_y_degrees.clamp(1.0, 170.0);
        cam.near = cam.near.max(1e-3);
        cam.far = cam.far.max(cam.near + 1.0);

        self.popup.threshold = self.popup.threshold.clamp(1, 11);
        self.popup.duration = self.popup.duration.max(MIN_DURATION);
        self.stats.refresh_interval = self.stats.refresh_interval.max(MIN_DURATION);
        self
    }
}
