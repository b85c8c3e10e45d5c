use std::f32::consts::TAU;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4};
use crate::api::config::CameraSection;

/// Who is driving the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// User orbit controls.
    Manual,
    /// Flying to or tracking an attack.
    Zooming,
    /// Easing back to the default pose.
    Resetting,
    /// Following a fixed geographic region.
    RegionFocus,
}

impl CameraMode {
    /// Numeric code carried in `GlobeEvent::CAMERA_MODE` payloads.
    pub fn code(self) -> f32 {
        match self {
            CameraMode::Manual => 0.0,
            CameraMode::Zooming => 1.0,
            CameraMode::Resetting => 2.0,
            CameraMode::RegionFocus => 3.0,
        }
    }
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
    /// Camera position (w = 1).
    pub eye: [f32; 4],
}

/// Damped orbit around a target point.
/// Drags feed angular velocity; `update` applies a `damping` fraction of it
/// per tick, so a drag's total rotation is independent of the damping.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub enabled: bool,
    /// Rotation about +Y (radians). 0 looks down -Z.
    pub azimuth: f32,
    /// Angle above the equatorial plane (radians).
    pub elevation: f32,
    pub distance: f32,
    azimuth_velocity: f32,
    elevation_velocity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl OrbitControls {
    const MAX_ELEVATION: f32 = 1.5; // ~86 degrees

    pub fn from_config(cfg: &CameraSection) -> Self {
        let mut orbit = Self {
            enabled: true,
            azimuth: 0.0,
            elevation: 0.0,
            distance: cfg.default_position.distance(cfg.default_look_at),
            azimuth_velocity: 0.0,
            elevation_velocity: 0.0,
            min_distance: cfg.min_distance,
            max_distance: cfg.max_distance,
            damping: cfg.damping,
            rotate_speed: cfg.rotate_speed,
            zoom_speed: cfg.zoom_speed,
        };
        orbit.sync_from(cfg.default_position, cfg.default_look_at);
        orbit
    }

    /// Re-derive the spherical pose from an absolute camera pose.
    /// Called when manual control is handed back after a transition.
    pub fn sync_from(&mut self, position: Vec3, target: Vec3) {
        let offset = position - target;
        let d = offset.length();
        if d < 1e-4 {
            return;
        }
        self.distance = d.clamp(self.min_distance, self.max_distance);
        self.elevation = (offset.y / d).clamp(-1.0, 1.0).asin()
            .clamp(-Self::MAX_ELEVATION, Self::MAX_ELEVATION);
        self.azimuth = offset.x.atan2(offset.z);
        self.azimuth_velocity = 0.0;
        self.elevation_velocity = 0.0;
    }

    /// Pointer drag in pixels. A drag across the full viewport height turns
    /// the globe once (scaled by `rotate_speed`).
    pub fn drag(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if !self.enabled {
            return;
        }
        let scale = TAU / viewport_height.max(1.0) * self.rotate_speed;
        self.azimuth_velocity -= dx * scale;
        self.elevation_velocity += dy * scale;
    }

    /// Wheel zoom. Positive `delta` moves closer.
    pub fn zoom(&mut self, delta: f32) {
        if !self.enabled {
            return;
        }
        self.distance *= 1.0 - delta * self.zoom_speed;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    /// Apply one tick of damped motion and return the camera position.
    pub fn update(&mut self, target: Vec3) -> Vec3 {
        let step = if self.damping > 0.0 { self.damping } else { 1.0 };
        self.azimuth += self.azimuth_velocity * step;
        self.elevation = (self.elevation + self.elevation_velocity * step)
            .clamp(-Self::MAX_ELEVATION, Self::MAX_ELEVATION);
        self.azimuth_velocity *= 1.0 - step;
        self.elevation_velocity *= 1.0 - step;
        self.position(target)
    }

    pub fn position(&self, target: Vec3) -> Vec3 {
        let (cos_el, sin_el) = (self.elevation.cos(), self.elevation.sin());
        target + Vec3::new(
            cos_el * self.azimuth.sin(),
            sin_el,
            cos_el * self.azimuth.cos(),
        ) * self.distance
    }

    /// Drop any pending drag motion.
    pub fn stop(&mut self) {
        self.azimuth_velocity = 0.0;
        self.elevation_velocity = 0.0;
    }
}

/// The single scene camera: absolute pose, mode, projection and manual controls.
#[derive(Debug, Clone)]
pub struct CameraState {
    pub position: Vec3,
    pub look_at: Vec3,
    pub mode: CameraMode,
    /// Pose captured when an automatic transition took over.
    pub saved_position: Vec3,
    pub saved_look_at: Vec3,
    pub default_position: Vec3,
    pub default_look_at: Vec3,
    pub orbit: OrbitControls,
    /// Viewport size in pixels.
    pub viewport: Vec2,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraState {
    pub fn new(cfg: &CameraSection) -> Self {
        Self {
            position: cfg.default_position,
            look_at: cfg.default_look_at,
            mode: CameraMode::Manual,
            saved_position: cfg.default_position,
            saved_look_at: cfg.default_look_at,
            default_position: cfg.default_position,
            default_look_at: cfg.default_look_at,
            orbit: OrbitControls::from_config(cfg),
            viewport: Vec2::new(1280.0, 720.0),
            fov_y: cfg.fov_y_degrees.to_radians(),
            near: cfg.near,
            far: cfg.far,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y.max(1.0)
    }

    /// Resize the viewport (e.g. on window resize). Zero sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width >= 1.0 && height >= 1.0 {
            self.viewport = Vec2::new(width, height);
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        let forward = (self.look_at - self.position).normalize_or_zero();
        // Looking straight along the spin axis: pick another up vector.
        let up = if forward.cross(Vec3::Y).length_squared() < 1e-8 { Vec3::Z } else { Vec3::Y };
        Mat4::look_at_rh(self.position, self.look_at, up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_projection: self.view_projection().to_cols_array_2d(),
            eye: [self.position.x, self.position.y, self.position.z, 1.0],
        }
    }

    /// World point → pixel coordinates (origin top-left, Y down).
    /// `None` when the point is behind the camera.
    pub fn project_to_screen(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x * 0.5 + 0.5) * self.viewport.x,
            (-ndc.y * 0.5 + 0.5) * self.viewport.y,
        ))
    }

    /// Remember the current pose as the start of a transition.
    pub fn snapshot(&mut self) {
        self.saved_position = self.position;
        self.saved_look_at = self.look_at;
    }

    pub fn set_pose(&mut self, position: Vec3, look_at: Vec3) {
        self.position = position;
        self.look_at = look_at;
    }

    /// Hand the camera to an automatic transition.
    pub fn disable_manual(&mut self) {
        self.orbit.enabled = false;
        self.orbit.stop();
    }

    /// Snap to the default pose and give control back to the user.
    pub fn restore_manual(&mut self) {
        self.position = self.default_position;
        self.look_at = self.default_look_at;
        self.orbit.sync_from(self.position, self.look_at);
        self.orbit.enabled = true;
        self.mode = CameraMode::Manual;
    }

    /// One tick of manual orbiting. No-op while a transition owns the camera.
    pub fn update_manual(&mut self) {
        if self.mode == CameraMode::Manual && self.orbit.enabled {
            self.position = self.orbit.update(self.look_at);
        }
    }
}
