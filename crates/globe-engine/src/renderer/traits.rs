//! Renderer trait for host backends.
//!
//! In the browser the host reads the frame buffers through the WASM bridge
//! and draws with WebGL/WebGPU. Native or test hosts implement this trait
//! and receive the same data once per tick.

use super::camera::CameraUniform;
use super::instance::{LineVertex, PointInstance};
use crate::systems::lighting::PointLight;

/// Timing information from a draw call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawTiming {
    /// Time spent submitting draw calls (microseconds)
    pub draw_us: u32,
}

/// Complete frame data for rendering.
pub struct FrameData<'a> {
    /// Point sprites; `[..additive_split]` alpha-blended, the rest additive.
    pub points: &'a [PointInstance],
    pub additive_split: u32,
    /// Line segment list (pairs of vertices).
    pub lines: &'a [LineVertex],
    /// Impact lights.
    pub lights: &'a [PointLight],
    pub camera: CameraUniform,
    /// Globe model matrix (spin about +Y), column-major.
    pub globe_model: [[f32; 4]; 4],
    pub globe_radius: f32,
    /// Frame counter since init.
    pub frame: u64,
}

/// Renderer trait for drawing backends.
///
/// ```ignore
/// struct CanvasRenderer { /* ... */ }
///
/// impl Renderer for CanvasRenderer {
///     fn backend(&self) -> &'static str { "canvas2d" }
///     fn draw(&mut self, frame: &FrameData) -> DrawTiming { /* ... */ }
///     fn resize(&mut self, width: u32, height: u32) { /* ... */ }
/// }
/// ```
pub trait Renderer {
    /// Backend identifier (e.g., "webgl", "webgpu", "headless")
    fn backend(&self) -> &'static str;

    /// Draw a complete frame.
    fn draw(&mut self, frame: &FrameData) -> DrawTiming;

    /// Handle viewport resize.
    fn resize(&mut self, width: u32, height: u32);
}

/// Renderer that draws nothing. Used by hosts that read the buffers
/// directly (the WASM bridge) and by tests.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames: u64,
    pub last_point_count: usize,
    pub last_line_vertex_count: usize,
    pub last_light_count: usize,
}

impl Renderer for NullRenderer {
    fn backend(&self) -> &'static str {
        "null"
    }

    fn draw(&mut self, frame: &FrameData) -> DrawTiming {
        self.frames += 1;
        self.last_point_count = frame.points.len();
        self.last_line_vertex_count = frame.lines.len();
        self.last_light_count = frame.lights.len();
        DrawTiming::default()
    }

    fn resize(&mut self, _width: u32, _height: u32) {}
}
