use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// One point sprite (arc particle, impact glow, burst particle).
/// Wire format: 8 floats = 32 bytes stride.
///
/// Positions are in the globe frame; the host applies the globe model matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// World-space size.
    pub size: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub a: f32,
}

impl PointInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn new(pos: Vec3, size: f32, color: [f32; 3], alpha: f32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            size,
            r: color[0],
            g: color[1],
            b: color[2],
            a: alpha,
        }
    }

    pub fn pos(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// One end of a line segment (trails, impact rings). Lines are a plain list:
/// vertices `2k` and `2k + 1` form segment `k`.
/// Wire format: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    /// Stroke width hint for hosts that can draw wide lines.
    pub width: f32,
}

impl LineVertex {
    pub const FLOATS: usize = 8;

    pub fn new(pos: Vec3, color: [f32; 3], alpha: f32, width: f32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            r: color[0],
            g: color[1],
            b: color[2],
            a: alpha,
            width,
        }
    }
}

/// Per-frame geometry handed to the renderer.
///
/// Points are ordered by blend mode: alpha-blended first, additive after
/// `additive_split`. Pushes past the configured capacity are dropped and
/// counted, never reallocated mid-frame.
pub struct RenderBuffer {
    pub points: Vec<PointInstance>,
    pub lines: Vec<LineVertex>,
    /// Index of the first additive point.
    pub additive_split: u32,
    max_points: usize,
    max_line_vertices: usize,
    dropped: u32,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(4096, 16384)
    }

    pub fn with_capacity(max_points: usize, max_line_vertices: usize) -> Self {
        Self {
            points: Vec::with_capacity(max_points),
            lines: Vec::with_capacity(max_line_vertices),
            additive_split: 0,
            max_points,
            max_line_vertices,
            dropped: 0,
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.lines.clear();
        self.additive_split = 0;
        self.dropped = 0;
    }

    pub fn push_point(&mut self, point: PointInstance) {
        if self.points.len() < self.max_points {
            self.points.push(point);
        } else {
            self.dropped += 1;
        }
    }

    /// Push a segment. Both vertices go in or neither does.
    pub fn push_segment(&mut self, a: LineVertex, b: LineVertex) {
        if self.lines.len() + 2 <= self.max_line_vertices {
            self.lines.push(a);
            self.lines.push(b);
        } else {
            self.dropped += 1;
        }
    }

    /// Mark everything pushed so far as alpha-blended.
    pub fn mark_additive_split(&mut self) {
        self.additive_split = self.points.len() as u32;
    }

    pub fn point_count(&self) -> u32 {
        self.points.len() as u32
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.lines.len() as u32
    }

    /// Primitives dropped this frame because a section was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Raw pointer to point data for host-side reads.
    pub fn points_ptr(&self) -> *const f32 {
        self.points.as_ptr() as *const f32
    }

    pub fn lines_ptr(&self) -> *const f32 {
        self.lines.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
