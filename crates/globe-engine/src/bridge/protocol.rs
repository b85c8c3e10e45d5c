/// Shared frame buffer layout.
/// Must stay in sync with the host's `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Camera: 36 floats]  view-projection (16) + eye (4) + globe model (16)
/// [Points: max_points × 8 floats]
/// [Lines: max_line_vertices × 8 floats]
/// [Lights: max_lights × 8 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// The host reads them from the header to compute offsets dynamically.

use crate::api::config::GlobeConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_PROTOCOL_VERSION: usize = 2;
pub const HEADER_MAX_POINTS: usize = 3;
pub const HEADER_POINT_COUNT: usize = 4;
pub const HEADER_ADDITIVE_SPLIT: usize = 5;
pub const HEADER_MAX_LINE_VERTICES: usize = 6;
pub const HEADER_LINE_VERTEX_COUNT: usize = 7;
pub const HEADER_MAX_LIGHTS: usize = 8;
pub const HEADER_LIGHT_COUNT: usize = 9;
pub const HEADER_MAX_EVENTS: usize = 10;
pub const HEADER_EVENT_COUNT: usize = 11;
pub const HEADER_GLOBE_RADIUS: usize = 12;
pub const HEADER_SPIN_ANGLE: usize = 13;
pub const HEADER_CAMERA_MODE: usize = 14;
pub const HEADER_POPUP_VISIBLE: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats in the camera section: view-projection, eye, globe model.
pub const CAMERA_FLOATS: usize = 16 + 4 + 16;

/// Floats per point instance (wire format, fixed).
pub const POINT_FLOATS: usize = 8;

/// Floats per line vertex (wire format, fixed).
pub const LINE_VERTEX_FLOATS: usize = 8;

/// Floats per point light: x, y, z, r, g, b, intensity, range.
pub const LIGHT_FLOATS: usize = 8;

/// Floats per globe event: kind, a, b, c.
pub const EVENT_FLOATS: usize = 4;

/// Default light capacity.
pub const DEFAULT_MAX_LIGHTS: usize = 64;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_points: usize,
    pub max_line_vertices: usize,
    pub max_lights: usize,
    pub max_events: usize,

    pub point_data_floats: usize,
    pub line_data_floats: usize,
    pub light_data_floats: usize,
    pub event_data_floats: usize,

    /// Offset (in floats) where the camera section begins.
    pub camera_data_offset: usize,
    pub point_data_offset: usize,
    pub line_data_offset: usize,
    pub light_data_offset: usize,
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_points: usize, max_line_vertices: usize, max_lights: usize, max_events: usize) -> Self {
        let point_data_floats = max_points * POINT_FLOATS;
        let line_data_floats = max_line_vertices * LINE_VERTEX_FLOATS;
        let light_data_floats = max_lights * LIGHT_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let camera_data_offset = HEADER_FLOATS;
        let point_data_offset = camera_data_offset + CAMERA_FLOATS;
        let line_data_offset = point_data_offset + point_data_floats;
        let light_data_offset = line_data_offset + line_data_floats;
        let event_data_offset = light_data_offset + light_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_points,
            max_line_vertices,
            max_lights,
            max_events,
            point_data_floats,
            line_data_floats,
            light_data_floats,
            event_data_floats,
            camera_data_offset,
            point_data_offset,
            line_data_offset,
            light_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GlobeConfig.
    pub fn from_config(config: &GlobeConfig) -> Self {
        let b = &config.buffers;
        Self::new(b.max_points, b.max_line_vertices, b.max_lights, b.max_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_sizes() {
        let layout = ProtocolLayout::from_config(&GlobeConfig::default());
        assert_eq!(layout.max_points, 4096);
        assert_eq!(layout.max_lights, DEFAULT_MAX_LIGHTS);
        assert_eq!(layout.point_data_offset, HEADER_FLOATS + CAMERA_FLOATS);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(100, 200, 10, 20);

        assert_eq!(layout.camera_data_offset, HEADER_FLOATS);
        assert_eq!(layout.line_data_offset, layout.point_data_offset + 100 * 8);
        assert_eq!(layout.light_data_offset, layout.line_data_offset + 200 * 8);
        assert_eq!(layout.event_data_offset, layout.light_data_offset + 10 * 8);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + 20 * 4);
    }

    #[test]
    fn wire_sizes_match_types() {
        use crate::api::types::GlobeEvent;
        use crate::renderer::camera::CameraUniform;
        use crate::renderer::instance::{LineVertex, PointInstance};
        assert_eq!(std::mem::size_of::<PointInstance>(), POINT_FLOATS * 4);
        assert_eq!(std::mem::size_of::<LineVertex>(), LINE_VERTEX_FLOATS * 4);
        assert_eq!(std::mem::size_of::<GlobeEvent>(), EVENT_FLOATS * 4);
        assert_eq!(std::mem::size_of::<CameraUniform>() + 16 * 4, CAMERA_FLOATS * 4);
    }
}
