use globe_engine::{
    EventSource, FixedTimestep, GlobeConfig, GlobeContext, InputEvent, InputQueue,
    NullRenderer, ProtocolLayout,
};
use globe_engine::bridge::protocol::CAMERA_FLOATS;

/// Generic globe runner that wires an event source to the engine loop.
///
/// Each concrete app (e.g., `attack-map`) creates a `thread_local!` GlobeRunner
/// and exports free functions via `#[wasm_bindgen]`, because wasm-bindgen
/// cannot export generic structs directly.
pub struct GlobeRunner<S: EventSource> {
    source: S,
    ctx: GlobeContext,
    input: InputQueue,
    /// The host draws from the shared buffers, so nothing is drawn here.
    renderer: NullRenderer,
    timestep: FixedTimestep,
    layout: ProtocolLayout,
    /// View-projection (16), eye (4), globe model (16).
    camera_buffer: [f32; CAMERA_FLOATS],
    initialized: bool,
}

impl<S: EventSource> GlobeRunner<S> {
    pub fn new(source: S, config: GlobeConfig) -> Self {
        let ctx = GlobeContext::new(config);
        let timestep = FixedTimestep::new(ctx.config().fixed_dt);
        let layout = ProtocolLayout::from_config(ctx.config());

        Self {
            source,
            ctx,
            input: InputQueue::new(),
            renderer: NullRenderer::default(),
            timestep,
            layout,
            camera_buffer: [0.0; CAMERA_FLOATS],
            initialized: false,
        }
    }

    /// Initialize the runner. Call once after construction.
    pub fn init(&mut self) {
        self.ctx.pump(&mut self.source);
        self.write_camera();
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one host frame: apply input, then step the engine at the fixed rate.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Notifications from the previous host frame were read already
        self.ctx.clear_frame_data();

        for event in self.input.drain() {
            self.ctx.apply_input(event);
        }

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.ctx.pump(&mut self.source);
            self.ctx.tick(self.timestep.dt(), &mut self.renderer);
        }

        self.write_camera();
    }

    fn write_camera(&mut self) {
        let camera = self.ctx.camera();
        let view_projection = camera.view_projection().to_cols_array();
        let eye = camera.uniform().eye;
        let model = self.ctx.spin().model_matrix().to_cols_array();
        self.camera_buffer[..16].copy_from_slice(&view_projection);
        self.camera_buffer[16..20].copy_from_slice(&eye);
        self.camera_buffer[20..].copy_from_slice(&model);
    }

    pub fn context(&self) -> &GlobeContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut GlobeContext {
        &mut self.ctx
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Re-run a recent attack. Returns the new id, or 0 when unknown.
    pub fn replay(&mut self, id: u64) -> f64 {
        self.ctx
            .replay(globe_engine::AttackId(id))
            .map_or(0.0, |new_id| new_id.0 as f64)
    }

    /// Toggle region focus on the default region.
    pub fn toggle_focus(&mut self) -> bool {
        self.ctx.toggle_region_focus(None)
    }

    pub fn popup_json(&self) -> String {
        self.ctx.popup().to_json()
    }

    pub fn stats_json(&self) -> String {
        serde_json::to_string(self.ctx.stats()).unwrap_or_else(|e| {
            log::warn!("stats_json: {}", e);
            "{}".to_string()
        })
    }

    /// Stop the engine. The runner stays allocated but ticks become no-ops.
    pub fn shutdown(&mut self) {
        self.ctx.shutdown();
        self.initialized = false;
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn points_ptr(&self) -> *const f32 {
        self.ctx.render_buffer().points_ptr()
    }

    pub fn point_count(&self) -> u32 {
        self.ctx.render_buffer().point_count()
    }

    pub fn additive_split(&self) -> u32 {
        self.ctx.render_buffer().additive_split
    }

    pub fn lines_ptr(&self) -> *const f32 {
        self.ctx.render_buffer().lines_ptr()
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.ctx.render_buffer().line_vertex_count()
    }

    pub fn lights_ptr(&self) -> *const f32 {
        self.ctx.lights().buffer_ptr()
    }

    pub fn light_count(&self) -> u32 {
        self.ctx.lights().count() as u32
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.ctx.events().as_ptr() as *const f32
    }

    pub fn events_len(&self) -> u32 {
        self.ctx.events().len() as u32
    }

    pub fn camera_ptr(&self) -> *const f32 {
        self.camera_buffer.as_ptr()
    }

    pub fn camera_mode(&self) -> f32 {
        self.ctx.camera().mode.code()
    }

    pub fn spin_angle(&self) -> f32 {
        self.ctx.spin().angle()
    }

    pub fn globe_radius(&self) -> f32 {
        self.ctx.config().globe.radius
    }

    pub fn popup_visible(&self) -> bool {
        self.ctx.popup().visible
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_points(&self) -> u32 {
        self.layout.max_points as u32
    }

    pub fn max_line_vertices(&self) -> u32 {
        self.layout.max_line_vertices as u32
    }

    pub fn max_lights(&self) -> u32 {
        self.layout.max_lights as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use globe_engine::{
        AttackCategory, AttackEvent, AttackId, Endpoint, GlobeEvent, StatsSnapshot,
    };
    use globe_engine::input::queue::KEY_DEBUG;

    /// Emits one intense attack on the first poll.
    struct OneShot {
        fired: bool,
    }

    impl EventSource for OneShot {
        fn poll(&mut self, _now: f64) -> Vec<AttackEvent> {
            if self.fired {
                return Vec::new();
            }
            self.fired = true;
            vec![AttackEvent::new(
                AttackId(1),
                Endpoint::new("BR", -14.235, -51.9253),
                Endpoint::new("JP", 36.2048, 138.2529),
                AttackCategory::Ransomware,
                9,
                0.0,
            )]
        }

        fn stats(&self, _limit: usize) -> StatsSnapshot {
            StatsSnapshot::default()
        }
    }

    fn runner() -> GlobeRunner<OneShot> {
        let mut r = GlobeRunner::new(OneShot { fired: false }, GlobeConfig::default());
        r.init();
        r
    }

    #[test]
    fn tick_before_init_is_noop() {
        let mut r = GlobeRunner::new(OneShot { fired: false }, GlobeConfig::default());
        r.tick(0.1);
        assert_eq!(r.context().frame(), 0);
    }

    #[test]
    fn host_frame_runs_fixed_steps() {
        let mut r = runner();
        assert_eq!(r.context().visuals().len(), 1);
        r.tick(1.0 / 30.0);
        assert_eq!(r.context().frame(), 2);
        assert!(r.point_count() > 0);
        assert!(r.additive_split() <= r.point_count());
        assert_eq!(r.camera_mode(), 1.0);
    }

    #[test]
    fn events_cleared_each_host_frame() {
        let mut r = runner();
        r.push_input(InputEvent::KeyDown { key_code: KEY_DEBUG });
        r.tick(1.0 / 60.0);
        let events = r.context().events();
        assert_eq!(r.events_len() as usize, events.len());
        assert!(events.iter().any(|e| e.kind == GlobeEvent::DEBUG));
        r.tick(1.0 / 60.0);
        let debug = r.context().events().iter().filter(|e| e.kind == GlobeEvent::DEBUG).count();
        assert_eq!(debug, 1);
    }

    #[test]
    fn camera_buffer_tracks_spin() {
        let mut r = runner();
        r.tick(1.0);
        let model = r.context().spin().model_matrix().to_cols_array();
        let buffer = unsafe { std::slice::from_raw_parts(r.camera_ptr(), CAMERA_FLOATS) };
        assert_eq!(&buffer[20..36], &model[..]);
        assert_eq!(buffer[19], 1.0);
    }

    #[test]
    fn popup_json_mentions_attack() {
        let r = runner();
        assert!(r.popup_visible());
        let json = r.popup_json();
        assert!(json.contains("\"visible\":true"));
        assert!(json.contains("Ransomware"));
    }

    #[test]
    fn replay_and_shutdown() {
        let mut r = runner();
        assert_eq!(r.replay(1), globe_engine::REPLAY_ID_BASE as f64);
        assert_eq!(r.replay(77), 0.0);
        r.shutdown();
        r.tick(0.5);
        assert!(r.context().is_shut_down());
        assert_eq!(r.point_count(), 0);
    }
}
