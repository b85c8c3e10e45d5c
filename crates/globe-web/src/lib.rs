pub mod runner;

pub use runner::GlobeRunner;

#[doc(hidden)]
pub use js_sys;

/// Parse an optional JSON config, falling back to defaults on absence or error.
pub fn parse_config(json: Option<String>) -> globe_engine::GlobeConfig {
    match json.as_deref().map(globe_engine::GlobeConfig::from_json) {
        None => globe_engine::GlobeConfig::default(),
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            log::warn!("globe_init: invalid config ({}), using defaults", e);
            globe_engine::GlobeConfig::default()
        }
    }
}

/// Generate all `#[wasm_bindgen]` exports for a globe app.
///
/// This macro generates:
/// - `thread_local!` storage for the GlobeRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (globe_init, globe_tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use globe_engine::*;
///
/// mod feed;
/// use feed::MyFeed;
///
/// globe_web::export_globe!(MyFeed, "my-globe");
/// ```
///
/// # Arguments
///
/// - `$source_type`: The feed type; implements `globe_engine::EventSource` and has `new()`
/// - `$app_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_globe {
    ($source_type:ty, $app_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GlobeRunner<$source_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GlobeRunner<$source_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Globe not initialized. Call globe_init() first.");
                f(runner)
            })
        }

        /// `config_json` may be omitted to use the defaults.
        #[wasm_bindgen]
        pub fn globe_init(config_json: Option<String>) {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let config = $crate::parse_config(config_json);
            let source = <$source_type>::new();
            let runner = $crate::GlobeRunner::new(source, config);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $app_name);
        }

        #[wasm_bindgen]
        pub fn globe_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn globe_shutdown() {
            with_runner(|r| r.shutdown());
        }

        #[wasm_bindgen]
        pub fn globe_orbit_drag(dx: f32, dy: f32) {
            with_runner(|r| r.push_input(InputEvent::OrbitDrag { dx, dy }));
        }

        #[wasm_bindgen]
        pub fn globe_zoom(delta: f32) {
            with_runner(|r| r.push_input(InputEvent::Zoom { delta }));
        }

        #[wasm_bindgen]
        pub fn globe_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn globe_resize(width: f32, height: f32) {
            with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
        }

        #[wasm_bindgen]
        pub fn globe_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn globe_replay(id: f64) -> f64 {
            with_runner(|r| r.replay(id as u64))
        }

        #[wasm_bindgen]
        pub fn globe_toggle_focus() -> bool {
            with_runner(|r| r.toggle_focus())
        }

        // ---- JSON accessors ----

        #[wasm_bindgen]
        pub fn get_popup() -> JsValue {
            let json = with_runner(|r| r.popup_json());
            $crate::js_sys::JSON::parse(&json).unwrap_or(JsValue::NULL)
        }

        #[wasm_bindgen]
        pub fn get_stats() -> JsValue {
            let json = with_runner(|r| r.stats_json());
            $crate::js_sys::JSON::parse(&json).unwrap_or(JsValue::NULL)
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_points_ptr() -> *const f32 {
            with_runner(|r| r.points_ptr())
        }

        #[wasm_bindgen]
        pub fn get_point_count() -> u32 {
            with_runner(|r| r.point_count())
        }

        #[wasm_bindgen]
        pub fn get_additive_split() -> u32 {
            with_runner(|r| r.additive_split())
        }

        #[wasm_bindgen]
        pub fn get_lines_ptr() -> *const f32 {
            with_runner(|r| r.lines_ptr())
        }

        #[wasm_bindgen]
        pub fn get_line_vertex_count() -> u32 {
            with_runner(|r| r.line_vertex_count())
        }

        #[wasm_bindgen]
        pub fn get_lights_ptr() -> *const f32 {
            with_runner(|r| r.lights_ptr())
        }

        #[wasm_bindgen]
        pub fn get_light_count() -> u32 {
            with_runner(|r| r.light_count())
        }

        #[wasm_bindgen]
        pub fn get_globe_events_ptr() -> *const f32 {
            with_runner(|r| r.events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_globe_events_len() -> u32 {
            with_runner(|r| r.events_len())
        }

        #[wasm_bindgen]
        pub fn get_camera_ptr() -> *const f32 {
            with_runner(|r| r.camera_ptr())
        }

        #[wasm_bindgen]
        pub fn get_camera_mode() -> f32 {
            with_runner(|r| r.camera_mode())
        }

        #[wasm_bindgen]
        pub fn get_spin_angle() -> f32 {
            with_runner(|r| r.spin_angle())
        }

        #[wasm_bindgen]
        pub fn get_globe_radius() -> f32 {
            with_runner(|r| r.globe_radius())
        }

        #[wasm_bindgen]
        pub fn get_popup_visible() -> bool {
            with_runner(|r| r.popup_visible())
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_points() -> u32 {
            with_runner(|r| r.max_points())
        }

        #[wasm_bindgen]
        pub fn get_max_line_vertices() -> u32 {
            with_runner(|r| r.max_line_vertices())
        }

        #[wasm_bindgen]
        pub fn get_max_lights() -> u32 {
            with_runner(|r| r.max_lights())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }
    };
}
