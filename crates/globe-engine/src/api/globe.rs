//! The frame driver: owns every piece of mutable globe state and advances it
//! in a fixed order once per tick.
//!
//! ```text
//! tick(dt):  spin → visuals (expire) → choreographer → popup → render → timers
//! ```

use std::collections::VecDeque;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::api::config::GlobeConfig;
use crate::api::types::{AttackEvent, AttackId, GlobeEvent, StatsSnapshot};
use crate::core::geo::GeoCoord;
use crate::core::registry::VisualRegistry;
use crate::core::schedule::{TaskAction, TaskKey, TaskScheduler};
use crate::core::spin::GlobeSpin;
use crate::input::queue::{InputEvent, CUSTOM_TOGGLE_FOCUS, KEY_DEBUG};
use crate::renderer::camera::{CameraMode, CameraState};
use crate::renderer::instance::RenderBuffer;
use crate::renderer::traits::{DrawTiming, FrameData, Renderer};
use crate::systems::arc::ArcBuilder;
use crate::systems::attack::{AttackVisual, VisualPhase};
use crate::systems::choreographer::Choreographer;
use crate::systems::lighting::LightState;
use crate::systems::popup::PopupState;
use crate::systems::render::build_frame;

/// First id handed to replayed events. Live feeds count up from 1, and ids
/// stay exactly representable in the f32 event payload below 2^24.
pub const REPLAY_ID_BASE: u64 = 1 << 23;

/// Where attack events and display statistics come from.
pub trait EventSource {
    /// Events that became available up to `now` (engine clock, seconds).
    fn poll(&mut self, now: f64) -> Vec<AttackEvent>;

    /// Current statistics, countries cut to `limit`.
    fn stats(&self, limit: usize) -> StatsSnapshot;
}

/// All globe state, advanced by [`GlobeContext::tick`].
pub struct GlobeContext {
    config: GlobeConfig,
    spin: GlobeSpin,
    visuals: VisualRegistry,
    choreographer: Choreographer,
    camera: CameraState,
    popup: PopupState,
    scheduler: TaskScheduler,
    rng: ChaCha8Rng,
    arcs: ArcBuilder,
    render_buffer: RenderBuffer,
    lights: LightState,
    events: Vec<GlobeEvent>,
    history: VecDeque<AttackEvent>,
    stats: StatsSnapshot,
    stats_due: bool,
    reported_mode: CameraMode,
    clock: f64,
    frame: u64,
    next_replay_id: u64,
    debug: bool,
    shut_down: bool,
}

impl GlobeContext {
    pub fn new(config: GlobeConfig) -> Self {
        let config = config.sanitized();
        let radius = config.globe.radius;
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule_repeating(TaskKey::StatsRefresh, config.stats.refresh_interval, TaskAction::RefreshStats);

        log::info!(
            "GlobeContext: radius {}, zoom threshold {}, seed {}",
            radius,
            config.camera.zoom_threshold,
            config.rng_seed
        );

        Self {
            spin: GlobeSpin::new(config.globe.rotation_speed),
            visuals: VisualRegistry::with_capacity(64),
            choreographer: Choreographer::new(&config.camera, radius),
            camera: CameraState::new(&config.camera),
            popup: PopupState::new(),
            scheduler,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            arcs: ArcBuilder::new(radius, &config.arcs),
            render_buffer: RenderBuffer::with_capacity(config.buffers.max_points, config.buffers.max_line_vertices),
            lights: LightState::with_capacity(config.buffers.max_lights),
            events: Vec::with_capacity(config.buffers.max_events),
            history: VecDeque::with_capacity(config.attacks.history_len),
            stats: StatsSnapshot::default(),
            stats_due: true,
            reported_mode: CameraMode::Manual,
            clock: 0.0,
            frame: 0,
            next_replay_id: REPLAY_ID_BASE,
            debug: false,
            shut_down: false,
            config,
        }
    }

    // ---- Event intake ----

    /// Drain new events from `source` and accept them. Also pulls statistics
    /// when a refresh is due.
    pub fn pump<S: EventSource + ?Sized>(&mut self, source: &mut S) {
        if self.shut_down {
            return;
        }
        for event in source.poll(self.clock) {
            self.accept_event(event);
        }
        if self.stats_due {
            self.refresh_stats(source);
        }
    }

    /// Build and register the visual for `event`. Qualifying events also
    /// raise the popup and are offered to the choreographer.
    /// Returns false when the event was refused (duplicate id, after shutdown).
    pub fn accept_event(&mut self, event: AttackEvent) -> bool {
        if self.shut_down {
            return false;
        }
        if self.visuals.contains(event.id) {
            log::warn!("accept_event: {} is already active, ignored", event.id);
            return false;
        }

        let source = GeoCoord::new(event.source.latitude, event.source.longitude);
        let target = GeoCoord::new(event.target.latitude, event.target.longitude);
        let plan = self.arcs.build(source, target, event.intensity, &event.category);
        let curve = plan.curve;
        let visual = AttackVisual::new(event.clone(), plan, &self.config.arcs, &self.config.attacks, &mut self.rng);
        if let Err(visual) = self.visuals.insert(visual) {
            log::warn!("accept_event: registry refused {}", visual.id());
            return false;
        }
        log::debug!(
            "accepted {} {} {} -> {} (intensity {})",
            event.id,
            event.category,
            event.source.country_code,
            event.target.country_code,
            event.intensity
        );

        if event.intensity >= self.config.popup.threshold {
            self.show_popup(&event);
        }
        self.choreographer.offer(&event, &curve, self.clock, &mut self.camera);
        self.report_camera_mode();
        self.remember(event);
        true
    }

    /// Replay a recent event by id. Returns the id of the new visual.
    pub fn replay(&mut self, id: AttackId) -> Option<AttackId> {
        let Some(event) = self.history.iter().find(|e| e.id == id).cloned() else {
            log::warn!("replay: {} is not in the recent history", id);
            return None;
        };
        self.replay_event(&event)
    }

    /// Re-run `event` as a live event under a fresh id and the current clock.
    pub fn replay_event(&mut self, event: &AttackEvent) -> Option<AttackId> {
        let id = AttackId(self.next_replay_id);
        self.next_replay_id += 1;
        log::debug!("replaying {} as {}", event.id, id);
        self.accept_event(event.reissued(id, self.clock)).then_some(id)
    }

    /// Toggle region focus. `None` uses the configured default region.
    pub fn toggle_region_focus(&mut self, region: Option<GeoCoord>) -> bool {
        let on = self.choreographer.toggle_region_focus(region, &mut self.camera);
        self.report_camera_mode();
        on
    }

    /// Apply one host input event.
    pub fn apply_input(&mut self, input: InputEvent) {
        match input {
            InputEvent::OrbitDrag { dx, dy } => {
                let height = self.camera.viewport.y;
                self.camera.orbit.drag(dx, dy, height);
            }
            InputEvent::Zoom { delta } => self.camera.orbit.zoom(delta),
            InputEvent::KeyDown { key_code } if key_code == KEY_DEBUG => {
                self.debug = !self.debug;
                log::info!(
                    "debug {}: {} visuals, phase {:?}, camera {:?}",
                    if self.debug { "on" } else { "off" },
                    self.visuals.len(),
                    self.choreographer.phase().code(),
                    self.camera.mode
                );
            }
            InputEvent::KeyDown { .. } => {}
            InputEvent::Resize { width, height } => self.camera.resize(width, height),
            InputEvent::Custom { kind, a, b, c } if kind == CUSTOM_TOGGLE_FOCUS => {
                let region = (c != 0.0).then(|| GeoCoord::new(a, b));
                self.toggle_region_focus(region);
            }
            InputEvent::Custom { kind, .. } => log::debug!("apply_input: unknown custom kind {}", kind),
        }
    }

    // ---- Frame ----

    /// Advance every subsystem by `dt` seconds and draw.
    pub fn tick(&mut self, dt: f32, renderer: &mut dyn Renderer) -> DrawTiming {
        if self.shut_down {
            return DrawTiming::default();
        }
        self.clock += dt as f64;
        self.frame += 1;

        self.spin.advance(dt);

        let mut expired = Vec::new();
        let mut impacts = Vec::new();
        for visual in self.visuals.iter_mut() {
            match visual.update(dt, &self.config.impact, &mut self.rng) {
                Some(VisualPhase::Completed) => impacts.push((visual.id(), visual.event.intensity)),
                Some(VisualPhase::Expired) => expired.push(visual.id()),
                _ => {}
            }
        }
        for (id, intensity) in impacts {
            self.emit(GlobeEvent::new(GlobeEvent::IMPACT, id.0 as f32, intensity as f32, 0.0));
        }
        for id in expired {
            if self.visuals.remove(id).is_some() {
                log::debug!("{} expired", id);
                self.emit(GlobeEvent::new(GlobeEvent::EXPIRED, id.0 as f32, 0.0, 0.0));
            }
        }

        self.choreographer.update(dt, &mut self.camera, &self.spin, &self.visuals);
        self.camera.update_manual();
        self.report_camera_mode();

        self.popup.project(&self.camera, &self.spin);

        build_frame(&self.visuals, &mut self.render_buffer, &mut self.lights);
        let timing = renderer.draw(&FrameData {
            points: &self.render_buffer.points,
            additive_split: self.render_buffer.additive_split,
            lines: &self.render_buffer.lines,
            lights: self.lights.as_slice(),
            camera: self.camera.uniform(),
            globe_model: self.spin.model_matrix().to_cols_array_2d(),
            globe_radius: self.config.globe.radius,
            frame: self.frame,
        });

        for action in self.scheduler.advance(dt) {
            self.run_task(action);
        }

        if self.debug {
            self.emit(GlobeEvent::new(
                GlobeEvent::DEBUG,
                self.visuals.len() as f32,
                self.choreographer.phase().code(),
                self.spin.angle(),
            ));
        }
        timing
    }

    /// Tear everything down. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.visuals.clear();
        self.scheduler.clear();
        self.choreographer.reset(&mut self.camera);
        self.popup.clear();
        self.history.clear();
        self.events.clear();
        self.render_buffer.clear();
        self.lights.clear();
        self.shut_down = true;
        log::info!("GlobeContext: shut down after {} frames", self.frame);
    }

    // ---- Notifications ----

    /// Take every pending notification.
    pub fn drain_events(&mut self) -> Vec<GlobeEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GlobeEvent] {
        &self.events
    }

    /// Drop notifications already read through [`events`](Self::events).
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }

    fn emit(&mut self, event: GlobeEvent) {
        if self.events.len() < self.config.buffers.max_events {
            self.events.push(event);
        } else {
            log::debug!("event buffer full, dropped kind {}", event.kind);
        }
    }

    fn report_camera_mode(&mut self) {
        if self.camera.mode != self.reported_mode {
            self.reported_mode = self.camera.mode;
            self.emit(GlobeEvent::new(GlobeEvent::CAMERA_MODE, self.camera.mode.code(), 0.0, 0.0));
        }
    }

    // ---- Popup, stats, timers ----

    fn show_popup(&mut self, event: &AttackEvent) {
        if let Some(previous) = self.popup.current() {
            self.scheduler.cancel_key(TaskKey::Popup(previous));
        }
        self.popup.show(event, self.config.globe.radius);
        self.scheduler.schedule(
            TaskKey::Popup(event.id),
            self.config.popup.duration,
            TaskAction::DismissPopup(event.id),
        );
        self.emit(GlobeEvent::new(GlobeEvent::POPUP_SHOWN, event.id.0 as f32, event.intensity as f32, 0.0));
    }

    fn run_task(&mut self, action: TaskAction) {
        match action {
            TaskAction::DismissPopup(id) => {
                if self.popup.dismiss(id) {
                    self.emit(GlobeEvent::new(GlobeEvent::POPUP_HIDDEN, id.0 as f32, 0.0, 0.0));
                } else {
                    log::debug!("popup timer for {} is stale", id);
                }
            }
            TaskAction::RefreshStats => self.stats_due = true,
        }
    }

    /// Pull a fresh statistics snapshot from `source`.
    pub fn refresh_stats<S: EventSource + ?Sized>(&mut self, source: &S) {
        let limit = self.config.stats.top_n;
        self.stats = source.stats(limit).ranked(limit);
        self.stats_due = false;
        let ranked = self.stats.top_countries.len() as f32;
        self.emit(GlobeEvent::new(GlobeEvent::STATS_UPDATED, ranked, 0.0, 0.0));
    }

    fn remember(&mut self, event: AttackEvent) {
        let cap = self.config.attacks.history_len;
        if cap == 0 {
            return;
        }
        while self.history.len() >= cap {
            self.history.pop_front();
        }
        self.history.push_back(event);
    }

    // ---- Accessors ----

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn spin(&self) -> &GlobeSpin {
        &self.spin
    }

    pub fn visuals(&self) -> &VisualRegistry {
        &self.visuals
    }

    pub fn choreographer(&self) -> &Choreographer {
        &self.choreographer
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn popup(&self) -> &PopupState {
        &self.popup
    }

    pub fn stats(&self) -> &StatsSnapshot {
        &self.stats
    }

    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.render_buffer
    }

    pub fn lights(&self) -> &LightState {
        &self.lights
    }

    /// Recent accepted events, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &AttackEvent> {
        self.history.iter()
    }

    /// Engine clock in seconds.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}
