//! Camera choreographer: a single-slot zoom queue plus the state machine that
//! takes the camera from manual orbit to an attack, tracks it, and eases back.
//!
//! ```text
//!   Idle ──qualifying event──▶ PendingTransition ──▶ ActiveTracking
//!    ▲                              │  pre-empt / guard      │ done / expired
//!    │                              ▼                        ▼
//!    └──────(slot empty)────── Resetting ◀───────────────────┘
//!                                   │ (slot holds item or focus)
//!                                   ▼
//!                    PendingTransition / RegionFocus
//! ```
//!
//! Viewpoints and region anchors are stored in the globe frame and passed
//! through the spin every frame, so a tracked arc stays framed while the
//! globe turns underneath it.

use glam::Vec3;
use crate::api::config::CameraSection;
use crate::api::types::{AttackEvent, AttackId};
use crate::core::geo::{self, GeoCoord};
use crate::core::spin::GlobeSpin;
use crate::core::registry::VisualRegistry;
use crate::extensions::{ease_vec3, lerp_vec3, two_segment, Easing, Tween};
use crate::renderer::camera::{CameraMode, CameraState};
use crate::systems::arc::ArcCurve;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomState {
    Pending,
    Active,
    Completed,
}

/// A request to fly to and follow one attack.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomQueueItem {
    pub target: AttackId,
    /// Start, mid and end viewpoints in the globe frame.
    pub viewpoints: [Vec3; 3],
    /// Engine clock when the item was created.
    pub start_time: f64,
    /// Tracking duration in seconds.
    pub duration: f32,
    pub state: ZoomState,
    pub follow_progress: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChoreoPhase {
    Idle,
    PendingTransition {
        item: ZoomQueueItem,
        tween: Tween,
    },
    ActiveTracking {
        item: ZoomQueueItem,
        elapsed: f32,
    },
    Resetting {
        tween: Tween,
        waypoint: Vec3,
    },
    RegionFocus {
        region: GeoCoord,
        entry: Tween,
    },
}

impl ChoreoPhase {
    /// Numeric code for debug payloads.
    pub fn code(&self) -> f32 {
        match self {
            ChoreoPhase::Idle => 0.0,
            ChoreoPhase::PendingTransition { .. } => 1.0,
            ChoreoPhase::ActiveTracking { .. } => 2.0,
            ChoreoPhase::Resetting { .. } => 3.0,
            ChoreoPhase::RegionFocus { .. } => 4.0,
        }
    }
}

/// What waits in the slot while a reset plays out.
#[derive(Debug, Clone, PartialEq)]
enum Waiting {
    Zoom(ZoomQueueItem),
    Focus(GeoCoord),
}

/// Transition decided while the phase is borrowed, applied afterwards.
enum Step {
    Stay,
    Track,
    Reset,
    Finish,
}

pub struct Choreographer {
    phase: ChoreoPhase,
    next: Option<Waiting>,
    cfg: CameraSection,
    radius: f32,
    last_completed: Option<ZoomQueueItem>,
    resets_started: u32,
}

impl Choreographer {
    pub fn new(cfg: &CameraSection, radius: f32) -> Self {
        Self {
            phase: ChoreoPhase::Idle,
            next: None,
            cfg: cfg.clone(),
            radius,
            last_completed: None,
            resets_started: 0,
        }
    }

    pub fn phase(&self) -> &ChoreoPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == ChoreoPhase::Idle
    }

    pub fn is_focusing(&self) -> bool {
        matches!(self.phase, ChoreoPhase::RegionFocus { .. })
    }

    /// The item currently pending or being tracked.
    pub fn current_item(&self) -> Option<&ZoomQueueItem> {
        match &self.phase {
            ChoreoPhase::PendingTransition { item, .. } | ChoreoPhase::ActiveTracking { item, .. } => Some(item),
            _ => None,
        }
    }

    /// Target of the item waiting for the current reset to finish.
    pub fn waiting_target(&self) -> Option<AttackId> {
        match &self.next {
            Some(Waiting::Zoom(item)) => Some(item.target),
            _ => None,
        }
    }

    pub fn focus_requested(&self) -> bool {
        matches!(self.next, Some(Waiting::Focus(_)))
    }

    /// The most recent item forced or run to completion.
    pub fn last_completed(&self) -> Option<&ZoomQueueItem> {
        self.last_completed.as_ref()
    }

    /// Number of reset phases started since construction.
    pub fn resets_started(&self) -> u32 {
        self.resets_started
    }

    /// Build the queue item for an accepted event and its curve.
    fn make_item(&self, event: &AttackEvent, curve: &ArcCurve, now: f64) -> ZoomQueueItem {
        let cfg = &self.cfg;
        let lift = |p: Vec3| {
            let dir = p.normalize_or_zero();
            dir * cfg.view_distance.max(p.length() + cfg.view_clearance)
        };
        ZoomQueueItem {
            target: event.id,
            viewpoints: [lift(curve.start), lift(curve.point_at(0.5)), lift(curve.end)],
            start_time: now,
            duration: cfg.tracking_duration,
            state: ZoomState::Pending,
            follow_progress: 0.0,
        }
    }

    /// Offer a newly accepted event. Returns whether it qualified for a zoom.
    /// Below-threshold events leave the camera untouched.
    pub fn offer(&mut self, event: &AttackEvent, curve: &ArcCurve, now: f64, camera: &mut CameraState) -> bool {
        if event.intensity < self.cfg.zoom_threshold {
            return false;
        }
        let item = self.make_item(event, curve, now);

        match &self.phase {
            ChoreoPhase::Idle => self.start_pending(item, camera),
            ChoreoPhase::RegionFocus { .. } => {
                log::info!("choreographer: region focus cancelled by {}", event.id);
                self.start_pending(item, camera);
            }
            ChoreoPhase::PendingTransition { .. } | ChoreoPhase::ActiveTracking { .. } => {
                log::debug!("choreographer: {} pre-empts current zoom", event.id);
                self.complete_current();
                self.next = Some(Waiting::Zoom(item));
                self.begin_reset(camera);
            }
            ChoreoPhase::Resetting { .. } => {
                // Single slot: the newest request replaces whatever was waiting.
                self.next = Some(Waiting::Zoom(item));
            }
        }
        true
    }

    /// Toggle region focus. `None` uses the configured default region.
    /// Returns whether focus is active or requested afterwards.
    pub fn toggle_region_focus(&mut self, region: Option<GeoCoord>, camera: &mut CameraState) -> bool {
        let region = region.unwrap_or(self.cfg.focus_region);
        match &self.phase {
            ChoreoPhase::RegionFocus { .. } => {
                log::info!("choreographer: region focus off");
                self.next = None;
                self.begin_reset(camera);
                false
            }
            ChoreoPhase::PendingTransition { .. } | ChoreoPhase::ActiveTracking { .. } => {
                log::info!("choreographer: region focus requested, ending zoom first");
                self.complete_current();
                self.next = Some(Waiting::Focus(region));
                self.begin_reset(camera);
                true
            }
            ChoreoPhase::Resetting { .. } => {
                if self.focus_requested() {
                    self.next = None;
                    false
                } else {
                    self.next = Some(Waiting::Focus(region));
                    true
                }
            }
            ChoreoPhase::Idle => {
                log::info!("choreographer: region focus on ({:.1}, {:.1})", region.lat, region.lng);
                self.start_focus(region, camera);
                true
            }
        }
    }

    /// Advance the active phase by `dt` and write the camera pose.
    pub fn update(&mut self, dt: f32, camera: &mut CameraState, spin: &GlobeSpin, visuals: &VisualRegistry) {
        let step = match &mut self.phase {
            ChoreoPhase::Idle => Step::Stay,

            ChoreoPhase::PendingTransition { item, tween } => match visuals.get(item.target) {
                None => {
                    log::warn!("choreographer: {} vanished before tracking", item.target);
                    Step::Reset
                }
                Some(visual) => {
                    let k = tween.advance(dt);
                    let to = spin.compensate(item.viewpoints[0]);
                    let waypoint = detour(camera.saved_position, to);
                    camera.position = two_segment(camera.saved_position, waypoint, to, k);
                    camera.look_at = lerp_vec3(camera.saved_look_at, spin.compensate(visual.curve.start), k);
                    if tween.is_complete() { Step::Track } else { Step::Stay }
                }
            },

            ChoreoPhase::ActiveTracking { item, elapsed } => match visuals.get(item.target) {
                None => {
                    log::debug!("choreographer: tracked {} expired", item.target);
                    Step::Reset
                }
                Some(visual) => {
                    *elapsed += dt;
                    // The envelope starts at zero, so tracking picks up at the
                    // start viewpoint where the fly-in left the camera.
                    let envelope = self.cfg.tracking_easing.apply(*elapsed / item.duration);
                    let follow = (visual.leading_progress() * envelope).clamp(0.0, 1.0);
                    item.follow_progress = follow;
                    let [v0, v1, v2] = item.viewpoints;
                    let pos = if follow < 0.5 {
                        lerp_vec3(v0, v1, follow * 2.0)
                    } else {
                        lerp_vec3(v1, v2, (follow - 0.5) * 2.0)
                    };
                    camera.position = spin.compensate(pos);
                    camera.look_at = spin.compensate(visual.curve.point_at(follow));
                    // Landed particles only end tracking once the camera has
                    // followed them to the end of the arc.
                    if *elapsed >= item.duration || (visual.particles_landed() && follow >= 1.0) {
                        Step::Reset
                    } else {
                        Step::Stay
                    }
                }
            },

            ChoreoPhase::Resetting { tween, waypoint } => {
                tween.advance(dt);
                let first = tween.window(0.0, 0.5);
                camera.position = if tween.progress() < 0.5 {
                    ease_vec3(camera.saved_position, *waypoint, first, self.cfg.reset_outbound_easing)
                } else {
                    ease_vec3(*waypoint, camera.default_position, tween.window(0.5, 1.0), self.cfg.reset_inbound_easing)
                };
                camera.look_at = ease_vec3(camera.saved_look_at, camera.default_look_at, tween.progress(), self.cfg.reset_look_easing);
                if tween.is_complete() { Step::Finish } else { Step::Stay }
            }

            ChoreoPhase::RegionFocus { region, entry } => {
                let anchor = geo::to_sphere(*region, self.radius);
                let focus = spin.compensate(anchor);
                let eye = spin.compensate(anchor.normalize_or_zero() * self.cfg.focus_distance);
                if entry.is_complete() {
                    camera.set_pose(eye, focus);
                } else {
                    let k = entry.advance(dt);
                    camera.position = lerp_vec3(camera.saved_position, eye, k);
                    camera.look_at = lerp_vec3(camera.saved_look_at, focus, k);
                }
                Step::Stay
            }
        };

        match step {
            Step::Stay => {}
            Step::Track => {
                let phase = std::mem::replace(&mut self.phase, ChoreoPhase::Idle);
                if let ChoreoPhase::PendingTransition { mut item, .. } = phase {
                    item.state = ZoomState::Active;
                    log::debug!("choreographer: tracking {}", item.target);
                    self.phase = ChoreoPhase::ActiveTracking { item, elapsed: 0.0 };
                }
            }
            Step::Reset => {
                self.complete_current();
                self.begin_reset(camera);
            }
            Step::Finish => self.finish_reset(camera),
        }
    }

    /// Drop everything and hand the camera back. Used on teardown.
    pub fn reset(&mut self, camera: &mut CameraState) {
        self.phase = ChoreoPhase::Idle;
        self.next = None;
        camera.restore_manual();
    }

    fn start_pending(&mut self, item: ZoomQueueItem, camera: &mut CameraState) {
        log::debug!("choreographer: zooming to {}", item.target);
        camera.snapshot();
        camera.disable_manual();
        camera.mode = CameraMode::Zooming;
        self.phase = ChoreoPhase::PendingTransition {
            item,
            tween: Tween::new(self.cfg.pending_duration, self.cfg.pending_easing),
        };
    }

    fn start_focus(&mut self, region: GeoCoord, camera: &mut CameraState) {
        camera.snapshot();
        camera.disable_manual();
        camera.mode = CameraMode::RegionFocus;
        self.phase = ChoreoPhase::RegionFocus {
            region,
            entry: Tween::new(self.cfg.focus_duration, self.cfg.focus_easing),
        };
    }

    /// Force the current item (if any) to Completed and remember it.
    fn complete_current(&mut self) {
        let phase = std::mem::replace(&mut self.phase, ChoreoPhase::Idle);
        match phase {
            ChoreoPhase::PendingTransition { mut item, .. } | ChoreoPhase::ActiveTracking { mut item, .. } => {
                item.state = ZoomState::Completed;
                self.last_completed = Some(item);
            }
            other => self.phase = other,
        }
    }

    fn begin_reset(&mut self, camera: &mut CameraState) {
        camera.snapshot();
        camera.disable_manual();
        camera.mode = CameraMode::Resetting;
        let waypoint = reset_waypoint(camera.position, camera.default_position);
        self.resets_started += 1;
        self.phase = ChoreoPhase::Resetting {
            tween: Tween::new(self.cfg.reset_duration, Easing::Linear),
            waypoint,
        };
    }

    fn finish_reset(&mut self, camera: &mut CameraState) {
        camera.restore_manual();
        self.phase = ChoreoPhase::Idle;
        match self.next.take() {
            Some(Waiting::Zoom(item)) => self.start_pending(item, camera),
            Some(Waiting::Focus(region)) => {
                log::info!("choreographer: region focus on ({:.1}, {:.1})", region.lat, region.lng);
                self.start_focus(region, camera);
            }
            None => log::debug!("choreographer: manual control restored"),
        }
    }
}

/// Raised, laterally offset midpoint for the fly-in path.
fn detour(from: Vec3, to: Vec3) -> Vec3 {
    let mid = (from + to) * 0.5;
    let dist = from.distance(to);
    let sum = from.normalize_or_zero() + to.normalize_or_zero();
    let up = if sum.length_squared() > 1e-6 {
        sum.normalize()
    } else {
        // Opposite sides of the globe: go around, not through.
        from.normalize_or(Vec3::Z).any_orthonormal_vector()
    };
    let side = (to - from).cross(up).normalize_or(up.any_orthonormal_vector());
    let height = (mid.length() + 0.25 * dist).max(from.length().max(to.length()));
    up * height + side * (0.15 * dist)
}

/// Waypoint for the reset path: on the bisector of both directions at
/// 1.2x the larger radius, or on a perpendicular when they are opposite.
pub fn reset_waypoint(current: Vec3, default: Vec3) -> Vec3 {
    let r = 1.2 * current.length().max(default.length());
    let (a, b) = (current.normalize_or_zero(), default.normalize_or_zero());
    let bisector = a + b;
    let dir = if bisector.length_squared() > 1e-6 {
        bisector.normalize()
    } else if a != Vec3::ZERO {
        let up = a.cross(Vec3::Y);
        if up.length_squared() > 1e-6 { up.normalize() } else { a.any_orthonormal_vector() }
    } else {
        Vec3::Y
    };
    dir * r
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use crate::api::config::{ArcSection, AttackSection, ImpactSection};
    use crate::api::types::{AttackCategory, Endpoint};
    use crate::systems::arc::ArcBuilder;
    use crate::systems::attack::{AttackVisual, VisualPhase};

    const DT: f32 = 1.0 / 60.0;

    struct Rig {
        choreo: Choreographer,
        camera: CameraState,
        spin: GlobeSpin,
        visuals: VisualRegistry,
        rng: ChaCha8Rng,
    }

    impl Rig {
        fn new() -> Self {
            Self::with_camera(CameraSection::default())
        }

        fn with_camera(cfg: CameraSection) -> Self {
            Self {
                choreo: Choreographer::new(&cfg, 100.0),
                camera: CameraState::new(&cfg),
                spin: GlobeSpin::new(0.03),
                visuals: VisualRegistry::new(),
                rng: ChaCha8Rng::seed_from_u64(5),
            }
        }

        fn spawn(&mut self, id: u64, intensity: u8) -> bool {
            let event = AttackEvent::new(
                AttackId(id),
                Endpoint::new("US", 37.09, -95.71),
                Endpoint::new("IT", 41.87, 12.56),
                AttackCategory::Ransomware,
                intensity,
                0.0,
            );
            let arcs = ArcSection::default();
            let plan = ArcBuilder::new(100.0, &arcs).build(
                GeoCoord::new(37.09, -95.71),
                GeoCoord::new(41.87, 12.56),
                intensity,
                &event.category,
            );
            let curve = plan.curve;
            let visual = AttackVisual::new(event.clone(), plan, &arcs, &AttackSection::default(), &mut self.rng);
            self.visuals.insert(visual).unwrap();
            self.choreo.offer(&event, &curve, 0.0, &mut self.camera)
        }

        /// Same order as a context tick: spin, visuals, then the camera.
        fn run(&mut self, seconds: f32) {
            let steps = (seconds / DT).round() as usize;
            let impact = ImpactSection::default();
            for _ in 0..steps {
                self.spin.advance(DT);
                let mut expired = Vec::new();
                for v in self.visuals.iter_mut() {
                    if v.update(DT, &impact, &mut self.rng) == Some(VisualPhase::Expired) {
                        expired.push(v.event.id);
                    }
                }
                for id in expired {
                    self.visuals.remove(id);
                }
                self.choreo.update(DT, &mut self.camera, &self.spin, &self.visuals);
            }
        }
    }

    #[test]
    fn below_threshold_leaves_camera_alone() {
        let mut rig = Rig::new();
        let before = (rig.camera.position, rig.camera.look_at, rig.camera.mode);
        assert!(!rig.spawn(1, 7));
        rig.run(1.0);
        assert!(rig.choreo.is_idle());
        assert_eq!((rig.camera.position, rig.camera.look_at, rig.camera.mode), before);
        assert!(rig.camera.orbit.enabled);
    }

    #[test]
    fn qualifying_event_runs_full_cycle() {
        let mut rig = Rig::new();
        assert!(rig.spawn(1, 9));
        assert_eq!(rig.camera.mode, CameraMode::Zooming);
        assert!(!rig.camera.orbit.enabled);

        rig.run(1.6);
        assert!(matches!(rig.choreo.phase(), ChoreoPhase::ActiveTracking { .. }));

        // Tracking runs until the arc expires, then the reset plays out.
        rig.run(12.0);
        assert!(rig.choreo.is_idle());
        assert_eq!(rig.camera.mode, CameraMode::Manual);
        assert_eq!(rig.camera.position, rig.camera.default_position);
        assert!(rig.camera.orbit.enabled);
        assert_eq!(rig.choreo.resets_started(), 1);
        assert_eq!(rig.choreo.last_completed().map(|i| i.state), Some(ZoomState::Completed));
    }

    #[test]
    fn camera_moves_continuously_through_the_cycle() {
        let mut rig = Rig::new();
        rig.spawn(1, 9);
        let mut prev = rig.camera.position;
        let mut tracking_frames = 0;
        let mut follow = 0.0;

        for frame in 0..(14.0 / DT) as usize {
            rig.run(DT);
            let jump = rig.camera.position.distance(prev);
            assert!(jump < 12.0, "frame {}: camera jumped {}", frame, jump);
            if let ChoreoPhase::ActiveTracking { item, .. } = rig.choreo.phase() {
                assert!(jump < 3.0, "frame {}: tracking jumped {}", frame, jump);
                assert!(item.follow_progress >= follow);
                follow = item.follow_progress;
                tracking_frames += 1;
            }
            prev = rig.camera.position;
        }

        assert!(rig.choreo.is_idle());
        let tracked = tracking_frames as f32 * DT;
        assert!(tracked > 0.7 * CameraSection::default().tracking_duration, "tracked only {}s", tracked);
        assert!(follow > 0.9);
    }

    #[test]
    fn tracking_starts_at_the_start_viewpoint() {
        let mut rig = Rig::new();
        rig.spawn(1, 9);
        let item = rig.choreo.current_item().cloned().unwrap();
        rig.run(1.6);
        assert!(matches!(rig.choreo.phase(), ChoreoPhase::ActiveTracking { .. }));
        // Particles are well along the arc by now; the envelope holds the camera back.
        assert!(rig.visuals.get(AttackId(1)).unwrap().leading_progress() > 0.5);
        let start = rig.spin.compensate(item.viewpoints[0]);
        assert!(rig.camera.position.distance(start) < 2.0);
        assert!(rig.choreo.current_item().unwrap().follow_progress < 0.01);
    }

    #[test]
    fn configured_easings_drive_the_paths() {
        let cfg = CameraSection {
            pending_easing: Easing::Linear,
            tracking_easing: Easing::Linear,
            ..CameraSection::default()
        };
        let mut rig = Rig::with_camera(cfg);
        rig.spawn(1, 9);
        let item = rig.choreo.current_item().cloned().unwrap();

        // Halfway through a linear fly-in the camera sits on the detour waypoint.
        rig.run(0.75);
        let waypoint = detour(rig.camera.saved_position, rig.spin.compensate(item.viewpoints[0]));
        assert!(rig.camera.position.distance(waypoint) < 0.5);

        // Particles have landed by mid-tracking, so follow is the linear envelope.
        rig.run(0.75 + 4.0);
        let follow = rig.choreo.current_item().unwrap().follow_progress;
        assert!((follow - 0.5).abs() < 0.01, "follow {}", follow);
    }

    #[test]
    fn pending_ends_on_compensated_start_viewpoint() {
        let mut rig = Rig::new();
        rig.spawn(1, 10);
        let item = rig.choreo.current_item().cloned().unwrap();
        rig.run(1.5);
        let expected = rig.spin.compensate(item.viewpoints[0]);
        assert!((rig.camera.position - expected).length() < 1e-2);
    }

    #[test]
    fn preemption_runs_exactly_one_reset_then_new_item() {
        let mut rig = Rig::new();
        rig.spawn(1, 9);
        rig.run(0.5);
        rig.spawn(2, 9);

        assert!(matches!(rig.choreo.phase(), ChoreoPhase::Resetting { .. }));
        assert_eq!(rig.choreo.last_completed().map(|i| i.target), Some(AttackId(1)));
        assert_eq!(rig.choreo.waiting_target(), Some(AttackId(2)));
        assert!(rig.choreo.current_item().is_none());

        rig.run(2.05);
        assert_eq!(rig.choreo.resets_started(), 1);
        let current = rig.choreo.current_item().unwrap();
        assert_eq!(current.target, AttackId(2));
        assert_eq!(current.state, ZoomState::Pending);
        assert!(!rig.camera.orbit.enabled);
    }

    #[test]
    fn later_event_replaces_waiting_item() {
        let mut rig = Rig::new();
        rig.spawn(1, 9);
        rig.run(0.2);
        rig.spawn(2, 9);
        rig.run(0.5);
        rig.spawn(3, 10);
        assert_eq!(rig.choreo.waiting_target(), Some(AttackId(3)));
        assert_eq!(rig.choreo.resets_started(), 1);
    }

    #[test]
    fn region_focus_while_tracking_goes_through_reset() {
        let mut rig = Rig::new();
        rig.spawn(1, 9);
        rig.run(1.7);
        assert!(matches!(rig.choreo.phase(), ChoreoPhase::ActiveTracking { .. }));

        assert!(rig.choreo.toggle_region_focus(None, &mut rig.camera));
        assert_eq!(rig.choreo.last_completed().map(|i| i.state), Some(ZoomState::Completed));
        assert!(matches!(rig.choreo.phase(), ChoreoPhase::Resetting { .. }));

        rig.run(2.05);
        assert!(rig.choreo.is_focusing());
        assert_eq!(rig.camera.mode, CameraMode::RegionFocus);
    }

    #[test]
    fn region_focus_tracks_rotation_after_entry() {
        let mut rig = Rig::new();
        rig.choreo.toggle_region_focus(Some(GeoCoord::new(50.0, 10.0)), &mut rig.camera);
        rig.run(3.0);
        let anchor = geo::to_sphere(GeoCoord::new(50.0, 10.0), 100.0);
        assert!((rig.camera.look_at - rig.spin.compensate(anchor)).length() < 1e-3);
        let eye = rig.spin.compensate(anchor.normalize() * 160.0);
        assert!((rig.camera.position - eye).length() < 1e-3);

        // Toggling again exits through a reset.
        assert!(!rig.choreo.toggle_region_focus(None, &mut rig.camera));
        rig.run(2.05);
        assert!(rig.choreo.is_idle());
        assert!(rig.camera.orbit.enabled);
    }

    #[test]
    fn missing_visual_completes_item_and_resets() {
        let mut rig = Rig::new();
        rig.spawn(1, 9);
        rig.run(0.3);
        rig.visuals.remove(AttackId(1));
        rig.run(DT);
        assert!(matches!(rig.choreo.phase(), ChoreoPhase::Resetting { .. }));
        assert_eq!(rig.choreo.last_completed().map(|i| i.target), Some(AttackId(1)));
    }

    #[test]
    fn reset_waypoint_bisects_or_falls_back() {
        let w = reset_waypoint(Vec3::new(200.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 200.0));
        assert!((w.length() - 240.0).abs() < 1e-3);
        assert!((w.x - w.z).abs() < 1e-3);

        let w = reset_waypoint(Vec3::new(0.0, 0.0, -150.0), Vec3::new(0.0, 0.0, 200.0));
        assert!(w.is_finite());
        assert!((w.length() - 240.0).abs() < 1e-3);
        assert!(w.z.abs() < 1e-3);
    }

    #[test]
    fn detour_stays_outside_the_globe() {
        let from = Vec3::new(0.0, 0.0, 200.0);
        let to = Vec3::new(0.0, 0.0, -170.0);
        let d = detour(from, to);
        assert!(d.length() >= 170.0);
    }
}
