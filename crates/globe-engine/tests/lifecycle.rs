use std::cell::Cell;

use globe_engine::{
    AttackCategory, AttackEvent, AttackId, CategoryStat, CountryStat, DrawTiming, Endpoint,
    EventSource, FrameData, GlobeConfig, GlobeContext, GlobeEvent, NullRenderer, Renderer,
    StatsSnapshot, VisualPhase, REPLAY_ID_BASE,
};

const DT: f32 = 1.0 / 60.0;

fn attack(id: u64, intensity: u8) -> AttackEvent {
    AttackEvent::new(
        AttackId(id),
        Endpoint::new("RU", 61.524, 105.3188).with_country("Russia"),
        Endpoint::new("IT", 41.8719, 12.5674).with_country("Italy"),
        AttackCategory::Phishing,
        intensity,
        0.0,
    )
}

fn run(ctx: &mut GlobeContext, renderer: &mut NullRenderer, seconds: f32) {
    let steps = (seconds / DT).round() as usize;
    for _ in 0..steps {
        ctx.tick(DT, renderer);
    }
}

/// Records what the last frame looked like.
#[derive(Default)]
struct Recorder {
    max_lights: usize,
    max_additive: usize,
}

impl Renderer for Recorder {
    fn backend(&self) -> &'static str {
        "recorder"
    }

    fn draw(&mut self, frame: &FrameData) -> DrawTiming {
        self.max_lights = self.max_lights.max(frame.lights.len());
        let additive = frame.points.len() - frame.additive_split as usize;
        self.max_additive = self.max_additive.max(additive);
        DrawTiming::default()
    }

    fn resize(&mut self, _width: u32, _height: u32) {}
}

#[test]
fn exactly_one_impact_after_all_particles_land() {
    let mut ctx = GlobeContext::new(GlobeConfig::default());
    let mut renderer = Recorder::default();
    ctx.accept_event(attack(1, 5));

    let mut impacts = 0;
    for _ in 0..360 {
        ctx.tick(DT, &mut renderer);
        impacts += ctx
            .drain_events()
            .iter()
            .filter(|e| e.kind == GlobeEvent::IMPACT)
            .count();
        if let Some(visual) = ctx.visuals().get(AttackId(1)) {
            if visual.impact.is_some() {
                assert!(visual.particles.iter().all(|p| p.progress >= 1.0));
                assert_eq!(visual.phase(), VisualPhase::Completed);
            } else {
                assert_eq!(visual.phase(), VisualPhase::Growing);
            }
        }
    }
    assert_eq!(impacts, 1);
    assert!(renderer.max_lights > 0);
    assert!(renderer.max_additive > 0);
}

#[test]
fn visuals_expire_after_their_lifetime() {
    let mut ctx = GlobeContext::new(GlobeConfig::default());
    let mut renderer = NullRenderer::default();
    // Lifetime 5 + 0.3 = 5.3 s.
    ctx.accept_event(attack(1, 1));

    run(&mut ctx, &mut renderer, 5.0);
    assert!(ctx.visuals().contains(AttackId(1)));
    ctx.clear_frame_data();

    run(&mut ctx, &mut renderer, 0.5);
    assert!(!ctx.visuals().contains(AttackId(1)));
    let expired: Vec<_> = ctx.events().iter().filter(|e| e.kind == GlobeEvent::EXPIRED).collect();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].a, 1.0);
}

#[test]
fn replay_behaves_like_a_live_event() {
    let mut ctx = GlobeContext::new(GlobeConfig::default());
    let mut renderer = NullRenderer::default();
    ctx.accept_event(attack(1, 9));

    // Zoom and track until expiry (lifetime 7.7 s), then a 2 s reset.
    run(&mut ctx, &mut renderer, 10.0);
    assert!(ctx.visuals().is_empty());
    assert!(ctx.choreographer().is_idle());

    let id = ctx.replay(AttackId(1)).unwrap();
    assert_eq!(id, AttackId(REPLAY_ID_BASE));
    let visual = ctx.visuals().get(id).unwrap();
    assert!((visual.event.timestamp - ctx.clock()).abs() < 1e-9);
    assert_eq!(visual.event.source.country_code, "RU");
    assert_eq!(visual.event.intensity, 9);
    assert_eq!(ctx.choreographer().current_item().unwrap().target, id);
    assert_eq!(ctx.popup().current(), Some(id));

    // A second replay gets yet another id.
    let again = ctx.replay(AttackId(1)).unwrap();
    assert_ne!(again, id);
    assert_eq!(ctx.visuals().len(), 2);
}

#[test]
fn stale_popup_timer_does_not_hide_the_newer_popup() {
    let mut ctx = GlobeContext::new(GlobeConfig::default());
    let mut renderer = NullRenderer::default();

    ctx.accept_event(attack(1, 8));
    run(&mut ctx, &mut renderer, 2.0);
    ctx.accept_event(attack(2, 8));
    assert_eq!(ctx.popup().current(), Some(AttackId(2)));

    // Past the first popup's 5 s deadline.
    run(&mut ctx, &mut renderer, 3.5);
    assert!(ctx.popup().visible);
    assert_eq!(ctx.popup().current(), Some(AttackId(2)));
    ctx.clear_frame_data();

    // Past the second popup's deadline.
    run(&mut ctx, &mut renderer, 2.0);
    assert!(!ctx.popup().visible);
    let hidden: Vec<_> = ctx.events().iter().filter(|e| e.kind == GlobeEvent::POPUP_HIDDEN).collect();
    assert_eq!(hidden.len(), 1);
    assert_eq!(hidden[0].a, 2.0);
}

struct CountingSource {
    calls: Cell<u32>,
}

impl EventSource for CountingSource {
    fn poll(&mut self, _now: f64) -> Vec<AttackEvent> {
        Vec::new()
    }

    fn stats(&self, limit: usize) -> StatsSnapshot {
        self.calls.set(self.calls.get() + 1);
        let countries = ["US", "IT", "FR"]
            .iter()
            .enumerate()
            .map(|(i, code)| CountryStat { code: code.to_string(), name: code.to_string(), attacks: i as u64 })
            .take(limit)
            .collect();
        StatsSnapshot {
            top_countries: countries,
            categories: vec![CategoryStat { category: AttackCategory::Dos, count: 61069 }],
        }
    }
}

#[test]
fn stats_refresh_periodically() {
    let mut ctx = GlobeContext::new(GlobeConfig::default());
    let mut renderer = NullRenderer::default();
    let mut source = CountingSource { calls: Cell::new(0) };

    for _ in 0..720 {
        ctx.pump(&mut source);
        ctx.tick(DT, &mut renderer);
    }
    // Once at start, then every 5 s.
    assert_eq!(source.calls.get(), 3);
    assert_eq!(ctx.stats().top_countries[0].code, "FR");
}
