//! End-to-end scenarios through the public engine API

use particula_spinner::core::math::Vec2;
use particula_spinner::domain::Particle;
use particula_spinner::host::DrawableHandle;
use particula_spinner::systems::patterns::{kinetic_energy, resolve_pair};
use particula_spinner::{
    EffectEngine, EngineConfig, Extent, FrameClock, RenderBuffer, ShapeMode, SkipReason, TickOutcome,
};

#[derive(Default)]
struct ManualClock {
    running: bool,
}

impl FrameClock for ManualClock {
    fn subscribe(&mut self) {
        self.running = true;
    }

    fn unsubscribe(&mut self) {
        self.running = false;
    }
}

fn engine(mode: ShapeMode, count: u32, extent: Extent) -> EffectEngine<RenderBuffer, ManualClock> {
    let config = EngineConfig {
        mode,
        particle_count: count,
        fade_ms: 0.0,
        ..EngineConfig::default()
    };
    EffectEngine::new(RenderBuffer::new(extent), ManualClock::default(), config).unwrap()
}

#[test]
fn four_orbit_dots_turn_a_quarter_in_one_second() {
    let extent = Extent::new(100.0, 100.0);
    let mut engine = engine(ShapeMode::Dots, 4, extent);
    let mut config = engine.config().clone();
    config.orbit.angular_speed_deg = 90.0;
    engine.set_config(config).unwrap();

    engine.set_visible(true);
    assert!(engine.clock().running);
    assert_eq!(engine.tick(0.0), TickOutcome::Initialized);
    let position = |engine: &EffectEngine<RenderBuffer, ManualClock>, i: usize| {
        let handle = engine.particles()[i].handle;
        let attrs = engine.surface().attributes_of(handle).unwrap();
        Vec2::new(attrs[0], attrs[1])
    };
    let before: Vec<Vec2> = (0..4).map(|i| position(&engine, i)).collect();

    for k in 1..=60 {
        engine.tick(k as f64 / 60.0);
    }

    let center = extent.center();
    for i in 0..4 {
        let now = position(&engine, i);
        // each dot lands where its neighbour started
        assert!((now - before[(i + 1) % 4]).length() < 0.05, "dot {i}");
        let a = (now - center).length();
        let b = (before[i] - center).length();
        assert!((a - b).abs() < 1e-3);
    }
}

#[test]
fn elastic_head_on_collision_swaps_normal_velocities() {
    let mut a = Particle::new(DrawableHandle(0), 10.0);
    let mut b = Particle::new(DrawableHandle(1), 10.0);
    a.pos = Vec2::new(45.5, 50.0);
    b.pos = Vec2::new(54.5, 50.0);
    a.vel = Vec2::new(2.0, 0.0);
    b.vel = Vec2::new(-1.0, 0.0);
    let energy = kinetic_energy(&[a.clone(), b.clone()]);

    assert!(resolve_pair(&mut a, &mut b, 1.0));
    assert!((a.vel.x + 1.0).abs() < 1e-5);
    assert!((b.vel.x - 2.0).abs() < 1e-5);
    assert!(a.vel.y.abs() < 1e-6 && b.vel.y.abs() < 1e-6);
    assert!((kinetic_energy(&[a.clone(), b.clone()]) - energy).abs() < 1e-4);
    // separated along the normal
    assert!((b.pos - a.pos).length() >= 10.0 - 1e-4);
}

#[test]
fn zero_width_resize_writes_no_invalid_values() {
    for mode in ShapeMode::ALL {
        let mut engine = engine(mode, 16, Extent::new(120.0, 90.0));
        engine.set_visible(true);
        engine.tick(0.0);
        engine.tick(0.016);

        engine.surface_mut().set_extent(Extent::new(0.0, 90.0));
        assert_eq!(
            engine.tick(0.032),
            TickOutcome::Skipped(SkipReason::InvalidExtent),
            "{mode}"
        );
        assert!(engine.surface().attributes().iter().all(|v| v.is_finite()), "{mode}");

        engine.surface_mut().set_extent(Extent::new(120.0, 90.0));
        for k in 3..30 {
            engine.tick(k as f64 * 0.016);
        }
        assert!(engine.surface().attributes().iter().all(|v| v.is_finite()), "{mode}");
        for p in engine.particles() {
            assert!(p.is_within_valid_ranges(), "{mode}: {p:?}");
        }
    }
}

#[test]
fn every_mode_keeps_opacity_in_range_over_irregular_frames() {
    let deltas = [0.0, 0.016, 0.033, 0.001, 0.25, 0.016, 0.7, 0.016];
    for mode in ShapeMode::ALL {
        let mut engine = engine(mode, 12, Extent::new(90.0, 70.0));
        engine.set_visible(true);
        let mut now = 0.0;
        for _ in 0..5 {
            for dt in deltas {
                now += dt;
                engine.tick(now);
            }
        }
        let attrs = engine.surface().attributes();
        for chunk in attrs.chunks(6) {
            assert!((0.0..=1.0).contains(&chunk[4]), "{mode}: {chunk:?}");
        }
        assert_eq!(engine.particles().len(), 12, "{mode}");
    }
}
