use std::f32::consts::FRAC_PI_2;

use super::*;
use crate::core::math::easing::wrap_angle;
use crate::host::{Extent, RenderBuffer};

#[derive(Debug, Default)]
struct CountingClock {
    subscribed: u32,
    unsubscribed: u32,
}

impl FrameClock for CountingClock {
    fn subscribe(&mut self) {
        self.subscribed += 1;
    }

    fn unsubscribe(&mut self) {
        self.unsubscribed += 1;
    }
}

type TestEngine = EffectEngine<RenderBuffer, CountingClock>;

fn engine_with(config: EngineConfig) -> TestEngine {
    EffectEngine::new(RenderBuffer::new(Extent::new(100.0, 100.0)), CountingClock::default(), config)
        .expect("valid config")
}

/// Instant fade so the first tick after showing is fully visible
fn config(mode: ShapeMode, count: u32) -> EngineConfig {
    EngineConfig {
        mode,
        particle_count: count,
        fade_ms: 0.0,
        ..EngineConfig::default()
    }
}

fn shown(mode: ShapeMode, count: u32) -> TestEngine {
    let mut engine = engine_with(config(mode, count));
    engine.set_visible(true);
    assert_eq!(engine.tick(0.0), TickOutcome::Initialized);
    engine
}

#[test]
fn start_and_stop_are_idempotent() {
    let mut engine = engine_with(config(ShapeMode::Dots, 4));
    engine.start();
    engine.start();
    assert_eq!(engine.clock().subscribed, 1);
    engine.stop();
    engine.stop();
    assert_eq!(engine.clock().unsubscribed, 1);
    assert!(!engine.is_running());
}

#[test]
fn hidden_engine_does_nothing() {
    let mut engine = engine_with(config(ShapeMode::Dots, 4));
    assert_eq!(engine.tick(0.0), TickOutcome::Idle);
    assert_eq!(engine.frame(), 0);
    assert!(engine.particles().is_empty());
    assert_eq!(engine.surface().drawable_count(), 0);
}

#[test]
fn first_visible_tick_initializes_then_advances() {
    let mut engine = shown(ShapeMode::Dots, 6);
    assert_eq!(engine.particles().len(), 6);
    assert_eq!(engine.surface().drawable_count(), 6);
    assert_eq!(engine.surface().surface_opacity(), 1.0);
    assert_eq!(engine.tick(0.016), TickOutcome::Advanced);
    assert_eq!(engine.frame(), 2);
}

#[test]
fn rejected_config_is_reported_and_ignored() {
    let err = EffectEngine::new(
        RenderBuffer::new(Extent::new(10.0, 10.0)),
        CountingClock::default(),
        config(ShapeMode::Dots, 0),
    );
    assert!(matches!(err, Err(ConfigError::ParticleCount(0))));

    let mut engine = shown(ShapeMode::Dots, 5);
    assert!(engine.set_particle_count(0).is_err());
    assert!(engine.set_mode_name("hexagon").is_err());
    assert_eq!(engine.config().particle_count, 5);
    assert_eq!(engine.tick(0.016), TickOutcome::Advanced);
}

#[test]
fn mode_change_rebuilds_on_next_tick() {
    let mut engine = shown(ShapeMode::Dots, 6);
    engine.tick(0.016);
    let generation = engine.surface().generation();

    engine.set_mode(ShapeMode::Meteor).unwrap();
    assert_eq!(engine.tick(0.032), TickOutcome::Initialized);
    assert!(engine.surface().generation() > generation);
    let trail = engine.config().meteor.trail_length as usize;
    assert_eq!(engine.surface().drawable_count(), 6 * (1 + trail));
    assert_eq!(engine.tick(0.048), TickOutcome::Advanced);
}

#[test]
fn particle_count_change_resizes_the_store() {
    let mut engine = shown(ShapeMode::Bounce, 4);
    engine.set_particle_count(9).unwrap();
    assert_eq!(engine.tick(0.016), TickOutcome::Initialized);
    assert_eq!(engine.particles().len(), 9);
    assert_eq!(engine.surface().drawable_count(), 9);
}

#[test]
fn zero_width_mid_run_skips_without_nan() {
    let mut engine = shown(ShapeMode::Explosion, 12);
    engine.tick(0.016);

    engine.surface_mut().set_extent(Extent::new(0.0, 100.0));
    assert_eq!(engine.tick(0.032), TickOutcome::Skipped(SkipReason::InvalidExtent));
    assert_eq!(engine.tick(0.048), TickOutcome::Skipped(SkipReason::InvalidExtent));
    assert!(engine.surface().attributes().iter().all(|v| v.is_finite()));

    // recovers without rebuilding
    engine.surface_mut().set_extent(Extent::new(80.0, 60.0));
    assert_eq!(engine.tick(0.064), TickOutcome::Advanced);
    assert!(engine.surface().attributes().iter().all(|v| v.is_finite()));
    assert_eq!(engine.perf_stats().frames_skipped(), 2);
}

#[test]
fn no_tick_runs_after_stop() {
    let mut engine = shown(ShapeMode::Snow, 10);
    engine.stop();
    let frame = engine.frame();
    let before = engine.surface().attributes().to_vec();
    assert_eq!(engine.tick(1.0), TickOutcome::Idle);
    assert_eq!(engine.frame(), frame);
    assert_eq!(engine.surface().attributes(), &before[..]);
}

#[test]
fn fade_in_and_out_drive_the_scheduler() {
    let mut engine = engine_with(EngineConfig {
        fade_ms: 200.0,
        ..config(ShapeMode::Dots, 4)
    });
    engine.set_visible(true);
    assert!(engine.is_running());
    assert_eq!(engine.visibility(), Visibility::FadingIn);

    engine.tick(0.0);
    engine.tick(0.1);
    assert!((engine.surface().surface_opacity() - 0.5).abs() < 1e-3);
    engine.tick(0.2);
    assert_eq!(engine.visibility(), Visibility::Visible);
    assert_eq!(engine.surface().surface_opacity(), 1.0);

    engine.set_visible(false);
    engine.tick(0.3);
    assert_eq!(engine.visibility(), Visibility::FadingOut);
    assert!(engine.is_running());
    assert_eq!(engine.tick(0.45), TickOutcome::Idle);
    assert_eq!(engine.visibility(), Visibility::Hidden);
    assert!(!engine.is_running());
    assert_eq!(engine.clock().unsubscribed, 1);
    assert_eq!(engine.surface().surface_opacity(), 0.0);
}

#[test]
fn discrete_rotation_hands_the_animation_to_the_host() {
    let mut engine = engine_with(EngineConfig {
        strategy: AnimationStrategy::DiscreteRotation,
        ..config(ShapeMode::Dots, 8)
    });
    engine.set_visible(true);
    assert_eq!(engine.tick(0.0), TickOutcome::Rotating);
    assert_eq!(engine.surface().rotation_period(), Some(360.0 / engine.config().orbit.angular_speed_deg));
    assert_eq!(engine.surface().drawable_count(), 8);
    assert!(engine.is_rotating());
    assert!(!engine.is_running());

    // hiding stops the rotation once the fade-out finishes
    engine.set_visible(false);
    assert!(engine.is_running());
    assert_eq!(engine.tick(0.5), TickOutcome::Idle);
    assert_eq!(engine.surface().rotation_period(), None);
    assert!(!engine.is_rotating());
}

#[test]
fn counter_clockwise_rotation_has_negative_period() {
    let mut config = config(ShapeMode::Dots, 4);
    config.strategy = AnimationStrategy::DiscreteRotation;
    config.orbit.angular_speed_deg = -120.0;
    let mut engine = engine_with(config);
    engine.set_visible(true);
    engine.tick(0.0);
    assert_eq!(engine.surface().rotation_period(), Some(-3.0));
}

#[test]
fn rotation_falls_back_for_modes_a_transform_cannot_express() {
    let mut engine = engine_with(EngineConfig {
        strategy: AnimationStrategy::DiscreteRotation,
        ..config(ShapeMode::Snow, 8)
    });
    assert_eq!(engine.effective_strategy(), AnimationStrategy::PerParticle);
    engine.set_visible(true);
    assert_eq!(engine.tick(0.0), TickOutcome::Initialized);
    assert_eq!(engine.tick(0.016), TickOutcome::Advanced);
    assert_eq!(engine.surface().rotation_period(), None);
}

#[test]
fn switching_strategy_stops_the_rotation_first() {
    let mut engine = engine_with(EngineConfig {
        strategy: AnimationStrategy::DiscreteRotation,
        ..config(ShapeMode::Dots, 6)
    });
    engine.set_visible(true);
    engine.tick(0.0);
    assert!(engine.surface().rotation_period().is_some());

    engine.set_strategy(AnimationStrategy::PerParticle).unwrap();
    assert_eq!(engine.surface().rotation_period(), None);
    assert!(engine.is_running());
    assert_eq!(engine.tick(1.0), TickOutcome::Initialized);
    assert_eq!(engine.tick(1.016), TickOutcome::Advanced);
}

#[test]
fn four_dots_advance_a_quarter_turn_per_second() {
    let mut config = config(ShapeMode::Dots, 4);
    config.orbit.angular_speed_deg = 90.0;
    let mut engine = engine_with(config);
    engine.set_visible(true);
    engine.tick(0.0);
    let before: Vec<f32> = engine.particles().iter().map(|p| p.phase).collect();

    for k in 1..=60 {
        assert_eq!(engine.tick(k as f64 / 60.0), TickOutcome::Advanced);
    }
    for (p, start) in engine.particles().iter().zip(before) {
        let diff = wrap_angle(p.phase - start - FRAC_PI_2 + 1.0) - 1.0;
        assert!(diff.abs() < 1e-3, "{diff}");
    }
}

#[test]
fn long_stall_is_clamped() {
    let mut config = config(ShapeMode::Dots, 4);
    config.orbit.angular_speed_deg = 90.0;
    let mut engine = engine_with(config);
    engine.set_visible(true);
    engine.tick(0.0);
    let start = engine.particles()[0].phase;
    engine.tick(30.0);
    let moved = wrap_angle(engine.particles()[0].phase - start);
    let expected = (MAX_FRAME_DELTA_SECS * 90.0).to_radians();
    assert!((moved - expected).abs() < 1e-3);
}

#[test]
fn perf_counters_track_ticks() {
    let mut engine = engine_with(config(ShapeMode::Comet, 5));
    engine.enable_perf_metrics(true);
    engine.set_visible(true);
    engine.tick(0.0);
    for k in 1..=10 {
        engine.tick(k as f64 * 0.02);
    }
    let stats = engine.perf_stats();
    assert_eq!(stats.reinitializations(), 1);
    assert_eq!(stats.frames_advanced(), 10);
    assert_eq!(stats.frames_skipped(), 0);
    assert_eq!(stats.particles(), 5);
    assert_eq!(stats.drawables(), 5);
    assert_eq!(stats.rejected_writes(), 0);
    assert!((stats.dt_ms() - 20.0).abs() < 1e-2);
    assert!(stats.tick_ms() >= 0.0);
}

#[test]
fn unchanged_config_keeps_the_store() {
    let mut engine = shown(ShapeMode::Twinkle, 7);
    let same = engine.config().clone();
    engine.set_config(same).unwrap();
    assert_eq!(engine.tick(0.016), TickOutcome::Advanced);

    engine.load_config_json(r#"{"mode":"twinkle","particleCount":7,"fadeMs":0,"seed":99}"#).unwrap();
    assert_eq!(engine.tick(0.032), TickOutcome::Initialized);
}

#[test]
fn resize_while_rotating_relays_out_the_dots() {
    let mut engine = engine_with(EngineConfig {
        strategy: AnimationStrategy::DiscreteRotation,
        ..config(ShapeMode::Dots, 8)
    });
    engine.set_visible(true);
    assert_eq!(engine.tick(0.0), TickOutcome::Rotating);
    assert!(!engine.is_running());
    let generation = engine.surface().generation();

    engine.surface_mut().set_extent(Extent::new(300.0, 300.0));
    engine.extent_changed();
    assert!(engine.is_running());
    assert_eq!(engine.surface().rotation_period(), None);

    assert_eq!(engine.tick(0.5), TickOutcome::Rotating);
    assert!(engine.surface().generation() > generation);
    assert!(engine.surface().rotation_period().is_some());
    assert!(!engine.is_running());

    let xs: Vec<f32> = engine
        .surface()
        .attributes()
        .chunks(crate::host::ATTRIBUTE_STRIDE)
        .map(|a| a[0])
        .collect();
    let mean = xs.iter().sum::<f32>() / xs.len() as f32;
    assert!(mean > 100.0, "{xs:?}");
    assert!(xs.iter().any(|&x| x > 250.0), "{xs:?}");
}

#[test]
fn resize_without_rotation_needs_no_rebuild() {
    let mut engine = shown(ShapeMode::Dots, 4);
    engine.extent_changed();
    assert_eq!(engine.tick(0.016), TickOutcome::Advanced);
}

#[test]
fn rejected_writes_are_per_tick_with_perf_disabled() {
    let mut engine = shown(ShapeMode::Dots, 4);
    engine.perf_stats.rejected_writes = 7;
    assert_eq!(engine.tick(0.016), TickOutcome::Advanced);
    let stats = engine.perf_stats();
    assert_eq!(stats.rejected_writes(), 0);
    assert_eq!(stats.frames_advanced(), 1);
    assert_eq!(stats.reinitializations(), 1);
    assert_eq!(stats.tick_ms(), 0.0);
}

#[test]
fn kernel_fault_drops_the_store_and_rebuilds() {
    let mut engine = shown(ShapeMode::Spiral, 6);
    assert_eq!(step::kernel_panicked(&mut engine, "update"), TickOutcome::Skipped(SkipReason::KernelPanic));
    assert!(engine.particles().is_empty());
    assert_eq!(engine.perf_stats().frames_skipped(), 1);
    assert_eq!(TickOutcome::Skipped(SkipReason::KernelPanic).code(), 2);

    assert_eq!(engine.tick(0.016), TickOutcome::Initialized);
    assert_eq!(engine.particles().len(), 6);
    assert_eq!(engine.tick(0.032), TickOutcome::Advanced);
}
