use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, trace, warn};

use crate::core::math::vec2::EPSILON;
use crate::domain::AnimationStrategy;
use crate::host::{Canvas, Extent, FrameClock, Surface};
use crate::systems::patterns::{PatternContext, PatternState};

use super::lifecycle::Visibility;
use super::{EffectEngine, PerfTimer, SkipReason, TickOutcome};

pub(super) fn tick<S: Surface, C: FrameClock>(engine: &mut EffectEngine<S, C>, now_secs: f64) -> TickOutcome {
    // Stopped: ticks delivered after stop() are ignored
    let Some(dt) = engine.scheduler.advance(now_secs) else {
        return TickOutcome::Idle;
    };

    // per-tick samples reset even with perf off; only the frame counters accumulate
    engine.perf_stats.begin_tick();
    let tick_start = if engine.perf_enabled { Some(PerfTimer::start()) } else { None };
    engine.frame += 1;

    // === VISIBILITY FADE ===
    let visibility = engine.lifecycle.advance(dt);
    engine.surface.set_surface_opacity(engine.lifecycle.opacity());
    if visibility == Visibility::Hidden {
        engine.halt();
        return TickOutcome::Idle;
    }

    // === GEOMETRY GUARD ===
    // Extent is read once per tick; kernels see the same value for the whole frame
    let extent = engine.surface.extent();
    if !extent.is_valid() {
        if !engine.geometry_lost {
            warn!(width = extent.width, height = extent.height, "no usable surface extent, skipping layout");
            engine.geometry_lost = true;
        }
        engine.perf_stats.frames_skipped += 1;
        return TickOutcome::Skipped(SkipReason::InvalidExtent);
    }
    if engine.geometry_lost {
        debug!(width = extent.width, height = extent.height, "surface extent restored");
        engine.geometry_lost = false;
    }

    let outcome = if engine.effective_strategy() == AnimationStrategy::DiscreteRotation {
        rotate(engine, extent, visibility)
    } else if engine.needs_init() {
        initialize(engine, extent)
    } else {
        advance(engine, extent, dt)
    };

    if let Some(t0) = tick_start {
        let particles = engine.particles().len() as u32;
        let drawables = engine.pattern.as_ref().map_or(0, |p| p.drawable_count()) as u32;
        let stats = &mut engine.perf_stats;
        stats.tick_ms = t0.elapsed_ms();
        stats.dt_ms = dt as f64 * 1000.0;
        stats.particles = particles;
        stats.drawables = drawables;
    }

    trace!(frame = engine.frame, dt, ?outcome, "tick");
    outcome
}

/// Rebuild the particle store for the current mode, count and extent
fn initialize<S: Surface, C: FrameClock>(engine: &mut EffectEngine<S, C>, extent: Extent) -> TickOutcome {
    let t0 = if engine.perf_enabled { Some(PerfTimer::start()) } else { None };

    let mode = engine.config.mode;
    let mut pattern = PatternState::for_mode(mode);
    let mut ctx = PatternContext {
        canvas: Canvas::new(&mut engine.surface),
        extent,
        config: &engine.config,
        rng: &mut engine.rng,
        dt: 0.0,
    };
    let result = catch_unwind(AssertUnwindSafe(|| {
        pattern.init(&mut ctx);
        ctx.canvas.rejected_writes()
    }));

    match result {
        Ok(rejected) => {
            engine.pattern = Some(pattern);
            engine.stale = false;
            engine.perf_stats.reinitializations += 1;
            engine.perf_stats.rejected_writes += rejected;
            if let Some(t0) = t0 {
                engine.perf_stats.init_ms = t0.elapsed_ms();
            }
            debug!(
                %mode,
                particles = engine.config.particle_count,
                width = extent.width,
                height = extent.height,
                "particle store initialized"
            );
            TickOutcome::Initialized
        }
        Err(_) => kernel_panicked(engine, "init"),
    }
}

/// Run the active kernel for one frame
fn advance<S: Surface, C: FrameClock>(engine: &mut EffectEngine<S, C>, extent: Extent, dt: f32) -> TickOutcome {
    let Some(pattern) = engine.pattern.as_mut() else {
        return TickOutcome::Idle;
    };
    let t0 = if engine.perf_enabled { Some(PerfTimer::start()) } else { None };

    let mut ctx = PatternContext {
        canvas: Canvas::new(&mut engine.surface),
        extent,
        config: &engine.config,
        rng: &mut engine.rng,
        dt,
    };
    let result = catch_unwind(AssertUnwindSafe(|| {
        pattern.update(&mut ctx);
        ctx.canvas.rejected_writes()
    }));

    match result {
        Ok(rejected) => {
            engine.perf_stats.frames_advanced += 1;
            engine.perf_stats.rejected_writes += rejected;
            if let Some(t0) = t0 {
                engine.perf_stats.update_ms = t0.elapsed_ms();
            }
            TickOutcome::Advanced
        }
        Err(_) => kernel_panicked(engine, "update"),
    }
}

/// Discrete rotation: lay the dots out once, then let the host spin the surface
fn rotate<S: Surface, C: FrameClock>(
    engine: &mut EffectEngine<S, C>,
    extent: Extent,
    visibility: Visibility,
) -> TickOutcome {
    if engine.needs_init() {
        if let TickOutcome::Skipped(reason) = initialize(engine, extent) {
            return TickOutcome::Skipped(reason);
        }
    }

    if !engine.rotating {
        let speed = engine.config.orbit.angular_speed_deg;
        if speed.abs() > EPSILON {
            // Negative period turns counter-clockwise
            let period = 360.0 / speed;
            engine.surface.start_rotation(period);
            debug!(period_secs = period, "discrete rotation started");
        } else {
            debug!("angular speed is zero, holding the static layout");
        }
        engine.rotating = true;
    }

    // The fade still needs the clock; once fully shown the host owns the animation
    if visibility == Visibility::Visible {
        engine.stop();
    }
    TickOutcome::Rotating
}

/// Drop the faulted store so the next tick rebuilds it
pub(super) fn kernel_panicked<S: Surface, C: FrameClock>(engine: &mut EffectEngine<S, C>, phase: &'static str) -> TickOutcome {
    warn!(mode = %engine.config.mode, phase, "pattern kernel panicked, rebuilding on next tick");
    engine.pattern = None;
    engine.stale = true;
    engine.perf_stats.frames_skipped += 1;
    TickOutcome::Skipped(SkipReason::KernelPanic)
}
