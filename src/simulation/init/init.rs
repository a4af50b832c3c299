use tracing::debug;

use crate::core::random::Rng;
use crate::domain::{ConfigError, EngineConfig};
use crate::host::{FrameClock, Surface};

use super::lifecycle::Lifecycle;
use super::perf_stats::PerfStats;
use super::scheduler::FrameScheduler;
use super::EffectEngine;

pub(super) fn create_engine<S: Surface, C: FrameClock>(
    surface: S,
    clock: C,
    config: EngineConfig,
) -> Result<EffectEngine<S, C>, ConfigError> {
    config.validate()?;
    let engine = create_engine_unchecked(surface, clock, config);
    engine.warn_on_fallback();
    Ok(engine)
}

/// Build without validation; callers guarantee `config` is sound (e.g. the defaults)
pub(super) fn create_engine_unchecked<S: Surface, C: FrameClock>(
    surface: S,
    clock: C,
    config: EngineConfig,
) -> EffectEngine<S, C> {
    debug!(mode = %config.mode, particles = config.particle_count, seed = config.seed, "engine created");
    EffectEngine {
        surface,
        clock,
        rng: Rng::new(config.seed),
        lifecycle: Lifecycle::new(config.fade_ms),
        config,
        scheduler: FrameScheduler::new(),
        // Nothing is laid out until the first visible frame
        pattern: None,

        stale: true,
        rotating: false,
        geometry_lost: false,
        frame: 0,

        perf_enabled: false,
        perf_stats: PerfStats::default(),
    }
}
