use tracing::{debug, warn};

use crate::core::random::Rng;
use crate::domain::{AnimationStrategy, ConfigError, EngineConfig, ShapeMode};
use crate::host::{FrameClock, Surface};

use super::perf_stats::PerfStats;
use super::EffectEngine;

/// Replace the whole configuration. Rejected configs leave the engine untouched.
pub(super) fn set_config<S: Surface, C: FrameClock>(
    engine: &mut EffectEngine<S, C>,
    config: EngineConfig,
) -> Result<(), ConfigError> {
    if let Err(err) = config.validate() {
        warn!(%err, "rejected engine config");
        return Err(err);
    }
    if config == engine.config {
        return Ok(());
    }

    if config.seed != engine.config.seed {
        engine.rng = Rng::new(config.seed);
    }
    engine.lifecycle.set_fade_ms(config.fade_ms);
    debug!(from = %engine.config.mode, to = %config.mode, particles = config.particle_count, "config changed");
    engine.config = config;
    engine.warn_on_fallback();

    // Whichever strategy is active is stopped before the next one starts
    if engine.rotating {
        engine.surface.stop_rotation();
        engine.rotating = false;
    }
    engine.stale = true;
    engine.ensure_ticking();
    Ok(())
}

pub(super) fn set_mode<S: Surface, C: FrameClock>(
    engine: &mut EffectEngine<S, C>,
    mode: ShapeMode,
) -> Result<(), ConfigError> {
    let config = EngineConfig { mode, ..engine.config.clone() };
    set_config(engine, config)
}

pub(super) fn set_particle_count<S: Surface, C: FrameClock>(
    engine: &mut EffectEngine<S, C>,
    count: u32,
) -> Result<(), ConfigError> {
    let config = EngineConfig { particle_count: count, ..engine.config.clone() };
    set_config(engine, config)
}

pub(super) fn set_strategy<S: Surface, C: FrameClock>(
    engine: &mut EffectEngine<S, C>,
    strategy: AnimationStrategy,
) -> Result<(), ConfigError> {
    let config = EngineConfig { strategy, ..engine.config.clone() };
    set_config(engine, config)
}

pub(super) fn enable_perf_metrics<S: Surface, C: FrameClock>(engine: &mut EffectEngine<S, C>, enabled: bool) {
    if enabled && !engine.perf_enabled {
        engine.perf_stats.reset();
    }
    engine.perf_enabled = enabled;
}

pub(super) fn get_perf_stats<S: Surface, C: FrameClock>(engine: &EffectEngine<S, C>) -> PerfStats {
    engine.perf_stats.clone()
}
