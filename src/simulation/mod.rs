//! Effect engine - one busy-indicator instance
//!
//! The engine only orchestrates: it owns the host collaborators, the frame
//! scheduler, the visibility controller and the active pattern, and
//! delegates the per-tick work to `step`. All particle rules live in
//! `systems::patterns`.

use tracing::{debug, warn};

use crate::core::random::Rng;
use crate::domain::{AnimationStrategy, ConfigError, EngineConfig, Particle, ShapeMode};
use crate::host::{FrameClock, Surface};
use crate::systems::patterns::PatternState;

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "scheduler/scheduler.rs"]
mod scheduler;
#[path = "lifecycle/lifecycle.rs"]
mod lifecycle;
#[path = "step/step.rs"]
mod step;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
mod facade;

pub use facade::{AbiLayout, HostClock, Spinner};
pub use lifecycle::{Lifecycle, Visibility};
pub use perf_stats::PerfStats;
pub use scheduler::{FrameScheduler, MAX_FRAME_DELTA_SECS};

use perf_timer::PerfTimer;

/// Why a tick did no layout work
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Width or height not strictly positive (or not finite)
    InvalidExtent,
    /// A kernel panicked; the store was dropped and will be rebuilt.
    ///
    /// Only reachable where panics unwind (native builds). wasm32 builds
    /// abort on panic, so there the fault kills the module instead.
    KernelPanic,
}

/// What one call to [`EffectEngine::tick`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Scheduler not running, or the fade-out just finished
    Idle,
    Skipped(SkipReason),
    /// The store was (re)built; no motion this frame
    Initialized,
    Advanced,
    /// Discrete rotation owns the animation
    Rotating,
}

impl TickOutcome {
    /// Stable numeric code for the wasm boundary
    pub fn code(self) -> u8 {
        match self {
            TickOutcome::Idle => 0,
            TickOutcome::Skipped(SkipReason::InvalidExtent) => 1,
            TickOutcome::Skipped(SkipReason::KernelPanic) => 2,
            TickOutcome::Initialized => 3,
            TickOutcome::Advanced => 4,
            TickOutcome::Rotating => 5,
        }
    }
}

/// The busy-indicator engine bound to one surface
pub struct EffectEngine<S: Surface, C: FrameClock> {
    surface: S,
    clock: C,
    config: EngineConfig,
    rng: Rng,
    scheduler: FrameScheduler,
    lifecycle: Lifecycle,
    pattern: Option<PatternState>,

    // State
    stale: bool,
    rotating: bool,
    /// Set while ticks are being skipped for lack of geometry
    geometry_lost: bool,
    frame: u64,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl<S: Surface, C: FrameClock> EffectEngine<S, C> {
    /// Create an engine; `config` is validated first
    pub fn new(surface: S, clock: C, config: EngineConfig) -> Result<Self, ConfigError> {
        init::create_engine(surface, clock, config)
    }

    pub fn with_defaults(surface: S, clock: C) -> Self {
        init::create_engine_unchecked(surface, clock, EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct surface access for the host (e.g. resizing an in-memory buffer)
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn visibility(&self) -> Visibility {
        self.lifecycle.state()
    }

    pub fn surface_opacity(&self) -> f32 {
        self.lifecycle.opacity()
    }

    /// True while the scheduler is subscribed to the clock
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    /// Records of the active pattern (empty before the first init)
    pub fn particles(&self) -> &[Particle] {
        match &self.pattern {
            Some(pattern) => pattern.particles(),
            None => &[],
        }
    }

    /// Strategy actually in use; discrete rotation falls back to
    /// per-particle for modes a single transform cannot express
    pub fn effective_strategy(&self) -> AnimationStrategy {
        match self.config.strategy {
            AnimationStrategy::DiscreteRotation if self.config.mode.supports_discrete_rotation() => {
                AnimationStrategy::DiscreteRotation
            }
            _ => AnimationStrategy::PerParticle,
        }
    }

    /// Subscribe to the frame clock (idempotent)
    pub fn start(&mut self) {
        self.scheduler.start(&mut self.clock);
    }

    /// Unsubscribe from the frame clock (idempotent). Ticks delivered after
    /// this returns are ignored.
    pub fn stop(&mut self) {
        self.scheduler.stop(&mut self.clock);
    }

    /// Visibility signal from the host
    pub fn set_visible(&mut self, visible: bool) {
        if self.lifecycle.set_visible(visible) {
            // the fade ramp itself is clock driven
            self.start();
        }
    }

    /// Run one frame at host time `now_secs`
    pub fn tick(&mut self, now_secs: f64) -> TickOutcome {
        step::tick(self, now_secs)
    }

    /// Force re-initialization on the next tick
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Host notice that the surface was resized. Per-particle kernels read
    /// the new extent on their next tick; a rotating layout is idle and
    /// has to be rebuilt and restarted.
    pub fn extent_changed(&mut self) {
        if !self.rotating {
            return;
        }
        self.surface.stop_rotation();
        self.rotating = false;
        self.stale = true;
        debug!("surface resized while rotating, re-laying out");
        self.ensure_ticking();
    }

    pub fn set_config(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        settings::set_config(self, config)
    }

    pub fn load_config_json(&mut self, json: &str) -> Result<(), ConfigError> {
        let config = EngineConfig::from_json(json)?;
        self.set_config(config)
    }

    pub fn set_mode(&mut self, mode: ShapeMode) -> Result<(), ConfigError> {
        settings::set_mode(self, mode)
    }

    /// Parse a mode name (`"meteor-shower"`, `"MeteorShower"`, ...) and switch to it
    pub fn set_mode_name(&mut self, name: &str) -> Result<(), ConfigError> {
        let mode: ShapeMode = name.parse()?;
        self.set_mode(mode)
    }

    pub fn set_particle_count(&mut self, count: u32) -> Result<(), ConfigError> {
        settings::set_particle_count(self, count)
    }

    pub fn set_strategy(&mut self, strategy: AnimationStrategy) -> Result<(), ConfigError> {
        settings::set_strategy(self, strategy)
    }

    /// Enable or disable per-tick timings (adds timer overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Last tick's perf snapshot (timings are zero when perf is disabled)
    pub fn perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    fn needs_init(&self) -> bool {
        match &self.pattern {
            Some(pattern) => self.stale || pattern.particles().len() != self.config.particle_count as usize,
            None => true,
        }
    }

    /// Keep the clock flowing while shown so pending work gets a tick
    fn ensure_ticking(&mut self) {
        if self.lifecycle.is_shown() {
            self.start();
        }
    }

    /// Entering Hidden: stop both animation strategies
    fn halt(&mut self) {
        self.stop();
        if self.rotating {
            self.surface.stop_rotation();
            self.rotating = false;
            debug!("discrete rotation stopped");
        }
    }

    fn warn_on_fallback(&self) {
        if self.config.strategy == AnimationStrategy::DiscreteRotation
            && !self.config.mode.supports_discrete_rotation()
        {
            warn!(mode = %self.config.mode, "discrete rotation unsupported for mode, using per-particle simulation");
        }
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
