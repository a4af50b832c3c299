//! Patterns - per-mode initializers and update kernels
//!
//! Each algorithm class lives in its own file and implements [`Pattern`].
//! [`PatternState`] is the tagged union the engine holds; it carries the
//! particle store of exactly one mode and dispatches by variant.

mod bounce;
mod burst;
mod drift;
mod falling;
mod meteor;
mod orbit;
mod oscillate;
mod perimeter;

pub use bounce::{kinetic_energy, resolve_pair, BouncePattern};
pub use burst::{BurstPattern, BurstStep};
pub use drift::DriftPattern;
pub use falling::FallingPattern;
pub use meteor::{life_to_edge, MeteorPattern};
pub use orbit::OrbitPattern;
pub use oscillate::OscillatePattern;
pub use perimeter::{rounded_rect_point, PerimeterPattern, RoundedRect};

use crate::core::math::Rgba;
use crate::core::random::Rng;
use crate::domain::{EngineConfig, ModeFamily, Particle, ShapeMode};
use crate::host::{Canvas, Extent};

/// Kernels that count in frames assume this cadence; `dt` is converted, never assumed
pub const NOMINAL_FPS: f32 = 60.0;

/// Everything a kernel may touch during one init or update call
pub struct PatternContext<'a> {
    pub canvas: Canvas<'a>,
    pub extent: Extent,
    pub config: &'a EngineConfig,
    pub rng: &'a mut Rng,
    /// Seconds since the previous tick (0 during init)
    pub dt: f32,
}

impl PatternContext<'_> {
    /// `dt` expressed in nominal frames
    #[inline]
    pub fn frames(&self) -> f32 {
        self.dt * NOMINAL_FPS
    }

    /// Replace every drawable with `count` dots and return matching particle records
    pub fn alloc_dots(&mut self, count: usize, size: f32, color: Rgba) -> Vec<Particle> {
        self.canvas.clear();
        (0..count)
            .map(|_| Particle::new(self.canvas.add_dot(size, color), size))
            .collect()
    }
}

/// One mode family's initializer + update kernel
pub trait Pattern {
    /// (Re)build the particle store and drawables for the current config and extent
    fn init(&mut self, ctx: &mut PatternContext<'_>);

    /// Advance by `ctx.dt` and write drawable attributes
    fn update(&mut self, ctx: &mut PatternContext<'_>);

    fn particles(&self) -> &[Particle];
}

/// Particle store of the active mode
pub enum PatternState {
    Orbit(OrbitPattern),
    Drift(DriftPattern),
    Bounce(BouncePattern),
    Meteor(MeteorPattern),
    Burst(BurstPattern),
    Falling(FallingPattern),
    Perimeter(PerimeterPattern),
    Oscillate(OscillatePattern),
}

impl PatternState {
    pub fn for_mode(mode: ShapeMode) -> Self {
        match mode.family() {
            ModeFamily::Orbit => PatternState::Orbit(OrbitPattern::new(mode)),
            ModeFamily::Drift => PatternState::Drift(DriftPattern::new(mode)),
            ModeFamily::Bounce => PatternState::Bounce(BouncePattern::new()),
            ModeFamily::Meteor => PatternState::Meteor(MeteorPattern::new(mode)),
            ModeFamily::Burst => PatternState::Burst(BurstPattern::new(mode)),
            ModeFamily::Falling => PatternState::Falling(FallingPattern::new()),
            ModeFamily::Perimeter => PatternState::Perimeter(PerimeterPattern::new(mode)),
            ModeFamily::Oscillate => PatternState::Oscillate(OscillatePattern::new(mode)),
        }
    }

    fn pattern_mut(&mut self) -> &mut dyn Pattern {
        match self {
            PatternState::Orbit(p) => p,
            PatternState::Drift(p) => p,
            PatternState::Bounce(p) => p,
            PatternState::Meteor(p) => p,
            PatternState::Burst(p) => p,
            PatternState::Falling(p) => p,
            PatternState::Perimeter(p) => p,
            PatternState::Oscillate(p) => p,
        }
    }

    fn pattern(&self) -> &dyn Pattern {
        match self {
            PatternState::Orbit(p) => p,
            PatternState::Drift(p) => p,
            PatternState::Bounce(p) => p,
            PatternState::Meteor(p) => p,
            PatternState::Burst(p) => p,
            PatternState::Falling(p) => p,
            PatternState::Perimeter(p) => p,
            PatternState::Oscillate(p) => p,
        }
    }

    pub fn init(&mut self, ctx: &mut PatternContext<'_>) {
        self.pattern_mut().init(ctx);
    }

    pub fn update(&mut self, ctx: &mut PatternContext<'_>) {
        self.pattern_mut().update(ctx);
    }

    pub fn particles(&self) -> &[Particle] {
        self.pattern().particles()
    }

    /// Drawables owned by the store, trails included
    pub fn drawable_count(&self) -> usize {
        self.particles().iter().map(|p| 1 + p.trail.len()).sum()
    }
}
