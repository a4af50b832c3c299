//! Particle record shared by every pattern.
//!
//! Records are never removed: a dead particle is recycled in place so the
//! store keeps the same length and order for the lifetime of a pattern.

use crate::core::math::easing::clamp_unit;
use crate::core::math::Vec2;
use crate::host::DrawableHandle;

/// Fixed-length run of drawables trailing a particle's head.
///
/// Allocated once at pattern initialization; never grows or shrinks.
#[derive(Clone, Debug, Default)]
pub struct Trail {
    handles: Box<[DrawableHandle]>,
}

impl Trail {
    pub fn new(handles: Vec<DrawableHandle>) -> Self {
        Self { handles: handles.into_boxed_slice() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    #[inline]
    pub fn handles(&self) -> &[DrawableHandle] {
        &self.handles
    }
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radians, for periodic motion
    pub phase: f32,
    /// Remaining life (seconds or nominal frames depending on the pattern), never negative
    pub life: f32,
    pub initial_life: f32,
    pub opacity: f32,
    /// Rendered diameter in px
    pub size: f32,
    /// Shooting / landed / launched, depending on the pattern
    pub active: bool,
    pub handle: DrawableHandle,
    pub trail: Trail,
}

impl Particle {
    pub fn new(handle: DrawableHandle, size: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            phase: 0.0,
            life: 0.0,
            initial_life: 0.0,
            opacity: 1.0,
            size,
            active: false,
            handle,
            trail: Trail::empty(),
        }
    }

    pub fn with_trail(mut self, trail: Trail) -> Self {
        self.trail = trail;
        self
    }

    #[inline]
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = clamp_unit(opacity);
    }

    #[inline]
    pub fn set_life(&mut self, life: f32) {
        self.life = if life.is_finite() { life.max(0.0) } else { 0.0 };
    }

    /// Fraction of initial life left, in [0, 1]
    #[inline]
    pub fn life_fraction(&self) -> f32 {
        if self.initial_life > 0.0 {
            clamp_unit(self.life / self.initial_life)
        } else {
            0.0
        }
    }

    /// Documented ranges: opacity in [0, 1], life >= 0, finite kinematics
    pub fn is_within_valid_ranges(&self) -> bool {
        (0.0..=1.0).contains(&self.opacity)
            && self.life >= 0.0
            && self.initial_life >= 0.0
            && self.pos.is_finite()
            && self.vel.is_finite()
            && self.phase.is_finite()
    }
}
