//! Explosion and fountain.
//!
//! Ballistic particles under gravity and drag, counted in nominal frames.
//! Opacity only ever drops between launches; a particle is relaunched on the
//! tick its opacity hits zero, either by fading or by leaving the surface.

use std::f32::consts::FRAC_PI_2;

use crate::core::math::easing::{clamp_unit, spread_to_radians};
use crate::core::math::vec2::EPSILON;
use crate::core::math::Vec2;
use crate::core::random::Rng;
use crate::domain::config::BurstTuning;
use crate::domain::{Particle, ShapeMode};
use crate::host::Extent;

use super::{Pattern, PatternContext};

/// Upper bound on the random head start given to each particle at init
const STAGGER_FRAMES: f32 = 60.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BurstStep {
    Flying,
    /// Opacity reached zero this frame; relaunch
    Spent,
}

pub struct BurstPattern {
    mode: ShapeMode,
    particles: Vec<Particle>,
}

/// Advance one particle by `frames` nominal frames
pub fn advance(p: &mut Particle, frames: f32, tuning: &BurstTuning, extent: Extent) -> BurstStep {
    p.vel.y += tuning.gravity * frames;
    p.vel = p.vel * tuning.drag.powf(frames);
    p.pos += p.vel * frames;

    // fade faster as vertical speed dies out at the top of the arc
    let near_apex = if tuning.speed > EPSILON {
        clamp_unit(1.0 - p.vel.y.abs() / tuning.speed)
    } else {
        0.0
    };
    let near_edge = if tuning.edge_margin > 0.0 {
        clamp_unit(1.0 - extent.edge_distance(p.pos) / tuning.edge_margin)
    } else {
        0.0
    };
    let boost = 1.0 + tuning.apex_fade_boost * near_apex + tuning.edge_fade_boost * near_edge;
    p.set_opacity(p.opacity - tuning.fade_rate * frames * boost);

    if !extent.contains(p.pos, 0.0) {
        p.set_opacity(0.0);
    }
    if p.opacity <= 0.0 {
        BurstStep::Spent
    } else {
        BurstStep::Flying
    }
}

impl BurstPattern {
    pub fn new(mode: ShapeMode) -> Self {
        Self {
            mode,
            particles: Vec::new(),
        }
    }

    fn origin(&self, extent: Extent, size: f32) -> Vec2 {
        match self.mode {
            ShapeMode::Fountain => Vec2::new(extent.width * 0.5, (extent.height - size * 0.5).max(0.0)),
            _ => extent.center(),
        }
    }

    /// Launch heading in radians (y grows downward)
    fn heading(&self, tuning: &BurstTuning, rng: &mut Rng) -> f32 {
        match self.mode {
            ShapeMode::Fountain => {
                let spread = spread_to_radians(tuning.spread_deg);
                let tilt = (rng.gaussian() * spread * 0.25).clamp(-spread * 0.5, spread * 0.5);
                -FRAC_PI_2 + tilt
            }
            _ => rng.angle(),
        }
    }

    fn launch(&self, p: &mut Particle, extent: Extent, tuning: &BurstTuning, rng: &mut Rng) {
        let speed = match self.mode {
            ShapeMode::Fountain => tuning.speed * rng.range(0.8, 1.2),
            _ => tuning.speed * rng.range(0.4, 1.0),
        };
        p.pos = self.origin(extent, p.size);
        p.vel = Vec2::from_angle(self.heading(tuning, rng)) * speed;
        p.active = true;
        p.set_opacity(1.0);
    }
}

impl Pattern for BurstPattern {
    fn init(&mut self, ctx: &mut PatternContext<'_>) {
        let count = ctx.config.particle_count as usize;
        let mut particles = ctx.alloc_dots(count, ctx.config.particle_size, ctx.config.base_color);
        let tuning = &ctx.config.burst;
        let extent = ctx.extent;

        for p in &mut particles {
            self.launch(p, extent, tuning, ctx.rng);
            let head_start = ctx.rng.range(0.0, STAGGER_FRAMES) as u32;
            for _ in 0..head_start {
                if advance(p, 1.0, tuning, extent) == BurstStep::Spent {
                    self.launch(p, extent, tuning, ctx.rng);
                }
            }
            ctx.canvas.draw(p.handle, p.pos, p.size, p.opacity);
        }
        self.particles = particles;
    }

    fn update(&mut self, ctx: &mut PatternContext<'_>) {
        let tuning = &ctx.config.burst;
        let frames = ctx.frames();
        let extent = ctx.extent;

        let mut particles = std::mem::take(&mut self.particles);
        for p in &mut particles {
            if advance(p, frames, tuning, extent) == BurstStep::Spent {
                self.launch(p, extent, tuning, ctx.rng);
            }
            ctx.canvas.draw(p.handle, p.pos, p.size, p.opacity);
        }
        self.particles = particles;
    }

    fn particles(&self) -> &[Particle] {
        &self.particles
    }
}
