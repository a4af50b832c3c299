//! Falling: a row of drops released one after another, landing on the floor
//! and resetting together after a pause.

use crate::core::math::easing::clamp_unit;
use crate::core::math::Vec2;
use crate::domain::Particle;
use crate::host::Extent;

use super::{Pattern, PatternContext};

pub struct FallingPattern {
    particles: Vec<Particle>,
    /// Seconds since the group was released
    clock: f32,
    /// Seconds spent on the floor once every drop has landed
    resting: f32,
}

impl FallingPattern {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            clock: 0.0,
            resting: 0.0,
        }
    }

    pub fn all_landed(&self) -> bool {
        !self.particles.is_empty() && self.particles.iter().all(|p| p.active)
    }

    fn column_x(index: usize, count: usize, extent: Extent) -> f32 {
        (index as f32 + 0.5) * extent.width / count.max(1) as f32
    }

    fn reset(&mut self, extent: Extent, speed: f32) {
        let n = self.particles.len();
        for (i, p) in self.particles.iter_mut().enumerate() {
            p.pos = Vec2::new(Self::column_x(i, n, extent), -p.size * 0.5);
            p.vel = Vec2::new(0.0, speed);
            p.active = false;
            p.set_opacity(0.0);
        }
        self.clock = 0.0;
        self.resting = 0.0;
    }
}

impl Default for FallingPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl Pattern for FallingPattern {
    fn init(&mut self, ctx: &mut PatternContext<'_>) {
        let count = ctx.config.particle_count as usize;
        self.particles = ctx.alloc_dots(count, ctx.config.particle_size, ctx.config.base_color);
        self.reset(ctx.extent, ctx.config.falling.speed);
        for p in &self.particles {
            ctx.canvas.draw(p.handle, p.pos, p.size, p.opacity);
        }
    }

    fn update(&mut self, ctx: &mut PatternContext<'_>) {
        let tuning = &ctx.config.falling;
        let extent = ctx.extent;
        let dt = ctx.dt;

        if self.all_landed() {
            self.resting += dt;
            if self.resting >= tuning.pause_secs {
                self.reset(extent, tuning.speed);
            }
        } else {
            self.clock += dt;
        }

        let n = self.particles.len();
        let fade = if self.all_landed() && tuning.pause_secs > 0.0 {
            1.0 - clamp_unit(self.resting / tuning.pause_secs)
        } else {
            1.0
        };

        for (i, p) in self.particles.iter_mut().enumerate() {
            // columns follow the extent on resize
            p.pos.x = Self::column_x(i, n, extent);
            let floor = (extent.height - p.size * 0.5).max(0.0);
            let released = self.clock >= i as f32 * tuning.stagger_secs;

            if p.active {
                p.pos.y = floor;
                p.set_opacity(fade);
            } else if released {
                p.vel.y += tuning.acceleration * dt;
                p.pos.y += p.vel.y * dt;
                if p.pos.y >= floor {
                    p.pos.y = floor;
                    p.vel = Vec2::ZERO;
                    p.active = true;
                }
                p.set_opacity(1.0);
            }
            ctx.canvas.draw(p.handle, p.pos, p.size, p.opacity);
        }
    }

    fn particles(&self) -> &[Particle] {
        &self.particles
    }
}
