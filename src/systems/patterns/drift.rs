//! Drift family: snow, wind and starfield.
//!
//! `pos` holds the unswayed track; the lateral sway is added only when
//! drawing so it never accumulates into the track.

use crate::core::math::easing::clamp_unit;
use crate::core::math::Vec2;
use crate::core::random::Rng;
use crate::domain::config::DriftTuning;
use crate::domain::{Particle, ShapeMode};
use crate::host::Extent;

use super::{Pattern, PatternContext};

/// Starfield stars never slow below this fraction of full speed
const STAR_MIN_SPEED: f32 = 0.2;
/// Respawned stars start within this many px of the center
const STAR_SPAWN_RADIUS: f32 = 2.0;

pub struct DriftPattern {
    mode: ShapeMode,
    particles: Vec<Particle>,
}

impl DriftPattern {
    pub fn new(mode: ShapeMode) -> Self {
        Self {
            mode,
            particles: Vec::new(),
        }
    }

    /// Fresh track for a flake or gust. `scatter` places it anywhere on the
    /// surface; otherwise it enters from the upstream edge.
    fn spawn_flow(&self, p: &mut Particle, extent: Extent, tuning: &DriftTuning, base_size: f32, rng: &mut Rng, scatter: bool) {
        let speed = tuning.speed * rng.range(0.6, 1.4);
        let (along, across) = match self.mode {
            ShapeMode::Wind => (extent.width, extent.height),
            _ => (extent.height, extent.width),
        };
        let start = if scatter { rng.range(0.0, along) } else { -tuning.margin };
        let lateral = rng.range(0.0, across);
        (p.pos, p.vel) = match self.mode {
            ShapeMode::Wind => (Vec2::new(start, lateral), Vec2::new(speed, 0.0)),
            _ => (Vec2::new(lateral, start), Vec2::new(0.0, speed)),
        };
        p.phase = rng.angle();
        p.size = base_size * rng.range(0.5, 1.0);
        p.set_opacity(rng.range(0.4, 1.0));
    }

    fn spawn_star(p: &mut Particle, extent: Extent, tuning: &DriftTuning, rng: &mut Rng, scatter: bool) {
        let heading = rng.angle();
        let dir = Vec2::from_angle(heading);
        let reach = if scatter {
            rng.range(0.0, star_reach(extent))
        } else {
            rng.range(0.0, STAR_SPAWN_RADIUS)
        };
        p.pos = extent.center() + dir * reach;
        p.vel = dir * (tuning.speed * rng.range(0.7, 1.3));
        p.phase = heading;
    }

    fn is_gone(&self, p: &Particle, extent: Extent, margin: f32) -> bool {
        match self.mode {
            ShapeMode::Snow => p.pos.y > extent.height + margin || p.pos.x > extent.width + margin,
            ShapeMode::Wind => p.pos.x > extent.width + margin || p.pos.y > extent.height + margin,
            _ => !extent.contains(p.pos, margin),
        }
    }

    fn render(&mut self, ctx: &mut PatternContext<'_>) {
        let tuning = &ctx.config.drift;
        let base_size = ctx.config.particle_size;
        let reach = star_reach(ctx.extent);
        let center = ctx.extent.center();

        for p in &mut self.particles {
            let sway = tuning.sway_amplitude * p.phase.sin();
            match self.mode {
                ShapeMode::Snow => {
                    ctx.canvas.draw(p.handle, p.pos + Vec2::new(sway, 0.0), p.size, p.opacity);
                }
                ShapeMode::Wind => {
                    ctx.canvas.draw(p.handle, p.pos + Vec2::new(0.0, sway), p.size, p.opacity);
                }
                _ => {
                    let depth = clamp_unit((p.pos - center).length() / reach);
                    p.size = base_size * (0.3 + 0.7 * depth);
                    p.set_opacity(0.2 + 0.8 * depth);
                    ctx.canvas.draw(p.handle, p.pos, p.size, p.opacity);
                }
            }
        }
    }
}

/// Half diagonal, the distance at which a star reaches full size
fn star_reach(extent: Extent) -> f32 {
    extent.center().length().max(1.0)
}

impl Pattern for DriftPattern {
    fn init(&mut self, ctx: &mut PatternContext<'_>) {
        let count = ctx.config.particle_count as usize;
        let base_size = ctx.config.particle_size;
        let mut particles = ctx.alloc_dots(count, base_size, ctx.config.base_color);
        let tuning = &ctx.config.drift;
        for p in &mut particles {
            match self.mode {
                ShapeMode::Starfield => Self::spawn_star(p, ctx.extent, tuning, ctx.rng, true),
                _ => self.spawn_flow(p, ctx.extent, tuning, base_size, ctx.rng, true),
            }
        }
        self.particles = particles;
        self.render(ctx);
    }

    fn update(&mut self, ctx: &mut PatternContext<'_>) {
        let tuning = &ctx.config.drift;
        let base_size = ctx.config.particle_size;
        let extent = ctx.extent;
        let center = extent.center();
        let reach = star_reach(extent);
        let dt = ctx.dt;

        let mut particles = std::mem::take(&mut self.particles);
        for p in &mut particles {
            match self.mode {
                ShapeMode::Starfield => {
                    let depth = clamp_unit((p.pos - center).length() / reach);
                    p.pos += p.vel * ((STAR_MIN_SPEED + (1.0 - STAR_MIN_SPEED) * depth) * dt);
                }
                _ => {
                    p.pos += p.vel * dt;
                    p.phase = (p.phase + tuning.sway_frequency * dt) % std::f32::consts::TAU;
                }
            }
            if self.is_gone(p, extent, tuning.margin) {
                match self.mode {
                    ShapeMode::Starfield => Self::spawn_star(p, extent, tuning, ctx.rng, false),
                    _ => self.spawn_flow(p, extent, tuning, base_size, ctx.rng, false),
                }
            }
        }
        self.particles = particles;
        self.render(ctx);
    }

    fn particles(&self) -> &[Particle] {
        &self.particles
    }
}
