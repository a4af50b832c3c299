//! Shooting stars.
//!
//! Dormant stars pulse in place. Each nominal frame a dormant star may shoot
//! along a direction sampled from a cone (meteor) or the full circle (meteor
//! shower). Life is the number of frames until the head leaves the surface;
//! when it runs out the star goes dormant again somewhere else.

use crate::core::math::easing::{deg_to_rad, oscillate, spread_to_radians, tail_fade, wrap_angle};
use crate::core::math::vec2::EPSILON;
use crate::core::math::{Rgba, Vec2};
use crate::core::random::Rng;
use crate::domain::config::MeteorTuning;
use crate::domain::{Particle, ShapeMode, Trail};
use crate::host::Extent;

use super::{Pattern, PatternContext};

const DORMANT_MIN_OPACITY: f32 = 0.2;
/// Last trail segment is this fraction of the head size
const TRAIL_MIN_SCALE: f32 = 0.4;
/// How far the default trail color is darkened from the base
const TRAIL_DARKEN: f32 = 0.6;

pub struct MeteorPattern {
    mode: ShapeMode,
    particles: Vec<Particle>,
}

/// Frames until `pos` moving at `vel` per frame leaves `extent` grown by
/// `margin`. Never below one frame; a still star gets exactly one.
pub fn life_to_edge(pos: Vec2, vel: Vec2, extent: Extent, margin: f32) -> f32 {
    let axis = |p: f32, v: f32, side: f32| {
        if v > EPSILON {
            (side + margin - p) / v
        } else if v < -EPSILON {
            (-margin - p) / v
        } else {
            f32::INFINITY
        }
    };
    let frames = axis(pos.x, vel.x, extent.width).min(axis(pos.y, vel.y, extent.height));
    if frames.is_finite() {
        frames.max(1.0)
    } else {
        1.0
    }
}

/// Probability that at least one of `frames` independent per-frame rolls hits
fn chance_over(per_frame: f32, frames: f32) -> f32 {
    if frames <= 0.0 {
        return 0.0;
    }
    1.0 - (1.0 - per_frame).powf(frames)
}

impl MeteorPattern {
    pub fn new(mode: ShapeMode) -> Self {
        Self {
            mode,
            particles: Vec::new(),
        }
    }

    fn go_dormant(p: &mut Particle, extent: Extent, rng: &mut Rng) {
        p.pos = Vec2::new(rng.range(0.0, extent.width), rng.range(0.0, extent.height));
        p.vel = Vec2::ZERO;
        p.phase = rng.angle();
        p.active = false;
        p.life = 0.0;
        p.initial_life = 0.0;
        p.set_opacity(DORMANT_MIN_OPACITY + (1.0 - DORMANT_MIN_OPACITY) * oscillate(p.phase));
    }

    fn launch(&self, p: &mut Particle, extent: Extent, tuning: &MeteorTuning, rng: &mut Rng) {
        let heading = match self.mode {
            ShapeMode::MeteorShower => rng.angle(),
            _ => {
                let half = spread_to_radians(tuning.spread_deg) * 0.5;
                deg_to_rad(tuning.direction_deg) + rng.range(-half, half)
            }
        };
        p.vel = Vec2::from_angle(heading) * (tuning.speed * rng.range(0.8, 1.2));
        let life = life_to_edge(p.pos, p.vel, extent, tuning.margin);
        p.set_life(life);
        p.initial_life = p.life;
        p.active = true;
        p.set_opacity(1.0);
    }

    fn render(&self, ctx: &mut PatternContext<'_>) {
        let spacing = ctx.config.meteor.trail_spacing;
        for p in &self.particles {
            ctx.canvas.draw(p.handle, p.pos, p.size, p.opacity);
            let segments = p.trail.handles();
            if !p.active {
                for &handle in segments {
                    ctx.canvas.hide(handle);
                }
                continue;
            }

            let speed = p.vel.length();
            let traveled = speed * (p.initial_life - p.life);
            let back = p.vel.try_normalize().map(|d| -d).unwrap_or(Vec2::ZERO);
            let len = segments.len() as f32;
            for (k, &handle) in segments.iter().enumerate() {
                let lag = spacing * (k + 1) as f32;
                if lag > traveled {
                    ctx.canvas.hide(handle);
                    continue;
                }
                let t = (k + 1) as f32 / (len + 1.0);
                let size = p.size * (1.0 - (1.0 - TRAIL_MIN_SCALE) * t);
                ctx.canvas.draw(handle, p.pos + back * lag, size, p.opacity * (1.0 - t));
            }
        }
    }
}

impl Pattern for MeteorPattern {
    fn init(&mut self, ctx: &mut PatternContext<'_>) {
        let tuning = &ctx.config.meteor;
        let count = ctx.config.particle_count as usize;
        let size = ctx.config.particle_size;
        let base = ctx.config.base_color;
        let tint = tuning
            .trail_color
            .unwrap_or_else(|| base.darken(TRAIL_DARKEN, ctx.config.gamma));
        let trail_len = tuning.trail_length as usize;

        ctx.canvas.clear();
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            let head = ctx.canvas.add_dot(size, base);
            let segments = (0..trail_len)
                .map(|k| {
                    let t = (k + 1) as f32 / trail_len as f32;
                    ctx.canvas.add_dot(size, trail_color(base, tint, t))
                })
                .collect();
            let mut p = Particle::new(head, size).with_trail(Trail::new(segments));
            Self::go_dormant(&mut p, ctx.extent, ctx.rng);
            particles.push(p);
        }
        self.particles = particles;
        self.render(ctx);
    }

    fn update(&mut self, ctx: &mut PatternContext<'_>) {
        let tuning = &ctx.config.meteor;
        let frames = ctx.frames();
        let shoot = chance_over(tuning.shoot_chance, frames);
        let extent = ctx.extent;

        let mut particles = std::mem::take(&mut self.particles);
        for p in &mut particles {
            if p.active {
                p.pos += p.vel * frames.min(p.life);
                p.set_life(p.life - frames);
                if p.life <= 0.0 {
                    Self::go_dormant(p, extent, ctx.rng);
                } else {
                    p.set_opacity(tail_fade(p.life_fraction(), tuning.fade_fraction));
                }
            } else {
                p.phase = wrap_angle(p.phase + tuning.pulse_speed * ctx.dt);
                p.set_opacity(DORMANT_MIN_OPACITY + (1.0 - DORMANT_MIN_OPACITY) * oscillate(p.phase));
                if ctx.rng.chance(shoot) {
                    self.launch(p, extent, tuning, ctx.rng);
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

fn trail_color(base: Rgba, tint: Rgba, t: f32) -> Rgba {
    base.lerp(tint, t)
}
