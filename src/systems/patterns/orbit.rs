//! Orbit family: dots, rings, pulse, spiral and comet.
//!
//! Every particle's angle lives in `phase` and advances by `ω·dt`, so the
//! layout after `T` seconds is independent of how `T` was sliced into ticks.

use std::f32::consts::TAU;

use crate::core::math::easing::{deg_to_rad, oscillate, sequence_opacity, wrap_angle};
use crate::core::math::{Easing, Vec2};
use crate::domain::{Particle, ShapeMode};
use crate::host::Extent;

use super::{Pattern, PatternContext};

/// Ring `k` sits at `1 - RING_SHRINK·k/rings` of the full radius
const RING_SHRINK: f32 = 0.6;
/// Inner rings turn this much slower per ring index
const RING_SLOWDOWN: f32 = 0.2;
/// Smallest comet tail dot, relative to the head
const COMET_MIN_SCALE: f32 = 0.4;
const PULSE_SHRINK: f32 = 0.3;
/// Opacity lost across all rings; the innermost keeps the rest
const RING_DIMMING: f32 = 0.75;

pub struct OrbitPattern {
    mode: ShapeMode,
    particles: Vec<Particle>,
    /// Breathing phase shared by all pulse dots
    pulse_phase: f32,
}

/// Radius of the orbit circle so a dot of `size` stays inside the extent
pub fn orbit_radius(extent: Extent, size: f32, ratio: f32) -> f32 {
    ((extent.min_side() - size) * 0.5 * ratio).max(0.0)
}

impl OrbitPattern {
    pub fn new(mode: ShapeMode) -> Self {
        Self {
            mode,
            particles: Vec::new(),
            pulse_phase: 0.0,
        }
    }

    fn rings(ctx: &PatternContext<'_>) -> usize {
        ctx.config.orbit.ring_count.max(1) as usize
    }

    fn arms(ctx: &PatternContext<'_>) -> usize {
        ctx.config.orbit.arm_count.max(1) as usize
    }

    fn place(&mut self, ctx: &mut PatternContext<'_>) {
        let tuning = &ctx.config.orbit;
        let n = self.particles.len();
        let size = ctx.config.particle_size;

        match self.mode {
            ShapeMode::Rings => {
                let rings = Self::rings(ctx);
                let per_ring = n.div_ceil(rings).max(1);
                for (i, p) in self.particles.iter_mut().enumerate() {
                    let (ring, slot) = (i % rings, i / rings);
                    p.phase = slot as f32 * TAU / per_ring as f32 + ring as f32 * 0.5;
                    // outer ring brightest, innermost never fully transparent
                    p.set_opacity(1.0 - RING_DIMMING * ring as f32 / rings as f32);
                }
            }
            ShapeMode::Spiral => {
                let arms = Self::arms(ctx);
                let per_arm = n.div_ceil(arms).max(1);
                let twist = deg_to_rad(tuning.spiral_twist_deg);
                for (i, p) in self.particles.iter_mut().enumerate() {
                    let (arm, step) = (i % arms, i / arms);
                    p.phase = wrap_angle(arm as f32 * TAU / arms as f32 + step as f32 * twist);
                    // inner dots dimmer
                    p.set_opacity(sequence_opacity(step, per_arm, tuning.fade));
                }
            }
            ShapeMode::Comet => {
                let arc = deg_to_rad(tuning.arc_deg.abs()).min(TAU);
                let gap = if n > 1 { arc / (n - 1) as f32 } else { 0.0 };
                for (i, p) in self.particles.iter_mut().enumerate() {
                    p.phase = wrap_angle(i as f32 * gap);
                    let t = sequence_opacity(i, n, Easing::Linear);
                    p.set_opacity(sequence_opacity(i, n, tuning.fade));
                    p.size = size * (COMET_MIN_SCALE + (1.0 - COMET_MIN_SCALE) * t);
                }
            }
            _ => {
                for (i, p) in self.particles.iter_mut().enumerate() {
                    p.phase = i as f32 * TAU / n as f32;
                    let opacity = match self.mode {
                        ShapeMode::Dots => sequence_opacity(i, n, tuning.fade),
                        _ => 1.0,
                    };
                    p.set_opacity(opacity);
                }
            }
        }
    }

    fn render(&self, ctx: &mut PatternContext<'_>) {
        let tuning = &ctx.config.orbit;
        let center = ctx.extent.center();
        let size = ctx.config.particle_size;
        let radius = orbit_radius(ctx.extent, size, tuning.radius_ratio);
        let n = self.particles.len();

        for (i, p) in self.particles.iter().enumerate() {
            let (r, dot, opacity) = match self.mode {
                ShapeMode::Rings => {
                    let rings = Self::rings(ctx);
                    let ring = (i % rings) as f32;
                    (radius * (1.0 - RING_SHRINK * ring / rings as f32), p.size, p.opacity)
                }
                ShapeMode::Pulse => {
                    let breathe = oscillate(self.pulse_phase);
                    (
                        radius * (1.0 - tuning.pulse_depth * breathe),
                        p.size * (1.0 - PULSE_SHRINK * breathe),
                        0.4 + 0.6 * (1.0 - breathe),
                    )
                }
                ShapeMode::Spiral => {
                    let arms = Self::arms(ctx);
                    let per_arm = n.div_ceil(arms).max(1);
                    let step = i / arms;
                    (radius * (step + 1) as f32 / per_arm as f32, p.size, p.opacity)
                }
                _ => (radius, p.size, p.opacity),
            };
            ctx.canvas
                .draw(p.handle, Vec2::polar(center, r, p.phase), dot, opacity);
        }
    }
}

impl Pattern for OrbitPattern {
    fn init(&mut self, ctx: &mut PatternContext<'_>) {
        let count = ctx.config.particle_count as usize;
        self.particles = ctx.alloc_dots(count, ctx.config.particle_size, ctx.config.base_color);
        self.pulse_phase = 0.0;
        self.place(ctx);
        self.render(ctx);
    }

    fn update(&mut self, ctx: &mut PatternContext<'_>) {
        let tuning = &ctx.config.orbit;
        let step = deg_to_rad(tuning.angular_speed_deg) * ctx.dt;

        match self.mode {
            ShapeMode::Rings => {
                let rings = Self::rings(ctx);
                for (i, p) in self.particles.iter_mut().enumerate() {
                    let ring = i % rings;
                    // neighbouring rings counter-rotate
                    let dir = if ring % 2 == 0 { 1.0 } else { -1.0 };
                    let speed = dir * (1.0 - RING_SLOWDOWN * ring as f32 / rings as f32);
                    p.phase = wrap_angle(p.phase + step * speed);
                }
            }
            _ => {
                for p in &mut self.particles {
                    p.phase = wrap_angle(p.phase + step);
                }
            }
        }

        if self.mode == ShapeMode::Pulse {
            self.pulse_phase = wrap_angle(self.pulse_phase + deg_to_rad(tuning.pulse_speed_deg) * ctx.dt);
        }

        self.render(ctx);
    }

    fn particles(&self) -> &[Particle] {
        &self.particles
    }
}
