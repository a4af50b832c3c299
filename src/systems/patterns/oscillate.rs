//! Oscillating patterns: twinkle, gradient twinkle and wave.
//!
//! Twinkling particles carry their own phase, seeded with a random offset so
//! they never pulse in unison. Opacity is `0.5 + 0.5·sin(phase)`.

use std::f32::consts::FRAC_PI_2;

use crate::core::math::easing::{deg_to_rad, oscillate, wrap_angle};
use crate::core::math::{GradientStop, Rgba, Vec2};
use crate::domain::{Particle, ShapeMode};
use crate::host::Fill;

use super::{Pattern, PatternContext};

/// Where the middle gradient stop sits at rest and how far it swings
const MID_STOP_BASE: f32 = 0.3;
const MID_STOP_SWING: f32 = 0.4;
const WAVE_MIN_OPACITY: f32 = 0.4;

pub struct OscillatePattern {
    mode: ShapeMode,
    particles: Vec<Particle>,
    /// One gradient per particle, rewritten in place every tick
    gradients: Vec<[GradientStop; 3]>,
    /// Shared wave phase
    clock: f32,
}

/// Three-stop radial gradient: bright core, base body, transparent rim
fn shade(stops: &mut [GradientStop; 3], base: Rgba, highlight: f32, gamma: f32, phase: f32) {
    let swing = oscillate(phase + FRAC_PI_2);
    stops[0] = GradientStop::new(0.0, base.brighten(highlight * swing, gamma));
    stops[1] = GradientStop::new(MID_STOP_BASE + MID_STOP_SWING * swing, base);
    stops[2] = GradientStop::new(1.0, base.with_alpha(0.0));
}

impl OscillatePattern {
    pub fn new(mode: ShapeMode) -> Self {
        Self {
            mode,
            particles: Vec::new(),
            gradients: Vec::new(),
            clock: 0.0,
        }
    }

    pub fn gradients(&self) -> &[[GradientStop; 3]] {
        &self.gradients
    }

    fn render(&mut self, ctx: &mut PatternContext<'_>) {
        let tuning = &ctx.config.oscillate;
        let extent = ctx.extent;
        let n = self.particles.len();

        match self.mode {
            ShapeMode::Wave => {
                let size = ctx.config.particle_size;
                let amplitude = tuning.wave_amplitude * (extent.height * 0.5 - size * 0.5).max(0.0);
                let step = deg_to_rad(tuning.wave_step_deg);
                for (i, p) in self.particles.iter_mut().enumerate() {
                    let phase = self.clock - i as f32 * step;
                    p.phase = wrap_angle(phase);
                    p.pos = Vec2::new(
                        (i as f32 + 0.5) * extent.width / n.max(1) as f32,
                        extent.height * 0.5 + amplitude * phase.sin(),
                    );
                    p.set_opacity(WAVE_MIN_OPACITY + (1.0 - WAVE_MIN_OPACITY) * oscillate(phase));
                    ctx.canvas.draw(p.handle, p.pos, p.size, p.opacity);
                }
            }
            _ => {
                let base = ctx.config.base_color;
                let gamma = ctx.config.gamma;
                for (i, p) in self.particles.iter_mut().enumerate() {
                    p.set_opacity(oscillate(p.phase));
                    ctx.canvas.draw(p.handle, p.pos, p.size, p.opacity);
                    if let Some(stops) = self.gradients.get_mut(i) {
                        shade(stops, base, tuning.highlight, gamma, p.phase);
                        ctx.canvas.set_fill(p.handle, Fill::RadialGradient(&stops[..]));
                    }
                }
            }
        }
    }
}

impl Pattern for OscillatePattern {
    fn init(&mut self, ctx: &mut PatternContext<'_>) {
        let count = ctx.config.particle_count as usize;
        let size = ctx.config.particle_size;
        let base = ctx.config.base_color;
        let mut particles = ctx.alloc_dots(count, size, base);

        let (w, h) = (ctx.extent.width, ctx.extent.height);
        let half = size * 0.5;
        for p in &mut particles {
            let x = if w > size { ctx.rng.range(half, w - half) } else { w * 0.5 };
            let y = if h > size { ctx.rng.range(half, h - half) } else { h * 0.5 };
            p.pos = Vec2::new(x, y);
            p.phase = ctx.rng.angle();
            p.size = size * ctx.rng.range(0.6, 1.0);
        }

        self.gradients = match self.mode {
            ShapeMode::GradientTwinkle => {
                vec![[GradientStop::new(0.0, base); 3]; count]
            }
            _ => Vec::new(),
        };
        self.particles = particles;
        self.clock = 0.0;
        self.render(ctx);
    }

    fn update(&mut self, ctx: &mut PatternContext<'_>) {
        let step = ctx.config.oscillate.speed * ctx.dt;
        match self.mode {
            ShapeMode::Wave => self.clock = wrap_angle(self.clock + step),
            _ => {
                for p in &mut self.particles {
                    p.phase = wrap_angle(p.phase + step);
                }
            }
        }
        self.render(ctx);
    }

    fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Extent;
    use crate::systems::patterns::harness::{config_for, Harness};

    #[test]
    fn twinkle_follows_its_own_phase() {
        let mut config = config_for(ShapeMode::Twinkle, 8);
        config.oscillate.speed = 2.0;
        let mut h = Harness::new(config, Extent::new(80.0, 80.0));
        let mut twinkle = OscillatePattern::new(ShapeMode::Twinkle);
        h.init(&mut twinkle);
        let start: Vec<f32> = twinkle.particles().iter().map(|p| p.phase).collect();
        // offsets differ, so the stars do not pulse together
        assert!(start.windows(2).any(|w| (w[0] - w[1]).abs() > 1e-3));

        h.steps(&mut twinkle, 0.05, 20);
        for (p, s) in twinkle.particles().iter().zip(start) {
            let expected = wrap_angle(s + 2.0);
            let diff = wrap_angle(p.phase - expected + 1.0) - 1.0;
            assert!(diff.abs() < 1e-3);
            assert!((p.opacity - (0.5 + 0.5 * p.phase.sin())).abs() < 1e-5);
        }
    }

    #[test]
    fn gradient_stops_stay_ordered() {
        let mut h = Harness::new(config_for(ShapeMode::GradientTwinkle, 5), Extent::new(60.0, 60.0));
        let mut twinkle = OscillatePattern::new(ShapeMode::GradientTwinkle);
        h.init(&mut twinkle);
        for _ in 0..30 {
            h.step(&mut twinkle, 1.0 / 30.0);
            assert_eq!(twinkle.gradients().len(), 5);
            for (stops, p) in twinkle.gradients().iter().zip(twinkle.particles()) {
                assert!(stops.windows(2).all(|w| w[0].offset <= w[1].offset));
                assert!(stops.iter().all(|s| (0.0..=1.0).contains(&s.offset)));
                let (offsets, _) = h.buffer.gradient_of(p.handle).unwrap();
                assert_eq!(offsets.len(), 3);
            }
        }
    }

    #[test]
    fn wave_dots_stay_in_their_columns_and_band() {
        let extent = Extent::new(90.0, 40.0);
        let mut h = Harness::new(config_for(ShapeMode::Wave, 6), extent);
        let mut wave = OscillatePattern::new(ShapeMode::Wave);
        h.init(&mut wave);
        let amplitude = 0.5 * (20.0 - 3.0);
        for _ in 0..50 {
            h.step(&mut wave, 1.0 / 20.0);
            for (i, p) in wave.particles().iter().enumerate() {
                assert!((p.pos.x - (i as f32 + 0.5) * 15.0).abs() < 1e-4);
                assert!((p.pos.y - 20.0).abs() <= amplitude + 1e-4);
            }
        }
    }
}
