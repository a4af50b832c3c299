//! Bounce: free particles reflecting off the walls and each other.
//!
//! Equal masses, no gravity. Walls and collisions only ever remove energy
//! (restitution <= 1), so total kinetic energy never grows.

use crate::core::math::vec2::EPSILON;
use crate::core::math::Vec2;
use crate::domain::Particle;

use super::{Pattern, PatternContext};

pub struct BouncePattern {
    particles: Vec<Particle>,
}

/// Sum of `½·|v|²` over equal unit masses
pub fn kinetic_energy(particles: &[Particle]) -> f32 {
    particles.iter().map(|p| 0.5 * p.vel.length_squared()).sum()
}

/// Resolve one overlapping pair along the contact normal.
///
/// Overlap is split evenly between both bodies. Velocities only change when
/// the pair is approaching. Returns false for separated or coincident pairs.
pub fn resolve_pair(a: &mut Particle, b: &mut Particle, restitution: f32) -> bool {
    let delta = b.pos - a.pos;
    let dist_sq = delta.length_squared();
    let min_dist = (a.size + b.size) * 0.5;
    if dist_sq >= min_dist * min_dist || dist_sq <= EPSILON {
        return false;
    }

    let dist = dist_sq.sqrt();
    let normal = delta * (1.0 / dist);

    let correction = normal * ((min_dist - dist) * 0.5);
    a.pos -= correction;
    b.pos += correction;

    let approach = (b.vel - a.vel).dot(normal);
    if approach < 0.0 {
        let impulse = -(1.0 + restitution) * approach * 0.5;
        a.vel -= normal * impulse;
        b.vel += normal * impulse;
    }
    true
}

/// Keep `pos` within `[radius, side - radius]`, reflecting inbound velocity
fn bounce_axis(pos: &mut f32, vel: &mut f32, radius: f32, side: f32, restitution: f32) {
    let lo = radius.min(side * 0.5);
    let hi = (side - radius).max(side * 0.5);
    if *pos < lo {
        *pos = lo;
        if *vel < 0.0 {
            *vel = -*vel * restitution;
        }
    } else if *pos > hi {
        *pos = hi;
        if *vel > 0.0 {
            *vel = -*vel * restitution;
        }
    }
}

impl BouncePattern {
    pub fn new() -> Self {
        Self { particles: Vec::new() }
    }

    fn render(&self, ctx: &mut PatternContext<'_>) {
        for p in &self.particles {
            ctx.canvas.draw(p.handle, p.pos, p.size, p.opacity);
        }
    }
}

impl Default for BouncePattern {
    fn default() -> Self {
        Self::new()
    }
}

impl Pattern for BouncePattern {
    fn init(&mut self, ctx: &mut PatternContext<'_>) {
        let count = ctx.config.particle_count as usize;
        let size = ctx.config.particle_size;
        let speed = ctx.config.bounce.speed;
        let mut particles = ctx.alloc_dots(count, size, ctx.config.base_color);

        let radius = size * 0.5;
        let (w, h) = (ctx.extent.width, ctx.extent.height);
        for p in &mut particles {
            let x = if w > size { ctx.rng.range(radius, w - radius) } else { w * 0.5 };
            let y = if h > size { ctx.rng.range(radius, h - radius) } else { h * 0.5 };
            p.pos = Vec2::new(x, y);
            p.vel = Vec2::from_angle(ctx.rng.angle()) * (speed * ctx.rng.range(0.7, 1.0));
        }
        self.particles = particles;
        self.render(ctx);
    }

    fn update(&mut self, ctx: &mut PatternContext<'_>) {
        let restitution = ctx.config.bounce.restitution;
        let (w, h) = (ctx.extent.width, ctx.extent.height);

        for p in &mut self.particles {
            p.pos += p.vel * ctx.dt;
            let radius = p.size * 0.5;
            bounce_axis(&mut p.pos.x, &mut p.vel.x, radius, w, restitution);
            bounce_axis(&mut p.pos.y, &mut p.vel.y, radius, h, restitution);
        }

        let n = self.particles.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (head, tail) = self.particles.split_at_mut(j);
                resolve_pair(&mut head[i], &mut tail[0], restitution);
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
    use crate::domain::ShapeMode;
    use crate::host::{DrawableHandle, Extent};
    use crate::systems::patterns::harness::{config_for, Harness};

    fn body(x: f32, y: f32, vx: f32, vy: f32) -> Particle {
        let mut p = Particle::new(DrawableHandle(0), 6.0);
        p.pos = Vec2::new(x, y);
        p.vel = Vec2::new(vx, vy);
        p
    }

    #[test]
    fn kinetic_energy_never_increases() {
        let mut config = config_for(ShapeMode::Bounce, 24);
        config.bounce.restitution = 0.8;
        config.bounce.speed = 150.0;
        let mut h = Harness::new(config, Extent::new(80.0, 60.0));
        let mut bounce = BouncePattern::new();
        h.init(&mut bounce);

        let mut last = kinetic_energy(bounce.particles());
        for _ in 0..600 {
            h.step(&mut bounce, 1.0 / 60.0);
            let now = kinetic_energy(bounce.particles());
            assert!(now <= last * (1.0 + 1e-5) + 1e-4, "{now} > {last}");
            last = now;
        }
        h.assert_attributes_finite();
    }

    #[test]
    fn head_on_elastic_collision_swaps_normal_velocity() {
        let mut config = config_for(ShapeMode::Bounce, 2);
        config.bounce.restitution = 1.0;
        let mut h = Harness::new(config, Extent::new(100.0, 100.0));
        let mut bounce = BouncePattern::new();
        h.init(&mut bounce);
        bounce.particles[0].pos = Vec2::new(30.0, 50.0);
        bounce.particles[0].vel = Vec2::new(40.0, 0.0);
        bounce.particles[1].pos = Vec2::new(70.0, 50.0);
        bounce.particles[1].vel = Vec2::new(-40.0, 0.0);
        let energy = kinetic_energy(bounce.particles());

        // contact after ~0.43 s, walls are still > 1 s away afterwards
        h.steps(&mut bounce, 1.0 / 60.0, 36);

        let (a, b) = (&bounce.particles[0], &bounce.particles[1]);
        assert!((a.vel.x + 40.0).abs() < 1e-3, "{:?}", a.vel);
        assert!((b.vel.x - 40.0).abs() < 1e-3, "{:?}", b.vel);
        assert!(a.vel.y.abs() < 1e-4 && b.vel.y.abs() < 1e-4);
        assert!((kinetic_energy(bounce.particles()) - energy).abs() < 1e-2);
    }

    #[test]
    fn oblique_elastic_collision_keeps_tangential_part() {
        let mut a = body(0.0, 0.0, 10.0, 3.0);
        let mut b = body(5.0, 0.0, -2.0, -7.0);
        assert!(resolve_pair(&mut a, &mut b, 1.0));
        assert!((a.vel.x + 2.0).abs() < 1e-5 && (b.vel.x - 10.0).abs() < 1e-5);
        assert!((a.vel.y - 3.0).abs() < 1e-5 && (b.vel.y + 7.0).abs() < 1e-5);
        // overlap removed
        assert!(((b.pos - a.pos).length() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn coincident_pair_is_skipped() {
        let mut a = body(10.0, 10.0, 1.0, 0.0);
        let mut b = body(10.0, 10.0, -1.0, 0.0);
        assert!(!resolve_pair(&mut a, &mut b, 1.0));
        assert_eq!(a.vel, Vec2::new(1.0, 0.0));
        assert!(a.pos.is_finite() && b.pos.is_finite());
    }

    #[test]
    fn separating_pair_keeps_velocity() {
        let mut a = body(0.0, 0.0, -5.0, 0.0);
        let mut b = body(4.0, 0.0, 5.0, 0.0);
        assert!(resolve_pair(&mut a, &mut b, 1.0));
        assert_eq!(a.vel.x, -5.0);
        assert_eq!(b.vel.x, 5.0);
    }

    #[test]
    fn walls_reflect_with_restitution() {
        let (mut x, mut vx) = (-2.0_f32, -10.0_f32);
        bounce_axis(&mut x, &mut vx, 3.0, 50.0, 0.5);
        assert_eq!(x, 3.0);
        assert_eq!(vx, 5.0);

        // outbound velocity is left alone
        let (mut x, mut vx) = (49.0_f32, -10.0_f32);
        bounce_axis(&mut x, &mut vx, 3.0, 50.0, 0.5);
        assert_eq!(x, 47.0);
        assert_eq!(vx, -10.0);
    }
}
