//! Perimeter walks: dots chasing each other around a rounded rectangle
//! (square) or scrolling bars across the middle (stripe).

use std::f32::consts::{FRAC_PI_2, PI};

use crate::core::math::easing::sequence_opacity;
use crate::core::math::vec2::EPSILON;
use crate::core::math::Vec2;
use crate::domain::{Particle, ShapeMode};
use crate::host::{DrawableKind, Extent, Fill};

use super::{Pattern, PatternContext};

/// Stripe bars are this much taller than wide, relative to the particle size
const BAR_WIDTH: f32 = 0.6;
const BAR_HEIGHT: f32 = 2.0;

pub struct PerimeterPattern {
    mode: ShapeMode,
    particles: Vec<Particle>,
    /// Distance of the leading particle along the path
    head: f32,
}

/// Rounded rectangle the square walk follows
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedRect {
    pub origin: Vec2,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
}

impl RoundedRect {
    /// Radius is clamped so opposite corners never overlap
    pub fn new(origin: Vec2, width: f32, height: f32, radius: f32) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let radius = radius.clamp(0.0, width.min(height) * 0.5);
        Self { origin, width, height, radius }
    }

    pub fn perimeter(&self) -> f32 {
        2.0 * (self.width + self.height - 4.0 * self.radius) + 2.0 * PI * self.radius
    }
}

/// Map a distance along the outline to a point.
///
/// The walk starts where the top edge leaves the top-left corner and runs
/// clockwise (y grows downward). `offset` wraps around the perimeter.
pub fn rounded_rect_point(rect: &RoundedRect, offset: f32) -> Vec2 {
    let total = rect.perimeter();
    if total <= EPSILON {
        return rect.origin;
    }
    let RoundedRect { origin: o, width: w, height: h, radius: r } = *rect;
    let straight_x = w - 2.0 * r;
    let straight_y = h - 2.0 * r;
    let arc = FRAC_PI_2 * r;

    let corner = |cx: f32, cy: f32, start: f32, s: f32| Vec2::polar(Vec2::new(cx, cy), r, start + s / r);

    let mut s = offset.rem_euclid(total);
    if s < straight_x {
        return Vec2::new(o.x + r + s, o.y);
    }
    s -= straight_x;
    if s < arc {
        return corner(o.x + w - r, o.y + r, -FRAC_PI_2, s);
    }
    s -= arc;
    if s < straight_y {
        return Vec2::new(o.x + w, o.y + r + s);
    }
    s -= straight_y;
    if s < arc {
        return corner(o.x + w - r, o.y + h - r, 0.0, s);
    }
    s -= arc;
    if s < straight_x {
        return Vec2::new(o.x + w - r - s, o.y + h);
    }
    s -= straight_x;
    if s < arc {
        return corner(o.x + r, o.y + h - r, FRAC_PI_2, s);
    }
    s -= arc;
    if s < straight_y {
        return Vec2::new(o.x, o.y + h - r - s);
    }
    s -= straight_y;
    if s < arc {
        return corner(o.x + r, o.y + r, PI, s);
    }
    Vec2::new(o.x + r, o.y)
}

impl PerimeterPattern {
    pub fn new(mode: ShapeMode) -> Self {
        Self {
            mode,
            particles: Vec::new(),
            head: 0.0,
        }
    }

    fn track(extent: Extent, size: f32, corner_radius: f32) -> RoundedRect {
        let inset = size * 0.5;
        RoundedRect::new(
            Vec2::new(inset, inset),
            extent.width - 2.0 * inset,
            extent.height - 2.0 * inset,
            corner_radius,
        )
    }

    /// Length of one lap for the current mode
    fn lap(&self, extent: Extent, size: f32, corner_radius: f32) -> f32 {
        match self.mode {
            ShapeMode::Stripe => extent.width + size,
            _ => Self::track(extent, size, corner_radius).perimeter(),
        }
    }

    fn render(&self, ctx: &mut PatternContext<'_>) {
        let tuning = &ctx.config.perimeter;
        let size = ctx.config.particle_size;
        let n = self.particles.len();
        let rect = Self::track(ctx.extent, size, tuning.corner_radius);
        let lap = self.lap(ctx.extent, size, tuning.corner_radius);

        for (i, p) in self.particles.iter().enumerate() {
            let along = self.head - i as f32 * tuning.spacing;
            // leader brightest
            let opacity = sequence_opacity(n - 1 - i, n, tuning.fade);
            match self.mode {
                ShapeMode::Stripe => {
                    let x = if lap > EPSILON { along.rem_euclid(lap) - size * 0.5 } else { 0.0 };
                    ctx.canvas
                        .set_position(p.handle, Vec2::new(x, ctx.extent.height * 0.5));
                    ctx.canvas.set_opacity(p.handle, opacity);
                }
                _ => {
                    ctx.canvas
                        .draw(p.handle, rounded_rect_point(&rect, along), p.size, opacity);
                }
            }
        }
    }
}

impl Pattern for PerimeterPattern {
    fn init(&mut self, ctx: &mut PatternContext<'_>) {
        let count = ctx.config.particle_count as usize;
        let size = ctx.config.particle_size;
        let color = ctx.config.base_color;
        self.particles = match self.mode {
            ShapeMode::Stripe => {
                ctx.canvas.clear();
                (0..count)
                    .map(|_| {
                        let handle = ctx.canvas.add(
                            DrawableKind::Rectangle,
                            size * BAR_WIDTH,
                            size * BAR_HEIGHT,
                            Fill::Solid(color),
                        );
                        Particle::new(handle, size)
                    })
                    .collect()
            }
            _ => ctx.alloc_dots(count, size, color),
        };
        let n = self.particles.len();
        for (i, p) in self.particles.iter_mut().enumerate() {
            p.set_opacity(sequence_opacity(n - 1 - i, n, ctx.config.perimeter.fade));
        }
        self.head = 0.0;
        self.render(ctx);
    }

    fn update(&mut self, ctx: &mut PatternContext<'_>) {
        let tuning = &ctx.config.perimeter;
        let lap = self.lap(ctx.extent, ctx.config.particle_size, tuning.corner_radius);
        self.head = if lap > EPSILON {
            (self.head + tuning.speed * ctx.dt).rem_euclid(lap)
        } else {
            0.0
        };
        self.render(ctx);
    }

    fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::patterns::harness::{config_for, Harness};

    fn on_outline(rect: &RoundedRect, p: Vec2) -> bool {
        let o = rect.origin;
        let inside = p.x >= o.x - 1e-3
            && p.x <= o.x + rect.width + 1e-3
            && p.y >= o.y - 1e-3
            && p.y <= o.y + rect.height + 1e-3;
        let edge = (p.x - o.x).abs() < 1e-3
            || (p.x - o.x - rect.width).abs() < 1e-3
            || (p.y - o.y).abs() < 1e-3
            || (p.y - o.y - rect.height).abs() < 1e-3;
        let corner = [
            Vec2::new(o.x + rect.radius, o.y + rect.radius),
            Vec2::new(o.x + rect.width - rect.radius, o.y + rect.radius),
            Vec2::new(o.x + rect.width - rect.radius, o.y + rect.height - rect.radius),
            Vec2::new(o.x + rect.radius, o.y + rect.height - rect.radius),
        ]
        .iter()
        .any(|c| ((p - *c).length() - rect.radius).abs() < 1e-3);
        inside && (edge || corner)
    }

    #[test]
    fn walk_stays_on_the_outline_and_is_continuous() {
        let rect = RoundedRect::new(Vec2::new(3.0, 3.0), 40.0, 30.0, 6.0);
        let total = rect.perimeter();
        let steps = 500;
        let mut last = rounded_rect_point(&rect, 0.0);
        assert_eq!(last, Vec2::new(9.0, 3.0));
        for k in 1..=steps {
            let s = total * k as f32 / steps as f32;
            let p = rounded_rect_point(&rect, s);
            assert!(on_outline(&rect, p), "{s}: {p:?}");
            assert!((p - last).length() <= total / steps as f32 + 1e-3);
            last = p;
        }
    }

    #[test]
    fn sharp_corners_and_wrapping() {
        let rect = RoundedRect::new(Vec2::ZERO, 10.0, 10.0, 0.0);
        assert_eq!(rect.perimeter(), 40.0);
        assert_eq!(rounded_rect_point(&rect, 10.0), Vec2::new(10.0, 0.0));
        assert_eq!(rounded_rect_point(&rect, 25.0), Vec2::new(5.0, 10.0));
        assert_eq!(rounded_rect_point(&rect, -5.0), Vec2::new(0.0, 5.0));
        assert_eq!(rounded_rect_point(&rect, 45.0), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn degenerate_rect_collapses_to_origin() {
        let rect = RoundedRect::new(Vec2::new(2.0, 2.0), -4.0, 0.0, 6.0);
        assert_eq!(rect.radius, 0.0);
        assert_eq!(rounded_rect_point(&rect, 17.0), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn head_advances_by_speed_times_time() {
        let mut config = config_for(ShapeMode::Square, 4);
        config.perimeter.speed = 30.0;
        let mut h = Harness::new(config, Extent::new(100.0, 100.0));
        let mut walk = PerimeterPattern::new(ShapeMode::Square);
        h.init(&mut walk);
        h.steps(&mut walk, 0.1, 10);
        assert!((walk.head - 30.0).abs() < 1e-3);

        let rect = PerimeterPattern::track(Extent::new(100.0, 100.0), 6.0, 6.0);
        let second = walk.particles()[1].handle;
        let attrs = h.buffer.attributes_of(second).unwrap();
        let expected = rounded_rect_point(&rect, 20.0);
        assert!((attrs[0] - expected.x).abs() < 1e-3 && (attrs[1] - expected.y).abs() < 1e-3);
    }

    #[test]
    fn stripe_bars_stay_in_the_band() {
        let mut config = config_for(ShapeMode::Stripe, 6);
        config.perimeter.speed = 250.0;
        let extent = Extent::new(90.0, 20.0);
        let mut h = Harness::new(config, extent);
        let mut stripe = PerimeterPattern::new(ShapeMode::Stripe);
        h.init(&mut stripe);
        for _ in 0..100 {
            h.step(&mut stripe, 1.0 / 60.0);
            for p in stripe.particles() {
                let attrs = h.buffer.attributes_of(p.handle).unwrap();
                assert!(attrs[0] >= -3.0 - 1e-4 && attrs[0] <= 93.0 + 1e-4);
                assert_eq!(attrs[1], 10.0);
                assert_eq!(attrs[5], 1.0);
            }
        }
    }
}
