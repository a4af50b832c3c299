//! Host collaborator interfaces.
//!
//! The engine never owns a visual tree. It asks the host for the surface
//! extent, allocates opaque drawables through [`Surface`], mutates them every
//! tick, and asks the [`FrameClock`] to start or stop delivering ticks.

pub mod console;
mod render_buffer;

pub use render_buffer::{RenderBuffer, ATTRIBUTE_STRIDE, MAX_GRADIENT_STOPS};

use crate::core::math::easing::clamp_unit;
use crate::core::math::{GradientStop, Rgba, Vec2};

/// Opaque reference to one host primitive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DrawableHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum DrawableKind {
    Ellipse = 0,
    Rectangle = 1,
}

/// Fill written to a drawable; gradients are borrowed so per-frame updates never allocate
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fill<'a> {
    Solid(Rgba),
    RadialGradient(&'a [GradientStop]),
}

/// Visible surface size in px
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both sides finite and strictly positive
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    #[inline]
    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }

    #[inline]
    pub fn contains(&self, p: Vec2, margin: f32) -> bool {
        p.x >= -margin && p.x <= self.width + margin && p.y >= -margin && p.y <= self.height + margin
    }

    /// Distance from `p` to the nearest edge (negative outside)
    #[inline]
    pub fn edge_distance(&self, p: Vec2) -> f32 {
        p.x.min(p.y).min(self.width - p.x).min(self.height - p.y)
    }
}

/// Drawing surface provided by the hosting control
pub trait Surface {
    /// Current size; non-positive values mean "no geometry this frame"
    fn extent(&self) -> Extent;

    fn clear_drawables(&mut self);

    fn add_drawable(&mut self, kind: DrawableKind, width: f32, height: f32, fill: Fill<'_>) -> DrawableHandle;

    /// Center of the drawable in surface coordinates
    fn set_position(&mut self, handle: DrawableHandle, x: f32, y: f32);

    fn set_opacity(&mut self, handle: DrawableHandle, value: f32);

    fn set_fill(&mut self, handle: DrawableHandle, fill: Fill<'_>);

    fn set_size(&mut self, handle: DrawableHandle, width: f32, height: f32);

    /// Whole-control opacity used by the visibility fade
    fn set_surface_opacity(&mut self, value: f32);

    /// Start a continuous whole-surface rotation, one turn per `period_secs`.
    /// A negative period turns counter-clockwise.
    fn start_rotation(&mut self, period_secs: f32);

    fn stop_rotation(&mut self);
}

/// Continuous per-frame clock provided by the host
pub trait FrameClock {
    fn subscribe(&mut self);
    fn unsubscribe(&mut self);
}

/// Guarded writer over a [`Surface`].
///
/// Drops non-finite coordinates and sizes and clamps opacity so nothing
/// invalid ever reaches a drawable.
pub struct Canvas<'a> {
    surface: &'a mut dyn Surface,
    rejected: u32,
}

impl<'a> Canvas<'a> {
    pub fn new(surface: &'a mut dyn Surface) -> Self {
        Self { surface, rejected: 0 }
    }

    pub fn clear(&mut self) {
        self.surface.clear_drawables();
    }

    pub fn add(&mut self, kind: DrawableKind, width: f32, height: f32, fill: Fill<'_>) -> DrawableHandle {
        self.surface
            .add_drawable(kind, sanitize_length(width), sanitize_length(height), fill)
    }

    /// Add a round particle of diameter `size`
    pub fn add_dot(&mut self, size: f32, color: Rgba) -> DrawableHandle {
        self.add(DrawableKind::Ellipse, size, size, Fill::Solid(color))
    }

    pub fn set_position(&mut self, handle: DrawableHandle, pos: Vec2) {
        if pos.is_finite() {
            self.surface.set_position(handle, pos.x, pos.y);
        } else {
            self.rejected += 1;
        }
    }

    pub fn set_opacity(&mut self, handle: DrawableHandle, value: f32) {
        if value.is_nan() {
            self.rejected += 1;
            self.surface.set_opacity(handle, 0.0);
        } else {
            self.surface.set_opacity(handle, clamp_unit(value));
        }
    }

    pub fn set_size(&mut self, handle: DrawableHandle, width: f32, height: f32) {
        if width.is_finite() && height.is_finite() {
            self.surface.set_size(handle, width.max(0.0), height.max(0.0));
        } else {
            self.rejected += 1;
        }
    }

    pub fn set_fill(&mut self, handle: DrawableHandle, fill: Fill<'_>) {
        let finite = match fill {
            Fill::Solid(c) => is_finite_color(c),
            Fill::RadialGradient(stops) => stops
                .iter()
                .all(|s| s.offset.is_finite() && is_finite_color(s.color)),
        };
        if finite {
            self.surface.set_fill(handle, fill);
        } else {
            self.rejected += 1;
        }
    }

    /// Position, diameter and opacity in one call, the common per-tick write
    pub fn draw(&mut self, handle: DrawableHandle, pos: Vec2, size: f32, opacity: f32) {
        self.set_position(handle, pos);
        self.set_size(handle, size, size);
        self.set_opacity(handle, opacity);
    }

    /// Hide without moving (opacity 0)
    pub fn hide(&mut self, handle: DrawableHandle) {
        self.surface.set_opacity(handle, 0.0);
    }

    pub fn rejected_writes(&self) -> u32 {
        self.rejected
    }
}

#[inline]
fn sanitize_length(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[inline]
fn is_finite_color(c: Rgba) -> bool {
    c.r.is_finite() && c.g.is_finite() && c.b.is_finite() && c.a.is_finite()
}
