//! In-memory surface.
//!
//! Drawable attributes live in flat, tightly packed arrays so a JS host can
//! read them straight out of wasm memory each frame (see `AbiLayout`).

use crate::core::math::easing::clamp_unit;

use super::{DrawableHandle, DrawableKind, Extent, Fill, Surface};

/// `[x, y, width, height, opacity, kind]` per drawable
pub const ATTRIBUTE_STRIDE: usize = 6;
pub const MAX_GRADIENT_STOPS: usize = 4;

#[derive(Debug)]
pub struct RenderBuffer {
    extent: Extent,
    attributes: Vec<f32>,
    /// Packed 0xRRGGBBAA solid fill (first stop for gradients)
    colors: Vec<u32>,
    gradient_offsets: Vec<f32>,
    gradient_colors: Vec<u32>,
    gradient_lens: Vec<u32>,
    surface_opacity: f32,
    rotation_period: Option<f32>,
    /// Bumped whenever the drawable list is rebuilt
    generation: u32,
}

impl RenderBuffer {
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            attributes: Vec::new(),
            colors: Vec::new(),
            gradient_offsets: Vec::new(),
            gradient_colors: Vec::new(),
            gradient_lens: Vec::new(),
            surface_opacity: 0.0,
            rotation_period: None,
            generation: 0,
        }
    }

    pub fn set_extent(&mut self, extent: Extent) {
        self.extent = extent;
    }

    pub fn drawable_count(&self) -> usize {
        self.colors.len()
    }

    pub fn attributes(&self) -> &[f32] {
        &self.attributes
    }

    pub fn colors(&self) -> &[u32] {
        &self.colors
    }

    pub fn gradient_offsets(&self) -> &[f32] {
        &self.gradient_offsets
    }

    pub fn gradient_colors(&self) -> &[u32] {
        &self.gradient_colors
    }

    pub fn gradient_lens(&self) -> &[u32] {
        &self.gradient_lens
    }

    pub fn attributes_of(&self, handle: DrawableHandle) -> Option<&[f32]> {
        let start = handle.0 as usize * ATTRIBUTE_STRIDE;
        self.attributes.get(start..start + ATTRIBUTE_STRIDE)
    }

    pub fn color_of(&self, handle: DrawableHandle) -> Option<u32> {
        self.colors.get(handle.0 as usize).copied()
    }

    pub fn gradient_of(&self, handle: DrawableHandle) -> Option<(&[f32], &[u32])> {
        let idx = handle.0 as usize;
        let len = *self.gradient_lens.get(idx)? as usize;
        let start = idx * MAX_GRADIENT_STOPS;
        Some((
            &self.gradient_offsets[start..start + len],
            &self.gradient_colors[start..start + len],
        ))
    }

    pub fn surface_opacity(&self) -> f32 {
        self.surface_opacity
    }

    pub fn rotation_period(&self) -> Option<f32> {
        self.rotation_period
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    fn write_fill(&mut self, idx: usize, fill: Fill<'_>) {
        let start = idx * MAX_GRADIENT_STOPS;
        match fill {
            Fill::Solid(color) => {
                self.colors[idx] = color.to_u32();
                self.gradient_lens[idx] = 0;
            }
            Fill::RadialGradient(stops) => {
                let len = stops.len().min(MAX_GRADIENT_STOPS);
                for (k, stop) in stops.iter().take(len).enumerate() {
                    self.gradient_offsets[start + k] = clamp_unit(stop.offset);
                    self.gradient_colors[start + k] = stop.color.to_u32();
                }
                if let Some(first) = stops.first() {
                    self.colors[idx] = first.color.to_u32();
                }
                self.gradient_lens[idx] = len as u32;
            }
        }
    }
}

impl Surface for RenderBuffer {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn clear_drawables(&mut self) {
        self.attributes.clear();
        self.colors.clear();
        self.gradient_offsets.clear();
        self.gradient_colors.clear();
        self.gradient_lens.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    fn add_drawable(&mut self, kind: DrawableKind, width: f32, height: f32, fill: Fill<'_>) -> DrawableHandle {
        let idx = self.colors.len();
        self.attributes
            .extend_from_slice(&[0.0, 0.0, width, height, 0.0, kind as u8 as f32]);
        self.colors.push(0);
        self.gradient_offsets.extend_from_slice(&[0.0; MAX_GRADIENT_STOPS]);
        self.gradient_colors.extend_from_slice(&[0; MAX_GRADIENT_STOPS]);
        self.gradient_lens.push(0);
        self.write_fill(idx, fill);
        DrawableHandle(idx as u32)
    }

    fn set_position(&mut self, handle: DrawableHandle, x: f32, y: f32) {
        let start = handle.0 as usize * ATTRIBUTE_STRIDE;
        if let Some(slot) = self.attributes.get_mut(start..start + 2) {
            slot[0] = x;
            slot[1] = y;
        }
    }

    fn set_opacity(&mut self, handle: DrawableHandle, value: f32) {
        let idx = handle.0 as usize * ATTRIBUTE_STRIDE + 4;
        if let Some(slot) = self.attributes.get_mut(idx) {
            *slot = value;
        }
    }

    fn set_fill(&mut self, handle: DrawableHandle, fill: Fill<'_>) {
        let idx = handle.0 as usize;
        if idx < self.colors.len() {
            self.write_fill(idx, fill);
        }
    }

    fn set_size(&mut self, handle: DrawableHandle, width: f32, height: f32) {
        let start = handle.0 as usize * ATTRIBUTE_STRIDE + 2;
        if let Some(slot) = self.attributes.get_mut(start..start + 2) {
            slot[0] = width;
            slot[1] = height;
        }
    }

    fn set_surface_opacity(&mut self, value: f32) {
        self.surface_opacity = clamp_unit(value);
    }

    fn start_rotation(&mut self, period_secs: f32) {
        self.rotation_period = Some(period_secs);
    }

    fn stop_rotation(&mut self) {
        self.rotation_period = None;
    }
}
