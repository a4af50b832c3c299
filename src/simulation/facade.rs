use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::domain::{AnimationStrategy, EngineConfig, ShapeMode};
use crate::host::{Extent, FrameClock, RenderBuffer, Surface};

use super::perf_stats::PerfStats;
use super::EffectEngine;

/// Frame clock backed by the host's `requestAnimationFrame` loop.
///
/// The JS side polls `wantsFrames` after each tick and keeps requesting
/// frames only while it is set.
#[derive(Debug, Default)]
pub struct HostClock {
    subscribed: bool,
}

impl HostClock {
    pub fn wants_frames(&self) -> bool {
        self.subscribed
    }
}

impl FrameClock for HostClock {
    fn subscribe(&mut self) {
        self.subscribed = true;
    }

    fn unsubscribe(&mut self) {
        self.subscribed = false;
    }
}

/// Pointers into wasm memory for the render buffer views
#[wasm_bindgen]
pub struct AbiLayout {
    attributes_ptr: u32,
    attributes_len_elements: u32,
    attributes_len_bytes: u32,
    colors_ptr: u32,
    colors_len_elements: u32,
    colors_len_bytes: u32,
    gradient_offsets_ptr: u32,
    gradient_offsets_len_elements: u32,
    gradient_offsets_len_bytes: u32,
    gradient_colors_ptr: u32,
    gradient_colors_len_elements: u32,
    gradient_colors_len_bytes: u32,
    gradient_lens_ptr: u32,
    gradient_lens_len_elements: u32,
    gradient_lens_len_bytes: u32,
}

#[wasm_bindgen]
impl AbiLayout {
    #[wasm_bindgen(getter)]
    pub fn attributes_ptr(&self) -> u32 { self.attributes_ptr }
    #[wasm_bindgen(getter)]
    pub fn attributes_len_elements(&self) -> u32 { self.attributes_len_elements }
    #[wasm_bindgen(getter)]
    pub fn attributes_len_bytes(&self) -> u32 { self.attributes_len_bytes }

    #[wasm_bindgen(getter)]
    pub fn colors_ptr(&self) -> u32 { self.colors_ptr }
    #[wasm_bindgen(getter)]
    pub fn colors_len_elements(&self) -> u32 { self.colors_len_elements }
    #[wasm_bindgen(getter)]
    pub fn colors_len_bytes(&self) -> u32 { self.colors_len_bytes }

    #[wasm_bindgen(getter)]
    pub fn gradient_offsets_ptr(&self) -> u32 { self.gradient_offsets_ptr }
    #[wasm_bindgen(getter)]
    pub fn gradient_offsets_len_elements(&self) -> u32 { self.gradient_offsets_len_elements }
    #[wasm_bindgen(getter)]
    pub fn gradient_offsets_len_bytes(&self) -> u32 { self.gradient_offsets_len_bytes }

    #[wasm_bindgen(getter)]
    pub fn gradient_colors_ptr(&self) -> u32 { self.gradient_colors_ptr }
    #[wasm_bindgen(getter)]
    pub fn gradient_colors_len_elements(&self) -> u32 { self.gradient_colors_len_elements }
    #[wasm_bindgen(getter)]
    pub fn gradient_colors_len_bytes(&self) -> u32 { self.gradient_colors_len_bytes }

    #[wasm_bindgen(getter)]
    pub fn gradient_lens_ptr(&self) -> u32 { self.gradient_lens_ptr }
    #[wasm_bindgen(getter)]
    pub fn gradient_lens_len_elements(&self) -> u32 { self.gradient_lens_len_elements }
    #[wasm_bindgen(getter)]
    pub fn gradient_lens_len_bytes(&self) -> u32 { self.gradient_lens_len_bytes }
}

#[wasm_bindgen]
pub struct Spinner {
    engine: EffectEngine<RenderBuffer, HostClock>,
}

#[wasm_bindgen]
impl Spinner {
    /// Create a spinner with the default config (8 orbiting dots)
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            engine: EffectEngine::with_defaults(RenderBuffer::new(Extent::new(width, height)), HostClock::default()),
        }
    }

    /// Create a spinner from camelCase config JSON
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(width: f32, height: f32, json: String) -> Result<Spinner, JsValue> {
        let config = EngineConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let engine = EffectEngine::new(RenderBuffer::new(Extent::new(width, height)), HostClock::default(), config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { engine })
    }

    #[wasm_bindgen(js_name = loadConfig)]
    pub fn load_config(&mut self, json: String) -> Result<(), JsValue> {
        self.engine
            .load_config_json(&json)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = configJson)]
    pub fn config_json(&self) -> String {
        self.engine.config().to_json()
    }

    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, name: &str) -> Result<(), JsValue> {
        self.engine
            .set_mode_name(name)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = setParticleCount)]
    pub fn set_particle_count(&mut self, count: u32) -> Result<(), JsValue> {
        self.engine
            .set_particle_count(count)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Switch between per-particle simulation and whole-surface rotation
    #[wasm_bindgen(js_name = setDiscreteRotation)]
    pub fn set_discrete_rotation(&mut self, enabled: bool) -> Result<(), JsValue> {
        let strategy = if enabled {
            AnimationStrategy::DiscreteRotation
        } else {
            AnimationStrategy::PerParticle
        };
        self.engine
            .set_strategy(strategy)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Report the control's current layout size; read at the start of the next tick
    #[wasm_bindgen(js_name = setExtent)]
    pub fn set_extent(&mut self, width: f32, height: f32) {
        let extent = Extent::new(width, height);
        if self.engine.surface().extent() == extent {
            return;
        }
        self.engine.surface_mut().set_extent(extent);
        self.engine.extent_changed();
    }

    #[wasm_bindgen(js_name = setVisible)]
    pub fn set_visible(&mut self, visible: bool) {
        self.engine.set_visible(visible);
    }

    pub fn start(&mut self) {
        self.engine.start();
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    /// Run one frame at `requestAnimationFrame` time (ms). Returns the
    /// outcome code: 0 idle, 1 no geometry, 2 kernel fault, 3 initialized,
    /// 4 advanced, 5 rotating.
    pub fn tick(&mut self, now_ms: f64) -> u8 {
        self.engine.tick(now_ms / 1000.0).code()
    }

    /// Whether the host should keep requesting animation frames
    #[wasm_bindgen(getter, js_name = wantsFrames)]
    pub fn wants_frames(&self) -> bool {
        self.engine.clock().wants_frames()
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 {
        self.engine.frame()
    }

    #[wasm_bindgen(getter)]
    pub fn surface_opacity(&self) -> f32 {
        self.engine.surface().surface_opacity()
    }

    /// Seconds per turn while discrete rotation is active (negative: counter-clockwise)
    #[wasm_bindgen(getter)]
    pub fn rotation_period(&self) -> Option<f32> {
        self.engine.surface().rotation_period()
    }

    #[wasm_bindgen(getter)]
    pub fn drawable_count(&self) -> u32 {
        self.engine.surface().drawable_count() as u32
    }

    /// Bumped whenever the drawable set is rebuilt; JS re-reads `abi_layout` on change
    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> u32 {
        self.engine.surface().generation()
    }

    /// Enable or disable per-tick perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.engine.enable_perf_metrics(enabled);
    }

    /// Get last tick perf snapshot (timings are zero when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.engine.perf_stats()
    }

    /// Every accepted mode name, in declaration order
    pub fn mode_names() -> Array {
        ShapeMode::ALL
            .iter()
            .map(|mode| JsValue::from_str(mode.name()))
            .collect()
    }

    pub fn abi_layout(&self) -> AbiLayout {
        let buffer = self.engine.surface();
        let attributes = buffer.attributes();
        let colors = buffer.colors();
        let gradient_offsets = buffer.gradient_offsets();
        let gradient_colors = buffer.gradient_colors();
        let gradient_lens = buffer.gradient_lens();
        AbiLayout {
            attributes_ptr: attributes.as_ptr() as u32,
            attributes_len_elements: attributes.len() as u32,
            attributes_len_bytes: std::mem::size_of_val(attributes) as u32,
            colors_ptr: colors.as_ptr() as u32,
            colors_len_elements: colors.len() as u32,
            colors_len_bytes: std::mem::size_of_val(colors) as u32,
            gradient_offsets_ptr: gradient_offsets.as_ptr() as u32,
            gradient_offsets_len_elements: gradient_offsets.len() as u32,
            gradient_offsets_len_bytes: std::mem::size_of_val(gradient_offsets) as u32,
            gradient_colors_ptr: gradient_colors.as_ptr() as u32,
            gradient_colors_len_elements: gradient_colors.len() as u32,
            gradient_colors_len_bytes: std::mem::size_of_val(gradient_colors) as u32,
            gradient_lens_ptr: gradient_lens.as_ptr() as u32,
            gradient_lens_len_elements: gradient_lens.len() as u32,
            gradient_lens_len_bytes: std::mem::size_of_val(gradient_lens) as u32,
        }
    }
}
