use wasm_bindgen::prelude::*;

/// Per-tick perf snapshot.
///
/// Timings are only sampled while perf metrics are enabled. Rejected writes
/// cover the last tick; the frame counters are cumulative and always
/// maintained.
#[wasm_bindgen]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PerfStats {
    pub(super) tick_ms: f64,
    pub(super) init_ms: f64,
    pub(super) update_ms: f64,
    pub(super) dt_ms: f64,
    pub(super) particles: u32,
    pub(super) drawables: u32,
    pub(super) rejected_writes: u32,
    pub(super) frames_advanced: u32,
    pub(super) frames_skipped: u32,
    pub(super) reinitializations: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }

    /// Clear the per-tick samples, keep the cumulative counters
    pub(crate) fn begin_tick(&mut self) {
        self.tick_ms = 0.0;
        self.init_ms = 0.0;
        self.update_ms = 0.0;
        self.dt_ms = 0.0;
        self.rejected_writes = 0;
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn tick_ms(&self) -> f64 { self.tick_ms }
    #[wasm_bindgen(getter)]
    pub fn init_ms(&self) -> f64 { self.init_ms }
    #[wasm_bindgen(getter)]
    pub fn update_ms(&self) -> f64 { self.update_ms }
    #[wasm_bindgen(getter)]
    pub fn dt_ms(&self) -> f64 { self.dt_ms }
    #[wasm_bindgen(getter)]
    pub fn particles(&self) -> u32 { self.particles }
    #[wasm_bindgen(getter)]
    pub fn drawables(&self) -> u32 { self.drawables }
    #[wasm_bindgen(getter)]
    pub fn rejected_writes(&self) -> u32 { self.rejected_writes }
    #[wasm_bindgen(getter)]
    pub fn frames_advanced(&self) -> u32 { self.frames_advanced }
    #[wasm_bindgen(getter)]
    pub fn frames_skipped(&self) -> u32 { self.frames_skipped }
    #[wasm_bindgen(getter)]
    pub fn reinitializations(&self) -> u32 { self.reinitializations }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_tick_keeps_the_frame_counters() {
        let mut stats = PerfStats {
            tick_ms: 2.5,
            dt_ms: 16.0,
            rejected_writes: 3,
            frames_advanced: 40,
            frames_skipped: 2,
            reinitializations: 1,
            ..PerfStats::default()
        };
        stats.begin_tick();
        assert_eq!(stats.tick_ms(), 0.0);
        assert_eq!(stats.dt_ms(), 0.0);
        assert_eq!(stats.rejected_writes(), 0);
        assert_eq!(stats.frames_advanced(), 40);
        assert_eq!(stats.frames_skipped(), 2);
        assert_eq!(stats.reinitializations(), 1);
    }
}
