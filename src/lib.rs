//! Particula Spinner - per-frame particle engine behind a busy indicator
//!
//! Architecture:
//! - core/        - Vector math, easing, color and the seeded PRNG
//! - domain/      - Shape modes, engine config and particle records
//! - host/        - Surface and frame clock interfaces, in-memory render buffer
//! - systems/     - Pattern kernels, one per mode family
//! - simulation/  - Engine orchestration, scheduler, lifecycle and wasm facade

pub mod core;
pub mod domain;
pub mod host;
pub mod systems;
pub mod simulation;

use tracing::{info, Level};
use wasm_bindgen::prelude::*;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the module (call once from JS before creating spinners).
/// Installs the panic hook and routes `tracing` output to the browser console.
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    let level = if cfg!(debug_assertions) { Level::DEBUG } else { Level::INFO };
    if host::console::install_subscriber(level) {
        info!(version = env!("CARGO_PKG_VERSION"), "Particula spinner engine initialized");
    }
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use domain::{AnimationStrategy, ConfigError, EngineConfig, ShapeMode};
pub use host::{Extent, FrameClock, RenderBuffer, Surface};
pub use simulation::{EffectEngine, PerfStats, SkipReason, Spinner, TickOutcome, Visibility};
