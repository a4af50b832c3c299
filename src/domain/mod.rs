//! Domain types: modes, configuration and particle records

pub mod config;
pub mod mode;
pub mod particle;

pub use config::{ConfigError, EngineConfig};
pub use mode::{AnimationStrategy, ModeFamily, ShapeMode};
pub use particle::{Particle, Trail};
