//! Engine configuration: base appearance plus one tuning block per pattern family.
//!
//! Loaded from camelCase JSON by the host. Every field has a default so a host
//! can send only what it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::math::{Easing, Rgba};

use super::mode::{AnimationStrategy, ShapeMode};

pub const MAX_PARTICLES: u32 = 4096;
pub const MAX_TRAIL_LENGTH: u32 = 64;
pub const DEFAULT_FADE_MS: f32 = 250.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown shape mode '{0}'")]
    UnknownMode(String),
    #[error("particle count {0} outside 1..={MAX_PARTICLES}")]
    ParticleCount(u32),
    #[error("{field} = {value} is out of range (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub mode: ShapeMode,
    pub particle_count: u32,
    /// Nominal particle diameter in px
    pub particle_size: f32,
    pub base_color: Rgba,
    pub strategy: AnimationStrategy,
    pub seed: u32,
    /// Duration of the whole-control visibility fade
    pub fade_ms: f32,
    pub gamma: f32,
    pub orbit: OrbitTuning,
    pub drift: DriftTuning,
    pub bounce: BounceTuning,
    pub meteor: MeteorTuning,
    pub burst: BurstTuning,
    pub falling: FallingTuning,
    pub perimeter: PerimeterTuning,
    pub oscillate: OscillateTuning,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: ShapeMode::Dots,
            particle_count: 8,
            particle_size: 6.0,
            base_color: Rgba::from_rgba8(0x3A, 0x7B, 0xFF, 0xFF),
            strategy: AnimationStrategy::PerParticle,
            seed: 12345,
            fade_ms: DEFAULT_FADE_MS,
            gamma: 2.2,
            orbit: OrbitTuning::default(),
            drift: DriftTuning::default(),
            bounce: BounceTuning::default(),
            meteor: MeteorTuning::default(),
            burst: BurstTuning::default(),
            falling: FallingTuning::default(),
            perimeter: PerimeterTuning::default(),
            oscillate: OscillateTuning::default(),
        }
    }
}

/// Dots, rings, pulse, spiral, comet
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrbitTuning {
    /// Degrees per second; negative spins counter-clockwise
    pub angular_speed_deg: f32,
    /// Fraction of the available radius used by the outer orbit
    pub radius_ratio: f32,
    pub ring_count: u32,
    pub arm_count: u32,
    /// Extra rotation per step outward along a spiral arm
    pub spiral_twist_deg: f32,
    /// Pulse oscillation in degrees of phase per second
    pub pulse_speed_deg: f32,
    /// Fraction of the radius the pulse breathes in by
    pub pulse_depth: f32,
    /// Angular span of the comet tail
    pub arc_deg: f32,
    pub fade: Easing,
}

impl Default for OrbitTuning {
    fn default() -> Self {
        Self {
            angular_speed_deg: 180.0,
            radius_ratio: 1.0,
            ring_count: 3,
            arm_count: 3,
            spiral_twist_deg: 25.0,
            pulse_speed_deg: 180.0,
            pulse_depth: 0.4,
            arc_deg: 270.0,
            fade: Easing::EaseIn,
        }
    }
}

/// Snow, wind, starfield
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriftTuning {
    /// Pixels per second
    pub speed: f32,
    pub sway_amplitude: f32,
    /// Radians per second
    pub sway_frequency: f32,
    /// How far past the edge a particle travels before it respawns
    pub margin: f32,
}

impl Default for DriftTuning {
    fn default() -> Self {
        Self {
            speed: 40.0,
            sway_amplitude: 6.0,
            sway_frequency: 2.0,
            margin: 8.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BounceTuning {
    /// Launch speed in pixels per second
    pub speed: f32,
    /// 1 = perfectly elastic
    pub restitution: f32,
}

impl Default for BounceTuning {
    fn default() -> Self {
        Self {
            speed: 80.0,
            restitution: 0.9,
        }
    }
}

/// Meteor and meteor shower. Velocities are px per nominal frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MeteorTuning {
    pub speed: f32,
    /// Center of the launch cone (0 = right, 90 = down)
    pub direction_deg: f32,
    pub spread_deg: f32,
    pub trail_length: u32,
    pub trail_spacing: f32,
    /// Probability per nominal frame that a dormant star shoots
    pub shoot_chance: f32,
    /// Final fraction of life over which the head fades out
    pub fade_fraction: f32,
    /// Dormant pulse in radians per second
    pub pulse_speed: f32,
    pub margin: f32,
    /// Color the trail blends toward; defaults to a darkened base color
    pub trail_color: Option<Rgba>,
}

impl Default for MeteorTuning {
    fn default() -> Self {
        Self {
            speed: 6.0,
            direction_deg: 135.0,
            spread_deg: 30.0,
            trail_length: 8,
            trail_spacing: 3.0,
            shoot_chance: 0.01,
            fade_fraction: 0.3,
            pulse_speed: 3.0,
            margin: 4.0,
            trail_color: None,
        }
    }
}

/// Explosion and fountain. Velocities are px per nominal frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BurstTuning {
    pub speed: f32,
    /// Downward acceleration per nominal frame
    pub gravity: f32,
    /// Velocity kept per nominal frame
    pub drag: f32,
    /// Opacity lost per nominal frame
    pub fade_rate: f32,
    /// Fountain cone width around vertical
    pub spread_deg: f32,
    /// Distance from an edge where the soft fade starts
    pub edge_margin: f32,
    pub edge_fade_boost: f32,
    pub apex_fade_boost: f32,
}

impl Default for BurstTuning {
    fn default() -> Self {
        Self {
            speed: 4.0,
            gravity: 0.15,
            drag: 0.98,
            fade_rate: 0.012,
            spread_deg: 30.0,
            edge_margin: 10.0,
            edge_fade_boost: 3.0,
            apex_fade_boost: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FallingTuning {
    /// Initial fall speed in px/s
    pub speed: f32,
    /// px/s²
    pub acceleration: f32,
    /// Pause on the floor before the group resets
    pub pause_secs: f32,
    /// Delay between consecutive drops
    pub stagger_secs: f32,
}

impl Default for FallingTuning {
    fn default() -> Self {
        Self {
            speed: 20.0,
            acceleration: 400.0,
            pause_secs: 0.6,
            stagger_secs: 0.08,
        }
    }
}

/// Square (rounded-rectangle walk) and stripe
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PerimeterTuning {
    /// px/s along the path
    pub speed: f32,
    pub corner_radius: f32,
    /// Gap between consecutive dots along the path
    pub spacing: f32,
    pub fade: Easing,
}

impl Default for PerimeterTuning {
    fn default() -> Self {
        Self {
            speed: 80.0,
            corner_radius: 6.0,
            spacing: 10.0,
            fade: Easing::Linear,
        }
    }
}

/// Twinkle, gradient twinkle, wave
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OscillateTuning {
    /// Radians per second
    pub speed: f32,
    /// Wave height as a fraction of half the surface height
    pub wave_amplitude: f32,
    /// Phase lag between neighbouring wave dots
    pub wave_step_deg: f32,
    /// How much the gradient highlight brightens the base color
    pub highlight: f32,
}

impl Default for OscillateTuning {
    fn default() -> Self {
        Self {
            speed: 3.0,
            wave_amplitude: 0.5,
            wave_step_deg: 40.0,
            highlight: 0.6,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        // Every field serializes infallibly (no maps with non-string keys)
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 || self.particle_count > MAX_PARTICLES {
            return Err(ConfigError::ParticleCount(self.particle_count));
        }
        positive("particleSize", self.particle_size)?;
        non_negative("fadeMs", self.fade_ms)?;
        positive("gamma", self.gamma)?;

        let o = &self.orbit;
        finite("orbit.angularSpeedDeg", o.angular_speed_deg)?;
        unit("orbit.radiusRatio", o.radius_ratio)?;
        at_least_one("orbit.ringCount", o.ring_count)?;
        at_least_one("orbit.armCount", o.arm_count)?;
        finite("orbit.spiralTwistDeg", o.spiral_twist_deg)?;
        finite("orbit.pulseSpeedDeg", o.pulse_speed_deg)?;
        unit("orbit.pulseDepth", o.pulse_depth)?;
        degrees("orbit.arcDeg", o.arc_deg)?;

        let d = &self.drift;
        non_negative("drift.speed", d.speed)?;
        non_negative("drift.swayAmplitude", d.sway_amplitude)?;
        finite("drift.swayFrequency", d.sway_frequency)?;
        non_negative("drift.margin", d.margin)?;

        non_negative("bounce.speed", self.bounce.speed)?;
        unit("bounce.restitution", self.bounce.restitution)?;

        let m = &self.meteor;
        positive("meteor.speed", m.speed)?;
        finite("meteor.directionDeg", m.direction_deg)?;
        degrees("meteor.spreadDeg", m.spread_deg)?;
        if m.trail_length > MAX_TRAIL_LENGTH {
            return Err(ConfigError::OutOfRange {
                field: "meteor.trailLength",
                value: m.trail_length as f64,
                expected: "0..=64",
            });
        }
        non_negative("meteor.trailSpacing", m.trail_spacing)?;
        unit("meteor.shootChance", m.shoot_chance)?;
        unit("meteor.fadeFraction", m.fade_fraction)?;
        finite("meteor.pulseSpeed", m.pulse_speed)?;
        non_negative("meteor.margin", m.margin)?;

        let b = &self.burst;
        non_negative("burst.speed", b.speed)?;
        finite("burst.gravity", b.gravity)?;
        if !(b.drag > 0.0 && b.drag <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "burst.drag",
                value: b.drag as f64,
                expected: "(0, 1]",
            });
        }
        positive("burst.fadeRate", b.fade_rate)?;
        degrees("burst.spreadDeg", b.spread_deg)?;
        non_negative("burst.edgeMargin", b.edge_margin)?;
        non_negative("burst.edgeFadeBoost", b.edge_fade_boost)?;
        non_negative("burst.apexFadeBoost", b.apex_fade_boost)?;

        let f = &self.falling;
        non_negative("falling.speed", f.speed)?;
        non_negative("falling.acceleration", f.acceleration)?;
        non_negative("falling.pauseSecs", f.pause_secs)?;
        non_negative("falling.staggerSecs", f.stagger_secs)?;

        let p = &self.perimeter;
        finite("perimeter.speed", p.speed)?;
        non_negative("perimeter.cornerRadius", p.corner_radius)?;
        positive("perimeter.spacing", p.spacing)?;

        let s = &self.oscillate;
        finite("oscillate.speed", s.speed)?;
        unit("oscillate.waveAmplitude", s.wave_amplitude)?;
        finite("oscillate.waveStepDeg", s.wave_step_deg)?;
        non_negative("oscillate.highlight", s.highlight)?;
        Ok(())
    }
}

fn out_of_range(field: &'static str, value: f32, expected: &'static str) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        value: value as f64,
        expected,
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(out_of_range(field, value, "a finite number"))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, value, "> 0"))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, value, ">= 0"))
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(out_of_range(field, value, "0..=1"))
    }
}

fn degrees(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=360.0).contains(&value) {
        Ok(())
    } else {
        Err(out_of_range(field, value, "0..=360"))
    }
}

fn at_least_one(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value >= 1 {
        Ok(())
    } else {
        Err(out_of_range(field, value as f32, ">= 1"))
    }
}
