use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::ConfigError;

/// Selectable shape/behavior variant
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ShapeMode {
    #[default]
    Dots,
    Rings,
    Pulse,
    Spiral,
    Comet,
    Snow,
    Wind,
    Starfield,
    Bounce,
    Meteor,
    MeteorShower,
    Explosion,
    Fountain,
    Falling,
    Square,
    Stripe,
    Twinkle,
    GradientTwinkle,
    Wave,
}

/// Algorithm class a mode belongs to; one pattern kernel per family
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeFamily {
    Orbit,
    Drift,
    Bounce,
    Meteor,
    Burst,
    Falling,
    Perimeter,
    Oscillate,
}

impl ShapeMode {
    pub const ALL: [ShapeMode; 19] = [
        ShapeMode::Dots,
        ShapeMode::Rings,
        ShapeMode::Pulse,
        ShapeMode::Spiral,
        ShapeMode::Comet,
        ShapeMode::Snow,
        ShapeMode::Wind,
        ShapeMode::Starfield,
        ShapeMode::Bounce,
        ShapeMode::Meteor,
        ShapeMode::MeteorShower,
        ShapeMode::Explosion,
        ShapeMode::Fountain,
        ShapeMode::Falling,
        ShapeMode::Square,
        ShapeMode::Stripe,
        ShapeMode::Twinkle,
        ShapeMode::GradientTwinkle,
        ShapeMode::Wave,
    ];

    pub fn family(self) -> ModeFamily {
        match self {
            ShapeMode::Dots | ShapeMode::Rings | ShapeMode::Pulse | ShapeMode::Spiral | ShapeMode::Comet => {
                ModeFamily::Orbit
            }
            ShapeMode::Snow | ShapeMode::Wind | ShapeMode::Starfield => ModeFamily::Drift,
            ShapeMode::Bounce => ModeFamily::Bounce,
            ShapeMode::Meteor | ShapeMode::MeteorShower => ModeFamily::Meteor,
            ShapeMode::Explosion | ShapeMode::Fountain => ModeFamily::Burst,
            ShapeMode::Falling => ModeFamily::Falling,
            ShapeMode::Square | ShapeMode::Stripe => ModeFamily::Perimeter,
            ShapeMode::Twinkle | ShapeMode::GradientTwinkle | ShapeMode::Wave => ModeFamily::Oscillate,
        }
    }

    /// The classic dot ring is a rigid layout, so a whole-surface rotation reproduces it exactly
    pub fn supports_discrete_rotation(self) -> bool {
        matches!(self, ShapeMode::Dots)
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeMode::Dots => "dots",
            ShapeMode::Rings => "rings",
            ShapeMode::Pulse => "pulse",
            ShapeMode::Spiral => "spiral",
            ShapeMode::Comet => "comet",
            ShapeMode::Snow => "snow",
            ShapeMode::Wind => "wind",
            ShapeMode::Starfield => "starfield",
            ShapeMode::Bounce => "bounce",
            ShapeMode::Meteor => "meteor",
            ShapeMode::MeteorShower => "meteor-shower",
            ShapeMode::Explosion => "explosion",
            ShapeMode::Fountain => "fountain",
            ShapeMode::Falling => "falling",
            ShapeMode::Square => "square",
            ShapeMode::Stripe => "stripe",
            ShapeMode::Twinkle => "twinkle",
            ShapeMode::GradientTwinkle => "gradient-twinkle",
            ShapeMode::Wave => "wave",
        }
    }
}

impl fmt::Display for ShapeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeMode {
    type Err = ConfigError;

    /// Accepts `meteor-shower`, `meteor_shower`, `MeteorShower`, `METEORSHOWER`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        ShapeMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.name().replace('-', "") == key)
            .ok_or_else(|| ConfigError::UnknownMode(s.to_string()))
    }
}

impl TryFrom<String> for ShapeMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShapeMode> for String {
    fn from(value: ShapeMode) -> Self {
        value.name().to_string()
    }
}

/// How the engine animates while visible
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationStrategy {
    /// Full per-particle simulation driven by the frame clock
    #[default]
    PerParticle,
    /// One host-side rotation transform over a static layout
    DiscreteRotation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_in_any_case_style() {
        for mode in ShapeMode::ALL {
            assert_eq!(mode.name().parse::<ShapeMode>().unwrap(), mode);
        }
        assert_eq!("MeteorShower".parse::<ShapeMode>().unwrap(), ShapeMode::MeteorShower);
        assert_eq!("gradient_twinkle".parse::<ShapeMode>().unwrap(), ShapeMode::GradientTwinkle);
        assert!("laser".parse::<ShapeMode>().is_err());
    }

    #[test]
    fn only_dots_rotate_discretely() {
        let rotating: Vec<_> = ShapeMode::ALL
            .iter()
            .filter(|m| m.supports_discrete_rotation())
            .collect();
        assert_eq!(rotating, vec![&ShapeMode::Dots]);
    }
}
