//! Visibility controller.
//!
//! Hidden -> FadingIn -> Visible -> FadingOut -> Hidden, with a linear
//! whole-surface opacity ramp. A visibility flip mid-fade reverses the ramp
//! from the current opacity instead of jumping.

use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Hidden,
    FadingIn,
    Visible,
    FadingOut,
}

#[derive(Debug)]
pub struct Lifecycle {
    state: Visibility,
    opacity: f32,
    fade_secs: f32,
}

impl Lifecycle {
    pub fn new(fade_ms: f32) -> Self {
        Self {
            state: Visibility::Hidden,
            opacity: 0.0,
            fade_secs: (fade_ms / 1000.0).max(0.0),
        }
    }

    pub fn set_fade_ms(&mut self, fade_ms: f32) {
        self.fade_secs = (fade_ms / 1000.0).max(0.0);
    }

    #[inline]
    pub fn state(&self) -> Visibility {
        self.state
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Anything but Hidden
    #[inline]
    pub fn is_shown(&self) -> bool {
        self.state != Visibility::Hidden
    }

    /// Apply the visibility signal; returns true if the state changed
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let next = match (self.state, visible) {
            (Visibility::Hidden | Visibility::FadingOut, true) => Visibility::FadingIn,
            (Visibility::Visible | Visibility::FadingIn, false) => Visibility::FadingOut,
            _ => return false,
        };
        debug!(from = ?self.state, to = ?next, "visibility transition");
        self.state = next;
        true
    }

    /// Move the fade ramp forward by `dt` seconds
    pub fn advance(&mut self, dt: f32) -> Visibility {
        let step = if self.fade_secs > 0.0 { dt / self.fade_secs } else { 1.0 };
        match self.state {
            Visibility::FadingIn => {
                self.opacity = (self.opacity + step).min(1.0);
                if self.opacity >= 1.0 {
                    debug!("fade-in complete");
                    self.state = Visibility::Visible;
                }
            }
            Visibility::FadingOut => {
                self.opacity = (self.opacity - step).max(0.0);
                if self.opacity <= 0.0 {
                    debug!("fade-out complete");
                    self.state = Visibility::Hidden;
                }
            }
            Visibility::Hidden | Visibility::Visible => {}
        }
        self.state
    }
}
