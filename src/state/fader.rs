use serde::{Deserialize, Serialize};

use crate::state::GameEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FadeMode {
    Idle,
    In,
    Out,
}

/// Full-screen fade overlay. Only the overlay alpha is modelled; drawing it
/// is up to whoever presents the game.
#[derive(Debug, Clone)]
pub struct ScreenFader {
    fade_time: f64,
    mode: FadeMode,
    timer: f64,
    alpha: f64,
}

impl ScreenFader {
    pub fn new(fade_time: f64) -> Self {
        Self {
            fade_time,
            mode: FadeMode::Idle,
            timer: 0.0,
            alpha: 0.0,
        }
    }

    pub fn fade_in(&mut self) {
        self.mode = FadeMode::In;
        self.timer = 0.0;
        self.alpha = 1.0;
    }

    pub fn fade_out(&mut self) {
        self.mode = FadeMode::Out;
        self.timer = 0.0;
        self.alpha = 0.0;
    }

    /// Advance the fade. Returns the completion notification on the tick the
    /// fade time is reached.
    pub fn tick(&mut self, dt: f64) -> Option<GameEvent> {
        let rate = dt / self.fade_time;
        let finished = match self.mode {
            FadeMode::Idle => return None,
            FadeMode::In => {
                self.alpha -= rate;
                GameEvent::FadeInDone
            }
            FadeMode::Out => {
                self.alpha += rate;
                GameEvent::FadeOutDone
            }
        };
        self.alpha = self.alpha.clamp(0.0, 1.0);

        self.timer += dt;
        if self.timer >= self.fade_time {
            self.mode = FadeMode::Idle;
            self.timer = 0.0;
            return Some(finished);
        }
        None
    }

    pub fn mode(&self) -> FadeMode {
        self.mode
    }

    /// Overlay opacity, 0 transparent to 1 opaque
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn fade_time(&self) -> f64 {
        self.fade_time
    }
}

impl Default for ScreenFader {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fade_out_reports_once() {
        let mut fader = ScreenFader::new(1.0);
        fader.fade_out();

        for _ in 0..9 {
            assert_eq!(fader.tick(0.1), None);
        }
        assert_relative_eq!(fader.alpha(), 0.9, epsilon = 1e-9);

        // Step past the fade time to stay clear of float accumulation
        assert_eq!(fader.tick(0.15), Some(GameEvent::FadeOutDone));
        assert_eq!(fader.mode(), FadeMode::Idle);
        assert_relative_eq!(fader.alpha(), 1.0);
        assert_eq!(fader.tick(0.1), None);
    }

    #[test]
    fn test_fade_in_starts_opaque() {
        let mut fader = ScreenFader::new(0.5);
        fader.fade_in();
        assert_relative_eq!(fader.alpha(), 1.0);

        assert_eq!(fader.tick(0.25), None);
        assert_relative_eq!(fader.alpha(), 0.5);
        assert_eq!(fader.tick(0.25), Some(GameEvent::FadeInDone));
        assert_relative_eq!(fader.alpha(), 0.0);
    }
}
