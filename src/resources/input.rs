use bevy::prelude::*;

/// Named input actions the simulation listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Jump,
    Reset,
    Quit,
}

/// Player input as delivered by the host.
///
/// Analog axes are in [-1, 1]. Button edges (`*_pressed`) are valid for the
/// frame in which they were raised and are cleared in `Last`.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    pub vertical: f64,
    pub horizontal: f64,
    pub jump_held: bool,
    jump_pressed: bool,
    reset_pressed: bool,
    quit_pressed: bool,
}

impl InputState {
    pub fn set_axes(&mut self, vertical: f64, horizontal: f64) {
        self.vertical = vertical.clamp(-1.0, 1.0);
        self.horizontal = horizontal.clamp(-1.0, 1.0);
    }

    /// Raise the edge for `action`; jump also becomes held until released.
    pub fn press(&mut self, action: InputAction) {
        match action {
            InputAction::Jump => {
                self.jump_pressed = true;
                self.jump_held = true;
            }
            InputAction::Reset => self.reset_pressed = true,
            InputAction::Quit => self.quit_pressed = true,
        }
    }

    pub fn release(&mut self, action: InputAction) {
        if action == InputAction::Jump {
            self.jump_held = false;
        }
    }

    pub fn just_pressed(&self, action: InputAction) -> bool {
        match action {
            InputAction::Jump => self.jump_pressed,
            InputAction::Reset => self.reset_pressed,
            InputAction::Quit => self.quit_pressed,
        }
    }

    pub fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.reset_pressed = false;
        self.quit_pressed = false;
    }
}

pub fn clear_input_edges_system(mut input: ResMut<InputState>) {
    input.clear_edges();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_clear_but_hold_persists() {
        let mut input = InputState::default();
        input.press(InputAction::Jump);
        input.press(InputAction::Reset);

        assert!(input.just_pressed(InputAction::Jump));
        assert!(input.just_pressed(InputAction::Reset));
        assert!(!input.just_pressed(InputAction::Quit));

        input.clear_edges();
        assert!(!input.just_pressed(InputAction::Jump));
        assert!(input.jump_held);

        input.release(InputAction::Jump);
        assert!(!input.jump_held);
    }

    #[test]
    fn test_axes_are_clamped() {
        let mut input = InputState::default();
        input.set_axes(3.0, -1.5);
        assert_eq!(input.vertical, 1.0);
        assert_eq!(input.horizontal, -1.0);
    }
}
