/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    MouseLeft,
}

impl Button {
    /// Number on the digit keys 1-5
    pub fn digit(&self) -> Option<u8> {
        match self {
            Button::Digit1 => Some(1),
            Button::Digit2 => Some(2),
            Button::Digit3 => Some(3),
            Button::Digit4 => Some(4),
            Button::Digit5 => Some(5),
            _ => None,
        }
    }
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];

    /// Buttons that went down since the last `reset_deltas`
    fn just_pressed(&self) -> &[Button];

    /// Relative mouse motion since the last `reset_deltas`, in pixels
    fn mouse_delta(&self) -> (f32, f32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_digits() {
        assert_eq!(Button::Digit1.digit(), Some(1));
        assert_eq!(Button::Digit5.digit(), Some(5));
        assert_eq!(Button::KeyW.digit(), None);
    }

    #[test]
    fn test_all_button_variants_unique() {
        let all_buttons = [
            Button::KeyW,
            Button::KeyA,
            Button::KeyS,
            Button::KeyD,
            Button::ArrowUp,
            Button::ArrowDown,
            Button::ArrowLeft,
            Button::ArrowRight,
            Button::Escape,
            Button::Digit1,
            Button::Digit2,
            Button::Digit3,
            Button::Digit4,
            Button::Digit5,
            Button::MouseLeft,
        ];

        let set: HashSet<_> = all_buttons.iter().collect();
        assert_eq!(set.len(), 15);
    }

    // Test mock controller implementation
    struct MockController {
        pressed: Vec<Button>,
        delta: (f32, f32),
    }

    impl Controller for MockController {
        fn is_down(&self, button: Button) -> bool {
            self.pressed.contains(&button)
        }

        fn get_down_keys(&self) -> &[Button] {
            &self.pressed
        }

        fn just_pressed(&self) -> &[Button] {
            &self.pressed
        }

        fn mouse_delta(&self) -> (f32, f32) {
            self.delta
        }
    }

    #[test]
    fn test_controller_is_down() {
        let controller = MockController {
            pressed: vec![Button::KeyW, Button::ArrowLeft],
            delta: (0.0, 0.0),
        };

        assert!(controller.is_down(Button::KeyW));
        assert!(controller.is_down(Button::ArrowLeft));
        assert!(!controller.is_down(Button::KeyA));
        assert_eq!(controller.get_down_keys().len(), 2);
    }

    #[test]
    fn test_controller_no_keys_pressed() {
        let controller = MockController {
            pressed: vec![],
            delta: (3.0, -1.0),
        };

        assert!(!controller.is_down(Button::KeyW));
        assert_eq!(controller.get_down_keys().len(), 0);
        assert_eq!(controller.mouse_delta(), (3.0, -1.0));
    }
}
