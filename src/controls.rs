use glam::Vec3;

use crate::camera::FirstPersonCamera;
use crate::core::{Button, Controller};

/// Radians of turn per pixel of mouse motion
pub const DEFAULT_MOUSE_SENSITIVITY: f32 = 0.002;
/// Units per second
pub const DEFAULT_MOVE_SPEED: f32 = 60.0;

/// Which movement keys are held
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementState {
    const fn to_direction(positive: bool, negative: bool) -> f32 {
        match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    /// (forward, right) in -1..=1
    pub const fn velocity(&self) -> (f32, f32) {
        (
            Self::to_direction(self.forward, self.backward),
            Self::to_direction(self.right, self.left),
        )
    }

    pub const fn is_moving(&self) -> bool {
        let (forward, right) = self.velocity();
        forward != 0.0 || right != 0.0
    }

    /// Applies a key going down or up; false for keys that do not move
    pub fn set(&mut self, button: Button, down: bool) -> bool {
        match button {
            Button::KeyW | Button::ArrowUp => self.forward = down,
            Button::KeyS | Button::ArrowDown => self.backward = down,
            Button::KeyA | Button::ArrowLeft => self.left = down,
            Button::KeyD | Button::ArrowRight => self.right = down,
            _ => return false,
        }
        true
    }

    /// Rebuilds the state from the keys a controller reports as held
    pub fn from_controller(controller: &impl Controller) -> Self {
        let mut state = Self::default();
        for &button in controller.get_down_keys() {
            state.set(button, true);
        }
        state
    }
}

/// First-person mouse look and walking, active only while the pointer is
/// locked to the window.
#[derive(Debug, Clone)]
pub struct PointerLockControls {
    locked: bool,
    pub movement: MovementState,
    pub move_speed: f32,
    pub sensitivity: f32,
}

impl Default for PointerLockControls {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_SPEED, DEFAULT_MOUSE_SENSITIVITY)
    }
}

impl PointerLockControls {
    pub fn new(move_speed: f32, sensitivity: f32) -> Self {
        Self {
            locked: false,
            movement: MovementState::default(),
            move_speed,
            sensitivity,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns true when the state changed
    pub fn lock(&mut self) -> bool {
        let changed = !self.locked;
        if changed {
            log::info!("Pointer locked");
        }
        self.locked = true;
        changed
    }

    /// Returns true when the state changed. Held keys are forgotten.
    pub fn unlock(&mut self) -> bool {
        let changed = self.locked;
        if changed {
            log::info!("Pointer unlocked");
        }
        self.locked = false;
        self.movement = MovementState::default();
        changed
    }

    /// Mouse look; ignored while unlocked
    pub fn on_mouse_move(&self, camera: &mut FirstPersonCamera, dx: f32, dy: f32) {
        if self.locked {
            camera.rotate(-dx * self.sensitivity, -dy * self.sensitivity);
        }
    }

    /// Walks the camera along the floor plane; returns the displacement.
    ///
    /// The camera's height never changes.
    pub fn update(&self, camera: &mut FirstPersonCamera, dt: f32) -> Vec3 {
        if !self.locked {
            return Vec3::ZERO;
        }
        let (forward, right) = self.movement.velocity();
        let step = self.move_speed * dt;
        let displacement = camera.horizontal_forward() * forward * step + camera.right() * right * step;
        camera.position += displacement;
        displacement
    }

    /// One frame of input: Escape unlocks, held keys walk, mouse motion looks
    pub fn apply(&mut self, controller: &impl Controller, camera: &mut FirstPersonCamera, dt: f32) -> Vec3 {
        if controller.just_pressed().contains(&Button::Escape) {
            self.unlock();
        }
        if !self.locked {
            return Vec3::ZERO;
        }
        self.movement = MovementState::from_controller(controller);
        let (dx, dy) = controller.mouse_delta();
        self.on_mouse_move(camera, dx, dy);
        self.update(camera, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WinitController;

    #[test]
    fn arrows_and_wasd_share_directions() {
        let mut state = MovementState::default();
        assert!(state.set(Button::ArrowUp, true));
        assert_eq!(state.velocity(), (1.0, 0.0));
        state.set(Button::KeyS, true);
        assert_eq!(state.velocity(), (0.0, 0.0));
        state.set(Button::ArrowUp, false);
        state.set(Button::KeyD, true);
        assert_eq!(state.velocity(), (-1.0, 1.0));
        assert!(!state.set(Button::Escape, true));
    }

    #[test]
    fn nothing_moves_while_unlocked() {
        let mut controls = PointerLockControls::default();
        controls.movement.forward = true;
        let mut camera = FirstPersonCamera::default();
        let before = camera;

        assert_eq!(controls.update(&mut camera, 1.0), Vec3::ZERO);
        controls.on_mouse_move(&mut camera, 100.0, 50.0);
        assert_eq!(camera, before);
    }

    #[test]
    fn walking_keeps_height() {
        let mut controls = PointerLockControls::new(60.0, DEFAULT_MOUSE_SENSITIVITY);
        controls.lock();
        controls.movement.forward = true;
        let mut camera = FirstPersonCamera::default();
        camera.pitch = 0.8;

        let moved = controls.update(&mut camera, 0.5);
        assert!((moved.length() - 30.0).abs() < 1e-3);
        assert_eq!(camera.position.y, 25.0);
        assert!(camera.position.z < 10.0);
    }

    #[test]
    fn mouse_right_turns_right() {
        let mut controls = PointerLockControls::default();
        controls.lock();
        let mut camera = FirstPersonCamera::default();
        controls.on_mouse_move(&mut camera, 50.0, 0.0);
        assert!(camera.forward().x > 0.0);
        assert!((camera.yaw - (std::f32::consts::PI - 0.1)).abs() < 1e-5);
    }

    #[test]
    fn escape_unlocks_and_stops() {
        let mut controls = PointerLockControls::default();
        controls.lock();
        let mut input = WinitController::new();
        input.press(Button::KeyW);
        input.press(Button::Escape);

        let mut camera = FirstPersonCamera::default();
        assert_eq!(controls.apply(&input, &mut camera, 0.1), Vec3::ZERO);
        assert!(!controls.is_locked());
        assert_eq!(controls.movement, MovementState::default());
    }

    #[test]
    fn apply_walks_with_held_keys() {
        let mut controls = PointerLockControls::default();
        controls.lock();
        let mut input = WinitController::new();
        input.press(Button::ArrowRight);

        let mut camera = FirstPersonCamera::default();
        let moved = controls.apply(&input, &mut camera, 0.1);
        assert!((moved - Vec3::new(6.0, 0.0, 0.0)).length() < 1e-3);
    }
}
