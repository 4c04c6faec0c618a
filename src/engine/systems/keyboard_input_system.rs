use std::collections::HashSet;

use log::{debug, info};
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Keyboard and mouse state shared by every exercise, updated from window
/// events and read once per frame.
#[derive(Debug)]
pub struct InputState {
    pressed_keys: HashSet<KeyCode>,
    pub spinning: bool,
    pub wireframe: bool,
    pub spot_light: bool,
    quit_requested: bool,
    requested_subroutine: Option<usize>,
    last_cursor: Option<(f64, f64)>,
    mouse_delta: (f32, f32),
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            spinning: true,
            wireframe: false,
            spot_light: false,
            quit_requested: false,
            requested_subroutine: None,
            last_cursor: None,
            mouse_delta: (0.0, 0.0),
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key transition. Toggles fire on the initial press only,
    /// never on auto-repeat.
    pub fn receive_key(&mut self, key_code: KeyCode, state: ElementState, repeat: bool) {
        match state {
            ElementState::Pressed => {
                self.pressed_keys.insert(key_code);
                if !repeat {
                    self.on_press(key_code);
                }
            }
            ElementState::Released => {
                self.pressed_keys.remove(&key_code);
            }
        }
    }

    fn on_press(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Escape => self.quit_requested = true,
            KeyCode::KeyP => {
                self.spinning = !self.spinning;
                info!("🔄 spinning: {}", self.spinning);
            }
            KeyCode::KeyL => {
                self.wireframe = !self.wireframe;
                info!("🔲 wireframe: {}", self.wireframe);
            }
            KeyCode::KeyF => {
                self.spot_light = !self.spot_light;
                info!("🔦 spot light: {}", self.spot_light);
            }
            other => {
                if let Some(digit) = digit_of(other) {
                    self.requested_subroutine = Some(digit - 1);
                }
            }
        }
    }

    pub fn is_pressed(&self, key_code: KeyCode) -> bool {
        self.pressed_keys.contains(&key_code)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// The subroutine index chosen with keys 1-9 since the last call, if it
    /// is below `available`.
    pub fn take_subroutine(&mut self, available: usize) -> Option<usize> {
        let index = self.requested_subroutine.take()?;
        if index < available {
            Some(index)
        } else {
            debug!("no subroutine at index {index} ({available} available)");
            None
        }
    }

    /// Records an absolute cursor position. The first position only seeds
    /// the reference point so the view does not jump.
    pub fn receive_cursor(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.last_cursor {
            self.mouse_delta.0 += (x - last_x) as f32;
            // window y grows downwards
            self.mouse_delta.1 += (last_y - y) as f32;
        }
        self.last_cursor = Some((x, y));
    }

    /// Accumulated `(x, y)` mouse offset since the last call.
    pub fn take_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }
}

fn digit_of(key_code: KeyCode) -> Option<usize> {
    let digit = match key_code {
        KeyCode::Digit1 | KeyCode::Numpad1 => 1,
        KeyCode::Digit2 | KeyCode::Numpad2 => 2,
        KeyCode::Digit3 | KeyCode::Numpad3 => 3,
        KeyCode::Digit4 | KeyCode::Numpad4 => 4,
        KeyCode::Digit5 | KeyCode::Numpad5 => 5,
        KeyCode::Digit6 | KeyCode::Numpad6 => 6,
        KeyCode::Digit7 | KeyCode::Numpad7 => 7,
        KeyCode::Digit8 | KeyCode::Numpad8 => 8,
        KeyCode::Digit9 | KeyCode::Numpad9 => 9,
        _ => return None,
    };
    Some(digit)
}
