use crate::{
    core::{geo::PixelPoint, viewport::PanDirection},
    prelude::HashSet,
};
use serde::{Deserialize, Serialize};

/// Raw input the plotter reacts to. Positions are window pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Window closed or the user asked to leave
    Quit,
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseDown {
        position: PixelPoint,
        button: MouseButton,
    },
    MouseUp {
        position: PixelPoint,
        button: MouseButton,
    },
    MouseMove { position: PixelPoint },
    /// Wheel movement; positive `delta` scrolls up
    Scroll { delta: f64, position: PixelPoint },
    /// The window lost focus, so releases may never arrive
    FocusLost,
}

/// Keys with a binding. Everything else is `Other` with the backend's code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    Q,
    E,
    R,
    Space,
    Other(u32),
}

impl KeyCode {
    /// Direction panned while this key is held
    pub fn pan_direction(self) -> Option<PanDirection> {
        match self {
            KeyCode::W => Some(PanDirection::Up),
            KeyCode::A => Some(PanDirection::Left),
            KeyCode::S => Some(PanDirection::Down),
            KeyCode::D => Some(PanDirection::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Held keys and buttons plus the pointer, tracked across frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashSet<KeyCode>,
    buttons: HashSet<MouseButton>,
    pointer: PixelPoint,
    /// Where the primary button went down, until it comes back up
    press_position: Option<PixelPoint>,
    /// Pointer position at the last drag sample
    drag_anchor: PixelPoint,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer(&self) -> PixelPoint {
        self.pointer
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    pub fn is_button_held(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Pan directions of every held movement key, in W, A, S, D order
    pub fn held_pan_directions(&self) -> Vec<PanDirection> {
        [KeyCode::W, KeyCode::A, KeyCode::S, KeyCode::D]
            .into_iter()
            .filter(|key| self.is_key_held(*key))
            .filter_map(KeyCode::pan_direction)
            .collect()
    }

    /// Records `event`. Returns the click position when the primary button
    /// is released exactly where it was pressed.
    pub fn apply(&mut self, event: &InputEvent) -> Option<PixelPoint> {
        match *event {
            InputEvent::KeyDown(key) => {
                self.keys.insert(key);
            }
            InputEvent::KeyUp(key) => {
                self.keys.remove(&key);
            }
            InputEvent::MouseDown { position, button } => {
                self.pointer = position;
                self.buttons.insert(button);
                if button == MouseButton::Left {
                    self.press_position = Some(position);
                    self.drag_anchor = position;
                }
            }
            InputEvent::MouseUp { position, button } => {
                self.pointer = position;
                self.buttons.remove(&button);
                if button == MouseButton::Left {
                    return self.press_position.take().filter(|pressed| *pressed == position);
                }
            }
            InputEvent::MouseMove { position } | InputEvent::Scroll { position, .. } => {
                self.pointer = position;
            }
            InputEvent::FocusLost => {
                self.keys.clear();
                self.buttons.clear();
                self.press_position = None;
            }
            InputEvent::Quit => {}
        }
        None
    }

    /// Pointer movement since the previous sample while the primary button
    /// is held, otherwise zero.
    pub fn take_drag_delta(&mut self) -> PixelPoint {
        if !self.is_button_held(MouseButton::Left) {
            return PixelPoint::ZERO;
        }
        let delta = self.pointer - self.drag_anchor;
        self.drag_anchor = self.pointer;
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: i32, y: i32) -> InputEvent {
        InputEvent::MouseDown {
            position: PixelPoint::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn up(x: i32, y: i32) -> InputEvent {
        InputEvent::MouseUp {
            position: PixelPoint::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_click_in_place() {
        let mut state = InputState::new();
        assert_eq!(state.apply(&down(100, 100)), None);
        assert_eq!(state.apply(&up(100, 100)), Some(PixelPoint::new(100, 100)));
        assert!(!state.is_button_held(MouseButton::Left));
    }

    #[test]
    fn test_moved_release_is_not_a_click() {
        let mut state = InputState::new();
        state.apply(&down(100, 100));
        state.apply(&InputEvent::MouseMove {
            position: PixelPoint::new(110, 100),
        });
        assert_eq!(state.apply(&up(110, 100)), None);
    }

    #[test]
    fn test_other_buttons_do_not_click() {
        let mut state = InputState::new();
        let position = PixelPoint::new(5, 5);
        state.apply(&InputEvent::MouseDown {
            position,
            button: MouseButton::Right,
        });
        assert_eq!(
            state.apply(&InputEvent::MouseUp {
                position,
                button: MouseButton::Right,
            }),
            None
        );
    }

    #[test]
    fn test_drag_delta_is_sampled() {
        let mut state = InputState::new();
        state.apply(&down(100, 100));
        state.apply(&InputEvent::MouseMove {
            position: PixelPoint::new(104, 97),
        });
        assert_eq!(state.take_drag_delta(), PixelPoint::new(4, -3));
        assert_eq!(state.take_drag_delta(), PixelPoint::ZERO);

        state.apply(&up(104, 97));
        state.apply(&InputEvent::MouseMove {
            position: PixelPoint::new(200, 200),
        });
        assert_eq!(state.take_drag_delta(), PixelPoint::ZERO);
    }

    #[test]
    fn test_held_pan_keys() {
        let mut state = InputState::new();
        state.apply(&InputEvent::KeyDown(KeyCode::D));
        state.apply(&InputEvent::KeyDown(KeyCode::W));
        state.apply(&InputEvent::KeyDown(KeyCode::Q));
        assert_eq!(
            state.held_pan_directions(),
            vec![PanDirection::Up, PanDirection::Right]
        );

        state.apply(&InputEvent::KeyUp(KeyCode::W));
        assert_eq!(state.held_pan_directions(), vec![PanDirection::Right]);
    }

    #[test]
    fn test_focus_lost_releases_everything() {
        let mut state = InputState::new();
        state.apply(&InputEvent::KeyDown(KeyCode::S));
        state.apply(&down(1, 1));
        state.apply(&InputEvent::FocusLost);
        assert!(state.held_pan_directions().is_empty());
        assert_eq!(state.apply(&up(1, 1)), None);
    }
}
