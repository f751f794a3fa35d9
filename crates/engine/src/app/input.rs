#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
}

const KEY_COUNT: usize = 10;

impl KeyCode {
    const fn index(self) -> usize {
        match self {
            KeyCode::W => 0,
            KeyCode::A => 1,
            KeyCode::S => 2,
            KeyCode::D => 3,
            KeyCode::ArrowUp => 4,
            KeyCode::ArrowDown => 5,
            KeyCode::ArrowLeft => 6,
            KeyCode::ArrowRight => 7,
            KeyCode::Space => 8,
            KeyCode::Escape => 9,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct KeyStates {
    down: [bool; KEY_COUNT],
}

impl KeyStates {
    pub(crate) fn set(&mut self, code: KeyCode, is_down: bool) {
        self.down[code.index()] = is_down;
    }

    pub(crate) fn is_down(&self, code: KeyCode) -> bool {
        self.down[code.index()]
    }
}

/// Keyboard state handed to one simulation tick: the keys held at tick time plus the
/// key-down events delivered since the previous tick, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    held: KeyStates,
    key_downs: Vec<KeyCode>,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, code: KeyCode) -> bool {
        self.held.is_down(code)
    }

    pub fn is_any_down(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|code| self.held.is_down(*code))
    }

    pub fn key_downs(&self) -> &[KeyCode] {
        &self.key_downs
    }

    pub fn with_key_held(mut self, code: KeyCode, is_down: bool) -> Self {
        self.held.set(code, is_down);
        self
    }

    /// Records a key-down event and marks the key as held.
    pub fn with_key_pressed(mut self, code: KeyCode) -> Self {
        self.held.set(code, true);
        self.key_downs.push(code);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub state: KeyState,
}

impl KeyEvent {
    pub const fn pressed(code: KeyCode) -> Self {
        Self {
            code,
            state: KeyState::Pressed,
        }
    }

    pub const fn released(code: KeyCode) -> Self {
        Self {
            code,
            state: KeyState::Released,
        }
    }
}

/// Collects raw key events between ticks and turns them into [`InputSnapshot`]s.
///
/// Key-down events are edge-triggered: holding a key produces one event until it is
/// released and pressed again.
#[derive(Debug, Default)]
pub struct Keyboard {
    quit_requested: bool,
    held: KeyStates,
    pending_key_downs: Vec<KeyCode>,
}

impl Keyboard {
    pub fn handle_event(&mut self, event: KeyEvent) {
        match event.state {
            KeyState::Pressed => {
                if !self.held.is_down(event.code) {
                    self.pending_key_downs.push(event.code);
                }
                self.held.set(event.code, true);
                if event.code == KeyCode::Escape {
                    self.quit_requested = true;
                }
            }
            KeyState::Released => self.held.set(event.code, false),
        }
    }

    pub fn snapshot_for_tick(&mut self) -> InputSnapshot {
        InputSnapshot {
            quit_requested: self.quit_requested,
            held: self.held,
            key_downs: std::mem::take(&mut self.pending_key_downs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_is_edge_triggered_for_single_tick() {
        let mut keyboard = Keyboard::default();
        keyboard.handle_event(KeyEvent::pressed(KeyCode::Space));

        let first = keyboard.snapshot_for_tick();
        let second = keyboard.snapshot_for_tick();

        assert_eq!(first.key_downs(), &[KeyCode::Space]);
        assert!(second.key_downs().is_empty());
        assert!(second.is_down(KeyCode::Space));
    }

    #[test]
    fn held_key_does_not_spam_key_downs() {
        let mut keyboard = Keyboard::default();
        keyboard.handle_event(KeyEvent::pressed(KeyCode::A));
        keyboard.handle_event(KeyEvent::pressed(KeyCode::A));
        assert_eq!(keyboard.snapshot_for_tick().key_downs(), &[KeyCode::A]);

        keyboard.handle_event(KeyEvent::released(KeyCode::A));
        keyboard.handle_event(KeyEvent::pressed(KeyCode::A));
        assert_eq!(keyboard.snapshot_for_tick().key_downs(), &[KeyCode::A]);
    }

    #[test]
    fn key_downs_keep_arrival_order() {
        let mut keyboard = Keyboard::default();
        keyboard.handle_event(KeyEvent::pressed(KeyCode::D));
        keyboard.handle_event(KeyEvent::pressed(KeyCode::Space));
        keyboard.handle_event(KeyEvent::pressed(KeyCode::W));

        let snapshot = keyboard.snapshot_for_tick();
        assert_eq!(
            snapshot.key_downs(),
            &[KeyCode::D, KeyCode::Space, KeyCode::W]
        );
    }

    #[test]
    fn release_clears_held_state() {
        let mut keyboard = Keyboard::default();
        keyboard.handle_event(KeyEvent::pressed(KeyCode::ArrowLeft));
        keyboard.handle_event(KeyEvent::released(KeyCode::ArrowLeft));

        let snapshot = keyboard.snapshot_for_tick();
        assert!(!snapshot.is_down(KeyCode::ArrowLeft));
        assert_eq!(snapshot.key_downs(), &[KeyCode::ArrowLeft]);
    }

    #[test]
    fn is_any_down_checks_every_code() {
        let snapshot = InputSnapshot::empty().with_key_held(KeyCode::ArrowRight, true);
        assert!(snapshot.is_any_down(&[KeyCode::W, KeyCode::ArrowRight]));
        assert!(!snapshot.is_any_down(&[KeyCode::W, KeyCode::S]));
        assert!(!snapshot.is_any_down(&[]));
    }

    #[test]
    fn escape_requests_quit() {
        let mut keyboard = Keyboard::default();
        keyboard.handle_event(KeyEvent::pressed(KeyCode::Escape));
        assert!(keyboard.snapshot_for_tick().quit_requested());
    }
}
