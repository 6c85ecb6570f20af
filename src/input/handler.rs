use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::{Direction, Intent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Intent(Intent),
    Quit,
    None,
}

/// Turns key events into intents
///
/// When the terminal reports key releases, a held pause key toggles pause
/// once per physical press. Without release events every press toggles.
pub struct InputHandler {
    release_events: bool,
    pause_held: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_release_events(false)
    }

    pub fn with_release_events(release_events: bool) -> Self {
        Self {
            release_events,
            pause_held: false,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> KeyAction {
        if is_pause_key(key.code) {
            return self.handle_pause_key(key.kind);
        }

        if key.kind == KeyEventKind::Release {
            return KeyAction::None;
        }

        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => turn(Direction::Up),
            KeyCode::Down => turn(Direction::Down),
            KeyCode::Left => turn(Direction::Left),
            KeyCode::Right => turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => turn(Direction::Right),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Intent(Intent::Restart),

            _ => KeyAction::None,
        }
    }

    fn handle_pause_key(&mut self, kind: KeyEventKind) -> KeyAction {
        match kind {
            KeyEventKind::Release => {
                self.pause_held = false;
                KeyAction::None
            }
            KeyEventKind::Repeat => KeyAction::None,
            KeyEventKind::Press => {
                if self.release_events {
                    if self.pause_held {
                        return KeyAction::None;
                    }
                    self.pause_held = true;
                }
                KeyAction::Intent(Intent::TogglePause)
            }
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn turn(direction: Direction) -> KeyAction {
    KeyAction::Intent(Intent::Turn(direction))
}

fn is_pause_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ')
    )
}
