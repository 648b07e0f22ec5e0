use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Start a new episode once the current one is over
    Restart,
    /// Leave the program once the current episode is over
    Exit,
    /// Leave immediately, from any phase
    Quit,
    TogglePause,
    SpeedUp,
    SlowDown,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Game over prompt
            KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            KeyCode::Char(' ') => KeyAction::Exit,

            // Playback
            KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::TogglePause,
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => KeyAction::SpeedUp,
            KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Down => KeyAction::SlowDown,

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
