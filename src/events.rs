use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;

/// What a key press asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Toggle between running and paused
    Pause,

    /// Pause if running, then advance exactly one generation
    Step,

    /// Re-randomize the board and restart the generation count
    Randomize,

    /// Exit the game
    Quit,
}

impl Control {
    /// Classify a key press. Keys without a binding yield `None`.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        match key {
            // interrupt and end of transmission
            KeyEvent {
                code: KeyCode::Char('c' | 'd'),
                modifiers,
                ..
            } if modifiers.contains(KeyModifiers::CONTROL) => Some(Self::Quit),

            KeyEvent { modifiers, .. } if modifiers.contains(KeyModifiers::CONTROL) => None,

            KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                ..
            } => Some(Self::Quit),
            KeyEvent {
                code: KeyCode::Char('p'),
                ..
            } => Some(Self::Pause),
            KeyEvent {
                code: KeyCode::Char('s'),
                ..
            } => Some(Self::Step),
            KeyEvent {
                code: KeyCode::Char('r'),
                ..
            } => Some(Self::Randomize),
            _ => None,
        }
    }
}
