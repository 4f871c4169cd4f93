//! Keyboard mapping

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter: start an unstarted session
    Confirm,
    /// Space: start, or jump once running
    Space,
    /// Escape: toggle pause
    Pause,
    Left,
    Right,
    Jump,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(Key::Confirm),
            " " | "Spacebar" => Some(Key::Space),
            "Escape" | "Esc" => Some(Key::Pause),
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "ArrowUp" | "w" | "W" => Some(Key::Jump),
            _ => None,
        }
    }

    /// Keys that hold the jump button down
    #[inline]
    pub fn is_jump(self) -> bool {
        matches!(self, Key::Jump | Key::Space)
    }
}
