use embedded_graphics::prelude::Point;

use crate::config::ConfigError;

/// Platform key code as delivered by the host window or input driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const VOLUME_UP: KeyCode = KeyCode(24);
    pub const VOLUME_DOWN: KeyCode = KeyCode(25);
    pub const POWER: KeyCode = KeyCode(26);
    pub const ENTER: KeyCode = KeyCode(13);
    pub const SPACE: KeyCode = KeyCode(32);
    pub const ARROW_UP: KeyCode = KeyCode(273);
    pub const ARROW_DOWN: KeyCode = KeyCode(274);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A key went down.
    Key(KeyCode),
    /// Pointer or touch activation in framebuffer coordinates.
    Tap(Point),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    Select,
    Ignore,
}

pub const MAX_KEYS_PER_ACTION: usize = 4;

pub type KeyList = heapless::Vec<KeyCode, MAX_KEYS_PER_ACTION>;

/// Key code to menu action mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    pub up: KeyList,
    pub down: KeyList,
    pub select: KeyList,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            up: key_list(&[KeyCode::VOLUME_UP, KeyCode::ARROW_UP]),
            down: key_list(&[KeyCode::VOLUME_DOWN, KeyCode::ARROW_DOWN]),
            select: key_list(&[KeyCode::POWER, KeyCode::ENTER, KeyCode::SPACE]),
        }
    }
}

fn key_list(codes: &[KeyCode]) -> KeyList {
    codes.iter().copied().take(MAX_KEYS_PER_ACTION).collect()
}

impl KeyMap {
    pub fn classify(&self, code: KeyCode) -> Action {
        if self.up.contains(&code) {
            Action::MoveUp
        } else if self.down.contains(&code) {
            Action::MoveDown
        } else if self.select.contains(&code) {
            Action::Select
        } else {
            Action::Ignore
        }
    }

    /// Parses a comma separated list such as `"24,273"`.
    pub fn parse_codes(text: &str) -> Result<KeyList, ConfigError> {
        let mut codes = KeyList::new();
        for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let code = part
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidKeyCode)?;
            codes
                .push(KeyCode(code))
                .map_err(|_| ConfigError::TooManyKeys)?;
        }
        if codes.is_empty() {
            return Err(ConfigError::Empty);
        }
        Ok(codes)
    }
}
