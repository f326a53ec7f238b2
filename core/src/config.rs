use core::{fmt, time::Duration};

use embedded_graphics::pixelcolor::Rgb888;

use crate::input::KeyMap;

/// Everything the application needs at start-up.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub keymap: KeyMap,
    pub theme: Theme,
    pub timing: Timing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgb888,
    pub classic_title: Rgb888,
    pub item: Rgb888,
    pub item_selected: Rgb888,
    pub classic_status: Rgb888,
    pub sensor_title: Rgb888,
    pub button: Rgb888,
    pub button_text: Rgb888,
    pub sensor_status: Rgb888,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Rgb888::new(0, 0, 0),
            classic_title: Rgb888::new(255, 204, 0),
            item: Rgb888::new(178, 178, 178),
            item_selected: Rgb888::new(0, 255, 255),
            classic_status: Rgb888::new(102, 204, 255),
            sensor_title: Rgb888::new(0, 229, 255),
            button: Rgb888::new(25, 102, 255),
            button_text: Rgb888::new(255, 255, 255),
            sensor_status: Rgb888::new(153, 229, 255),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// How often the charging sensor is read.
    pub battery_poll: Duration,
    /// How often the classic menu highlight is re-rendered.
    pub render: Duration,
    /// Delay between a cable change and the screen switch.
    pub transition_delay: Duration,
    /// Length of the cross-fade between screens.
    pub fade: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            battery_poll: Duration::from_secs(2),
            render: Duration::from_millis(100),
            transition_delay: Duration::from_secs(1),
            fade: Duration::from_millis(400),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    InvalidKeyCode,
    TooManyKeys,
    Empty,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidKeyCode => f.write_str("key codes must be integers in 0..=65535"),
            ConfigError::TooManyKeys => write!(
                f,
                "at most {} key codes per action",
                crate::input::MAX_KEYS_PER_ACTION
            ),
            ConfigError::Empty => f.write_str("no key codes given"),
        }
    }
}
