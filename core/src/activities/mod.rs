use crate::{
    battery::ChargeState,
    clock::Instant,
    config::Theme,
    framebuffer::Framebuffer,
    input::{InputEvent, KeyMap},
};

pub mod classic;
pub mod sensor;

pub const STATUS_CAPACITY: usize = 64;

/// Which screen is on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Classic,
    Sensor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResult {
    None,
    Redraw,
    SwitchTo(ScreenState),
}

/// Status line text owned by a screen. Overlong text is cut off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMessage(heapless::String<STATUS_CAPACITY>);

impl StatusMessage {
    pub fn new(text: &str) -> Self {
        let mut status = Self::default();
        status.set(text);
        status
    }

    pub fn set(&mut self, text: &str) {
        self.0.clear();
        for c in text.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub trait Activity {
    fn start(&mut self, now: Instant);
    /// Leaving the screen drops any transition it still had scheduled.
    fn stop(&mut self);
    fn handle_event(&mut self, event: &InputEvent, keymap: &KeyMap) -> UpdateResult;
    fn poll_charging(&mut self, charge: ChargeState, now: Instant) -> UpdateResult;
    fn update(&mut self, now: Instant) -> UpdateResult;
    fn draw(&mut self, target: &mut Framebuffer, theme: &Theme);
}
