use embedded_graphics::prelude::Point;
use log::{info, warn};
use recovery_core::{
    framebuffer::{Framebuffer, HEIGHT, WIDTH},
    input::{InputEvent, KeyCode},
};

/// Desktop keys standing in for the phone's hardware buttons. `None` marks
/// the simulated cable toggle.
const KEYS: [(minifb::Key, Option<KeyCode>); 8] = [
    (minifb::Key::Up, Some(KeyCode::ARROW_UP)),
    (minifb::Key::Down, Some(KeyCode::ARROW_DOWN)),
    (minifb::Key::Enter, Some(KeyCode::ENTER)),
    (minifb::Key::Space, Some(KeyCode::SPACE)),
    (minifb::Key::PageUp, Some(KeyCode::VOLUME_UP)),
    (minifb::Key::PageDown, Some(KeyCode::VOLUME_DOWN)),
    (minifb::Key::P, Some(KeyCode::POWER)),
    (minifb::Key::C, None),
];

/// Held keys of this frame and the previous one, one bit per `KEYS` entry.
#[derive(Clone, Copy, Default)]
struct KeyState {
    current: u16,
    previous: u16,
}

impl KeyState {
    fn update(&mut self, current: u16) {
        self.previous = self.current;
        self.current = current;
    }

    fn is_pressed(&self, index: usize) -> bool {
        (self.current & !self.previous) & (1 << index) != 0
    }
}

pub struct MinifbDisplay {
    window: minifb::Window,
    keys: KeyState,
    mouse_down: bool,
}

/// Input gathered during one pass of the window loop.
#[derive(Default)]
pub struct FrameInput {
    pub events: Vec<InputEvent>,
    pub toggle_charging: bool,
}

impl MinifbDisplay {
    pub fn new(scale: minifb::Scale) -> Self {
        Self {
            window: Self::create_window(scale),
            keys: KeyState::default(),
            mouse_down: false,
        }
    }

    fn create_window(scale: minifb::Scale) -> minifb::Window {
        let options = minifb::WindowOptions {
            borderless: false,
            title: true,
            resize: false,
            scale,
            ..minifb::WindowOptions::default()
        };
        let mut window = minifb::Window::new("Android Recovery", WIDTH, HEIGHT, options)
            .unwrap_or_else(|e| {
                panic!("Unable to open window: {}", e);
            });

        window.set_target_fps(60);
        window
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(minifb::Key::Escape)
    }

    pub fn update(&mut self) -> FrameInput {
        self.window.update();
        let mut input = FrameInput::default();

        let mut current: u16 = 0;
        for (i, (key, _)) in KEYS.iter().enumerate() {
            if self.window.is_key_down(*key) {
                current |= 1 << i;
            }
        }
        self.keys.update(current);

        for (i, (_, code)) in KEYS.iter().enumerate() {
            if !self.keys.is_pressed(i) {
                continue;
            }
            match code {
                Some(code) => input.events.push(InputEvent::Key(*code)),
                None => input.toggle_charging = true,
            }
        }

        let down = self.window.get_mouse_down(minifb::MouseButton::Left);
        if down && !self.mouse_down {
            if let Some((x, y)) = self.window.get_mouse_pos(minifb::MouseMode::Discard) {
                let point = Point::new(x as i32, y as i32);
                info!("Tap at {:?}", point);
                input.events.push(InputEvent::Tap(point));
            }
        }
        self.mouse_down = down;

        input
    }
}

impl recovery_core::display::Display for MinifbDisplay {
    fn present(&mut self, framebuffer: &Framebuffer) {
        if let Err(e) = self
            .window
            .update_with_buffer(framebuffer.pixels(), WIDTH, HEIGHT)
        {
            warn!("Failed to present frame: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_reported_once_while_held() {
        let mut keys = KeyState::default();
        keys.update(0b01);
        assert!(keys.is_pressed(0));
        assert!(!keys.is_pressed(1));

        keys.update(0b01);
        assert!(!keys.is_pressed(0));

        keys.update(0b11);
        assert!(!keys.is_pressed(0));
        assert!(keys.is_pressed(1));

        keys.update(0b00);
        keys.update(0b01);
        assert!(keys.is_pressed(0));
    }

    #[test]
    fn every_tracked_key_fits_the_mask() {
        assert!(KEYS.len() <= u16::BITS as usize);
        assert_eq!(KEYS.iter().filter(|(_, code)| code.is_none()).count(), 1);
    }
}
