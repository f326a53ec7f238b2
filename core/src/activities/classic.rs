use core::time::Duration;

use embedded_graphics::{
    mono_font::ascii::{FONT_8X13, FONT_10X20},
    prelude::{DrawTarget, Point},
};
use log::{info, trace};
use strum::VariantArray;

use super::{Activity, ScreenState, StatusMessage, UpdateResult};
use crate::{
    battery::ChargeState,
    clock::{Deadline, Instant},
    config::Theme,
    framebuffer::Framebuffer,
    input::{Action, InputEvent, KeyMap},
    menu::MenuCursor,
    widgets::{self, CENTER_X},
};

pub const HINT: &str = "Use VOL+/VOL- to move, POWER to select";
pub const CABLE_CONNECTED: &str = "Cable connected - switching to Sensor Recovery...";

const TITLE: &str = "-- Android Recovery --";
const TITLE_Y: i32 = 80;
const ITEMS_TOP: i32 = 200;
const ITEM_PITCH: i32 = 100;
const STATUS_Y: i32 = 720;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::VariantArray)]
pub enum ClassicOption {
    RebootSystem,
    ApplyAdbUpdate,
    WipeData,
    WipeCache,
    PowerOff,
}

impl ClassicOption {
    pub fn label(&self) -> &'static str {
        match self {
            ClassicOption::RebootSystem => "Reboot system now",
            ClassicOption::ApplyAdbUpdate => "Apply update from ADB",
            ClassicOption::WipeData => "Wipe data/factory reset",
            ClassicOption::WipeCache => "Wipe cache partition",
            ClassicOption::PowerOff => "Power off",
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            ClassicOption::RebootSystem => "Rebooting...",
            ClassicOption::ApplyAdbUpdate => "Waiting for ADB sideload...",
            ClassicOption::WipeData => "Formatting /data...",
            ClassicOption::WipeCache => "Clearing cache...",
            ClassicOption::PowerOff => "Shutting down...",
        }
    }
}

pub const MENU_LEN: usize = ClassicOption::VARIANTS.len();

/// One rendered menu row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuLine {
    pub text: heapless::String<32>,
    pub selected: bool,
}

impl MenuLine {
    fn new(option: ClassicOption, selected: bool) -> Self {
        let mut text = heapless::String::new();
        text.push_str(if selected { "> " } else { "  " }).ok();
        text.push_str(option.label()).ok();
        Self { text, selected }
    }
}

pub struct ClassicActivity {
    cursor: MenuCursor<ClassicOption, MENU_LEN>,
    lines: [MenuLine; MENU_LEN],
    status: StatusMessage,
    charge: Option<ChargeState>,
    transition_delay: Duration,
    pending: Option<Deadline>,
    /// Status to put back if the pending switch is cancelled.
    resume_status: StatusMessage,
}

impl ClassicActivity {
    pub fn new(transition_delay: Duration) -> Self {
        let mut activity = Self {
            cursor: MenuCursor::new(core::array::from_fn(|i| ClassicOption::VARIANTS[i])),
            lines: Default::default(),
            status: StatusMessage::new(HINT),
            charge: None,
            transition_delay,
            pending: None,
            resume_status: StatusMessage::default(),
        };
        activity.render();
        activity
    }

    pub fn cursor(&self) -> &MenuCursor<ClassicOption, MENU_LEN> {
        &self.cursor
    }

    pub fn lines(&self) -> &[MenuLine] {
        &self.lines
    }

    pub fn status(&self) -> &str {
        self.status.as_str()
    }

    pub fn pending(&self) -> Option<Deadline> {
        self.pending
    }

    pub fn select(&mut self) -> UpdateResult {
        let choice = *self.cursor.current();
        info!("Selected: {}", choice.label());
        self.status.set(choice.status());
        UpdateResult::Redraw
    }

    /// Projects the cursor onto the menu rows.
    pub fn render(&mut self) -> UpdateResult {
        let mut changed = false;
        for ((option, selected), line) in self.cursor.iter().zip(self.lines.iter_mut()) {
            let next = MenuLine::new(*option, selected);
            if *line != next {
                *line = next;
                changed = true;
            }
        }
        if changed { UpdateResult::Redraw } else { UpdateResult::None }
    }
}

impl Activity for ClassicActivity {
    fn start(&mut self, _now: Instant) {
        info!("ClassicActivity started");
    }

    fn stop(&mut self) {
        self.pending = None;
    }

    fn handle_event(&mut self, event: &InputEvent, keymap: &KeyMap) -> UpdateResult {
        let InputEvent::Key(code) = event else {
            return UpdateResult::None;
        };
        // Cursor moves show up on the next render tick.
        match keymap.classify(*code) {
            Action::MoveUp => {
                self.cursor.move_up();
                UpdateResult::None
            }
            Action::MoveDown => {
                self.cursor.move_down();
                UpdateResult::None
            }
            Action::Select => self.select(),
            Action::Ignore => {
                trace!("Ignoring key {:?}", code);
                UpdateResult::None
            }
        }
    }

    fn poll_charging(&mut self, charge: ChargeState, now: Instant) -> UpdateResult {
        let mut result = UpdateResult::None;
        if self.charge != Some(charge) {
            self.charge = Some(charge);
            result = UpdateResult::Redraw;
        }

        if charge.charging {
            if self.pending.is_none() {
                info!("Cable connected, switching to sensor recovery in {:?}", self.transition_delay);
                self.resume_status = self.status.clone();
                self.status.set(CABLE_CONNECTED);
                self.pending = Some(Deadline::after(now, self.transition_delay));
                result = UpdateResult::Redraw;
            }
        } else if self.pending.take().is_some() {
            self.status = core::mem::take(&mut self.resume_status);
            result = UpdateResult::Redraw;
            info!("Cable removed before the switch, staying in classic recovery");
        }
        result
    }

    fn update(&mut self, now: Instant) -> UpdateResult {
        match self.pending {
            Some(deadline) if deadline.expired(now) => {
                self.pending = None;
                UpdateResult::SwitchTo(ScreenState::Sensor)
            }
            _ => UpdateResult::None,
        }
    }

    fn draw(&mut self, target: &mut Framebuffer, theme: &Theme) {
        target.clear(theme.background).ok();

        widgets::label(target, TITLE, Point::new(CENTER_X, TITLE_Y), &FONT_10X20, theme.classic_title);

        for (i, line) in self.lines.iter().enumerate() {
            let color = if line.selected { theme.item_selected } else { theme.item };
            let y = ITEMS_TOP + i as i32 * ITEM_PITCH;
            widgets::label(target, &line.text, Point::new(CENTER_X, y), &FONT_10X20, color);
        }

        widgets::label(
            target,
            self.status.as_str(),
            Point::new(CENTER_X, STATUS_Y),
            &FONT_8X13,
            theme.classic_status,
        );
        widgets::charge(target, self.charge, theme.item);
    }
}
