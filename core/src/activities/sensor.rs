use core::time::Duration;

use embedded_graphics::{
    mono_font::ascii::{FONT_8X13, FONT_9X18_BOLD, FONT_10X20},
    prelude::{DrawTarget, Point},
};
use log::{debug, info};
use strum::VariantArray;

use super::{Activity, ScreenState, StatusMessage, UpdateResult};
use crate::{
    battery::ChargeState,
    clock::{Deadline, Instant},
    config::Theme,
    framebuffer::Framebuffer,
    input::{InputEvent, KeyMap},
    widgets::{self, CENTER_X},
};

pub const CABLE_DISCONNECTED: &str = "Cable disconnected - returning to Classic Recovery...";

const TITLE: &str = "Sensor Recovery Mode";
const TITLE_Y: i32 = 105;
const STATUS_Y: i32 = 762;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::VariantArray)]
pub enum SensorAction {
    WipeData,
    Backup,
    Restore,
    RebootSystem,
    Back,
}

impl SensorAction {
    pub fn label(&self) -> &'static str {
        match self {
            SensorAction::WipeData => "Wipe Data",
            SensorAction::Backup => "Backup",
            SensorAction::Restore => "Restore",
            SensorAction::RebootSystem => "Reboot System",
            SensorAction::Back => "<- Back",
        }
    }

    /// Status shown on activation. `Back` leaves the screen instead.
    pub fn status(&self) -> Option<&'static str> {
        match self {
            SensorAction::WipeData => Some("Wiping /data..."),
            SensorAction::Backup => Some("Creating backup..."),
            SensorAction::Restore => Some("Restoring backup..."),
            SensorAction::RebootSystem => Some("Rebooting..."),
            SensorAction::Back => None,
        }
    }

    /// The button under `point`, if any.
    pub fn at(point: Point) -> Option<SensorAction> {
        SensorAction::VARIANTS
            .iter()
            .enumerate()
            .find(|(i, _)| widgets::sensor_button_area(*i).contains(point))
            .map(|(_, action)| *action)
    }
}

pub struct SensorActivity {
    status: StatusMessage,
    charge: Option<ChargeState>,
    transition_delay: Duration,
    pending: Option<Deadline>,
    /// Status to put back if the pending switch is cancelled.
    resume_status: StatusMessage,
}

impl SensorActivity {
    pub fn new(transition_delay: Duration) -> Self {
        Self {
            status: StatusMessage::default(),
            charge: None,
            transition_delay,
            pending: None,
            resume_status: StatusMessage::default(),
        }
    }

    pub fn status(&self) -> &str {
        self.status.as_str()
    }

    pub fn pending(&self) -> Option<Deadline> {
        self.pending
    }

    pub fn activate(&mut self, action: SensorAction) -> UpdateResult {
        info!("Sensor action: {}", action.label());
        match action.status() {
            Some(status) => {
                self.status.set(status);
                UpdateResult::Redraw
            }
            None => {
                self.pending = None;
                UpdateResult::SwitchTo(ScreenState::Classic)
            }
        }
    }
}

impl Activity for SensorActivity {
    fn start(&mut self, _now: Instant) {
        info!("SensorActivity started");
    }

    fn stop(&mut self) {
        self.pending = None;
    }

    fn handle_event(&mut self, event: &InputEvent, _keymap: &KeyMap) -> UpdateResult {
        let InputEvent::Tap(point) = event else {
            return UpdateResult::None;
        };
        match SensorAction::at(*point) {
            Some(action) => self.activate(action),
            None => {
                debug!("Tap at {:?} hit no button", point);
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

        if !charge.charging {
            if self.pending.is_none() {
                info!("Cable disconnected, returning to classic recovery in {:?}", self.transition_delay);
                self.resume_status = self.status.clone();
                self.status.set(CABLE_DISCONNECTED);
                self.pending = Some(Deadline::after(now, self.transition_delay));
                result = UpdateResult::Redraw;
            }
        } else if self.pending.take().is_some() {
            self.status = core::mem::take(&mut self.resume_status);
            result = UpdateResult::Redraw;
            info!("Cable reconnected before the switch, staying in sensor recovery");
        }
        result
    }

    fn update(&mut self, now: Instant) -> UpdateResult {
        match self.pending {
            Some(deadline) if deadline.expired(now) => {
                self.pending = None;
                UpdateResult::SwitchTo(ScreenState::Classic)
            }
            _ => UpdateResult::None,
        }
    }

    fn draw(&mut self, target: &mut Framebuffer, theme: &Theme) {
        target.clear(theme.background).ok();

        widgets::label(target, TITLE, Point::new(CENTER_X, TITLE_Y), &FONT_9X18_BOLD, theme.sensor_title);

        for (i, action) in SensorAction::VARIANTS.iter().enumerate() {
            widgets::button(
                target,
                widgets::sensor_button_area(i),
                action.label(),
                &FONT_10X20,
                theme.button,
                theme.button_text,
            );
        }

        widgets::label(
            target,
            self.status.as_str(),
            Point::new(CENTER_X, STATUS_Y),
            &FONT_8X13,
            theme.sensor_status,
        );
        widgets::charge(target, self.charge, theme.sensor_status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;

    const DELAY: Duration = Duration::from_secs(1);

    fn charging(charging: bool) -> ChargeState {
        ChargeState { level: 80, charging }
    }

    fn tap(activity: &mut SensorActivity, action: SensorAction) -> UpdateResult {
        let index = SensorAction::VARIANTS.iter().position(|a| *a == action).unwrap();
        let center = widgets::sensor_button_area(index).center();
        activity.handle_event(&InputEvent::Tap(center), &KeyMap::default())
    }

    #[test]
    fn cosmetic_actions_only_set_status() {
        let table = [
            (SensorAction::WipeData, "Wiping /data..."),
            (SensorAction::Backup, "Creating backup..."),
            (SensorAction::Restore, "Restoring backup..."),
            (SensorAction::RebootSystem, "Rebooting..."),
        ];
        let mut activity = SensorActivity::new(DELAY);
        assert_eq!(activity.status(), "");
        for (action, status) in table {
            assert_eq!(tap(&mut activity, action), UpdateResult::Redraw);
            assert_eq!(activity.status(), status);
        }
    }

    #[test]
    fn back_switches_immediately() {
        let mut activity = SensorActivity::new(DELAY);
        activity.poll_charging(charging(false), Instant::from_millis(0));
        assert!(activity.pending().is_some());
        assert_eq!(
            tap(&mut activity, SensorAction::Back),
            UpdateResult::SwitchTo(ScreenState::Classic)
        );
        assert_eq!(activity.pending(), None);
    }

    #[test]
    fn taps_outside_buttons_and_keys_are_ignored() {
        let mut activity = SensorActivity::new(DELAY);
        let keymap = KeyMap::default();
        assert_eq!(SensorAction::at(Point::new(5, 5)), None);
        assert_eq!(
            activity.handle_event(&InputEvent::Tap(Point::new(5, 5)), &keymap),
            UpdateResult::None
        );
        assert_eq!(
            activity.handle_event(&InputEvent::Key(KeyCode::POWER), &keymap),
            UpdateResult::None
        );
        assert_eq!(activity.status(), "");
    }

    #[test]
    fn unplugging_schedules_return_once() {
        let mut activity = SensorActivity::new(DELAY);
        activity.poll_charging(charging(false), Instant::from_millis(4000));
        assert_eq!(activity.status(), CABLE_DISCONNECTED);
        let first = activity.pending().unwrap();

        activity.poll_charging(charging(false), Instant::from_millis(4500));
        assert_eq!(activity.pending(), Some(first));

        assert_eq!(activity.update(Instant::from_millis(4999)), UpdateResult::None);
        assert_eq!(
            activity.update(Instant::from_millis(5000)),
            UpdateResult::SwitchTo(ScreenState::Classic)
        );
    }

    #[test]
    fn replugging_cancels_return() {
        let mut activity = SensorActivity::new(DELAY);
        activity.poll_charging(charging(false), Instant::from_millis(0));
        activity.poll_charging(charging(true), Instant::from_millis(200));
        assert_eq!(activity.pending(), None);
        assert_eq!(activity.update(Instant::from_millis(2000)), UpdateResult::None);
    }

    #[test]
    fn cancelled_return_restores_previous_status() {
        let mut activity = SensorActivity::new(DELAY);
        tap(&mut activity, SensorAction::Backup);
        activity.poll_charging(charging(false), Instant::from_millis(0));
        assert_eq!(activity.status(), CABLE_DISCONNECTED);
        activity.poll_charging(charging(true), Instant::from_millis(200));
        assert_eq!(activity.update(Instant::from_millis(10_000)), UpdateResult::None);
        assert_eq!(activity.status(), "Creating backup...");
    }
}
