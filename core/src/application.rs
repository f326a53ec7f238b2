use alloc::boxed::Box;
use log::{debug, info};

use crate::{
    activities::{
        Activity, ScreenState, UpdateResult, classic::ClassicActivity, sensor::SensorActivity,
    },
    battery::ChargingSensor,
    clock::{Instant, Interval},
    config::Config,
    display::Display,
    framebuffer::Framebuffer,
    input::InputEvent,
};

struct Fade {
    from: Box<Framebuffer>,
    started: Instant,
}

/// Screen manager. Both screens live for the whole run; one is shown.
pub struct Application<Charger>
where
    Charger: ChargingSensor,
{
    config: Config,
    charger: Charger,
    classic: ClassicActivity,
    sensor: SensorActivity,
    screen: ScreenState,
    battery_poll: Interval,
    render_tick: Interval,
    framebuffer: Box<Framebuffer>,
    fade: Option<Fade>,
    dirty: bool,
}

impl<Charger> Application<Charger>
where
    Charger: ChargingSensor,
{
    pub fn new(config: Config, charger: Charger, now: Instant) -> Self {
        let timing = config.timing;
        let mut application = Application {
            classic: ClassicActivity::new(timing.transition_delay),
            sensor: SensorActivity::new(timing.transition_delay),
            config,
            charger,
            screen: ScreenState::Classic,
            battery_poll: Interval::new(timing.battery_poll, now),
            render_tick: Interval::new(timing.render, now),
            framebuffer: Box::default(),
            fade: None,
            dirty: true,
        };
        application.classic.start(now);
        application
    }

    pub fn screen(&self) -> ScreenState {
        self.screen
    }

    pub fn classic(&self) -> &ClassicActivity {
        &self.classic
    }

    pub fn sensor(&self) -> &SensorActivity {
        &self.sensor
    }

    pub fn charger_mut(&mut self) -> &mut Charger {
        &mut self.charger
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    fn active(&mut self) -> &mut dyn Activity {
        match self.screen {
            ScreenState::Classic => &mut self.classic,
            ScreenState::Sensor => &mut self.sensor,
        }
    }

    pub fn update(&mut self, now: Instant, events: &[InputEvent]) {
        for event in events {
            let result = match self.screen {
                ScreenState::Classic => self.classic.handle_event(event, &self.config.keymap),
                ScreenState::Sensor => self.sensor.handle_event(event, &self.config.keymap),
            };
            self.apply(result, now);
        }

        if self.render_tick.due(now) && self.screen == ScreenState::Classic {
            let result = self.classic.render();
            self.apply(result, now);
        }

        if self.battery_poll.due(now) {
            match self.charger.read() {
                Ok(charge) => {
                    debug!("Battery poll: {:?}", charge);
                    let result = self.active().poll_charging(charge, now);
                    self.apply(result, now);
                }
                Err(err) => debug!("Battery poll skipped: {}", err),
            }
        }

        let result = self.active().update(now);
        self.apply(result, now);
    }

    fn apply(&mut self, result: UpdateResult, now: Instant) {
        match result {
            UpdateResult::None => {}
            UpdateResult::Redraw => self.dirty = true,
            UpdateResult::SwitchTo(screen) => self.transition_to(screen, now),
        }
    }

    /// Switches the visible screen and starts a cross-fade from the last frame.
    pub fn transition_to(&mut self, screen: ScreenState, now: Instant) {
        if self.screen == screen {
            return;
        }
        info!("Transition {:?} -> {:?}", self.screen, screen);
        self.active().stop();
        self.screen = screen;
        self.active().start(now);
        if screen == ScreenState::Classic {
            self.classic.render();
        }
        self.fade = Some(Fade { from: self.framebuffer.clone(), started: now });
        self.dirty = true;
    }

    pub fn draw(&mut self, display: &mut dyn Display, now: Instant) {
        if !self.dirty && self.fade.is_none() {
            return;
        }
        self.dirty = false;

        let theme = &self.config.theme;
        match self.screen {
            ScreenState::Classic => self.classic.draw(&mut self.framebuffer, theme),
            ScreenState::Sensor => self.sensor.draw(&mut self.framebuffer, theme),
        }

        if let Some(fade) = &self.fade {
            let total = self.config.timing.fade.as_millis() as u64;
            let elapsed = now.duration_since(fade.started).as_millis() as u64;
            if elapsed >= total {
                self.fade = None;
            } else {
                let remaining = (total - elapsed) * 255 / total;
                self.framebuffer.blend_from(&fade.from, remaining as u8);
            }
        }

        display.present(&self.framebuffer);
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::*;
    use crate::{
        activities::{classic, sensor},
        battery::{BatteryError, ChargeState},
        input::KeyCode,
    };

    struct FakeCharger {
        reading: Result<ChargeState, BatteryError>,
        reads: usize,
    }

    impl FakeCharger {
        fn set(&mut self, charging: bool) {
            self.reading = Ok(ChargeState { level: 60, charging });
        }
    }

    impl ChargingSensor for FakeCharger {
        fn read(&mut self) -> Result<ChargeState, BatteryError> {
            self.reads += 1;
            self.reading
        }
    }

    #[derive(Default)]
    struct FrameCounter {
        frames: usize,
    }

    impl Display for FrameCounter {
        fn present(&mut self, _framebuffer: &Framebuffer) {
            self.frames += 1;
        }
    }

    fn ms(millis: u64) -> Instant {
        Instant::from_millis(millis)
    }

    fn app(charging: bool) -> Application<FakeCharger> {
        let charger = FakeCharger {
            reading: Ok(ChargeState { level: 60, charging }),
            reads: 0,
        };
        Application::new(Config::default(), charger, ms(0))
    }

    #[test]
    fn starts_on_classic() {
        let app = app(false);
        assert_eq!(app.screen(), ScreenState::Classic);
        assert_eq!(app.classic().status(), classic::HINT);
    }

    #[test]
    fn plugging_in_switches_to_sensor_after_delay() {
        let mut app = app(true);
        app.update(ms(1999), &[]);
        assert_eq!(app.classic().status(), classic::HINT);

        app.update(ms(2000), &[]);
        assert_eq!(app.classic().status(), classic::CABLE_CONNECTED);
        assert_eq!(app.screen(), ScreenState::Classic);

        app.update(ms(2999), &[]);
        assert_eq!(app.screen(), ScreenState::Classic);
        app.update(ms(3000), &[]);
        assert_eq!(app.screen(), ScreenState::Sensor);
        assert!(app.is_fading());
    }

    #[test]
    fn unplugging_returns_to_classic_after_delay() {
        let mut app = app(true);
        app.update(ms(2000), &[]);
        app.update(ms(3000), &[]);
        assert_eq!(app.screen(), ScreenState::Sensor);

        app.charger_mut().set(false);
        app.update(ms(4000), &[]);
        assert_eq!(app.sensor().status(), sensor::CABLE_DISCONNECTED);
        assert_eq!(app.screen(), ScreenState::Sensor);

        app.update(ms(5000), &[]);
        assert_eq!(app.screen(), ScreenState::Classic);
        // Status text carries over from before the switch.
        assert_eq!(app.classic().status(), classic::CABLE_CONNECTED);
    }

    #[test]
    fn back_button_returns_immediately() {
        let mut app = app(true);
        app.update(ms(2000), &[]);
        app.update(ms(3000), &[]);
        assert_eq!(app.screen(), ScreenState::Sensor);

        let back = crate::widgets::sensor_button_area(4).center();
        app.update(ms(3100), &[InputEvent::Tap(back)]);
        assert_eq!(app.screen(), ScreenState::Classic);
    }

    #[test]
    fn unavailable_battery_is_skipped() {
        let mut app = app(false);
        app.charger_mut().reading = Err(BatteryError::Unavailable);
        for t in (0..=10_000).step_by(100) {
            app.update(ms(t), &[]);
        }
        assert_eq!(app.screen(), ScreenState::Classic);
        assert_eq!(app.classic().status(), classic::HINT);
        assert_eq!(app.charger_mut().reads, 5);
    }

    #[test]
    fn unavailable_battery_keeps_pending_switch() {
        let mut config = Config::default();
        config.timing.battery_poll = Duration::from_millis(500);
        let charger = FakeCharger {
            reading: Ok(ChargeState { level: 60, charging: true }),
            reads: 0,
        };
        let mut app = Application::new(config, charger, ms(0));

        app.update(ms(500), &[]);
        let pending = app.classic().pending();
        assert_eq!(pending.map(|d| d.at()), Some(ms(1500)));

        app.charger_mut().reading = Err(BatteryError::Unavailable);
        app.update(ms(1000), &[]);
        assert_eq!(app.charger_mut().reads, 2);
        assert_eq!(app.classic().pending(), pending);
        assert_eq!(app.classic().status(), classic::CABLE_CONNECTED);

        app.update(ms(1500), &[]);
        assert_eq!(app.screen(), ScreenState::Sensor);
    }

    #[test]
    fn classic_cursor_survives_sensor_round_trip() {
        let mut app = app(false);
        let down = InputEvent::Key(KeyCode::ARROW_DOWN);
        app.update(ms(50), &[down, down, down]);
        assert_eq!(app.classic().cursor().selected(), 3);

        app.transition_to(ScreenState::Sensor, ms(100));
        app.update(ms(200), &[]);
        app.transition_to(ScreenState::Classic, ms(300));

        assert_eq!(app.screen(), ScreenState::Classic);
        assert_eq!(app.classic().cursor().selected(), 3);
        assert!(app.classic().lines()[3].selected);
    }

    #[test]
    fn keys_reach_classic_menu() {
        let mut app = app(false);
        let events = [
            InputEvent::Key(KeyCode::ARROW_DOWN),
            InputEvent::Key(KeyCode::ARROW_DOWN),
            InputEvent::Key(KeyCode::ENTER),
        ];
        app.update(ms(50), &events);
        assert_eq!(app.classic().status(), "Formatting /data...");

        // Highlight follows on the next render tick.
        assert!(!app.classic().lines()[2].selected);
        app.update(ms(100), &[]);
        assert!(app.classic().lines()[2].selected);
    }

    #[test]
    fn fade_runs_for_configured_time() {
        let mut app = app(false);
        let mut display = FrameCounter::default();
        app.draw(&mut display, ms(0));
        app.draw(&mut display, ms(10));
        assert_eq!(display.frames, 1);

        app.transition_to(ScreenState::Sensor, ms(100));
        let fade = Config::default().timing.fade;
        app.draw(&mut display, ms(100));
        app.draw(&mut display, ms(200));
        assert!(app.is_fading());
        app.draw(&mut display, ms(100) + fade);
        assert!(!app.is_fading());
        assert_eq!(display.frames, 4);

        app.draw(&mut display, ms(1000));
        assert_eq!(display.frames, 4);
    }

    #[test]
    fn transition_to_active_screen_is_noop() {
        let mut app = app(false);
        app.transition_to(ScreenState::Classic, ms(10));
        assert!(!app.is_fading());
    }
}
