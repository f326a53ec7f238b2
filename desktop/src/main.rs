use argh::FromArgs;
use recovery_core::{
    application::Application,
    clock::Instant,
    config::Config,
    input::{KeyList, KeyMap},
};

use crate::battery::{DesktopCharger, SimulatedCharger, SysfsBattery};
use crate::minifb_display::MinifbDisplay;

mod battery;
mod minifb_display;

#[derive(FromArgs)]
/// Android style recovery screen simulator
struct Args {
    /// window scale: 1, 2 or 4
    #[argh(option, default = "1")]
    scale: u8,

    /// use a charger toggled with the C key instead of the system battery
    #[argh(switch)]
    simulate: bool,

    /// start the simulated charger plugged in
    #[argh(switch)]
    charging: bool,

    /// key codes moving the cursor up, e.g. "24,273"
    #[argh(option, from_str_fn(parse_keys))]
    up_keys: Option<KeyList>,

    /// key codes moving the cursor down, e.g. "25,274"
    #[argh(option, from_str_fn(parse_keys))]
    down_keys: Option<KeyList>,

    /// key codes selecting the current item, e.g. "26,13,32"
    #[argh(option, from_str_fn(parse_keys))]
    select_keys: Option<KeyList>,
}

fn parse_keys(value: &str) -> Result<KeyList, String> {
    KeyMap::parse_codes(value).map_err(|e| e.to_string())
}

fn window_scale(scale: u8) -> minifb::Scale {
    match scale {
        2 => minifb::Scale::X2,
        4 => minifb::Scale::X4,
        _ => minifb::Scale::X1,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    let mut config = Config::default();
    if let Some(keys) = args.up_keys {
        config.keymap.up = keys;
    }
    if let Some(keys) = args.down_keys {
        config.keymap.down = keys;
    }
    if let Some(keys) = args.select_keys {
        config.keymap.select = keys;
    }

    let charger = if args.simulate {
        DesktopCharger::Simulated(SimulatedCharger::new(args.charging))
    } else {
        DesktopCharger::Sysfs(SysfsBattery::discover())
    };

    log::info!("Recovery desktop application started");

    let start = std::time::Instant::now();
    let now = || Instant::from_millis(start.elapsed().as_millis() as u64);

    let mut display = MinifbDisplay::new(window_scale(args.scale));
    let mut application = Application::new(config, charger, now());

    while display.is_open() {
        let input = display.update();
        if input.toggle_charging {
            application.charger_mut().toggle();
        }
        application.update(now(), &input.events);
        application.draw(&mut display, now());
    }
}
