use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use recovery_core::battery::{BatteryError, ChargeState, ChargingSensor};

const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

/// Battery exposed by the Linux power supply class.
pub struct SysfsBattery {
    path: Option<PathBuf>,
}

impl SysfsBattery {
    pub fn discover() -> Self {
        let path = Self::find_battery(Path::new(POWER_SUPPLY_ROOT));
        match &path {
            Some(path) => info!("Using battery at {:?}", path),
            None => info!("No battery found under {}", POWER_SUPPLY_ROOT),
        }
        SysfsBattery { path }
    }

    fn find_battery(root: &Path) -> Option<PathBuf> {
        fs::read_dir(root)
            .ok()?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .find(|path| {
                fs::read_to_string(path.join("type"))
                    .map(|kind| kind.trim() == "Battery")
                    .unwrap_or(false)
            })
    }

    fn read_state(path: &Path) -> io::Result<ChargeState> {
        let status = fs::read_to_string(path.join("status"))?;
        // Some supplies do not report a capacity.
        let capacity = fs::read_to_string(path.join("capacity")).unwrap_or_default();
        Ok(parse_state(&status, &capacity))
    }
}

/// "Full" means the cable is still plugged in.
fn parse_state(status: &str, capacity: &str) -> ChargeState {
    let charging = matches!(status.trim(), "Charging" | "Full");
    let level = capacity.trim().parse::<u8>().unwrap_or(0).min(100);
    ChargeState { level, charging }
}

impl ChargingSensor for SysfsBattery {
    fn read(&mut self) -> Result<ChargeState, BatteryError> {
        let path = self.path.as_deref().ok_or(BatteryError::Unavailable)?;
        Self::read_state(path).map_err(|e| {
            debug!("Reading {:?} failed: {}", path, e);
            BatteryError::Unavailable
        })
    }
}

/// Cable state flipped from the keyboard.
pub struct SimulatedCharger {
    state: ChargeState,
}

impl SimulatedCharger {
    pub fn new(charging: bool) -> Self {
        Self { state: ChargeState { level: 75, charging } }
    }

    pub fn toggle(&mut self) {
        self.state.charging = !self.state.charging;
        info!("Simulated cable {}", if self.state.charging { "connected" } else { "disconnected" });
    }
}

impl ChargingSensor for SimulatedCharger {
    fn read(&mut self) -> Result<ChargeState, BatteryError> {
        Ok(self.state)
    }
}

pub enum DesktopCharger {
    Sysfs(SysfsBattery),
    Simulated(SimulatedCharger),
}

impl DesktopCharger {
    pub fn toggle(&mut self) {
        match self {
            DesktopCharger::Simulated(charger) => charger.toggle(),
            DesktopCharger::Sysfs(_) => info!("Cable toggle needs --simulate"),
        }
    }
}

impl ChargingSensor for DesktopCharger {
    fn read(&mut self) -> Result<ChargeState, BatteryError> {
        match self {
            DesktopCharger::Sysfs(battery) => battery.read(),
            DesktopCharger::Simulated(charger) => charger.read(),
        }
    }
}
