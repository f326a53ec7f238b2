use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChargeState {
    pub level: u8,
    pub charging: bool,
}

impl ChargeState {
    pub fn format(&self) -> heapless::String<8> {
        heapless::format!("{}{}%", if self.charging { "+" } else { "" }, self.level)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryError {
    /// No reading could be taken. Callers skip the poll.
    Unavailable,
}

impl fmt::Display for BatteryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatteryError::Unavailable => f.write_str("battery status unavailable"),
        }
    }
}

/// Source of the external charging state, sampled on the battery poll cadence.
pub trait ChargingSensor {
    fn read(&mut self) -> Result<ChargeState, BatteryError>;
}
