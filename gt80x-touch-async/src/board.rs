//! Power and shutdown control lines.

use embedded_hal::digital::OutputPin;

/// Board wiring of the controller's power and shutdown lines.
pub trait Board {
    /// Switches the controller supply on or off.
    fn set_power(&mut self, on: bool);

    /// Asserts (`true`) or releases the shutdown line.
    fn set_shutdown(&mut self, active: bool);
}

/// A [`Board`] driving two GPIO outputs, both active high.
pub struct PinBoard<PWR, SHDN> {
    power: PWR,
    shutdown: SHDN,
}

impl<PWR, SHDN> PinBoard<PWR, SHDN>
where
    PWR: OutputPin,
    SHDN: OutputPin,
{
    /// Creates a new `PinBoard`.
    ///
    /// # Arguments
    ///
    /// * `power` - Output enabling the controller supply.
    /// * `shutdown` - Output holding the controller in shutdown while high.
    pub fn new(power: PWR, shutdown: SHDN) -> Self {
        Self { power, shutdown }
    }

    /// Gives the pins back.
    pub fn release(self) -> (PWR, SHDN) {
        (self.power, self.shutdown)
    }
}

impl<PWR, SHDN> Board for PinBoard<PWR, SHDN>
where
    PWR: OutputPin,
    SHDN: OutputPin,
{
    fn set_power(&mut self, on: bool) {
        let res = if on {
            self.power.set_high()
        } else {
            self.power.set_low()
        };
        if let Err(err) = res {
            log::warn!("Error driving power line: {err:?}");
        }
    }

    fn set_shutdown(&mut self, active: bool) {
        let res = if active {
            self.shutdown.set_high()
        } else {
            self.shutdown.set_low()
        };
        if let Err(err) = res {
            log::warn!("Error driving shutdown line: {err:?}");
        }
    }
}

/// Cuts or restores power. The shutdown line is released before the supply
/// is cut so it never back-feeds an unpowered controller.
pub(crate) fn power<B: Board>(board: &mut B, on: bool) {
    if !on {
        board.set_shutdown(false);
    }
    board.set_power(on);
}
