//! Per-instance configuration supplied at probe time.

/// Default 7-bit bus address of the GT801.
pub const DEFAULT_ADDRESS: u8 = 0x55;

/// Raw value written to the orientation register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation(pub u8);

impl Orientation {
    /// Native panel orientation.
    pub const NORMAL: Orientation = Orientation(0x00);
    /// X axis reported mirrored by the controller.
    pub const INVERT_X: Orientation = Orientation(0x01);

    /// The byte sent to the controller.
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Driver configuration, fixed for the lifetime of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// 7-bit bus address of the controller.
    pub address: u8,
    /// Orientation register value pushed at the end of bring-up.
    pub orientation: Orientation,
    /// Exchange X and Y when decoding.
    pub swap_xy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            orientation: Orientation::NORMAL,
            swap_xy: false,
        }
    }
}

impl Config {
    /// Sets the bus address.
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Sets the orientation register value.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Enables or disables the X/Y swap.
    pub fn with_swap_xy(mut self, swap_xy: bool) -> Self {
        self.swap_xy = swap_xy;
        self
    }
}
