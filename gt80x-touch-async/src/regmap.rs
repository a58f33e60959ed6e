//! Fixed register layout of the GT80x controller.
//!
//! The output block (`0x00..0x22`) is read in one burst on every interrupt.
//! Offsets are not contiguous for contact 3: its low X byte lives at `0x18`,
//! after a gap of unused registers.

/// Number of simultaneously tracked contacts.
pub const NB_CONTACTS: usize = 5;

/// Offsets of the registers describing one contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactRegs {
    /// X coordinate, high byte.
    pub x_h: u8,
    /// X coordinate, low byte.
    pub x_l: u8,
    /// Y coordinate, high byte.
    pub y_h: u8,
    /// Y coordinate, low byte.
    pub y_l: u8,
    /// Contact pressure.
    pub pressure: u8,
}

/// Offsets of the output register block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterMap {
    /// One "pressed" bit per contact, bit `i` for contact `i`.
    pub flags: u8,
    /// Per-contact state register (read but not interpreted).
    pub states: u8,
    /// Per-contact coordinate and pressure registers.
    pub contacts: [ContactRegs; NB_CONTACTS],
    /// Payload checksum (read but not validated).
    pub checksum: u8,
}

const fn contact(x_h: u8, x_l: u8, y_h: u8, y_l: u8, pressure: u8) -> ContactRegs {
    ContactRegs {
        x_h,
        x_l,
        y_h,
        y_l,
        pressure,
    }
}

/// The output register block as laid out by the controller.
pub const MAP: RegisterMap = RegisterMap {
    flags: 0x00,
    states: 0x01,
    contacts: [
        contact(0x02, 0x03, 0x04, 0x05, 0x06),
        contact(0x07, 0x08, 0x09, 0x0a, 0x0b),
        contact(0x0c, 0x0d, 0x0e, 0x0f, 0x10),
        contact(0x11, 0x18, 0x19, 0x1a, 0x1b),
        contact(0x1c, 0x1d, 0x1e, 0x1f, 0x20),
    ],
    checksum: 0x21,
};

/// Size of one burst read of the output block.
pub const FRAME_LEN: usize = MAP.checksum as usize + 1;

/// First register of the output block.
pub const REG_OUTPUT_BASE: u8 = 0x00;

/// First register of the configuration block.
pub const REG_CONF_BASE: u8 = 0x30;

/// Maximum X coordinate, big endian u16.
pub const REG_X_MAX: u8 = 0x3a;

/// Maximum Y coordinate, big endian u16.
pub const REG_Y_MAX: u8 = 0x3c;

/// Orientation / axis inversion register.
pub const REG_ORIENTATION: u8 = 0x68;

/// Vendor configuration image, written from [`REG_CONF_BASE`] up to and
/// including the refresh register at `0x64`.
pub const INIT_IMAGE: [u8; 53] = [
    // 0x30 -> 0x37
    0x19, 0x05, 0x03, 0x28, 0x02, 0x14, 0x40, 0x10,
    // 0x38 -> 0x3f
    0x3C, 0xF8, 0x14, 0x00, 0x1E, 0x00, 0x01, 0x23,
    // 0x40 -> 0x47
    0x45, 0x67, 0x89, 0xAB, 0xCD, 0xE1, 0x00, 0x00,
    // 0x48 -> 0x4f
    0x00, 0x00, 0x4D, 0xC0, 0x20, 0x01, 0x01, 0x83,
    // 0x50 -> 0x57
    0x50, 0x3C, 0x1E, 0xB4, 0x00, 0x0A, 0x3C, 0x6E,
    // 0x58 -> 0x5f
    0x1E, 0x00, 0x50, 0x32, 0x73, 0x00, 0x00, 0x00,
    // 0x60 -> 0x63
    0x00, 0x00, 0x00, 0x00,
    // 0x64: config refresh
    0x01,
];
