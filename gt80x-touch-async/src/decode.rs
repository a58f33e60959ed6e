//! Decoding of the output register block.

use crate::error::DecodeError;
use crate::regmap::{ContactRegs, FRAME_LEN, MAP, NB_CONTACTS};

/// One burst read of the output register block.
pub type RawFrame = [u8; FRAME_LEN];

/// What the controller reports for one contact slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContactSample {
    /// The slot's bit in the flags register.
    pub pressed: bool,
    /// X coordinate, after the optional axis swap.
    pub x: u16,
    /// Y coordinate, after the optional axis swap.
    pub y: u16,
    /// Contact pressure.
    pub pressure: u8,
}

/// A fully decoded output block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    /// Raw flags register.
    pub flags: u8,
    /// Raw states register. Kept for diagnostics only.
    pub states: u8,
    /// Per-slot samples, indexed by tracking id.
    pub contacts: [ContactSample; NB_CONTACTS],
}

fn word(raw: &[u8], high: u8, low: u8) -> u16 {
    ((raw[high as usize] as u16) << 8) | raw[low as usize] as u16
}

fn sample(raw: &[u8], flags: u8, index: usize, regs: &ContactRegs, swap_xy: bool) -> ContactSample {
    let (x, y) = if swap_xy {
        (word(raw, regs.y_h, regs.y_l), word(raw, regs.x_h, regs.x_l))
    } else {
        (word(raw, regs.x_h, regs.x_l), word(raw, regs.y_h, regs.y_l))
    };

    ContactSample {
        pressed: flags & (1u8 << index) != 0,
        x,
        y,
        pressure: raw[regs.pressure as usize],
    }
}

/// Decodes a burst read of the output block.
///
/// `raw` must be exactly [`FRAME_LEN`] bytes; anything else is discarded
/// whole. When `swap_xy` is set the X and Y registers are exchanged before
/// assembly, so downstream consumers never see unswapped coordinates.
pub fn decode(raw: &[u8], swap_xy: bool) -> Result<Frame, DecodeError> {
    if raw.len() != FRAME_LEN {
        return Err(DecodeError::ShortRead);
    }

    let flags = raw[MAP.flags as usize];
    let mut frame = Frame {
        flags,
        states: raw[MAP.states as usize],
        ..Frame::default()
    };
    for (index, (slot, regs)) in frame
        .contacts
        .iter_mut()
        .zip(MAP.contacts.iter())
        .enumerate()
    {
        *slot = sample(raw, flags, index, regs, swap_xy);
    }

    log::trace!("flags 0x{:02x} states 0x{:02x}", frame.flags, frame.states);
    Ok(frame)
}
