//! Error types for the GT80x driver.

use core::fmt;

/// An error raised by a single register transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// The transfer failed on the bus or moved fewer bytes than requested.
    Io,
    /// The request does not fit the transport's transaction buffer.
    Resource,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "bus transfer failed"),
            Self::Resource => write!(f, "transaction exceeds transport buffer"),
        }
    }
}

/// An error raised while bringing the controller up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BringupError {
    /// The controller never answered the liveness probe.
    NotDetected,
    /// The vendor initialization image was not fully written.
    InitFailed,
    /// The orientation register (or the axis range readback) failed.
    ConfigFailed,
}

impl fmt::Display for BringupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotDetected => write!(f, "controller not detected"),
            Self::InitFailed => write!(f, "initialization image write failed"),
            Self::ConfigFailed => write!(f, "configuration write failed"),
        }
    }
}

/// An error raised while turning a burst read into contact samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The burst read did not cover the whole output register block.
    ShortRead,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortRead => write!(f, "short read of output registers"),
        }
    }
}

/// Why a single service cycle was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    /// The burst read failed on the bus.
    Bus(BusError),
    /// The burst read came back incomplete.
    Decode(DecodeError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(err) => write!(f, "service cycle aborted: {err}"),
            Self::Decode(err) => write!(f, "service cycle aborted: {err}"),
        }
    }
}

impl From<BusError> for ServiceError {
    fn from(err: BusError) -> Self {
        ServiceError::Bus(err)
    }
}

impl From<DecodeError> for ServiceError {
    fn from(err: DecodeError) -> Self {
        ServiceError::Decode(err)
    }
}
