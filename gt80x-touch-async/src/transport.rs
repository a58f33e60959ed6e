//! Register-addressed transactions on top of an async I2C bus.

use embedded_hal_async::i2c::{I2c, SevenBitAddress};
use heapless::Vec;

use crate::error::BusError;

/// Largest payload a single transaction may carry.
pub const MAX_BURST: usize = 64;

// Register address byte plus payload.
const WRITE_FRAME_LEN: usize = MAX_BURST + 1;

/// Register-level access to the controller.
///
/// Both operations return the number of payload bytes moved. A write is one
/// bus transaction carrying the register address followed by the payload; a
/// read is an address write linked to a read with no bus release in between.
#[allow(async_fn_in_trait)]
pub trait RegisterBus {
    /// Largest payload accepted by [`RegisterBus::write`] and [`RegisterBus::read`].
    const MAX_BURST: usize;

    /// Writes `bytes` starting at register `reg`.
    async fn write(&mut self, reg: u8, bytes: &[u8]) -> Result<usize, BusError>;

    /// Fills `buf` from consecutive registers starting at `reg`.
    async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<usize, BusError>;

    /// Writes a single register.
    async fn write_u8(&mut self, reg: u8, value: u8) -> Result<usize, BusError> {
        self.write(reg, &[value]).await
    }

    /// Reads a big endian 16 bit value from `reg` and `reg + 1`.
    async fn read_u16(&mut self, reg: u8) -> Result<u16, BusError> {
        let mut buf = [0u8; 2];
        if self.read(reg, &mut buf).await? != buf.len() {
            return Err(BusError::Io);
        }
        Ok(u16::from_be_bytes(buf))
    }
}

/// [`RegisterBus`] implementation over an `embedded-hal-async` I2C device.
pub struct I2cTransport<I2cType> {
    i2c: I2cType,
    address: SevenBitAddress,
}

impl<I2cType> I2cTransport<I2cType>
where
    I2cType: I2c<SevenBitAddress>,
{
    /// Creates a transport talking to the device at `address`.
    pub fn new(i2c: I2cType, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    /// The 7-bit bus address of the controller.
    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Gives the underlying bus back.
    pub fn release(self) -> I2cType {
        self.i2c
    }
}

impl<I2cType> RegisterBus for I2cTransport<I2cType>
where
    I2cType: I2c<SevenBitAddress>,
{
    const MAX_BURST: usize = MAX_BURST;

    async fn write(&mut self, reg: u8, bytes: &[u8]) -> Result<usize, BusError> {
        let mut frame: Vec<u8, WRITE_FRAME_LEN> = Vec::new();
        frame.push(reg).map_err(|_| BusError::Resource)?;
        frame
            .extend_from_slice(bytes)
            .map_err(|_| BusError::Resource)?;

        self.i2c
            .write(self.address, &frame)
            .await
            .map_err(|err| {
                log::trace!("write of {} bytes at 0x{reg:02x} failed: {err:?}", bytes.len());
                BusError::Io
            })?;

        log::trace!("wrote {} bytes at 0x{reg:02x}", bytes.len());
        Ok(bytes.len())
    }

    async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<usize, BusError> {
        if buf.len() > MAX_BURST {
            return Err(BusError::Resource);
        }

        self.i2c
            .write_read(self.address, &[reg], buf)
            .await
            .map_err(|err| {
                log::trace!("read of {} bytes at 0x{reg:02x} failed: {err:?}", buf.len());
                BusError::Io
            })?;

        log::trace!("read {} bytes at 0x{reg:02x}", buf.len());
        Ok(buf.len())
    }
}
