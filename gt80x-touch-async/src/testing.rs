//! Test doubles: a scripted controller on a fake I2C bus, recording board
//! lines, delays and sink.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::board::Board;
use crate::config::DEFAULT_ADDRESS;
use crate::decode::RawFrame;
use crate::error::BusError;
use crate::event::{InputReport, TouchSink};
use crate::regmap::{FRAME_LEN, MAP};
use crate::transport::RegisterBus;

/// Everything observable that happened on the rig, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Power(bool),
    Shutdown(bool),
    Delay(u32),
    Read { reg: u8, len: usize, ok: bool },
    Write { reg: u8, bytes: Vec<u8> },
}

struct Bench {
    address: u8,
    regs: [u8; 256],
    steps: Vec<Step>,
    powered: Option<bool>,
    fail_reads: usize,
    fail_read_regs: Vec<u8>,
    fail_write_regs: Vec<u8>,
}

/// Shared state behind the fake bus, board and delay.
#[derive(Clone)]
pub struct Rig {
    bench: Rc<RefCell<Bench>>,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            bench: Rc::new(RefCell::new(Bench {
                address: DEFAULT_ADDRESS,
                regs: [0; 256],
                steps: Vec::new(),
                powered: None,
                fail_reads: 0,
                fail_read_regs: Vec::new(),
                fail_write_regs: Vec::new(),
            })),
        }
    }

    pub fn address(&self) -> u8 {
        self.bench.borrow().address
    }

    pub fn i2c(&self) -> FakeI2c {
        FakeI2c {
            bench: self.bench.clone(),
        }
    }

    pub fn board(&self) -> FakeBoard {
        FakeBoard {
            bench: self.bench.clone(),
        }
    }

    pub fn delay(&self) -> FakeDelay {
        FakeDelay {
            bench: self.bench.clone(),
        }
    }

    pub fn steps(&self) -> Vec<Step> {
        self.bench.borrow().steps.clone()
    }

    pub fn clear_steps(&self) {
        self.bench.borrow_mut().steps.clear();
    }

    pub fn register(&self, reg: u8) -> u8 {
        self.bench.borrow().regs[reg as usize]
    }

    pub fn registers(&self) -> [u8; 256] {
        self.bench.borrow().regs
    }

    pub fn set_registers(&self, start: u8, bytes: &[u8]) {
        let start = start as usize;
        self.bench.borrow_mut().regs[start..start + bytes.len()].copy_from_slice(bytes);
    }

    /// Last level driven on the power line, if any.
    pub fn powered(&self) -> Option<bool> {
        self.bench.borrow().powered
    }

    /// NACKs the next `count` reads, whatever their register.
    pub fn fail_next_reads(&self, count: usize) {
        self.bench.borrow_mut().fail_reads = count;
    }

    /// NACKs every read starting at `reg`.
    pub fn fail_reads_at(&self, reg: u8) {
        self.bench.borrow_mut().fail_read_regs.push(reg);
    }

    /// NACKs every write starting at `reg`.
    pub fn fail_writes_at(&self, reg: u8) {
        self.bench.borrow_mut().fail_write_regs.push(reg);
    }
}

/// I2C controller exposing a flat 256-byte register file.
pub struct FakeI2c {
    bench: Rc<RefCell<Bench>>,
}

impl ErrorType for FakeI2c {
    type Error = ErrorKind;
}

impl I2c for FakeI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut bench = self.bench.borrow_mut();
        if address != bench.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        let mut pointer = 0usize;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    let (reg, payload) = bytes.split_first().ok_or(ErrorKind::Other)?;
                    pointer = *reg as usize;
                    if payload.is_empty() {
                        continue;
                    }
                    if bench.fail_write_regs.contains(reg) {
                        return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
                    }
                    bench.regs[pointer..pointer + payload.len()].copy_from_slice(payload);
                    bench.steps.push(Step::Write {
                        reg: *reg,
                        bytes: payload.to_vec(),
                    });
                }
                Operation::Read(buf) => {
                    let reg = pointer as u8;
                    let ok = bench.fail_reads == 0 && !bench.fail_read_regs.contains(&reg);
                    bench.steps.push(Step::Read {
                        reg,
                        len: buf.len(),
                        ok,
                    });
                    if !ok {
                        bench.fail_reads = bench.fail_reads.saturating_sub(1);
                        return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
                    }
                    buf.copy_from_slice(&bench.regs[pointer..pointer + buf.len()]);
                }
            }
        }
        Ok(())
    }
}

/// Board recording every line change.
pub struct FakeBoard {
    bench: Rc<RefCell<Bench>>,
}

impl Board for FakeBoard {
    fn set_power(&mut self, on: bool) {
        let mut bench = self.bench.borrow_mut();
        bench.powered = Some(on);
        bench.steps.push(Step::Power(on));
    }

    fn set_shutdown(&mut self, active: bool) {
        self.bench.borrow_mut().steps.push(Step::Shutdown(active));
    }
}

/// Delay that returns immediately and records the requested time in ms.
pub struct FakeDelay {
    bench: Rc<RefCell<Bench>>,
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.bench.borrow_mut().steps.push(Step::Delay(ns / 1_000_000));
    }

    async fn delay_us(&mut self, us: u32) {
        self.bench.borrow_mut().steps.push(Step::Delay(us / 1_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.bench.borrow_mut().steps.push(Step::Delay(ms));
    }
}

/// Sink keeping every report.
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: Vec<InputReport>,
}

impl RecordingSink {
    /// Returns and clears the recorded reports.
    pub fn take(&mut self) -> Vec<InputReport> {
        std::mem::take(&mut self.reports)
    }
}

impl TouchSink for RecordingSink {
    fn report_contact(&mut self, tracking_id: u8, x: u16, y: u16, pressure: u8) {
        self.reports.push(InputReport::Touch(crate::event::TouchEvent::moved(
            tracking_id,
            x,
            y,
            pressure,
        )));
    }

    fn report_release(&mut self, tracking_id: u8) {
        self.reports
            .push(InputReport::Touch(crate::event::TouchEvent::released(tracking_id)));
    }

    fn frame_sync(&mut self) {
        self.reports.push(InputReport::Sync);
    }

    fn set_axis_range(&mut self, max_x: u16, max_y: u16) {
        self.reports.push(InputReport::AxisRange { max_x, max_y });
    }
}

/// Bus returning at most `limit` bytes per read, as if the transfer was cut.
pub struct ShortReadBus<R> {
    inner: R,
    limit: usize,
}

impl<R> ShortReadBus<R> {
    pub fn new(inner: R, limit: usize) -> Self {
        Self { inner, limit }
    }
}

impl<R: RegisterBus> RegisterBus for ShortReadBus<R> {
    const MAX_BURST: usize = R::MAX_BURST;

    async fn write(&mut self, reg: u8, bytes: &[u8]) -> Result<usize, BusError> {
        self.inner.write(reg, bytes).await
    }

    async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<usize, BusError> {
        let len = buf.len().min(self.limit);
        self.inner.read(reg, &mut buf[..len]).await
    }
}

/// Fills the whole buffer but claims `extra` more bytes than it holds.
pub struct OvercountBus<R> {
    inner: R,
    extra: usize,
}

impl<R> OvercountBus<R> {
    pub fn new(inner: R, extra: usize) -> Self {
        Self { inner, extra }
    }
}

impl<R: RegisterBus> RegisterBus for OvercountBus<R> {
    const MAX_BURST: usize = R::MAX_BURST;

    async fn write(&mut self, reg: u8, bytes: &[u8]) -> Result<usize, BusError> {
        self.inner.write(reg, bytes).await
    }

    async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<usize, BusError> {
        let read = self.inner.read(reg, buf).await?;
        Ok(read + self.extra)
    }
}

/// Builds an output block with `flags` and the given
/// `(slot, x, y, pressure)` samples.
pub fn frame_with(flags: u8, contacts: &[(usize, u16, u16, u8)]) -> RawFrame {
    let mut raw: RawFrame = [0; FRAME_LEN];
    raw[MAP.flags as usize] = flags;
    for &(slot, x, y, pressure) in contacts {
        let regs = &MAP.contacts[slot];
        let [x_h, x_l] = x.to_be_bytes();
        let [y_h, y_l] = y.to_be_bytes();
        raw[regs.x_h as usize] = x_h;
        raw[regs.x_l as usize] = x_l;
        raw[regs.y_h as usize] = y_h;
        raw[regs.y_l as usize] = y_l;
        raw[regs.pressure as usize] = pressure;
    }
    raw
}
