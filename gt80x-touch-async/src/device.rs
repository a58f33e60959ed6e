//! Device lifecycle and the service loop.

use embedded_hal_async::delay::DelayNs;
use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::board::{power, Board};
use crate::bringup::startup;
use crate::config::Config;
use crate::decode::{decode, RawFrame};
use crate::dispatch::{Dispatcher, PowerRequest, Work};
use crate::error::{BringupError, BusError, DecodeError, ServiceError};
use crate::event::TouchSink;
use crate::regmap::{FRAME_LEN, REG_OUTPUT_BASE, REG_X_MAX, REG_Y_MAX};
use crate::tracker::Tracker;
use crate::transport::RegisterBus;

/// A probed GT80x controller.
///
/// Owns the bus, the board lines, a delay source and the sink receiving
/// touch reports. Contact state lives here and is only touched by the task
/// driving [`Gt80x::run`] (or [`Gt80x::step`]).
pub struct Gt80x<R, B, D, S> {
    bus: R,
    board: B,
    delay: D,
    sink: S,
    config: Config,
    tracker: Tracker,
}

impl<R, B, D, S> Gt80x<R, B, D, S>
where
    R: RegisterBus,
    B: Board,
    D: DelayNs,
    S: TouchSink,
{
    /// Brings the controller up and announces its axis ranges to `sink`.
    ///
    /// On failure the controller is powered down and every part is dropped.
    pub async fn probe(
        mut bus: R,
        mut board: B,
        mut delay: D,
        mut sink: S,
        config: Config,
    ) -> Result<Self, BringupError> {
        log::debug!("gt80x::probe {config:?}");

        if let Err(err) = startup(&mut bus, &mut board, &mut delay, &config).await {
            power(&mut board, false);
            return Err(err);
        }

        let (max_x, max_y) = match read_axis_range(&mut bus).await {
            Ok(range) => range,
            Err(err) => {
                log::error!("Error reading axis range: {err}");
                power(&mut board, false);
                return Err(BringupError::ConfigFailed);
            }
        };
        if config.swap_xy {
            sink.set_axis_range(max_y, max_x);
        } else {
            sink.set_axis_range(max_x, max_y);
        }

        log::debug!("gt80x::probe done, range {max_x}x{max_y}");
        Ok(Self {
            bus,
            board,
            delay,
            sink,
            config,
            tracker: Tracker::new(),
        })
    }

    /// Masks the interrupt, powers the controller down and gives the parts
    /// back.
    pub fn remove<M: RawMutex>(mut self, dispatcher: &Dispatcher<M>) -> (R, B, D, S) {
        dispatcher.mask();
        power(&mut self.board, false);
        log::debug!("gt80x::remove");
        (self.bus, self.board, self.delay, self.sink)
    }

    /// Stops servicing and cuts power.
    ///
    /// Takes `&mut self`, so no service cycle can be in flight.
    pub fn suspend<M: RawMutex>(&mut self, dispatcher: &Dispatcher<M>) {
        dispatcher.mask();
        power(&mut self.board, false);
        log::debug!("gt80x::suspend");
    }

    /// Re-runs bring-up and re-enables the interrupt, even if bring-up failed.
    pub async fn resume<M: RawMutex>(&mut self, dispatcher: &Dispatcher<M>) -> Result<(), BringupError> {
        let res = startup(&mut self.bus, &mut self.board, &mut self.delay, &self.config).await;
        if let Err(err) = &res {
            log::error!("Resume failed: {err}");
        }
        dispatcher.unmask();
        res
    }

    /// One poll: burst read, decode, update contacts. Nothing is reported if
    /// the read fails or comes back short.
    pub async fn service(&mut self) -> Result<(), ServiceError> {
        let mut raw: RawFrame = [0; FRAME_LEN];
        let read = self.bus.read(REG_OUTPUT_BASE, &mut raw).await?;
        let frame = decode(raw.get(..read).ok_or(DecodeError::ShortRead)?, self.config.swap_xy)?;
        self.tracker.update(&frame, &mut self.sink);
        Ok(())
    }

    /// Waits for and handles one unit of work from `dispatcher`.
    pub async fn step<M: RawMutex>(&mut self, dispatcher: &Dispatcher<M>) {
        match dispatcher.next().await {
            Work::Service => {
                if let Err(err) = self.service().await {
                    log::warn!("Could not read output registers: {err}");
                }
                dispatcher.rearm();
            }
            Work::Power(PowerRequest::Suspend) => self.suspend(dispatcher),
            Work::Power(PowerRequest::Resume) => {
                // Already logged; servicing continues degraded.
                let _ = self.resume(dispatcher).await;
            }
        }
    }

    /// Serves `dispatcher` forever.
    pub async fn run<M: RawMutex>(&mut self, dispatcher: &Dispatcher<M>) -> ! {
        loop {
            self.step(dispatcher).await;
        }
    }

    /// Contact tracking state.
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// The configuration the device was probed with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The sink receiving touch reports.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the sink receiving touch reports.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The 7-bit bus address of the controller.
    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// Largest burst the transport can move in one transaction.
    pub fn max_burst(&self) -> usize {
        R::MAX_BURST
    }
}

async fn read_axis_range<R: RegisterBus>(bus: &mut R) -> Result<(u16, u16), BusError> {
    let max_x = bus.read_u16(REG_X_MAX).await?;
    let max_y = bus.read_u16(REG_Y_MAX).await?;
    Ok((max_x, max_y))
}
