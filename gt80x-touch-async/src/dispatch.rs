//! Hand-off from the interrupt line to the device task.
//!
//! The interrupt side only flips an atomic gate and drops a token into a
//! capacity-1 channel; the device task does all bus work. While a cycle is
//! being serviced the gate is closed. The first edge arriving in that window
//! is latched and replayed as one more cycle when the device task re-arms;
//! further edges are coalesced into it.

use core::convert::Infallible;
use core::sync::atomic::{AtomicU8, Ordering};

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embedded_hal_async::digital::Wait;

const ARMED: u8 = 0;
const SERVICING: u8 = 1;
const MASKED: u8 = 2;
const SERVICING_PENDING: u8 = 3;

/// Gate state of the interrupt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// The next edge schedules a service cycle.
    Armed,
    /// A cycle is queued or running; the next edge is latched.
    Servicing,
    /// A cycle is queued or running and one more edge is latched behind it.
    Pending,
    /// The device is suspended or removed; edges are ignored.
    Masked,
}

/// Power transition requested by the host's power manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerRequest {
    /// Stop servicing and cut power.
    Suspend,
    /// Run the bring-up sequence again and resume servicing.
    Resume,
}

/// Next thing the device task has to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Work {
    /// Read and decode one frame.
    Service,
    /// Handle a power transition.
    Power(PowerRequest),
}

/// Single-flight dispatcher shared by the interrupt side and one device task.
///
/// Usually placed in a `static`:
///
/// ```ignore
/// static TOUCH: Dispatcher<CriticalSectionRawMutex> = Dispatcher::new();
/// ```
pub struct Dispatcher<M: RawMutex> {
    state: AtomicU8,
    work: Channel<M, (), 1>,
    power: Signal<M, PowerRequest>,
}

impl<M: RawMutex> Default for Dispatcher<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> Dispatcher<M> {
    /// An armed dispatcher with nothing queued.
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(ARMED),
            work: Channel::new(),
            power: Signal::new(),
        }
    }

    /// Current gate state.
    pub fn state(&self) -> DispatchState {
        match self.state.load(Ordering::Acquire) {
            ARMED => DispatchState::Armed,
            SERVICING => DispatchState::Servicing,
            SERVICING_PENDING => DispatchState::Pending,
            _ => DispatchState::Masked,
        }
    }

    /// Interrupt edge. Never blocks and never touches the bus.
    ///
    /// Returns `true` if the edge scheduled a service cycle right away,
    /// `false` if it was latched behind the running cycle, coalesced into an
    /// already latched one, or the line is masked.
    pub fn on_edge(&self) -> bool {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let next = match current {
                ARMED => SERVICING,
                SERVICING => SERVICING_PENDING,
                _ => return false,
            };
            match self
                .state
                .compare_exchange(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) if next == SERVICING => {
                    // A token sent after a racing `mask` is dropped by `next`
                    // and `unmask`.
                    let _ = self.work.try_send(());
                    return true;
                }
                Ok(_) => return false,
                Err(actual) => current = actual,
            }
        }
    }

    /// Asks the device task to suspend. Latest request wins.
    pub fn request_suspend(&self) {
        self.power.signal(PowerRequest::Suspend);
    }

    /// Asks the device task to resume. Latest request wins.
    pub fn request_resume(&self) {
        self.power.signal(PowerRequest::Resume);
    }

    /// Waits for the next unit of work. Power requests take precedence over
    /// a queued service cycle. Service tokens found while masked are dropped.
    pub async fn next(&self) -> Work {
        loop {
            if let Some(request) = self.power.try_take() {
                return Work::Power(request);
            }
            match select(self.power.wait(), self.work.receive()).await {
                Either::First(request) => return Work::Power(request),
                Either::Second(()) if self.state() == DispatchState::Masked => {
                    log::trace!("stale service token dropped");
                }
                Either::Second(()) => return Work::Service,
            }
        }
    }

    /// Ends a service cycle. Arms the line, or queues one more cycle if an
    /// edge was latched meanwhile. Does nothing while masked.
    pub fn rearm(&self) {
        if self
            .state
            .compare_exchange(SERVICING_PENDING, SERVICING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let _ = self.work.try_send(());
            return;
        }
        let _ = self
            .state
            .compare_exchange(SERVICING, ARMED, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Stops edges from scheduling work and drops any queued cycle.
    pub fn mask(&self) {
        self.state.store(MASKED, Ordering::Release);
        while self.work.try_receive().is_ok() {}
    }

    /// Re-enables the line after [`Dispatcher::mask`].
    pub fn unmask(&self) {
        if self.state.load(Ordering::Acquire) != MASKED {
            return;
        }
        while self.work.try_receive().is_ok() {}
        let _ = self
            .state
            .compare_exchange(MASKED, ARMED, Ordering::AcqRel, Ordering::Acquire);
    }
}

/// Forwards rising edges of the controller's interrupt pin to `dispatcher`.
///
/// Only returns if the pin reports an error.
pub async fn watch_edges<P, M>(pin: &mut P, dispatcher: &Dispatcher<M>) -> Result<Infallible, P::Error>
where
    P: Wait,
    M: RawMutex,
{
    loop {
        pin.wait_for_rising_edge().await?;
        if !dispatcher.on_edge() {
            log::trace!("edge deferred ({:?})", dispatcher.state());
        }
    }
}
