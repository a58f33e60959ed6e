//! Touch events and the sink they are reported to.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;

use crate::regmap::NB_CONTACTS;

/// Whether a contact is still down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The contact is down at the given position.
    Move,
    /// The contact was lifted.
    Release,
}

/// A single contact report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchEvent {
    /// Contact slot, stable for as long as the finger stays down.
    pub tracking_id: u8,
    /// X coordinate. Zero for releases.
    pub x: u16,
    /// Y coordinate. Zero for releases.
    pub y: u16,
    /// Contact pressure. Zero for releases.
    pub pressure: u8,
    /// Move or release.
    pub phase: Phase,
}

impl TouchEvent {
    /// A contact down at `(x, y)`.
    pub fn moved(tracking_id: u8, x: u16, y: u16, pressure: u8) -> Self {
        Self {
            tracking_id,
            x,
            y,
            pressure,
            phase: Phase::Move,
        }
    }

    /// A contact lifted.
    pub fn released(tracking_id: u8) -> Self {
        Self {
            tracking_id,
            x: 0,
            y: 0,
            pressure: 0,
            phase: Phase::Release,
        }
    }
}

/// The input subsystem consuming touch reports.
///
/// Reports between two [`TouchSink::frame_sync`] calls belong to the same
/// sampled instant.
pub trait TouchSink {
    /// A contact is down at `(x, y)`.
    fn report_contact(&mut self, tracking_id: u8, x: u16, y: u16, pressure: u8);

    /// A contact was lifted.
    fn report_release(&mut self, tracking_id: u8);

    /// Closes the current batch of reports.
    fn frame_sync(&mut self);

    /// Announces the coordinate range, once per successful probe.
    fn set_axis_range(&mut self, _max_x: u16, _max_y: u16) {}

    /// Forwards `event` to [`TouchSink::report_contact`] or [`TouchSink::report_release`].
    fn report(&mut self, event: TouchEvent) {
        match event.phase {
            Phase::Move => self.report_contact(event.tracking_id, event.x, event.y, event.pressure),
            Phase::Release => self.report_release(event.tracking_id),
        }
    }
}

/// Everything a [`TouchSink`] can be told, as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputReport {
    /// A contact report.
    Touch(TouchEvent),
    /// End of a batch.
    Sync,
    /// Coordinate range of the panel.
    AxisRange {
        /// Largest X coordinate.
        max_x: u16,
        /// Largest Y coordinate.
        max_y: u16,
    },
}

/// A [`TouchSink`] forwarding reports into a channel for a consumer task.
///
/// Contact reports are held back until [`TouchSink::frame_sync`] and then
/// sent together with the sync marker. A batch that does not fit into the
/// channel's free space is dropped whole, with a warning, so the consumer
/// never sees a frame with a sync but without some of its contacts.
pub struct ChannelSink<'a, M: RawMutex, const N: usize> {
    channel: &'a Channel<M, InputReport, N>,
    batch: Vec<TouchEvent, NB_CONTACTS>,
    overflowed: bool,
}

impl<'a, M: RawMutex, const N: usize> ChannelSink<'a, M, N> {
    /// Creates a sink feeding `channel`.
    pub fn new(channel: &'a Channel<M, InputReport, N>) -> Self {
        Self {
            channel,
            batch: Vec::new(),
            overflowed: false,
        }
    }

    fn hold(&mut self, event: TouchEvent) {
        if self.batch.push(event).is_err() {
            self.overflowed = true;
        }
    }

    fn flush(&mut self) {
        let needed = self.batch.len() + 1;
        if self.overflowed || self.channel.free_capacity() < needed {
            log::warn!("Input channel full, dropping frame of {needed} reports");
        } else {
            for event in self.batch.iter() {
                let _ = self.channel.try_send(InputReport::Touch(*event));
            }
            let _ = self.channel.try_send(InputReport::Sync);
        }
        self.batch.clear();
        self.overflowed = false;
    }
}

impl<M: RawMutex, const N: usize> TouchSink for ChannelSink<'_, M, N> {
    fn report_contact(&mut self, tracking_id: u8, x: u16, y: u16, pressure: u8) {
        self.hold(TouchEvent::moved(tracking_id, x, y, pressure));
    }

    fn report_release(&mut self, tracking_id: u8) {
        self.hold(TouchEvent::released(tracking_id));
    }

    fn frame_sync(&mut self) {
        self.flush();
    }

    fn set_axis_range(&mut self, max_x: u16, max_y: u16) {
        let report = InputReport::AxisRange { max_x, max_y };
        if self.channel.try_send(report).is_err() {
            log::warn!("Input channel full, dropping {report:?}");
        }
    }
}
