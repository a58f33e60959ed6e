//! Per-contact press/release tracking.

use crate::decode::Frame;
use crate::event::{TouchEvent, TouchSink};
use crate::regmap::NB_CONTACTS;

/// Whether a contact slot is currently down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactState {
    /// No finger in this slot.
    #[default]
    Released,
    /// A finger is down in this slot.
    Pressed,
}

/// Remembers which slots are down and turns decoded frames into events.
#[derive(Debug, Clone)]
pub struct Tracker {
    states: [ContactState; NB_CONTACTS],
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker {
    /// All slots released.
    pub const fn new() -> Self {
        Self {
            states: [ContactState::Released; NB_CONTACTS],
        }
    }

    /// Current state of slot `index`.
    pub fn state(&self, index: usize) -> ContactState {
        self.states[index]
    }

    /// All slot states, indexed by tracking id.
    pub fn states(&self) -> &[ContactState; NB_CONTACTS] {
        &self.states
    }

    /// Applies one decoded frame, in ascending slot order, then closes the
    /// batch with a frame sync.
    ///
    /// A slot whose flag goes up reports its position in the same frame. A
    /// slot only releases when its flag is seen low; nothing is inferred
    /// from missing frames.
    pub fn update<S: TouchSink>(&mut self, frame: &Frame, sink: &mut S) {
        for (index, (state, sample)) in self
            .states
            .iter_mut()
            .zip(frame.contacts.iter())
            .enumerate()
        {
            let tracking_id = index as u8;

            if *state == ContactState::Released && sample.pressed {
                log::trace!("contact {tracking_id} down");
                *state = ContactState::Pressed;
            }

            if *state == ContactState::Pressed {
                if sample.pressed {
                    sink.report(TouchEvent::moved(
                        tracking_id,
                        sample.x,
                        sample.y,
                        sample.pressure,
                    ));
                } else {
                    log::trace!("contact {tracking_id} up");
                    sink.report(TouchEvent::released(tracking_id));
                    *state = ContactState::Released;
                }
            }
        }

        sink.frame_sync();
    }
}
