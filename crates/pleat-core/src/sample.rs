//! Transport of the newest [`ControlSample`] from the estimator to the frame loop.
//!
//! The estimator pushes, the frame loop pulls; pulling never blocks and only
//! the most recent sample matters. Threaded estimators use
//! [`sample_channel`]; single-threaded hosts (the web front-end) use
//! [`SharedSample`].

use crate::hand::ControlSample;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Anything the frame loop can pull the latest hand sample from.
pub trait SampleSource {
    /// Latest sample, or the previous one again if nothing new arrived.
    fn latest(&mut self) -> ControlSample;
}

type Slot = Mutex<Option<ControlSample>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<ControlSample>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Single-slot channel: each push overwrites the unread sample, so an
/// estimator that runs ahead of the frame loop never queues anything up.
pub fn sample_channel() -> (SampleSender, SampleReceiver) {
    let slot = Arc::new(Mutex::new(None));
    (
        SampleSender {
            slot: Arc::downgrade(&slot),
        },
        SampleReceiver {
            slot,
            last: ControlSample::UNTRACKED,
            connected: true,
        },
    )
}

#[derive(Clone)]
pub struct SampleSender {
    slot: Weak<Slot>,
}

impl SampleSender {
    /// Returns `false` once the receiving side is gone.
    pub fn push(&self, sample: ControlSample) -> bool {
        let Some(slot) = self.slot.upgrade() else {
            return false;
        };
        *lock(&slot) = Some(sample);
        true
    }
}

pub struct SampleReceiver {
    slot: Arc<Slot>,
    last: ControlSample,
    connected: bool,
}

impl SampleReceiver {
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// A sample was pushed since the last [`SampleSource::latest`].
    pub fn has_pending(&self) -> bool {
        lock(&self.slot).is_some()
    }
}

impl SampleSource for SampleReceiver {
    fn latest(&mut self) -> ControlSample {
        if let Some(sample) = lock(&self.slot).take() {
            self.last = sample;
        }
        // senders hold the only weak references
        if Arc::weak_count(&self.slot) == 0 {
            if self.connected {
                log::info!("[hand] estimator disconnected; pointer-only control");
                self.connected = false;
            }
            // a vanished estimator must not leave a stale fist behind
            self.last = ControlSample::UNTRACKED;
        }
        self.last
    }
}

/// Single-threaded latest-value cell: written by the estimator callback,
/// read by the frame loop on the same thread.
#[derive(Clone, Default)]
pub struct SharedSample(Rc<RefCell<ControlSample>>);

impl SharedSample {
    pub fn set(&self, sample: ControlSample) {
        *self.0.borrow_mut() = sample;
    }

    pub fn get(&self) -> ControlSample {
        *self.0.borrow()
    }
}

impl SampleSource for SharedSample {
    fn latest(&mut self) -> ControlSample {
        self.get()
    }
}
