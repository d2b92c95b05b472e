use crate::collections::map::HashMap;
use std::cell::RefCell;
use std::rc::Rc;

pub type FrameCallbackId = u64;

type FrameCallback = Box<dyn FnOnce(u64)>;

#[derive(Default)]
struct FrameClockInner {
    next_id: FrameCallbackId,
    callbacks: HashMap<FrameCallbackId, FrameCallback>,
    last_frame_nanos: Option<u64>,
}

/// Registry of one-shot callbacks that run on the next rendered frame.
///
/// Single-threaded: clones share the same registry. The host calls
/// [`FrameClock::drain_frame_callbacks`] with a monotonic frame time.
#[derive(Clone, Default)]
pub struct FrameClock {
    inner: Rc<RefCell<FrameClockInner>>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.callbacks.insert(id, Box::new(callback));
            id
        };
        FrameCallbackRegistration::new(self.clone(), id)
    }

    pub fn has_pending_frame_callbacks(&self) -> bool {
        !self.inner.borrow().callbacks.is_empty()
    }

    pub fn pending_frame_callbacks(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }

    /// Time of the most recently drained frame.
    pub fn last_frame_nanos(&self) -> Option<u64> {
        self.inner.borrow().last_frame_nanos
    }

    /// Runs every callback registered before this call, in registration
    /// order, and returns how many ran.
    ///
    /// Callbacks registered while draining wait for the next frame. A callback
    /// cancelled by an earlier one in the same frame does not run.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) -> usize {
        let mut ids: Vec<FrameCallbackId> = {
            let mut inner = self.inner.borrow_mut();
            inner.last_frame_nanos = Some(frame_time_nanos);
            inner.callbacks.keys().copied().collect()
        };
        ids.sort_unstable();

        let mut ran = 0;
        for id in ids {
            let callback = self.inner.borrow_mut().callbacks.remove(&id);
            if let Some(callback) = callback {
                callback(frame_time_nanos);
                ran += 1;
            }
        }
        log::trace!("frame {frame_time_nanos}: ran {ran} callbacks");
        ran
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        // Dropped outside the borrow: the callback may own registrations of its own.
        let removed = self.inner.borrow_mut().callbacks.remove(&id);
        drop(removed);
    }
}

/// Handle to a pending frame callback. Dropping it cancels the callback.
pub struct FrameCallbackRegistration {
    clock: FrameClock,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    fn new(clock: FrameClock, id: FrameCallbackId) -> Self {
        Self {
            clock,
            id: Some(id),
        }
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.clock.cancel_frame_callback(id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.clock.cancel_frame_callback(id);
        }
    }
}

#[cfg(test)]
#[path = "tests/frame_clock_tests.rs"]
mod tests;
