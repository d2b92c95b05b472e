use zoomable_foundation::{PointerDispatcher, PointerEvent, PointerInputNode};
use zoomable_ui_graphics::Size;

/// Virtual input clock plus the batches queued against it.
pub(crate) struct Timeline {
    pub(crate) now: u64,
    pub(crate) bounds: Size,
    dispatcher: PointerDispatcher,
}

impl Timeline {
    pub(crate) fn new(bounds: Size) -> Self {
        Self {
            now: 0,
            bounds,
            dispatcher: PointerDispatcher::new(),
        }
    }

    pub(crate) fn push(&mut self, event: PointerEvent) {
        self.dispatcher.push(event);
    }

    /// Delivers the queued batches over `path`, then lets the clock catch up
    /// to `now` so deadlines that passed after the last batch fire too.
    pub(crate) fn flush(&mut self, path: &mut [&mut dyn PointerInputNode]) -> Vec<PointerEvent> {
        let delivered = self.dispatcher.dispatch_pending(path, self.bounds);
        PointerDispatcher::fire_timeouts(path, self.now);
        delivered
    }
}
