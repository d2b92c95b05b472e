//! Pointer input dispatcher plumbing.
//!
//! Platform integrations enqueue batches; the dispatcher runs each batch
//! through the three passes over the hit path of nodes, outermost first.

use super::types::{PointerEvent, PointerEventPass};
use crate::modifier::PointerInputNode;
use smallvec::SmallVec;
use zoomable_ui_graphics::Size;

/// What the handlers on a path did with one batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchResult {
    /// Some handler reported consuming during one of the passes.
    pub handled: bool,
    /// Indices into the batch's `changes` that were claimed by this dispatch.
    /// Changes that arrived already consumed are not listed.
    pub claimed: SmallVec<[usize; 2]>,
}

impl DispatchResult {
    pub fn is_claimed(&self, index: usize) -> bool {
        self.claimed.contains(&index)
    }
}

#[derive(Default)]
pub struct PointerDispatcher {
    queue: Vec<PointerEvent>,
}

impl PointerDispatcher {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    pub fn push(&mut self, event: PointerEvent) {
        self.queue.push(event);
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Dispatches every queued batch over `path` and returns them with the
    /// consumption the handlers left on them.
    pub fn dispatch_pending(
        &mut self,
        path: &mut [&mut dyn PointerInputNode],
        bounds: Size,
    ) -> Vec<PointerEvent> {
        let mut delivered = Vec::with_capacity(self.queue.len());
        for mut event in self.queue.drain(..) {
            Self::dispatch(&mut event, path, bounds);
            delivered.push(event);
        }
        delivered
    }

    /// Runs one batch through `Initial` (outer to inner), `Main` (inner to
    /// outer) and `Final` (outer to inner). `path[0]` is the outermost node.
    ///
    /// Timers that expire by the batch's uptime fire first, so a deadline
    /// always wins over a batch that arrives at or after it.
    pub fn dispatch(
        event: &mut PointerEvent,
        path: &mut [&mut dyn PointerInputNode],
        bounds: Size,
    ) -> DispatchResult {
        Self::fire_timeouts(path, event.uptime());

        let arrived_consumed: SmallVec<[bool; 2]> =
            event.changes.iter().map(|c| c.is_consumed()).collect();
        let mut handled = false;
        for node in path.iter_mut() {
            handled |= node.on_pointer_event(event, PointerEventPass::Initial, bounds);
        }
        for node in path.iter_mut().rev() {
            handled |= node.on_pointer_event(event, PointerEventPass::Main, bounds);
        }
        for node in path.iter_mut() {
            handled |= node.on_pointer_event(event, PointerEventPass::Final, bounds);
        }

        let claimed = event
            .changes
            .iter()
            .enumerate()
            .filter(|(index, change)| {
                change.is_consumed() && !arrived_consumed.get(*index).copied().unwrap_or(false)
            })
            .map(|(index, _)| index)
            .collect();
        DispatchResult { handled, claimed }
    }

    /// Fires every deadline at or before `uptime_millis`.
    pub fn fire_timeouts(path: &mut [&mut dyn PointerInputNode], uptime_millis: u64) {
        for node in path.iter_mut() {
            if node
                .next_deadline()
                .is_some_and(|deadline| deadline <= uptime_millis)
            {
                node.on_timeout(uptime_millis);
            }
        }
    }

    /// Earliest pending deadline along `path`.
    pub fn next_deadline(path: &[&mut dyn PointerInputNode]) -> Option<u64> {
        path.iter().filter_map(|node| node.next_deadline()).min()
    }
}
