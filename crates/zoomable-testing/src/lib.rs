//! Testing utilities for zoomable surfaces
//!
//! [`TouchInjector`] and [`MouseInjector`] play scripted input into pointer
//! input nodes the way a platform would: every batch lists all pointers that
//! are down, time only moves when the script says so, and pending gesture
//! deadlines fire as the clock passes them.

mod injector;
mod timeline;

pub use injector::{MouseInjector, TouchInjector, EVENT_PERIOD_MILLIS};

pub mod prelude {
    pub use crate::injector::{MouseInjector, TouchInjector, EVENT_PERIOD_MILLIS};
}
