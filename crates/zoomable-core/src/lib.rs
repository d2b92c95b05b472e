//! Core runtime pieces for the zoomable crates
//!
//! The host owns a [`FrameClock`] and drains it once per rendered frame;
//! animations register one-shot frame callbacks on it.

pub mod collections;
mod frame_clock;

pub use frame_clock::*;
