//! Animation system for the zoomable crates
//!
//! Provides [`Animatable`], a scalar animated by tweens, springs or decay
//! curves on a [`zoomable_core::FrameClock`].
//!
//! Note: `Animatable` uses camelCase for `animateTo`, `snapTo` and
//! `animateDecay` to keep the Jetpack Compose vocabulary.

#![allow(non_snake_case)]

mod animatable;
mod animation;
mod decay_spec;

pub use animatable::*;
pub use animation::*;
pub use decay_spec::*;
