//! Horizontal slide carousel.
//!
//! [`SliderState`] holds the index and the animation/drag flags and knows
//! nothing about the DOM. [`Slider`] binds it to a `[data-slider]` root:
//! arrow buttons, keyboard, progress-bar clicks, indicator drags and
//! native track scrolling all funnel into the same state machine, and a
//! programmatic scroll keeps both arrows disabled until the track settles.

mod controller;
mod state;

pub use controller::{Slider, SliderConfig, DRAGGING_CLASS};
pub use state::{Arrows, SliderState};
