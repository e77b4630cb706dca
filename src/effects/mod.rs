//! Per-page visual effects.
//!
//! Each effect exposes a `setup` that binds whatever it finds in the
//! current document and returns a [`Disposer`](crate::lifecycle::Disposer)
//! releasing it. Pages without the relevant markup get a no-op.

pub mod drag_scroll;
pub mod header;
pub mod horizontal_scroll;
pub mod magnetic;
pub mod text_reveal;

pub use drag_scroll::DragScrollConfig;
pub use magnetic::MagneticConfig;
pub use text_reveal::{RevealConfig, RevealTrigger};
