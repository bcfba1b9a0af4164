//! Contracts between the runtime loop and the application.
//!
//! The runtime owns the window, GPU and frame clock; the application owns its
//! session state and is driven through [`App`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
