//! gpudraw engine crate.
//!
//! Platform + GPU runtime pieces for a single-mesh wgpu viewer: device and
//! surface setup, the window loop, asset loading, transform math, and the
//! renderer that issues one draw call per frame.

pub mod assets;
pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;
