//! Rendering module
//!
//! The simulation draws through the [`Surface`] capability and never touches
//! the host directly. `scene` walks the state in stacking order; `canvas2d`
//! backs the capability with a real CanvasRenderingContext2d on wasm, and
//! [`RecordingSurface`] captures the op stream for tests and headless runs.

pub mod scene;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub mod canvas2d;

pub use scene::render_frame;
pub use surface::{Op, RecordingSurface, Surface};

#[cfg(target_arch = "wasm32")]
pub use canvas2d::CanvasSurface;
