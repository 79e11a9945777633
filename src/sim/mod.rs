//! Deterministic simulation module
//!
//! Everything the animation computes lives here. This module must be pure
//! and deterministic:
//! - Advances only from elapsed-milliseconds pushes
//! - Seeded RNG only, drawn once at startup for population attributes
//! - Timers count simulated time, not wall clocks
//! - No rendering or platform dependencies

pub mod color;
pub mod ease;
pub mod graph;
pub mod state;
pub mod tick;
pub mod timer;

pub use color::{ColorRamp, Rgb};
pub use graph::{connect_nodes, node_distance};
pub use state::{Entity, Flair, Node, Space};
pub use tick::{FrameInput, Wormhole};
pub use timer::TimerBank;
