//! Window-side plumbing: keyboard commands, display sinks and screenshots

mod input;
mod screenshot;
mod sink;

pub use input::*;
pub use screenshot::*;
pub use sink::*;
