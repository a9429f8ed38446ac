//! Command handlers

pub mod describe;
pub mod play;
pub mod presets;

pub use describe::*;
pub use play::*;
pub use presets::*;
