//! Combat systems

pub mod hit_volume;
pub mod lifecycle;


// Re-export all systems
pub use hit_volume::*;
pub use lifecycle::*;
