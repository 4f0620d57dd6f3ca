//! Combat components

pub mod hit_record;
pub mod hit_volume;
pub mod lifecycle;

// Re-export all components
pub use hit_record::*;
pub use hit_volume::*;
pub use lifecycle::*;
