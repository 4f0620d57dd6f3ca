//! AI systems: sensing + controller tick, hit / damage reactions

pub mod fsm;
pub mod reactions;

// Re-export all systems
pub use fsm::*;
pub use reactions::*;
